//! Pub/sub channel interface
//!
//! The room engine never talks to a concrete transport. It consumes
//! [`ChannelEvent`]s and writes through the [`Channel`] trait, so any
//! presence-capable pub/sub service (a hosted realtime service, the
//! in-process hub in `huddle-net`, a test double) can back a room.

use std::collections::HashMap;
use std::future::Future;

use serde_json::Value;

use crate::error::Result;

/// Presence as reported by the transport: presence key to every payload
/// currently tracked under that key, oldest first.
///
/// A key can carry several payloads at once, e.g. while a client is
/// reconnecting.
pub type RawPresenceState = HashMap<String, Vec<Value>>;

/// Inbound event delivered by the transport
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Presence settled; carries the full current snapshot
    PresenceSync(RawPresenceState),
    /// Fire-and-forget message from another subscriber
    Broadcast { event: String, payload: Value },
}

/// Outcome of a subscription attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeStatus {
    Subscribed,
    TimedOut,
    ChannelError(String),
    Closed,
}

impl SubscribeStatus {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, SubscribeStatus::Subscribed)
    }
}

/// One client's handle on a room topic.
///
/// Writes are fire-and-forget: an `Ok` only means the transport accepted
/// the write, not that peers received it.
pub trait Channel: Send {
    /// Join the topic; resolves once the transport acknowledges
    fn subscribe(&self) -> impl Future<Output = SubscribeStatus> + Send;

    /// Replace this client's tracked presence payload
    fn track(&self, payload: Value) -> Result<()>;

    /// Broadcast `event` to the other subscribers
    fn send(&self, event: &str, payload: Value) -> Result<()>;

    /// Current presence snapshot as seen by this client
    fn presence_state(&self) -> RawPresenceState;

    /// Leave the topic; further writes fail
    fn unsubscribe(&self);
}
