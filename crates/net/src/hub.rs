//! In-process presence pub/sub hub
//!
//! Every topic keeps a subscriber list and a presence table. Tracking a
//! payload pushes a full presence snapshot to every subscriber of the
//! topic, the tracking client included. Broadcasts reach everyone but the
//! sender.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use huddle_core::{
    room_topic, Channel, ChannelEvent, Identity, IdentityStore, RawPresenceState, RoomSession,
    SubscribeStatus,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::Error;

/// Inbound events for one channel
pub type EventStream = mpsc::UnboundedReceiver<ChannelEvent>;

/// Connected subscriber
struct Subscriber {
    tx: mpsc::UnboundedSender<ChannelEvent>,
    subscribed: bool,
}

/// One tracked presence payload
struct Tracked {
    key: String,
    sequence: u64,
    payload: Value,
}

#[derive(Default)]
struct Topic {
    subscribers: HashMap<u64, Subscriber>,
    /// Keyed by connection, so a reconnecting client briefly shows up
    /// twice under its presence key
    presence: HashMap<u64, Tracked>,
}

impl Topic {
    fn snapshot(&self) -> RawPresenceState {
        let mut tracked: Vec<&Tracked> = self.presence.values().collect();
        tracked.sort_by_key(|t| t.sequence);

        let mut raw = RawPresenceState::new();
        for t in tracked {
            raw.entry(t.key.clone()).or_default().push(t.payload.clone());
        }
        raw
    }

    fn deliver(&mut self, event: &ChannelEvent, except: Option<u64>) {
        self.subscribers.retain(|conn, sub| {
            if !sub.subscribed || Some(*conn) == except {
                return true;
            }
            if sub.tx.send(event.clone()).is_err() {
                debug!(conn, "Dropping subscriber with closed stream");
                return false;
            }
            true
        });
    }

    /// Send to a single subscriber, dropping it if its stream is gone
    fn deliver_to(&mut self, conn: u64, event: ChannelEvent) -> bool {
        let delivered = self
            .subscribers
            .get(&conn)
            .is_some_and(|sub| sub.tx.send(event).is_ok());
        if !delivered && self.subscribers.remove(&conn).is_some() {
            debug!(conn, "Dropping subscriber with closed stream");
        }
        delivered
    }

    fn sync_all(&mut self) {
        let event = ChannelEvent::PresenceSync(self.snapshot());
        self.deliver(&event, None);
    }
}

#[derive(Default)]
struct HubState {
    topics: HashMap<String, Topic>,
    next_conn: u64,
    next_sequence: u64,
    closed: bool,
}

/// In-process pub/sub service with presence
#[derive(Clone, Default)]
pub struct MemoryHub {
    state: Arc<Mutex<HubState>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a channel on `topic` that will track presence under `key`
    pub fn channel(&self, topic: &str, key: &str) -> (MemoryChannel, EventStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.lock();
        state.next_conn += 1;
        let conn = state.next_conn;

        if !state.closed {
            state.topics.entry(topic.to_string()).or_default().subscribers.insert(
                conn,
                Subscriber {
                    tx,
                    subscribed: false,
                },
            );
        }

        let channel = MemoryChannel {
            hub: self.clone(),
            topic: topic.to_string(),
            key: key.to_string(),
            conn,
        };
        (channel, rx)
    }

    /// Build a room session wired to this hub
    pub fn join(
        &self,
        room_id: &str,
        identity: Identity,
        store: Box<dyn IdentityStore>,
    ) -> (RoomSession<MemoryChannel>, EventStream) {
        let (channel, events) = self.channel(&room_topic(room_id), identity.id.as_str());
        (RoomSession::new(room_id, identity, channel, store), events)
    }

    /// Drop every topic and end every event stream
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.topics.clear();
        info!("Hub shut down");
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One client's handle on a hub topic
pub struct MemoryChannel {
    hub: MemoryHub,
    topic: String,
    key: String,
    conn: u64,
}

impl MemoryChannel {
    fn with_topic<T>(
        &self,
        f: impl FnOnce(&mut Topic, &mut u64) -> T,
    ) -> std::result::Result<T, Error> {
        let mut guard = self.hub.lock();
        let state = &mut *guard;
        if state.closed {
            return Err(Error::HubClosed);
        }
        let subscribed = state
            .topics
            .get(&self.topic)
            .and_then(|t| t.subscribers.get(&self.conn))
            .is_some_and(|s| s.subscribed);
        if !subscribed {
            return Err(Error::NotSubscribed(self.topic.clone()));
        }
        match state.topics.get_mut(&self.topic) {
            Some(topic) => Ok(f(topic, &mut state.next_sequence)),
            None => Err(Error::NotSubscribed(self.topic.clone())),
        }
    }
}

impl Channel for MemoryChannel {
    async fn subscribe(&self) -> SubscribeStatus {
        tokio::task::yield_now().await;

        let mut state = self.hub.lock();
        if state.closed {
            return SubscribeStatus::Closed;
        }
        let Some(topic) = state.topics.get_mut(&self.topic) else {
            return SubscribeStatus::Closed;
        };
        let Some(sub) = topic.subscribers.get_mut(&self.conn) else {
            return SubscribeStatus::Closed;
        };
        sub.subscribed = true;

        let snapshot = ChannelEvent::PresenceSync(topic.snapshot());
        if !topic.deliver_to(self.conn, snapshot) {
            return SubscribeStatus::Closed;
        }
        debug!(topic = %self.topic, key = %self.key, "Subscribed");
        SubscribeStatus::Subscribed
    }

    fn track(&self, payload: Value) -> huddle_core::Result<()> {
        let conn = self.conn;
        let key = self.key.clone();
        self.with_topic(|topic, next_sequence| {
            *next_sequence += 1;
            topic.presence.insert(
                conn,
                Tracked {
                    key,
                    sequence: *next_sequence,
                    payload,
                },
            );
            topic.sync_all();
        })?;
        Ok(())
    }

    fn send(&self, event: &str, payload: Value) -> huddle_core::Result<()> {
        let conn = self.conn;
        let event = ChannelEvent::Broadcast {
            event: event.to_string(),
            payload,
        };
        self.with_topic(|topic, _| topic.deliver(&event, Some(conn)))?;
        Ok(())
    }

    fn presence_state(&self) -> RawPresenceState {
        self.hub
            .lock()
            .topics
            .get(&self.topic)
            .map(Topic::snapshot)
            .unwrap_or_default()
    }

    fn unsubscribe(&self) {
        let mut state = self.hub.lock();
        let Some(topic) = state.topics.get_mut(&self.topic) else {
            return;
        };
        if topic.subscribers.remove(&self.conn).is_none() {
            return;
        }
        if topic.presence.remove(&self.conn).is_some() {
            topic.sync_all();
        }
        debug!(topic = %self.topic, key = %self.key, "Unsubscribed");
        if topic.subscribers.is_empty() {
            state.topics.remove(&self.topic);
        }
    }
}

impl Drop for MemoryChannel {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn subscribed(hub: &MemoryHub, key: &str) -> (MemoryChannel, EventStream) {
        let (channel, mut events) = hub.channel("room:T", key);
        assert!(channel.subscribe().await.is_subscribed());
        // initial snapshot
        assert!(matches!(events.try_recv(), Ok(ChannelEvent::PresenceSync(_))));
        (channel, events)
    }

    fn drain(events: &mut EventStream) -> Vec<ChannelEvent> {
        std::iter::from_fn(|| events.try_recv().ok()).collect()
    }

    #[tokio::test]
    async fn test_track_syncs_every_subscriber() {
        let hub = MemoryHub::new();
        let (a, mut a_events) = subscribed(&hub, "a").await;
        let (_b, mut b_events) = subscribed(&hub, "b").await;

        a.track(json!({ "id": "a" })).unwrap();

        let expected = ChannelEvent::PresenceSync(
            [("a".to_string(), vec![json!({ "id": "a" })])].into_iter().collect(),
        );
        assert_eq!(drain(&mut a_events), vec![expected.clone()]);
        assert_eq!(drain(&mut b_events), vec![expected]);
    }

    #[tokio::test]
    async fn test_retrack_replaces_payload() {
        let hub = MemoryHub::new();
        let (a, _events) = subscribed(&hub, "a").await;

        a.track(json!({ "v": 1 })).unwrap();
        a.track(json!({ "v": 2 })).unwrap();

        assert_eq!(a.presence_state()["a"], vec![json!({ "v": 2 })]);
    }

    #[tokio::test]
    async fn test_same_key_twice_lists_both_oldest_first() {
        let hub = MemoryHub::new();
        let (old, _e1) = subscribed(&hub, "a").await;
        let (new, _e2) = subscribed(&hub, "a").await;

        old.track(json!({ "v": "old" })).unwrap();
        new.track(json!({ "v": "new" })).unwrap();

        assert_eq!(
            new.presence_state()["a"],
            vec![json!({ "v": "old" }), json!({ "v": "new" })]
        );
    }

    #[tokio::test]
    async fn test_broadcast_skips_sender() {
        let hub = MemoryHub::new();
        let (a, mut a_events) = subscribed(&hub, "a").await;
        let (_b, mut b_events) = subscribed(&hub, "b").await;

        a.send("REVEAL", json!({})).unwrap();

        assert!(drain(&mut a_events).is_empty());
        assert_eq!(
            drain(&mut b_events),
            vec![ChannelEvent::Broadcast {
                event: "REVEAL".to_string(),
                payload: json!({})
            }]
        );
    }

    #[tokio::test]
    async fn test_writes_before_subscribe_fail() {
        let hub = MemoryHub::new();
        let (channel, _events) = hub.channel("room:T", "a");

        assert!(channel.track(json!({})).is_err());
        assert!(channel.send("RESET", json!({})).is_err());
    }

    #[tokio::test]
    async fn test_subscribe_with_dropped_stream_is_closed() {
        let hub = MemoryHub::new();
        let (channel, events) = hub.channel("room:T", "a");
        drop(events);

        assert_eq!(channel.subscribe().await, SubscribeStatus::Closed);
        assert!(matches!(
            channel.track(json!({})),
            Err(huddle_core::Error::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_drop_removes_presence() {
        let hub = MemoryHub::new();
        let (a, _a_events) = subscribed(&hub, "a").await;
        let (b, mut b_events) = subscribed(&hub, "b").await;
        a.track(json!({ "id": "a" })).unwrap();
        drain(&mut b_events);

        drop(a);

        assert_eq!(
            drain(&mut b_events),
            vec![ChannelEvent::PresenceSync(RawPresenceState::new())]
        );
        assert!(b.presence_state().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_ends_streams() {
        let hub = MemoryHub::new();
        let (a, mut events) = subscribed(&hub, "a").await;

        hub.shutdown();

        assert!(events.recv().await.is_none());
        assert!(a.track(json!({})).is_err());
        let (late, _) = hub.channel("room:T", "b");
        assert_eq!(late.subscribe().await, SubscribeStatus::Closed);
    }
}
