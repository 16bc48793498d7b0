//! Event pumping
//!
//! Feeds a channel's inbound events into its room session.

use huddle_core::{Channel, RoomSession};
use tracing::debug;

use crate::hub::EventStream;

/// Apply every event already queued, without waiting. Returns how many
/// were applied.
pub fn drain<C: Channel>(session: &mut RoomSession<C>, events: &mut EventStream) -> usize {
    let mut applied = 0;
    while let Ok(event) = events.try_recv() {
        session.handle_event(event);
        applied += 1;
    }
    applied
}

/// Apply events until the stream ends
pub async fn run_until_closed<C: Channel>(
    session: &mut RoomSession<C>,
    events: &mut EventStream,
) -> usize {
    let mut applied = 0;
    while let Some(event) = events.recv().await {
        session.handle_event(event);
        applied += 1;
    }
    debug!(room = %session.room_id(), applied, "Event stream closed");
    applied
}
