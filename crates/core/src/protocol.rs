//! Room wire protocol
//!
//! Presence payloads are [`Member`](crate::models::Member) values. Room-wide
//! transitions travel as broadcasts whose event names are fixed strings.

use rand::Rng;
use serde_json::{Map, Value};

use crate::settings::SettingsPatch;

pub const REVEAL_EVENT: &str = "REVEAL";
pub const RESET_EVENT: &str = "RESET";
pub const SETTINGS_EVENT: &str = "SETTINGS";

/// Channel topic for a room
pub fn room_topic(room_id: &str) -> String {
    format!("room:{room_id}")
}

const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ROOM_CODE_LEN: usize = 6;

/// Random six character room code, e.g. `K3Q9ZD`
pub fn new_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Uppercase a typed room code and strip everything but ASCII letters
/// and digits. `None` if nothing is left.
pub fn normalize_room_code(input: &str) -> Option<String> {
    let code: String = input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    (!code.is_empty()).then_some(code)
}

/// Room broadcast events
#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastEvent {
    /// Show every vote
    Reveal,
    /// Hide votes and clear them
    Reset,
    /// Partial settings update
    Settings(SettingsPatch),
}

impl BroadcastEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BroadcastEvent::Reveal => REVEAL_EVENT,
            BroadcastEvent::Reset => RESET_EVENT,
            BroadcastEvent::Settings(_) => SETTINGS_EVENT,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            BroadcastEvent::Reveal | BroadcastEvent::Reset => Value::Object(Map::new()),
            BroadcastEvent::Settings(patch) => Value::Object(patch.clone()),
        }
    }

    /// Decode an inbound broadcast. Unknown events and non-object
    /// settings payloads yield `None`.
    pub fn decode(event: &str, payload: &Value) -> Option<Self> {
        match event {
            REVEAL_EVENT => Some(BroadcastEvent::Reveal),
            RESET_EVENT => Some(BroadcastEvent::Reset),
            SETTINGS_EVENT => payload
                .as_object()
                .map(|patch| BroadcastEvent::Settings(patch.clone())),
            _ => None,
        }
    }
}
