//! Huddle Core Library
//!
//! Room synchronization engine for serverless planning poker: presence
//! reconciliation, host election, the reveal/reset round, settings sync,
//! and local identity storage. Transport is abstracted behind [`Channel`].

pub mod channel;
pub mod config;
pub mod error;
pub mod hosting;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod presence;
pub mod protocol;
pub mod round;
pub mod session;
pub mod settings;
pub mod storage;
pub mod view;

pub use channel::{Channel, ChannelEvent, RawPresenceState, SubscribeStatus};
pub use config::HuddleConfig;
pub use error::{Error, Result};
pub use hosting::*;
pub use models::*;
pub use permissions::*;
pub use presence::{reconcile, PresenceChange, PresenceTracker};
pub use protocol::{new_room_code, normalize_room_code, room_topic, BroadcastEvent};
pub use round::{Phase, ResetOutcome, Round};
pub use session::{ConnectionState, RoomSession};
pub use settings::{deck_patch, merge_settings, Settings, SettingsPatch};
pub use storage::{
    load_or_create_identity, Database, IdentityRecordStore, IdentityStore, MemoryIdentityStore,
};
pub use view::{MemberView, RoomView, VoteDisplay};
