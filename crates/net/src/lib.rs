//! Huddle Network Library
//!
//! Transport plumbing for room sessions.
//!
//! # Architecture
//!
//! - **Hub**: In-process pub/sub with presence, one topic per room
//! - **Channel**: A client's handle on a topic, implements `huddle_core::Channel`
//! - **Pump**: Feeds a channel's events into its `RoomSession`
//!
//! # Usage
//!
//! ```ignore
//! let hub = MemoryHub::new();
//! let (mut session, mut events) = hub.join("ABC123", identity, store);
//! session.connect().await;
//!
//! while let Some(event) = events.recv().await {
//!     let view = session.handle_event(event);
//!     /* render view */
//! }
//! ```

pub mod error;
pub mod hub;
pub mod pump;

pub use error::{Error, Result};
pub use hub::{EventStream, MemoryChannel, MemoryHub};
pub use pump::{drain, run_until_closed};
