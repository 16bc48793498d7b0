//! Data models for Huddle

mod deck;
mod identity;
mod member;
mod vote;

pub use deck::*;
pub use identity::*;
pub use member::*;
pub use vote::*;
