//! Storage traits
//!
//! The room session only needs a get/set capability for the local
//! identity; these traits let it run against SQLite, memory, or anything
//! else a host application provides.

use crate::error::Result;
use crate::models::Identity;

/// Persisted local identity (`{ id, name, role }`)
pub trait IdentityStore: Send {
    /// Load the stored identity, if any
    fn load(&self) -> Result<Option<Identity>>;

    /// Store the identity, replacing any previous one
    fn save(&self, identity: &Identity) -> Result<()>;
}
