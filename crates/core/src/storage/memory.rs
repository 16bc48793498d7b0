//! In-memory identity store
//!
//! Used for simulated peers and as the fallback when no database can be
//! opened.

use std::sync::Mutex;

use crate::error::Result;
use crate::models::Identity;
use crate::storage::traits::IdentityStore;

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identity: Mutex<Option<Identity>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: Mutex::new(Some(identity)),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<Option<Identity>> {
        let guard = self.identity.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, identity: &Identity) -> Result<()> {
        let mut guard = self.identity.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(identity.clone());
        Ok(())
    }
}
