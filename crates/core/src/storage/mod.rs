//! SQLite storage layer for Huddle

mod identity;
mod memory;
mod migrations;
mod parse;
mod traits;

use crate::error::Result;
use crate::models::Identity;
use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

pub use identity::{load_or_create_identity, IdentityRecordStore};
pub use memory::MemoryIdentityStore;
pub use traits::IdentityStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get identity store
    pub fn identities(&self) -> IdentityRecordStore<'_> {
        IdentityRecordStore::new(&self.conn)
    }
}

// Lets a Database be handed straight to a room session

impl IdentityStore for Database {
    fn load(&self) -> Result<Option<Identity>> {
        self.identities().load()
    }

    fn save(&self, identity: &Identity) -> Result<()> {
        self.identities().save(identity)
    }
}
