//! Local identity persistence
//!
//! One row: the id, display name and last known role of this client.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{IdGenerator, Identity};
use crate::storage::parse::{parse_member_id, parse_role};
use crate::storage::traits::IdentityStore;

/// Identity store backed by a SQLite connection
pub struct IdentityRecordStore<'a> {
    conn: &'a Connection,
}

impl<'a> IdentityRecordStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Save the local identity (upsert)
    pub fn save(&self, identity: &Identity) -> Result<()> {
        self.conn.execute(
            "INSERT INTO local_identity (slot, id, name, role, updated_at)
             VALUES (0, ?1, ?2, ?3, ?4)
             ON CONFLICT(slot) DO UPDATE SET id = ?1, name = ?2, role = ?3, updated_at = ?4",
            params![
                identity.id.as_str(),
                identity.name,
                identity.role.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Load the local identity
    pub fn load(&self) -> Result<Option<Identity>> {
        let result = self.conn.query_row(
            "SELECT id, name, role FROM local_identity WHERE slot = 0",
            [],
            |row| {
                let id: String = row.get(0)?;
                let name: String = row.get(1)?;
                let role: String = row.get(2)?;
                Ok(Identity {
                    id: parse_member_id(id)?,
                    name,
                    role: parse_role(&role)?,
                })
            },
        );

        match result {
            Ok(identity) => Ok(Some(identity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Load the persisted identity, creating and saving a guest identity on
/// first use.
///
/// Storage failures are not fatal: the client falls back to a fresh
/// ephemeral identity that lives only as long as this process.
pub fn load_or_create_identity(
    store: &dyn IdentityStore,
    ids: &dyn IdGenerator,
    default_name: Option<&str>,
) -> Identity {
    match store.load() {
        Ok(Some(identity)) => {
            debug!(id = %identity.id, "Loaded stored identity");
            return identity;
        }
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "Identity storage unavailable, using ephemeral identity");
            return new_identity(ids, default_name);
        }
    }

    let identity = new_identity(ids, default_name);
    match store.save(&identity) {
        Ok(()) => info!(id = %identity.id, name = %identity.name, "Created local identity"),
        Err(e) => warn!(error = %e, "Failed to persist new identity, continuing without it"),
    }
    identity
}

fn new_identity(ids: &dyn IdGenerator, default_name: Option<&str>) -> Identity {
    let id = ids.next_id();
    match default_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => Identity::new(id, name),
        None => Identity::guest(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{MemberId, Role, SequentialIds};
    use crate::storage::{Database, MemoryIdentityStore};

    struct UnavailableStore;

    impl IdentityStore for UnavailableStore {
        fn load(&self) -> Result<Option<Identity>> {
            Err(Error::NotFound("storage offline".into()))
        }

        fn save(&self, _identity: &Identity) -> Result<()> {
            Err(Error::NotFound("storage offline".into()))
        }
    }

    #[test]
    fn test_identity_save_load() {
        let db = Database::open_in_memory().unwrap();
        let store = IdentityRecordStore::new(&db.conn);

        let mut identity = Identity::new(MemberId::from("u-1"), "Ada");
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity.clone()));

        identity.role = Role::Host;
        identity.name = "Ada L".to_string();
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity));
    }

    #[test]
    fn test_identity_not_found() {
        let db = Database::open_in_memory().unwrap();
        let store = IdentityRecordStore::new(&db.conn);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_or_create_persists_once() {
        let store = MemoryIdentityStore::new();
        let ids = SequentialIds::new("id");

        let first = load_or_create_identity(&store, &ids, None);
        assert_eq!(first.id, MemberId::from("id-0001"));
        assert!(first.name.starts_with("Guest-"));

        let second = load_or_create_identity(&store, &ids, None);
        assert_eq!(second, first);
    }

    #[test]
    fn test_load_or_create_uses_default_name() {
        let store = MemoryIdentityStore::new();
        let ids = SequentialIds::new("id");

        let identity = load_or_create_identity(&store, &ids, Some("  Grace "));
        assert_eq!(identity.name, "Grace");

        let blank = load_or_create_identity(&MemoryIdentityStore::new(), &ids, Some(""));
        assert!(blank.name.starts_with("Guest-"));
    }

    #[test]
    fn test_unavailable_storage_falls_back_to_ephemeral() {
        let ids = SequentialIds::new("eph");

        let first = load_or_create_identity(&UnavailableStore, &ids, None);
        let second = load_or_create_identity(&UnavailableStore, &ids, None);

        assert_eq!(first.role, Role::Member);
        assert_ne!(first.id, second.id);
    }
}
