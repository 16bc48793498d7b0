//! Application state management

use std::path::PathBuf;

use directories::ProjectDirs;
use huddle_core::{
    new_room_code, normalize_room_code, Database, Error, HuddleConfig, IdentityStore,
    MemoryIdentityStore, Result,
};
use tracing::{info, warn};

const DATABASE_FILE: &str = "huddle.db";

/// Main application state
pub struct AppState {
    config: HuddleConfig,
    data_dir: PathBuf,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let dirs = Self::project_dirs()?;
        let config = HuddleConfig::load_from_dir(dirs.config_dir())?;
        Ok(Self::with_config(config, dirs.data_dir().to_path_buf()))
    }

    pub fn with_config(config: HuddleConfig, data_dir: PathBuf) -> Self {
        Self { config, data_dir }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "huddle", "huddle").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })
    }

    pub fn config(&self) -> &HuddleConfig {
        &self.config
    }

    pub fn database_path(&self) -> PathBuf {
        self.config
            .database_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DATABASE_FILE))
    }

    /// Open the identity database, or fall back to an in-memory store
    pub fn open_identity_store(&self) -> Box<dyn IdentityStore> {
        let path = self.database_path();
        match open_database(&path) {
            Ok(db) => {
                info!(path = %path.display(), "Opened identity database");
                Box::new(db)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Identity database unavailable, identity will not persist"
                );
                Box::new(MemoryIdentityStore::new())
            }
        }
    }

    /// Room to join: the command-line code, else the configured default,
    /// else a fresh one
    pub fn room_id(&self, arg: Option<&str>) -> String {
        arg.and_then(normalize_room_code)
            .or_else(|| self.config.default_room.as_deref().and_then(normalize_room_code))
            .unwrap_or_else(new_room_code)
    }
}

fn open_database(path: &std::path::Path) -> Result<Database> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Database::open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::{Identity, MemberId};

    #[test]
    fn test_room_id_precedence() {
        let config = HuddleConfig {
            default_room: Some("team-a".to_string()),
            ..Default::default()
        };
        let state = AppState::with_config(config, PathBuf::from("/unused"));

        assert_eq!(state.room_id(Some("xyz 9")), "XYZ9");
        assert_eq!(state.room_id(None), "TEAMA");
        assert_eq!(state.room_id(Some("!!")), "TEAMA");

        let bare = AppState::with_config(HuddleConfig::default(), PathBuf::from("/unused"));
        assert_eq!(bare.room_id(None).len(), 6);
    }

    #[test]
    fn test_identity_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_config(HuddleConfig::default(), dir.path().join("nested"));
        let identity = Identity::new(MemberId::from("me"), "Me");

        state.open_identity_store().save(&identity).unwrap();

        assert!(state.database_path().exists());
        assert_eq!(state.open_identity_store().load().unwrap(), Some(identity));
    }

    #[test]
    fn test_unusable_database_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let config = HuddleConfig {
            // a directory cannot be opened as a database
            database_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let state = AppState::with_config(config, dir.path().to_path_buf());

        let store = state.open_identity_store();
        assert_eq!(store.load().unwrap(), None);
        let identity = Identity::new(MemberId::from("me"), "Me");
        store.save(&identity).unwrap();
        assert_eq!(store.load().unwrap(), Some(identity));
    }
}
