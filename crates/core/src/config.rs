//! Client configuration
//!
//! Loaded from `huddle.toml` in the platform config directory. Every field
//! is optional; a missing file means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Client configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuddleConfig {
    /// Name for a freshly created identity (otherwise `Guest-N`)
    pub display_name: Option<String>,
    /// Room joined when none is given on the command line
    pub default_room: Option<String>,
    /// Identity database location (defaults to the platform data dir)
    pub database_path: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl HuddleConfig {
    pub const FILE_NAME: &'static str = "huddle.toml";

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load `huddle.toml` from a config directory
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(Self::FILE_NAME))
    }
}
