//! Shared room settings
//!
//! Settings have no owner. Every client merges each `SETTINGS` broadcast it
//! receives into its local copy, field by field, last write wins. There is
//! no versioning, so concurrent conflicting writes only converge once the
//! broadcasts stop.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::Deck;

/// Partial settings object as carried by a `SETTINGS` broadcast
pub type SettingsPatch = Map<String, Value>;

const DECK_KEY: &str = "deck";

/// Room-wide settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub deck: Deck,
    /// Fields this client does not understand, kept so they survive merges
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Settings {
    pub fn with_deck(deck: Deck) -> Self {
        Self {
            deck,
            extra: BTreeMap::new(),
        }
    }

    /// Full settings as a patch object
    pub fn to_patch(&self) -> SettingsPatch {
        let mut patch = SettingsPatch::new();
        patch.insert(DECK_KEY.to_string(), Value::from(self.deck.code()));
        for (key, value) in &self.extra {
            patch.insert(key.clone(), value.clone());
        }
        patch
    }
}

/// Patch that switches the active deck
pub fn deck_patch(deck: Deck) -> SettingsPatch {
    let mut patch = SettingsPatch::new();
    patch.insert(DECK_KEY.to_string(), Value::from(deck.code()));
    patch
}

/// Field-wise last-write-wins merge.
///
/// Keys present in `incoming` overwrite, keys absent are preserved. An
/// unrecognised `deck` value is ignored and the current deck kept.
pub fn merge_settings(current: &Settings, incoming: &SettingsPatch) -> Settings {
    let mut merged = current.clone();
    for (key, value) in incoming {
        if key == DECK_KEY {
            match value.as_str().and_then(Deck::from_code) {
                Some(deck) => merged.deck = deck,
                None => debug!(value = %value, "Ignoring unknown deck"),
            }
        } else {
            merged.extra.insert(key.clone(), value.clone());
        }
    }
    merged
}
