//! Player preferences
//!
//! Persisted separately from the score counter, as one JSON blob.

use serde::{Deserialize, Serialize};

use crate::persistence::{SETTINGS_KEY, Storage};
use crate::sim::{MovementMode, ScoringPolicy};
use crate::tuning::SessionConfig;

/// Which movement and scoring rules new sessions use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub movement: MovementMode,
    pub scoring: ScoringPolicy,
}

impl Settings {
    /// Load from storage, falling back to defaults when missing or malformed
    pub fn load(storage: &impl Storage) -> Self {
        let Some(json) = storage.get_item(SETTINGS_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings: {:?}", settings);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut impl Storage) {
        match serde_json::to_string(self) {
            Ok(json) => {
                storage.set_item(SETTINGS_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }

    /// Apply these preferences on top of a session config
    pub fn apply(&self, config: &mut SessionConfig) {
        config.movement = self.movement;
        config.scoring = self.scoring;
    }
}
