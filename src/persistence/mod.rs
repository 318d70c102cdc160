//! Key/value persistence for the score counter and preferences
//!
//! Values are stored as strings under fixed keys, the way browser
//! LocalStorage holds them. Missing or malformed values are never an error:
//! they are logged and replaced with the documented default.

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use std::collections::HashMap;

/// Steps done so far (cumulative scoring), decimal integer
pub const SCORE_KEY: &str = "survive_steps_done";
/// Sound toggle, `"true"` / `"false"`
pub const SOUND_KEY: &str = "survive_sound_enabled";
/// Session settings as JSON
pub const SETTINGS_KEY: &str = "survive_settings";

/// String key/value store
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);
}

/// In-process store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Persisted cumulative score; 0 when missing or malformed
pub fn load_score(storage: &impl Storage) -> u32 {
    match storage.get_item(SCORE_KEY) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed stored score {:?}", raw);
            0
        }),
        None => 0,
    }
}

pub fn save_score(storage: &mut impl Storage, steps: u32) {
    storage.set_item(SCORE_KEY, &steps.to_string());
}

/// Persisted sound preference; on when missing or malformed
pub fn load_sound_pref(storage: &impl Storage) -> bool {
    match storage.get_item(SOUND_KEY).as_deref() {
        Some("true") => true,
        Some("false") => false,
        Some(other) => {
            log::warn!("Ignoring malformed sound preference {:?}", other);
            true
        }
        None => true,
    }
}

pub fn save_sound_pref(storage: &mut impl Storage, enabled: bool) {
    storage.set_item(SOUND_KEY, if enabled { "true" } else { "false" });
}
