//! UI preferences
//!
//! Persisted under their own key, separately from the shopping list envelope,
//! so a theme change never rewrites list data and vice versa.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_STORAGE_KEY;
use crate::error::{PersistError, Result};
use crate::persistence::KeyValueStore;

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    /// Follow the device color scheme
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "system" | "auto" => Some(Theme::System),
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Whether to render dark, given the device's current scheme
    pub fn is_dark(&self, device_dark: bool) -> bool {
        match self {
            Theme::System => device_dark,
            Theme::Light => false,
            Theme::Dark => true,
        }
    }
}

/// UI preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
}

impl Settings {
    /// Load settings, falling back to defaults if missing or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.get(SETTINGS_STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(err) => log::warn!("Ignoring unreadable settings: {}", err),
            },
            Ok(None) => {}
            Err(err) => log::warn!("Could not read settings: {}", err),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        let json = serde_json::to_string(self).map_err(PersistError::Encode)?;
        store.set(SETTINGS_STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
