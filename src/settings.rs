//! Game settings and preferences
//!
//! Persisted as JSON next to the score file, separate from scores.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::PersistError;
use crate::{clamp_radius, clamp_time_millis};

/// What happens to the score when a target times out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MissPolicy {
    /// Timeouts cost nothing
    #[default]
    Ignore,
    /// Timeouts cost one point (never below zero)
    Penalize,
}

impl MissPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissPolicy::Ignore => "Ignore",
            MissPolicy::Penalize => "Penalize",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ignore" | "none" => Some(MissPolicy::Ignore),
            "penalize" | "penalty" => Some(MissPolicy::Penalize),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target radius in pixels (1 - 50)
    pub target_radius: u32,
    /// How long each target stays up, in ms (250 - 2000)
    pub target_time_millis: u32,
    pub miss_policy: MissPolicy,

    // === Surface ===
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_radius: DEFAULT_TARGET_RADIUS,
            target_time_millis: DEFAULT_TARGET_TIME_MILLIS,
            miss_policy: MissPolicy::Ignore,

            surface_width: DEFAULT_SURFACE_WIDTH,
            surface_height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

impl Settings {
    /// Pull out-of-range values back into range
    pub fn clamped(mut self) -> Self {
        self.target_radius = clamp_radius(self.target_radius);
        self.target_time_millis = clamp_time_millis(self.target_time_millis);
        self
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(PersistError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring settings at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, PersistError> {
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        Ok(settings.clamped())
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_policy_parse() {
        assert_eq!(MissPolicy::from_str("PENALIZE"), Some(MissPolicy::Penalize));
        assert_eq!(MissPolicy::from_str("none"), Some(MissPolicy::Ignore));
        assert_eq!(MissPolicy::from_str("sometimes"), None);
        assert_eq!(MissPolicy::Penalize.as_str(), "Penalize");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            target_radius: 35,
            target_time_millis: 400,
            miss_policy: MissPolicy::Penalize,
            surface_width: 640,
            surface_height: 480,
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(&dir.path().join("nope.json")), Settings::default());
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::try_load(&path), Err(PersistError::Json(_))));
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_is_clamped_and_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "target_radius": 500, "target_time_millis": 5 }"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.target_radius, MAX_TARGET_RADIUS);
        assert_eq!(settings.target_time_millis, MIN_TARGET_TIME_MILLIS);
        assert_eq!(settings.surface_width, DEFAULT_SURFACE_WIDTH);
    }
}
