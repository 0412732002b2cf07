//! Game settings
//!
//! Stored as JSON. Every field has a default, so a partial file is fine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TICK_RATE_HZ;
use crate::ms_to_ticks;
use crate::sim::SimConfig;

/// Settings failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse settings '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rate the host drives `tick` at
    pub tick_rate_hz: u32,

    // === Combat ===
    pub player_fire_cooldown_ms: u32,
    pub enemy_fire_cooldown_ms: u32,

    // === Leaderboard ===
    pub max_name_len: usize,
    /// Rows shown per leaderboard view
    pub leaderboard_rows: usize,
    /// JSON-lines file holding every result
    pub leaderboard_path: String,

    // === Bonus placement ===
    pub seed: u64,
    pub randomize_bonus: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,

            player_fire_cooldown_ms: 500,
            enemy_fire_cooldown_ms: 3000,

            max_name_len: 16,
            leaderboard_rows: 10,
            leaderboard_path: "leaderboard.json".to_string(),

            seed: 0,
            randomize_bonus: false,
        }
    }
}

impl Settings {
    /// Read and validate settings from `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Like `load`, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Write settings to `path` as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_rate_hz",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_name_len == 0 {
            return Err(SettingsError::Invalid {
                field: "max_name_len",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.leaderboard_path.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "leaderboard_path",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Tick-counted configuration for the simulation
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            player_fire_cooldown_ticks: ms_to_ticks(self.player_fire_cooldown_ms, self.tick_rate_hz),
            enemy_fire_cooldown_ticks: ms_to_ticks(self.enemy_fire_cooldown_ms, self.tick_rate_hz),
            max_name_len: self.max_name_len,
            seed: self.seed,
            randomize_bonus: self.randomize_bonus,
        }
    }
}
