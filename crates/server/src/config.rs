//! Host configuration file handling.
//!
//! TOML on disk, `DOWNTIMER_*` environment overrides on top.

use std::path::Path;

use downtimer_autoshutdown::AutoShutdownSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One game event the simulated registry is seeded with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEventEntry {
    pub id: u32,
    #[serde(default)]
    pub description: String,
}

/// The `[world]` section: what the simulated host starts out knowing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSettings {
    /// `[[world.game_event]]` entries.
    #[serde(default)]
    pub game_event: Vec<GameEventEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub autoshutdown: AutoShutdownSettings,
    #[serde(default)]
    pub world: WorldSettings,
}

impl HostConfig {
    /// Parse TOML text, then apply environment overrides on top.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let mut config: HostConfig = toml::from_str(text)?;
        config.autoshutdown.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
