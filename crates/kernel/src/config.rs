use std::path::Path;

use cellworld_common::{ConfigError, check_chance};
use cellworld_stream::{CellEntity, StreamConfig};
use serde::{Deserialize, Serialize};

use crate::entities::{Glucose, Zone};

/// Session configuration, fixed once a world is created.
///
/// Every field is optional in the JSON form; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Explicit session seed. `None` means derive one from the clock.
    pub seed: Option<i64>,
    pub stream: StreamConfig,
    pub zone_spawn_chance: f32,
    pub glucose_spawn_chance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            stream: StreamConfig::default(),
            zone_spawn_chance: Zone::DEFAULT_SPAWN_CHANCE,
            glucose_spawn_chance: Glucose::DEFAULT_SPAWN_CHANCE,
        }
    }
}

impl WorldConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "loaded world config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stream.validate()?;
        check_chance("zone_spawn_chance", self.zone_spawn_chance)?;
        check_chance("glucose_spawn_chance", self.glucose_spawn_chance)?;
        Ok(())
    }
}
