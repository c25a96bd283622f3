/// Errors raised while building or loading session configuration.
///
/// The streaming operations themselves are total; only configuration can fail.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid stream radii: spawn={spawn}, despawn={despawn} (need 0 <= spawn < despawn)")]
    InvalidRadii { spawn: i32, despawn: i32 },
    #[error("invalid {name}: {value} (must be within [0, 1])")]
    InvalidChance { name: &'static str, value: f32 },
}

/// Reject probabilities outside `[0, 1]`, NaN included.
pub fn check_chance(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidChance { name, value })
    }
}
