use std::path::{Path, PathBuf};

use pyro_platform::Rgb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Scene-wide constants. Shared by reference, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub fps: f64,
    /// Chance per rendered frame that a new tail launches.
    pub spawn_probability: f64,
    pub burst_size: usize,
    pub tail_color: Rgb,
    pub background: Rgb,
    /// Alpha of the per-frame background wash; lower leaves longer trails.
    pub trail_alpha: u8,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            spawn_probability: 0.03,
            burst_size: 700,
            tail_color: Rgb::WHITE,
            background: Rgb::BLACK,
            trail_alpha: 0x30,
        }
    }
}

impl SceneConfig {
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::Invalid(format!("fps must be positive, got {}", self.fps)));
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(ConfigError::Invalid(format!(
                "spawn_probability must be within 0..=1, got {}",
                self.spawn_probability
            )));
        }
        Ok(())
    }
}
