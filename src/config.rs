//! Show tuning
//!
//! [`ShowConfig`] mirrors the defaults in [`crate::consts`]. Any subset of its
//! fields can be overridden from JSON; missing keys keep their defaults:
//!
//! ```json
//! { "scheduler": { "shell_interval_ms": 8000 }, "background_fade": 0.2 }
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::{BACKGROUND_FADE, BACKGROUND_RGB, LOUDNESS_SCALE};
use crate::error::ConfigError;
use crate::palette::Rgb;
use crate::sim::SchedulerConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    pub scheduler: SchedulerConfig,
    /// Color painted over the previous frame
    pub background: Rgb,
    /// Alpha of that paint; lower values leave longer streaks
    pub background_fade: f32,
    /// Multiplier from burst loudness to synth volume
    pub loudness_scale: f32,
}

impl Default for ShowConfig {
    fn default() -> Self {
        let [r, g, b] = BACKGROUND_RGB;
        Self {
            scheduler: SchedulerConfig::default(),
            background: Rgb(r, g, b),
            background_fade: BACKGROUND_FADE,
            loudness_scale: LOUDNESS_SCALE,
        }
    }
}

impl ShowConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler.validate()?;
        if !(0.0..=1.0).contains(&self.background_fade) {
            return Err(ConfigError::invalid("background_fade must be within 0..=1"));
        }
        if !(self.loudness_scale >= 0.0) {
            return Err(ConfigError::invalid("loudness_scale must not be negative"));
        }
        Ok(())
    }

    /// Read a JSON config file (native driver)
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded show config from {}", path.display());
        Ok(config)
    }
}
