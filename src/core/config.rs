//! Status effect configuration with documented constants
//!
//! All tunable numbers are collected here so the authoritative simulation and
//! a predicting client can be handed the exact same values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StatusError};
use crate::core::types::TimeSpan;

/// Tile friction multiplier while knocked down (a sliding body stops sooner)
pub const KNOCKDOWN_FRICTION_MODIFIER: f32 = 0.4;

/// Highest tick rate whose frame still advances timers (one microsecond)
pub const MAX_TICK_RATE: u32 = 1_000_000;

/// Configuration for the status effect systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StunConfig {
    /// Simulation ticks per second
    ///
    /// Every tick advances effect timers by `1 / tick_rate` seconds.
    pub tick_rate: u32,

    /// Multiplier applied to tile friction while knocked down
    ///
    /// Must stay within [0, 1]: a knockdown never speeds anyone up.
    pub knockdown_friction_modifier: f32,

    /// Seconds of knockdown removed by one helping hand
    ///
    /// The helper cooldown is set to half of this after each help.
    pub help_interval: f32,

    /// Sound played when someone helps a knocked down entity up
    pub knockdown_sound: String,
}

impl Default for StunConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30,
            knockdown_friction_modifier: KNOCKDOWN_FRICTION_MODIFIER,
            help_interval: 1.0,
            knockdown_sound: "/Audio/Effects/thudswoosh.ogg".to_string(),
        }
    }
}

impl StunConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Time advanced by a single tick, never less than one microsecond
    pub fn frame_time(&self) -> TimeSpan {
        let tick_rate = i64::from(self.tick_rate.clamp(1, MAX_TICK_RATE));
        TimeSpan::from_micros(1_000_000 / tick_rate)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 || self.tick_rate > MAX_TICK_RATE {
            return Err(StatusError::InvalidConfig(format!(
                "tick_rate ({}) must be within 1..={}",
                self.tick_rate, MAX_TICK_RATE
            )));
        }

        if !(0.0..=1.0).contains(&self.knockdown_friction_modifier) {
            return Err(StatusError::InvalidConfig(format!(
                "knockdown_friction_modifier ({}) should be within [0, 1]",
                self.knockdown_friction_modifier
            )));
        }

        if !self.help_interval.is_finite() || self.help_interval < 0.0 {
            return Err(StatusError::InvalidConfig(format!(
                "help_interval ({}) must be a non-negative number of seconds",
                self.help_interval
            )));
        }

        Ok(())
    }
}
