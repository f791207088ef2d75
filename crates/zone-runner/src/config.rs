//! Runner configuration from environment variables.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    /// A variable parsed but is outside the accepted range.
    #[error("{var} must be {expected}, got {value}")]
    OutOfRange {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Tick loop settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Ticks per second.
    pub target_fps: f32,
    /// Ticks to run before exiting; 0 runs until interrupted.
    pub ticks: u64,
    /// Simulated players.
    pub players: u32,
    /// Zones laid out on the demo grid.
    pub zones: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            target_fps: 20.0,
            ticks: 400,
            players: 4,
            zones: 16,
        }
    }
}

impl RunnerConfig {
    /// Read `TARGET_FPS`, `ZONE_TICKS`, `ZONE_PLAYERS` and `ZONE_COUNT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from any variable source. Unset variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            target_fps: parse(&lookup, "TARGET_FPS")?.unwrap_or(defaults.target_fps),
            ticks: parse(&lookup, "ZONE_TICKS")?.unwrap_or(defaults.ticks),
            players: parse(&lookup, "ZONE_PLAYERS")?.unwrap_or(defaults.players),
            zones: parse(&lookup, "ZONE_COUNT")?.unwrap_or(defaults.zones),
        };

        if !(config.target_fps > 0.0 && config.target_fps.is_finite()) {
            return Err(ConfigError::OutOfRange {
                var: "TARGET_FPS",
                expected: "a positive number",
                value: config.target_fps.to_string(),
            });
        }
        config.tick_period()?;
        if config.zones as usize > zone_core::ZONE_POOL_SIZE {
            return Err(ConfigError::OutOfRange {
                var: "ZONE_COUNT",
                expected: "at most the zone pool size",
                value: config.zones.to_string(),
            });
        }

        Ok(config)
    }
}

impl RunnerConfig {
    /// Time budget for one tick.
    ///
    /// Fails when the rate is so low the period does not fit a [`Duration`].
    pub fn tick_period(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f32(1.0 / self.target_fps).map_err(|_| ConfigError::OutOfRange {
            var: "TARGET_FPS",
            expected: "a rate whose tick period fits a Duration",
            value: self.target_fps.to_string(),
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::Invalid { var, value })
}
