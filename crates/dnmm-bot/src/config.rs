//! Application configuration.

use crate::error::AppResult;
use dnmm_engine::EngineConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Paper-feed simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Starting mid price for the random walk.
    #[serde(default = "default_start_price")]
    pub start_price: Decimal,

    /// Interval between generated depth frames.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Seed spot balance for the paper account.
    #[serde(default = "default_sim_spot_balance")]
    pub spot_balance: Decimal,

    /// Seed futures position for the paper account.
    #[serde(default)]
    pub futures_position: Decimal,

    /// Frames to generate before closing the feed (0 = unbounded).
    #[serde(default)]
    pub frame_count: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_price: default_start_price(),
            tick_interval_ms: default_tick_interval_ms(),
            spot_balance: default_sim_spot_balance(),
            futures_position: Decimal::ZERO,
            frame_count: 0,
        }
    }
}

fn default_start_price() -> Decimal {
    Decimal::new(2500, 2) // 25.00
}
fn default_tick_interval_ms() -> u64 {
    1_000
}
fn default_sim_spot_balance() -> Decimal {
    Decimal::new(9_500, 0)
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub sim: SimConfig,
}

impl AppConfig {
    /// Load from a TOML file. A missing file falls back to defaults
    /// with a warning; a malformed file is an error.
    pub fn from_file(path: &str) -> AppResult<Self> {
        if !Path::new(path).exists() {
            warn!(path, "config file not found, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
