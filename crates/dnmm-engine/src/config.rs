//! Engine configuration.

use crate::error::{EngineError, EngineResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for one spot/futures pair.
///
/// `symbol` names both the spot book and the futures instrument
/// (same ticker on both venues); `asset` is the base asset whose
/// free balance is hedged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Instrument symbol (e.g. "NEOUSDT").
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Base asset for spot balance queries (e.g. "NEO").
    #[serde(default = "default_asset")]
    pub asset: String,

    /// Quote skew away from the book, in basis points.
    /// 50 bps = 0.005 margin.
    #[serde(default = "default_margin_bps")]
    pub margin_bps: Decimal,

    /// Depth levels consumed per side.
    #[serde(default = "default_depth_levels")]
    pub depth_levels: usize,

    /// Decimal places for ladder prices.
    #[serde(default = "default_price_decimals")]
    pub price_decimals: u32,

    /// Decimal places for the hedge quantity.
    #[serde(default = "default_size_decimals")]
    pub size_decimals: u32,

    /// Spot inventory baseline the hedge restores toward.
    #[serde(default = "default_initial_spot_balance")]
    pub initial_spot_balance: Decimal,

    /// Hedge deltas at or below this size are ignored.
    #[serde(default = "default_min_hedge_size")]
    pub min_hedge_size: Decimal,

    /// Bounded wait for the next depth frame; expiry triggers
    /// resubscription.
    #[serde(default = "default_recv_timeout_ms")]
    pub recv_timeout_ms: u64,

    /// Maximum resubscription attempts (0 = infinite).
    #[serde(default)]
    pub max_reconnect_attempts: u32,

    /// Base delay for exponential backoff.
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,

    /// Maximum delay for exponential backoff.
    #[serde(default = "default_reconnect_max_delay_ms")]
    pub reconnect_max_delay_ms: u64,
}

impl EngineConfig {
    /// Margin as a fraction: bps / 10000.
    pub fn margin(&self) -> Decimal {
        self.margin_bps / Decimal::from(10_000)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.symbol.is_empty() {
            return Err(EngineError::Config("symbol must not be empty".to_string()));
        }
        if self.asset.is_empty() {
            return Err(EngineError::Config("asset must not be empty".to_string()));
        }
        if self.margin_bps < Decimal::ZERO || self.margin_bps >= Decimal::from(10_000) {
            return Err(EngineError::Config(format!(
                "margin_bps must be in [0, 10000), got {}",
                self.margin_bps
            )));
        }
        if self.depth_levels == 0 {
            return Err(EngineError::Config(
                "depth_levels must be at least 1".to_string(),
            ));
        }
        if self.min_hedge_size < Decimal::ZERO {
            return Err(EngineError::Config(
                "min_hedge_size must not be negative".to_string(),
            ));
        }
        if self.recv_timeout_ms == 0 {
            return Err(EngineError::Config(
                "recv_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            asset: default_asset(),
            margin_bps: default_margin_bps(),
            depth_levels: default_depth_levels(),
            price_decimals: default_price_decimals(),
            size_decimals: default_size_decimals(),
            initial_spot_balance: default_initial_spot_balance(),
            min_hedge_size: default_min_hedge_size(),
            recv_timeout_ms: default_recv_timeout_ms(),
            max_reconnect_attempts: 0,
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
            reconnect_max_delay_ms: default_reconnect_max_delay_ms(),
        }
    }
}

fn default_symbol() -> String {
    "NEOUSDT".to_string()
}
fn default_asset() -> String {
    "NEO".to_string()
}
fn default_margin_bps() -> Decimal {
    Decimal::new(50, 0) // 50 bps = 0.005
}
fn default_depth_levels() -> usize {
    5
}
fn default_price_decimals() -> u32 {
    2
}
fn default_size_decimals() -> u32 {
    2
}
fn default_initial_spot_balance() -> Decimal {
    Decimal::new(10_000, 0)
}
fn default_min_hedge_size() -> Decimal {
    Decimal::new(10, 0)
}
fn default_recv_timeout_ms() -> u64 {
    30_000
}
fn default_reconnect_base_delay_ms() -> u64 {
    1_000
}
fn default_reconnect_max_delay_ms() -> u64 {
    60_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.symbol, "NEOUSDT");
        assert_eq!(config.asset, "NEO");
        assert_eq!(config.margin_bps, dec!(50));
        assert_eq!(config.margin(), dec!(0.005));
        assert_eq!(config.depth_levels, 5);
        assert_eq!(config.initial_spot_balance, dec!(10000));
        assert_eq!(config.min_hedge_size, dec!(10));
        assert_eq!(config.max_reconnect_attempts, 0); // Infinite
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serde_defaults() {
        let toml_str = r#"
symbol = "GASUSDT"
asset = "GAS"
margin_bps = 100
"#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.symbol, "GASUSDT");
        assert_eq!(config.margin(), dec!(0.01));
        assert_eq!(config.depth_levels, 5);
        assert_eq!(config.recv_timeout_ms, 30_000);
    }

    #[test]
    fn test_validate_rejects_bad_margin() {
        let config = EngineConfig {
            margin_bps: dec!(10000),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_levels() {
        let config = EngineConfig {
            depth_levels: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
