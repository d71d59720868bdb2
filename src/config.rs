//! Engine configuration.
//!
//! Defaults match the reference parameters of every component. `from_env`
//! overrides individual keys from environment variables; unparseable values
//! are ignored with a warning and range problems surface from `validate`.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::indicators::regime::BaseParameters;
use crate::risk::position::{DEFAULT_BALANCE, DEFAULT_MAX_RISK_PER_TRADE};
use crate::signals::filter::{DEFAULT_DUPLICATE_WINDOW_MINUTES, DEFAULT_FILTER_MIN_CONFIDENCE};
use crate::signals::fusion::DEFAULT_MIN_CONFIDENCE;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub volatility_window: usize,
    pub trend_window: usize,
    pub default_volatility: f64,
    pub sr_sensitivity: f64,
    pub base: BaseParameters,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            volatility_window: 14,
            trend_window: 50,
            default_volatility: 0.0,
            sr_sensitivity: 0.5,
            base: BaseParameters::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub min_confidence: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub balance: f64,
    pub max_risk_per_trade: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            balance: DEFAULT_BALANCE,
            max_risk_per_trade: DEFAULT_MAX_RISK_PER_TRADE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub duplicate_window_minutes: i64,
    pub min_confidence: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            duplicate_window_minutes: DEFAULT_DUPLICATE_WINDOW_MINUTES,
            min_confidence: DEFAULT_FILTER_MIN_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,
    pub fusion: FusionConfig,
    pub risk: RiskConfig,
    pub filter: FilterConfig,
}

/// Parse an env var, keeping `current` when unset or unparseable
fn env_or<T: FromStr + Copy>(key: &str, current: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, "Ignoring unparseable configuration value");
                current
            }
        },
        Err(_) => current,
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let ind = &mut config.indicators;
        ind.volatility_window = env_or("ENGINE_VOLATILITY_WINDOW", ind.volatility_window);
        ind.trend_window = env_or("ENGINE_TREND_WINDOW", ind.trend_window);
        ind.default_volatility = env_or("ENGINE_DEFAULT_VOLATILITY", ind.default_volatility);
        ind.sr_sensitivity = env_or("ENGINE_SR_SENSITIVITY", ind.sr_sensitivity);

        config.fusion.min_confidence = env_or("ENGINE_MIN_CONFIDENCE", config.fusion.min_confidence);

        config.risk.balance = env_or("RISK_BALANCE", config.risk.balance);
        config.risk.max_risk_per_trade = env_or("RISK_MAX_PER_TRADE", config.risk.max_risk_per_trade);

        config.filter.duplicate_window_minutes = env_or(
            "FILTER_DUPLICATE_WINDOW_MINUTES",
            config.filter.duplicate_window_minutes,
        );
        config.filter.min_confidence = env_or("FILTER_MIN_CONFIDENCE", config.filter.min_confidence);

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        if ind.volatility_window == 0 {
            return Err(invalid("indicators.volatility_window", "must be at least 1"));
        }
        if ind.trend_window < 4 {
            return Err(invalid("indicators.trend_window", "must be at least 4"));
        }
        if !(0.0..=1.0).contains(&ind.default_volatility) {
            return Err(invalid("indicators.default_volatility", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&ind.sr_sensitivity) {
            return Err(invalid("indicators.sr_sensitivity", "must be within [0, 1]"));
        }

        let base = &ind.base;
        if base.rsi_period == 0
            || base.macd_fast == 0
            || base.macd_signal == 0
            || base.bollinger_period == 0
            || base.stochastic_k == 0
            || base.stochastic_d == 0
        {
            return Err(invalid("indicators.base", "periods must be positive"));
        }
        if base.macd_fast >= base.macd_slow {
            return Err(invalid("indicators.base.macd_fast", "must be below macd_slow"));
        }
        if !base.bollinger_std_dev.is_finite() || base.bollinger_std_dev <= 0.0 {
            return Err(invalid("indicators.base.bollinger_std_dev", "must be positive"));
        }

        if !(0.0..=1.0).contains(&self.fusion.min_confidence) {
            return Err(invalid("fusion.min_confidence", "must be within [0, 1]"));
        }
        if !self.risk.balance.is_finite() || self.risk.balance < 0.0 {
            return Err(invalid("risk.balance", "must be a non-negative number"));
        }
        if !(f64::EPSILON..=1.0).contains(&self.risk.max_risk_per_trade) {
            return Err(invalid("risk.max_risk_per_trade", "must be within (0, 1]"));
        }
        if self.filter.duplicate_window_minutes < 0 {
            return Err(invalid("filter.duplicate_window_minutes", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.filter.min_confidence) {
            return Err(invalid("filter.min_confidence", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Deployment environment from `APP_ENV`, then `ENVIRONMENT`, default `sandbox`
pub fn get_environment() -> String {
    env::var("APP_ENV")
        .or_else(|_| env::var("ENVIRONMENT"))
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}

/// HTTP port from `PORT`
pub fn get_port() -> u16 {
    env_or("PORT", DEFAULT_PORT)
}
