//! Market regime and the indicator periods it selects.
//!
//! The regime is decided once per evaluation so that every indicator sees the
//! same classification. Strong trends take priority over high volatility.

use serde::{Deserialize, Serialize};

use crate::indicators::trend::TrendState;
use crate::indicators::volatility::VolatilityScore;

/// Volatility score above which periods are lengthened
pub const HIGH_VOLATILITY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    StrongTrend,
    HighVolatility,
    Default,
}

impl MarketRegime {
    pub fn classify(trend: TrendState, volatility: VolatilityScore) -> Self {
        if trend.is_strong() {
            MarketRegime::StrongTrend
        } else if volatility.value() > HIGH_VOLATILITY_THRESHOLD {
            MarketRegime::HighVolatility
        } else {
            MarketRegime::Default
        }
    }
}

/// Base indicator parameters before regime adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseParameters {
    pub rsi_period: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub bollinger_period: u32,
    pub bollinger_std_dev: f64,
    pub stochastic_k: u32,
    pub stochastic_d: u32,
}

impl Default for BaseParameters {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            stochastic_k: 14,
            stochastic_d: 3,
        }
    }
}

/// Periods actually used for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptivePeriods {
    pub rsi: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub bollinger_period: u32,
    pub bollinger_std_dev: f64,
    pub stochastic_k: u32,
    pub stochastic_slow_k: u32,
    pub stochastic_d: u32,
}

/// Slow %K smoothing is fixed across regimes
const STOCHASTIC_SLOW_K: u32 = 3;

fn scale_floor(base: u32, factor: f64, floor: u32) -> u32 {
    ((base as f64 * factor) as u32).max(floor)
}

fn scale_cap(base: u32, factor: f64, cap: u32) -> u32 {
    ((base as f64 * factor) as u32).min(cap)
}

impl AdaptivePeriods {
    pub fn for_regime(regime: MarketRegime, base: &BaseParameters) -> Self {
        match regime {
            MarketRegime::StrongTrend => Self {
                rsi: scale_floor(base.rsi_period, 0.7, 5),
                macd_fast: scale_floor(base.macd_fast, 0.8, 8),
                macd_slow: scale_floor(base.macd_slow, 0.8, 20),
                macd_signal: scale_floor(base.macd_signal, 0.8, 7),
                bollinger_period: scale_floor(base.bollinger_period, 0.8, 14),
                bollinger_std_dev: (base.bollinger_std_dev * 0.8).max(1.5),
                stochastic_k: scale_floor(base.stochastic_k, 0.8, 10),
                stochastic_slow_k: STOCHASTIC_SLOW_K,
                stochastic_d: scale_floor(base.stochastic_d, 0.8, 2),
            },
            // Bollinger period shortens here too while the bands widen
            MarketRegime::HighVolatility => Self {
                rsi: scale_cap(base.rsi_period, 1.5, 30),
                macd_fast: scale_cap(base.macd_fast, 1.3, 18),
                macd_slow: scale_cap(base.macd_slow, 1.3, 40),
                macd_signal: scale_cap(base.macd_signal, 1.3, 14),
                bollinger_period: scale_floor(base.bollinger_period, 0.8, 14),
                bollinger_std_dev: (base.bollinger_std_dev * 1.3).min(3.0),
                stochastic_k: base.stochastic_k,
                stochastic_slow_k: STOCHASTIC_SLOW_K,
                stochastic_d: base.stochastic_d,
            },
            MarketRegime::Default => Self {
                rsi: base.rsi_period,
                macd_fast: base.macd_fast,
                macd_slow: base.macd_slow,
                macd_signal: base.macd_signal,
                bollinger_period: base.bollinger_period,
                bollinger_std_dev: base.bollinger_std_dev,
                stochastic_k: base.stochastic_k,
                stochastic_slow_k: STOCHASTIC_SLOW_K,
                stochastic_d: base.stochastic_d,
            },
        }
    }
}
