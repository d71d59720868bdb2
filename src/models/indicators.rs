use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::validate_candles;

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Validated, time-ascending sequence of candles.
///
/// Dereferences to `[Candle]` so every indicator function can take it directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceWindow {
    candles: Vec<Candle>,
}

impl PriceWindow {
    /// Build a window, rejecting empty input and malformed candles
    pub fn new(candles: Vec<Candle>) -> Result<Self, IndicatorError> {
        validate_candles(&candles)?;
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn current_price(&self) -> f64 {
        // Non-empty by construction
        self.candles.last().map(|c| c.close).unwrap_or_default()
    }

    pub fn into_inner(self) -> Vec<Candle> {
        self.candles
    }
}

impl Deref for PriceWindow {
    type Target = [Candle];

    fn deref(&self) -> &Self::Target {
        &self.candles
    }
}

pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

pub fn highs(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.high).collect()
}

pub fn lows(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.low).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<(u32, u32, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerBandsIndicator {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub period: u32,
    pub std_dev: f64,
}

impl BollingerBandsIndicator {
    /// Band width relative to the middle band
    pub fn width(&self) -> Option<f64> {
        if self.middle == 0.0 {
            return None;
        }
        Some((self.upper - self.lower) / self.middle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StochasticIndicator {
    pub k: f64,
    pub d: f64,
    pub k_period: u32,
    pub d_period: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtrIndicator {
    pub value: f64,
    pub period: u32,
}

/// Full RSI history for the period it was computed with
#[derive(Debug, Clone)]
pub struct RsiSeries {
    pub values: Vec<Option<f64>>,
    pub period: u32,
}

impl RsiSeries {
    pub fn latest(&self) -> Option<RsiIndicator> {
        Some(RsiIndicator {
            value: math::last_value(&self.values)?,
            period: Some(self.period),
        })
    }
}

#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
    pub fast_period: u32,
    pub slow_period: u32,
    pub signal_period: u32,
}

impl MacdSeries {
    pub fn latest(&self) -> Option<MacdIndicator> {
        Some(MacdIndicator {
            macd: math::last_value(&self.macd)?,
            signal: math::last_value(&self.signal)?,
            histogram: math::last_value(&self.histogram)?,
            period: Some((self.fast_period, self.slow_period, self.signal_period)),
        })
    }

    /// Histogram value one bar before the latest
    pub fn previous_histogram(&self) -> Option<f64> {
        let len = self.histogram.len();
        if len < 2 {
            return None;
        }
        self.histogram[len - 2]
    }
}

#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub period: u32,
    pub std_dev: f64,
}

impl BollingerSeries {
    pub fn latest(&self) -> Option<BollingerBandsIndicator> {
        Some(BollingerBandsIndicator {
            upper: math::last_value(&self.upper)?,
            middle: math::last_value(&self.middle)?,
            lower: math::last_value(&self.lower)?,
            period: self.period,
            std_dev: self.std_dev,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
    pub k_period: u32,
    pub slow_k_period: u32,
    pub d_period: u32,
}

impl StochasticSeries {
    pub fn latest(&self) -> Option<StochasticIndicator> {
        Some(StochasticIndicator {
            k: math::last_value(&self.k)?,
            d: math::last_value(&self.d)?,
            k_period: self.k_period,
            d_period: self.d_period,
        })
    }
}

/// Candidate support and resistance price levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistanceLevels {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

impl SupportResistanceLevels {
    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.resistance.is_empty()
    }

    /// Highest support strictly below `price`
    pub fn nearest_support_below(&self, price: f64) -> Option<f64> {
        self.support
            .iter()
            .copied()
            .filter(|&s| s < price)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))))
    }

    /// Lowest resistance strictly above `price`
    pub fn nearest_resistance_above(&self, price: f64) -> Option<f64> {
        self.resistance
            .iter()
            .copied()
            .filter(|&r| r > price)
            .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |a| a.min(r))))
    }
}
