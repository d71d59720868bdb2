//! ATR (Average True Range) and the normalized volatility score

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::math;
use crate::models::indicators::{closes, AtrIndicator, Candle};

/// True range per bar; the first bar has no previous close and is `None`
pub fn true_range_series(candles: &[Candle]) -> Vec<Option<f64>> {
    let mut result = vec![None; candles.len()];
    for i in 1..candles.len() {
        result[i] = Some(math::true_range(
            candles[i].high,
            candles[i].low,
            candles[i - 1].close,
        ));
    }
    result
}

/// ATR series with Wilder smoothing.
///
/// Seeded with the mean of the first `period` true ranges, then
/// ATR[t] = (ATR[t-1] * (period - 1) + TR[t]) / period.
pub fn calculate_atr_series(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    let period = period as usize;
    let mut result = vec![None; candles.len()];
    if period == 0 || candles.len() < period + 1 {
        return result;
    }

    let tr: Vec<f64> = true_range_series(candles).into_iter().flatten().collect();
    let mut atr = tr[..period].iter().sum::<f64>() / period as f64;
    result[period] = Some(atr);
    for i in (period + 1)..candles.len() {
        atr = (atr * (period as f64 - 1.0) + tr[i - 1]) / period as f64;
        result[i] = Some(atr);
    }
    result
}

/// Latest ATR value
pub fn calculate_atr(candles: &[Candle], period: u32) -> Option<AtrIndicator> {
    let value = math::last_value(&calculate_atr_series(candles, period))?;
    Some(AtrIndicator { value, period })
}

/// Calculate ATR with default period (14)
pub fn calculate_atr_default(candles: &[Candle]) -> Option<AtrIndicator> {
    calculate_atr(candles, 14)
}

/// Normalized volatility in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolatilityScore(f64);

impl VolatilityScore {
    /// Clamp into [0, 1]; non-finite input maps to 0
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self(0.0)
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// ATR-based volatility estimate relative to recent price
#[derive(Debug, Clone)]
pub struct VolatilityEstimator {
    window: usize,
    default_score: VolatilityScore,
}

impl VolatilityEstimator {
    pub fn new(window: usize, default_score: f64) -> Self {
        Self {
            window: window.max(1),
            default_score: VolatilityScore::new(default_score),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Mean true range over the last `window` bars divided by 10% of the mean
    /// close over the same bars, clamped to [0, 1].
    ///
    /// The first bar of the input uses its own close as previous close.
    pub fn estimate(&self, candles: &[Candle]) -> VolatilityScore {
        if candles.len() < 2 {
            return self.default_score;
        }

        let tr: Vec<f64> = candles
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let prev_close = if i == 0 { c.close } else { candles[i - 1].close };
                math::true_range(c.high, c.low, prev_close)
            })
            .collect();

        let start = tr.len().saturating_sub(self.window);
        let all_closes = closes(candles);
        let (Some(atr), Some(mean_close)) =
            (math::mean(&tr[start..]), math::mean(&all_closes[start..]))
        else {
            return self.default_score;
        };

        if mean_close <= 0.0 {
            debug!(mean_close, "VolatilityEstimator: non-positive mean close, using default");
            return self.default_score;
        }

        VolatilityScore::new(atr / (mean_close * 0.1))
    }
}

impl Default for VolatilityEstimator {
    fn default() -> Self {
        Self::new(14, 0.0)
    }
}
