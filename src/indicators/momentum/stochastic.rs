//! Stochastic oscillator (slow %K / %D)

use crate::common::math;
use crate::models::indicators::{Candle, StochasticIndicator, StochasticSeries};

/// Raw %K when the high-low range is zero
const FLAT_RANGE_K: f64 = 50.0;

/// Raw %K: position of close within the last `period` bars' range
pub fn raw_k_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; candles.len()];
    if period == 0 || candles.len() < period {
        return result;
    }

    for i in (period - 1)..candles.len() {
        let window = &candles[i + 1 - period..=i];
        let highest = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;
        result[i] = Some(if range > 0.0 {
            100.0 * (candles[i].close - lowest) / range
        } else {
            FLAT_RANGE_K
        });
    }
    result
}

/// Slow stochastic: %K = SMA(raw %K, slow_k_period), %D = SMA(%K, d_period)
pub fn calculate_stochastic_series(
    candles: &[Candle],
    k_period: u32,
    slow_k_period: u32,
    d_period: u32,
) -> StochasticSeries {
    let raw = raw_k_series(candles, k_period as usize);
    let k = math::on_defined_tail(&raw, |v| math::sma_series(v, slow_k_period as usize));
    let d = math::on_defined_tail(&k, |v| math::sma_series(v, d_period as usize));

    StochasticSeries {
        k,
        d,
        k_period,
        slow_k_period,
        d_period,
    }
}

/// Latest slow %K / %D
pub fn calculate_stochastic(
    candles: &[Candle],
    k_period: u32,
    d_period: u32,
) -> Option<StochasticIndicator> {
    calculate_stochastic_series(candles, k_period, 3, d_period).latest()
}
