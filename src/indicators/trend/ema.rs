//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::{closes, Candle};

/// EMA of close for every bar in the window
pub fn calculate_ema_series(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    math::ema_series(&closes(candles), period as usize)
}

/// Latest EMA value for a specific period
pub fn calculate_ema(candles: &[Candle], period: u32) -> Option<f64> {
    math::last_value(&calculate_ema_series(candles, period))
}

/// Close-to-close momentum over `period` bars
pub fn calculate_momentum_series(candles: &[Candle], period: u32) -> Vec<Option<f64>> {
    math::momentum_series(&closes(candles), period as usize)
}
