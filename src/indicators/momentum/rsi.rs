//! RSI (Relative Strength Index) indicator

use crate::models::indicators::{Candle, RsiIndicator, RsiSeries};

/// RSI from smoothed average gain and loss.
///
/// No losses maps to 100, no gains to 0, and a flat window to 50.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

/// Calculate the RSI series with Wilder smoothing
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
pub fn calculate_rsi_series(candles: &[Candle], period: u32) -> RsiSeries {
    let p = period as usize;
    let mut values = vec![None; candles.len()];
    if p == 0 || candles.len() < p + 1 {
        return RsiSeries { values, period };
    }

    let changes: Vec<f64> = candles.windows(2).map(|w| w[1].close - w[0].close).collect();

    let mut avg_gain = changes[..p].iter().filter(|c| **c > 0.0).sum::<f64>() / p as f64;
    let mut avg_loss = -changes[..p].iter().filter(|c| **c < 0.0).sum::<f64>() / p as f64;
    values[p] = Some(rsi_from_averages(avg_gain, avg_loss));

    for (i, &change) in changes.iter().enumerate().skip(p) {
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        avg_gain = (avg_gain * (p as f64 - 1.0) + gain) / p as f64;
        avg_loss = (avg_loss * (p as f64 - 1.0) + loss) / p as f64;
        values[i + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    RsiSeries { values, period }
}

/// Latest RSI value
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Option<RsiIndicator> {
    calculate_rsi_series(candles, period).latest()
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Option<RsiIndicator> {
    calculate_rsi(candles, 14)
}
