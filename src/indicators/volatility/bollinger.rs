//! Bollinger Bands indicator

use crate::common::math;
use crate::models::indicators::{closes, BollingerBandsIndicator, BollingerSeries, Candle};

/// Calculate Bollinger Bands over the whole window
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * standard deviation)
/// Lower Band = Middle - (std_dev * standard deviation)
pub fn calculate_bollinger_series(candles: &[Candle], period: u32, std_dev: f64) -> BollingerSeries {
    let closes = closes(candles);
    let middle = math::sma_series(&closes, period as usize);
    let deviation = math::std_dev_series(&closes, period as usize);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&deviation)
            .map(|(m, d)| Some(m.as_ref()? + sign * std_dev * d.as_ref()?))
            .collect()
    };

    BollingerSeries {
        upper: band(1.0),
        lower: band(-1.0),
        middle,
        period,
        std_dev,
    }
}

/// Latest Bollinger Bands
pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: u32,
    std_dev: f64,
) -> Option<BollingerBandsIndicator> {
    calculate_bollinger_series(candles, period, std_dev).latest()
}

/// Calculate Bollinger Bands with default parameters (20 SMA, 2σ)
pub fn calculate_bollinger_bands_default(candles: &[Candle]) -> Option<BollingerBandsIndicator> {
    calculate_bollinger_bands(candles, 20, 2.0)
}
