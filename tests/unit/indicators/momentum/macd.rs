//! Unit tests for MACD indicator

use adaptrix::indicators::momentum::{calculate_macd, calculate_macd_default, calculate_macd_series};
use adaptrix::models::indicators::Candle;

fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .map(|&c| Candle::new(c, c + 0.5, c - 0.5, c, 1000.0))
        .collect()
}

#[test]
fn test_macd_needs_slow_plus_signal_bars() {
    let candles = candles_from_closes(&[100.0; 33]);
    assert!(calculate_macd_default(&candles).is_none());

    let candles = candles_from_closes(&[100.0; 34]);
    assert!(calculate_macd_default(&candles).is_some());
}

#[test]
fn test_macd_flat_market_is_zero() {
    let macd = calculate_macd(&candles_from_closes(&[250.0; 60]), 12, 26, 9).unwrap();
    assert!(macd.macd.abs() < 1e-9);
    assert!(macd.signal.abs() < 1e-9);
    assert!(macd.histogram.abs() < 1e-9);
    assert_eq!(macd.period, Some((12, 26, 9)));
}

#[test]
fn test_macd_positive_in_uptrend() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 1.5).collect();
    let macd = calculate_macd_default(&candles_from_closes(&closes)).unwrap();
    assert!(macd.macd > 0.0);
}

#[test]
fn test_macd_histogram_is_macd_minus_signal() {
    let closes: Vec<f64> = (0..70)
        .map(|i| 100.0 + (i as f64 / 4.0).sin() * 3.0)
        .collect();
    let series = calculate_macd_series(&candles_from_closes(&closes), 12, 26, 9);
    for i in 0..closes.len() {
        if let (Some(m), Some(s), Some(h)) = (series.macd[i], series.signal[i], series.histogram[i]) {
            assert!((m - s - h).abs() < 1e-12);
        }
    }
    assert!(series.previous_histogram().is_some());
}
