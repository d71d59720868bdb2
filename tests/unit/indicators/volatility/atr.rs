//! Unit tests for ATR and the volatility estimator

use adaptrix::indicators::volatility::{
    calculate_atr, calculate_atr_default, calculate_atr_series, VolatilityEstimator, VolatilityScore,
};
use adaptrix::models::indicators::Candle;

fn constant_range_candles(count: usize, close: f64, half_range: f64) -> Vec<Candle> {
    (0..count)
        .map(|_| Candle::new(close, close + half_range, close - half_range, close, 500.0))
        .collect()
}

#[test]
fn test_atr_needs_period_plus_one_bars() {
    let candles = constant_range_candles(14, 100.0, 1.0);
    assert!(calculate_atr_default(&candles).is_none());

    let candles = constant_range_candles(15, 100.0, 1.0);
    let atr = calculate_atr_default(&candles).unwrap();
    assert!((atr.value - 2.0).abs() < 1e-12);
    assert_eq!(atr.period, 14);
}

#[test]
fn test_atr_wilder_smoothing() {
    let mut candles = constant_range_candles(4, 100.0, 1.0);
    // TR of the new bar is 6 (high 103, low 97)
    candles.push(Candle::new(100.0, 103.0, 97.0, 100.0, 500.0));
    let series = calculate_atr_series(&candles, 3);
    assert_eq!(series[2], None);
    assert!((series[3].unwrap() - 2.0).abs() < 1e-12);
    // (2 * 2 + 6) / 3
    assert!((series[4].unwrap() - 10.0 / 3.0).abs() < 1e-12);
    assert!((calculate_atr(&candles, 3).unwrap().value - 10.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_volatility_default_for_short_window() {
    let estimator = VolatilityEstimator::new(14, 0.3);
    let candles = constant_range_candles(1, 100.0, 1.0);
    assert_eq!(estimator.estimate(&candles).value(), 0.3);
    assert_eq!(estimator.estimate(&[]).value(), 0.3);
}

#[test]
fn test_volatility_normalized_by_ten_percent_of_price() {
    // TR 2 on price 100: 2 / 10 = 0.2
    let candles = constant_range_candles(30, 100.0, 1.0);
    let score = VolatilityEstimator::default().estimate(&candles);
    assert!((score.value() - 0.2).abs() < 1e-12);
}

#[test]
fn test_volatility_clamped_to_one() {
    let candles = constant_range_candles(30, 100.0, 20.0);
    assert_eq!(VolatilityEstimator::default().estimate(&candles).value(), 1.0);
}

#[test]
fn test_volatility_score_rejects_non_finite() {
    assert_eq!(VolatilityScore::new(f64::NAN).value(), 0.0);
    assert_eq!(VolatilityScore::new(-0.5).value(), 0.0);
    assert_eq!(VolatilityScore::new(1.7).value(), 1.0);
}
