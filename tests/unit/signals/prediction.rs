//! Unit tests for external prediction adapters

use adaptrix::indicators::error::IndicatorError;
use adaptrix::indicators::parser::parse_prediction;
use adaptrix::models::indicators::Candle;
use adaptrix::models::signal::{ExternalPrediction, SignalDirection};
use adaptrix::signals::prediction::relative_volatility;

fn flat_candles(count: usize) -> Vec<Candle> {
    vec![Candle::new(100.0, 101.0, 99.0, 100.0, 10.0); count]
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_price_forecast_long() {
    let prediction = ExternalPrediction::from_price_forecast(100.0, 105.0, 0.02, 0.04).unwrap();
    assert_eq!(prediction.direction, SignalDirection::Long);
    assert!(approx(prediction.confidence, 0.05));
    assert!(approx(prediction.stop_loss.unwrap(), 98.0));
    assert!(approx(prediction.take_profit.unwrap(), 104.0));
}

#[test]
fn test_price_forecast_short_and_saturation() {
    let prediction = ExternalPrediction::from_price_forecast(100.0, 90.0, -0.03, 0.06).unwrap();
    assert_eq!(prediction.direction, SignalDirection::Short);
    assert!(approx(prediction.confidence, 0.1));
    assert!(approx(prediction.stop_loss.unwrap(), 103.0));
    assert!(approx(prediction.take_profit.unwrap(), 94.0));

    let doubled = ExternalPrediction::from_price_forecast(100.0, 250.0, 0.02, 0.04).unwrap();
    assert_eq!(doubled.confidence, 1.0);
}

#[test]
fn test_price_forecast_rejects_bad_price() {
    assert!(matches!(
        ExternalPrediction::from_price_forecast(0.0, 10.0, 0.02, 0.04),
        Err(IndicatorError::InvalidNumericValue { .. })
    ));
}

#[test]
fn test_relative_volatility() {
    // TR 2 on close 100
    assert!(approx(relative_volatility(&flat_candles(20)), 0.02));

    let wide = vec![Candle::new(100.0, 120.0, 80.0, 100.0, 10.0); 20];
    assert_eq!(relative_volatility(&wide), 0.05);

    let tight = vec![Candle::new(100.0, 100.1, 99.9, 100.0, 10.0); 20];
    assert_eq!(relative_volatility(&tight), 0.005);
}

#[test]
fn test_volatility_levels_for_long() {
    let prediction = ExternalPrediction::new(SignalDirection::Long, 0.8)
        .with_volatility_levels(&flat_candles(20));
    assert!(approx(prediction.stop_loss.unwrap(), 97.0));
    assert!(approx(prediction.take_profit.unwrap(), 104.0));
}

#[test]
fn test_volatility_levels_for_short() {
    let prediction = ExternalPrediction::new(SignalDirection::Short, 0.5)
        .with_volatility_levels(&flat_candles(20));
    assert!(approx(prediction.stop_loss.unwrap(), 103.0));
    assert!(approx(prediction.take_profit.unwrap(), 97.5));
}

#[test]
fn test_volatility_levels_keep_supplied_levels() {
    let prediction = ExternalPrediction::new(SignalDirection::Long, 0.8)
        .with_levels(90.0, 120.0)
        .with_volatility_levels(&flat_candles(20));
    assert_eq!(prediction.stop_loss, Some(90.0));
    assert_eq!(prediction.take_profit, Some(120.0));

    let neutral = ExternalPrediction::new(SignalDirection::Neutral, 0.8)
        .with_volatility_levels(&flat_candles(20));
    assert!(!neutral.has_levels());
}

#[test]
fn test_parse_prediction_validates_confidence() {
    assert!(parse_prediction(ExternalPrediction::new(SignalDirection::Long, 0.7)).is_ok());
    assert!(matches!(
        parse_prediction(ExternalPrediction::new(SignalDirection::Long, -0.1)),
        Err(IndicatorError::InvalidPrediction(_))
    ));
}
