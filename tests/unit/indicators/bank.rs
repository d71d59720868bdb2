//! Unit tests for the adaptive indicator bank

use adaptrix::indicators::bank::AdaptiveIndicatorBank;
use adaptrix::indicators::regime::MarketRegime;
use adaptrix::indicators::trend::TrendState;
use adaptrix::models::indicators::Candle;

fn rising_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let c = 100.0 + i as f64;
            Candle::new(c - 0.2, c + 0.5, c - 0.5, c, 1000.0)
        })
        .collect()
}

/// Closes alternate between 100 and 115: huge ranges, no persistent trend
fn whipsaw_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let c = if i % 2 == 0 { 100.0 } else { 115.0 };
            Candle::new(c, c + 1.0, c - 1.0, c, 1000.0)
        })
        .collect()
}

/// Gentle oscillation: sideways trend, low volatility
fn calm_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let c = 100.0 + (i as f64 * 0.9).sin() * 0.3;
            Candle::new(c, c + 0.2, c - 0.2, c, 1000.0)
        })
        .collect()
}

#[test]
fn test_strong_trend_regime_applies_to_every_indicator() {
    let readings = AdaptiveIndicatorBank::default().compute(&rising_candles(60));
    assert_eq!(readings.context.trend, TrendState::StrongUp);
    assert_eq!(readings.context.regime, MarketRegime::StrongTrend);

    assert_eq!(readings.rsi.period, 9);
    assert_eq!(
        (readings.macd.fast_period, readings.macd.slow_period, readings.macd.signal_period),
        (9, 20, 7)
    );
    assert_eq!(readings.bollinger.period, 16);
    assert_eq!((readings.stochastic.k_period, readings.stochastic.d_period), (11, 2));
}

#[test]
fn test_high_volatility_regime() {
    let readings = AdaptiveIndicatorBank::default().compute(&whipsaw_candles(60));
    assert!(readings.context.volatility.value() > 0.7);
    assert!(!readings.context.trend.is_strong());
    assert_eq!(readings.context.regime, MarketRegime::HighVolatility);
    assert_eq!(readings.rsi.period, 21);
    assert!((readings.bollinger.std_dev - 2.6).abs() < 1e-12);
}

#[test]
fn test_default_regime() {
    let readings = AdaptiveIndicatorBank::default().compute(&calm_candles(80));
    assert_eq!(readings.context.regime, MarketRegime::Default);
    assert_eq!(readings.rsi.period, 14);
    assert_eq!(readings.bollinger.period, 20);
}

#[test]
fn test_series_are_aligned_with_input() {
    let candles = rising_candles(60);
    let readings = AdaptiveIndicatorBank::default().compute(&candles);
    assert_eq!(readings.rsi.values.len(), candles.len());
    assert_eq!(readings.macd.histogram.len(), candles.len());
    assert_eq!(readings.bollinger.upper.len(), candles.len());
    assert_eq!(readings.stochastic.k.len(), candles.len());
    assert!(readings.rsi.latest().is_some());
    assert!(readings.macd.latest().is_some());
}

#[test]
fn test_short_window_is_sideways_default() {
    let readings = AdaptiveIndicatorBank::default().compute(&rising_candles(10));
    assert_eq!(readings.context.trend, TrendState::Sideways);
    assert_eq!(readings.context.regime, MarketRegime::Default);
    assert!(readings.rsi.latest().is_none());
}
