//! Unit tests for the stochastic oscillator

use adaptrix::indicators::momentum::{calculate_stochastic, calculate_stochastic_series, raw_k_series};
use adaptrix::models::indicators::Candle;

#[test]
fn test_zero_range_gives_midpoint() {
    let candles = vec![Candle::new(100.0, 100.0, 100.0, 100.0, 10.0); 20];
    let raw = raw_k_series(&candles, 14);
    assert_eq!(raw[13], Some(50.0));

    let stoch = calculate_stochastic(&candles, 14, 3).unwrap();
    assert!((stoch.k - 50.0).abs() < 1e-9);
    assert!((stoch.d - 50.0).abs() < 1e-9);
}

#[test]
fn test_close_at_high_of_range() {
    let candles: Vec<Candle> = (0..30)
        .map(|i| {
            let c = 100.0 + i as f64;
            Candle::new(c - 0.2, c, c - 1.0, c, 10.0)
        })
        .collect();
    let stoch = calculate_stochastic(&candles, 14, 3).unwrap();
    assert!((stoch.k - 100.0).abs() < 1e-9);
}

#[test]
fn test_warm_up_alignment() {
    let candles: Vec<Candle> = (0..30)
        .map(|i| {
            let c = 100.0 + (i as f64).sin();
            Candle::new(c, c + 1.0, c - 1.0, c, 10.0)
        })
        .collect();
    let series = calculate_stochastic_series(&candles, 14, 3, 3);
    // raw %K from 13, slow %K from 15, %D from 17
    assert!(series.k[14].is_none());
    assert!(series.k[15].is_some());
    assert!(series.d[16].is_none());
    assert!(series.d[17].is_some());
}
