//! Unit tests for shared numeric helpers

use adaptrix::common::math::{
    last_value, mean, momentum_series, std_dev_series, true_range,
};

#[test]
fn test_true_range_uses_gap_from_previous_close() {
    assert_eq!(true_range(105.0, 103.0, 100.0), 5.0);
    assert_eq!(true_range(101.0, 99.0, 100.0), 2.0);
    assert_eq!(true_range(98.0, 95.0, 100.0), 5.0);
}

#[test]
fn test_momentum_series_warm_up() {
    let values = [1.0, 2.0, 4.0, 7.0];
    let momentum = momentum_series(&values, 2);
    assert_eq!(momentum, vec![None, None, Some(3.0), Some(5.0)]);
    assert_eq!(last_value(&momentum), Some(5.0));
}

#[test]
fn test_std_dev_series_flat_window_is_zero() {
    let values = [5.0; 6];
    let series = std_dev_series(&values, 3);
    assert_eq!(series[1], None);
    assert_eq!(series[5], Some(0.0));
}

#[test]
fn test_mean_empty_is_none() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 3.0]), Some(2.0));
}
