//! Numeric helpers shared by the indicator implementations.
//!
//! Series helpers return a `Vec<Option<f64>>` aligned with their input:
//! `None` marks the warm-up region where the value is undefined.

/// Simple moving average of the last `period` values
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (ddof = 0)
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// True range of a bar given the previous close
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Rolling simple moving average
pub fn sma_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = Some(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        result[i] = Some(sum / period as f64);
    }
    result
}

/// Rolling population standard deviation
pub fn std_dev_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }
    for i in (period - 1)..values.len() {
        result[i] = std_dev(&values[i + 1 - period..=i]);
    }
    result
}

/// Exponential moving average seeded with the SMA of the first `period` values
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return result;
    }

    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = Some(prev);
    for i in period..values.len() {
        prev = ema_from_previous(values[i], prev, period);
        result[i] = Some(prev);
    }
    result
}

/// One EMA step
pub fn ema_from_previous(value: f64, prev_ema: f64, period: usize) -> f64 {
    let k = 2.0 / (period as f64 + 1.0);
    value * k + prev_ema * (1.0 - k)
}

/// Difference between the current value and the value `period` bars ago
pub fn momentum_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    for i in period..values.len() {
        result[i] = Some(values[i] - values[i - period]);
    }
    result
}

/// Apply a dense series function to the defined tail of a sparse series.
///
/// Leading `None`s are carried over; the defined values must be contiguous.
pub fn on_defined_tail<F>(series: &[Option<f64>], f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Vec<Option<f64>>,
{
    let start = match series.iter().position(Option::is_some) {
        Some(start) => start,
        None => return vec![None; series.len()],
    };
    let dense: Vec<f64> = series[start..].iter().map(|v| v.unwrap_or(f64::NAN)).collect();

    let mut result = vec![None; start];
    result.extend(f(&dense));
    result
}

/// Last element of a series, flattened
pub fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// The last `count` elements of a series, or `None` if any is undefined
pub fn last_defined(series: &[Option<f64>], count: usize) -> Option<Vec<f64>> {
    if series.len() < count {
        return None;
    }
    series[series.len() - count..].iter().copied().collect()
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
