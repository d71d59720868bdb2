//! Support and Resistance levels detection
//!
//! Resistance levels are prominent local maxima of the high series, support
//! levels prominent local minima of the low series. Peak selection uses a
//! minimum bar separation and a minimum prominence that both adapt to the
//! current volatility score.

use tracing::debug;

use crate::common::math;
use crate::indicators::volatility::{VolatilityEstimator, VolatilityScore};
use crate::models::indicators::{closes, highs, lows, Candle, SupportResistanceLevels};

/// Bars required before any level is reported
pub const MIN_BARS: usize = 30;
/// Closes used for the prominence threshold
const PROMINENCE_LOOKBACK: usize = 30;
/// Upper bound on bars used for the recent price range
const RECENT_WINDOW_CAP: usize = 100;

/// Indices of local maxima; a flat top resolves to its middle bar
pub fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if values.len() < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < values.len() - 1 {
        if values[i] > values[i - 1] {
            let mut ahead = i + 1;
            while ahead < values.len() - 1 && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

/// Prominence of the peak at `peak`: height above the higher of the two
/// lowest points between it and the nearest higher bar on either side
pub fn peak_prominence(values: &[f64], peak: usize) -> f64 {
    let height = values[peak];

    let mut left_min = height;
    for &v in values[..peak].iter().rev() {
        if v > height {
            break;
        }
        left_min = left_min.min(v);
    }

    let mut right_min = height;
    for &v in &values[peak + 1..] {
        if v > height {
            break;
        }
        right_min = right_min.min(v);
    }

    height - left_min.max(right_min)
}

/// Keep the tallest peaks so that no two kept peaks are closer than `distance` bars
pub fn enforce_distance(values: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    if distance <= 1 {
        return peaks.to_vec();
    }

    let mut by_height: Vec<usize> = peaks.to_vec();
    by_height.sort_by(|a, b| values[*b].total_cmp(&values[*a]).then(b.cmp(a)));

    let mut kept: Vec<usize> = Vec::new();
    for candidate in by_height {
        if kept.iter().all(|&k| k.abs_diff(candidate) >= distance) {
            kept.push(candidate);
        }
    }
    kept.sort_unstable();
    kept
}

/// Peak indices satisfying both the separation and prominence constraints
pub fn find_peaks(values: &[f64], distance: usize, prominence: f64) -> Vec<usize> {
    let peaks = local_maxima(values);
    enforce_distance(values, &peaks, distance)
        .into_iter()
        .filter(|&p| peak_prominence(values, p) >= prominence)
        .collect()
}

#[derive(Debug, Clone)]
pub struct SupportResistanceDetector {
    sensitivity: f64,
    volatility: VolatilityEstimator,
}

impl SupportResistanceDetector {
    pub fn new(sensitivity: f64, volatility: VolatilityEstimator) -> Self {
        Self {
            sensitivity: sensitivity.clamp(0.0, 1.0),
            volatility,
        }
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Minimum bar separation: max(5, 20 × (1 − sensitivity) × (1 + volatility))
    pub fn peak_distance(&self, volatility: VolatilityScore) -> usize {
        (20.0 * (1.0 - self.sensitivity) * (1.0 + volatility.value())).max(5.0) as usize
    }

    /// Minimum prominence: stddev(last 30 closes) × (0.2 + sensitivity × 0.6)
    pub fn prominence_threshold(&self, candles: &[Candle]) -> f64 {
        let closes = closes(candles);
        let start = closes.len().saturating_sub(PROMINENCE_LOOKBACK);
        math::std_dev(&closes[start..]).unwrap_or(0.0) * (0.2 + self.sensitivity * 0.6)
    }

    pub fn detect(&self, candles: &[Candle]) -> SupportResistanceLevels {
        self.detect_with_volatility(candles, self.volatility.estimate(candles))
    }

    /// Detect levels using an already computed volatility score
    pub fn detect_with_volatility(
        &self,
        candles: &[Candle],
        volatility: VolatilityScore,
    ) -> SupportResistanceLevels {
        if candles.len() < MIN_BARS {
            return SupportResistanceLevels::default();
        }

        let highs = highs(candles);
        let lows = lows(candles);
        let distance = self.peak_distance(volatility);
        let prominence = self.prominence_threshold(candles);

        let inverted_lows: Vec<f64> = lows.iter().map(|l| -l).collect();
        let resistance_idx = find_peaks(&highs, distance, prominence);
        let support_idx = find_peaks(&inverted_lows, distance, prominence);

        let recent_window = RECENT_WINDOW_CAP.min(candles.len() / 2);
        let start = candles.len() - recent_window;
        let recent_high = highs[start..].iter().copied().fold(f64::MIN, f64::max);
        let recent_low = lows[start..].iter().copied().fold(f64::MAX, f64::min);

        let resistance: Vec<f64> = resistance_idx
            .into_iter()
            .map(|i| highs[i])
            .filter(|&level| level >= recent_low && level <= recent_high * 1.1)
            .collect();
        let support: Vec<f64> = support_idx
            .into_iter()
            .map(|i| lows[i])
            .filter(|&level| level >= recent_low * 0.9 && level <= recent_high)
            .collect();

        debug!(
            distance,
            prominence,
            support = support.len(),
            resistance = resistance.len(),
            "SupportResistanceDetector: levels detected"
        );

        SupportResistanceLevels {
            support,
            resistance,
        }
    }
}

impl Default for SupportResistanceDetector {
    fn default() -> Self {
        Self::new(0.5, VolatilityEstimator::default())
    }
}
