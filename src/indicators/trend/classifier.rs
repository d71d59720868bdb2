//! Trend classification from EMA crossover and momentum

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::math;
use crate::indicators::trend::ema::{calculate_ema_series, calculate_momentum_series};
use crate::models::indicators::Candle;

/// Number of trailing bars that must agree
const CONFIRMATION_BARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendState {
    StrongDown,
    ModerateDown,
    Sideways,
    ModerateUp,
    StrongUp,
}

impl TrendState {
    /// Scalar form: -1, -0.5, 0, 0.5, 1
    pub fn value(self) -> f64 {
        match self {
            TrendState::StrongDown => -1.0,
            TrendState::ModerateDown => -0.5,
            TrendState::Sideways => 0.0,
            TrendState::ModerateUp => 0.5,
            TrendState::StrongUp => 1.0,
        }
    }

    pub fn is_strong(self) -> bool {
        self.value().abs() > 0.7
    }
}

#[derive(Debug, Clone)]
pub struct TrendClassifier {
    window: usize,
}

impl TrendClassifier {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(4),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Classify the trend at the last bar.
    ///
    /// Short EMA = window/4, long EMA = window, momentum = window/2. Strong
    /// when all of the last 5 EMA differences and momentum values share a
    /// sign; moderate when both means share a sign; otherwise sideways.
    pub fn classify(&self, candles: &[Candle]) -> TrendState {
        if candles.len() < self.window {
            return TrendState::Sideways;
        }

        let short = calculate_ema_series(candles, (self.window / 4) as u32);
        let long = calculate_ema_series(candles, self.window as u32);
        let momentum = calculate_momentum_series(candles, (self.window / 2) as u32);

        let ema_diff: Vec<Option<f64>> = short
            .iter()
            .zip(&long)
            .map(|(s, l)| Some((*s)? - (*l)?))
            .collect();

        let (Some(diff), Some(mom)) = (
            math::last_defined(&ema_diff, CONFIRMATION_BARS),
            math::last_defined(&momentum, CONFIRMATION_BARS),
        ) else {
            debug!(bars = candles.len(), "TrendClassifier: trailing values undefined");
            return TrendState::Sideways;
        };

        let all_positive = |v: &[f64]| v.iter().all(|x| *x > 0.0);
        let all_negative = |v: &[f64]| v.iter().all(|x| *x < 0.0);

        if all_positive(&diff) && all_positive(&mom) {
            return TrendState::StrongUp;
        }
        if all_negative(&diff) && all_negative(&mom) {
            return TrendState::StrongDown;
        }

        let diff_mean = math::mean(&diff).unwrap_or(0.0);
        let mom_mean = math::mean(&mom).unwrap_or(0.0);
        if diff_mean > 0.0 && mom_mean > 0.0 {
            TrendState::ModerateUp
        } else if diff_mean < 0.0 && mom_mean < 0.0 {
            TrendState::ModerateDown
        } else {
            TrendState::Sideways
        }
    }
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self::new(50)
    }
}
