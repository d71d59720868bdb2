//! Duplicate and low-confidence signal filtering.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::FilterConfig;
use crate::models::signal::SignalDirection;

pub const DEFAULT_DUPLICATE_WINDOW_MINUTES: i64 = 15;
pub const DEFAULT_FILTER_MIN_CONFIDENCE: f64 = 0.65;

/// A previously emitted signal as the caller recorded it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedSignal {
    pub symbol: String,
    pub timeframe: String,
    pub direction: SignalDirection,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDecision {
    Accept,
    Duplicate,
    LowConfidence,
}

impl FilterDecision {
    pub fn is_accepted(self) -> bool {
        self == FilterDecision::Accept
    }
}

#[derive(Debug, Clone)]
pub struct SignalFilter {
    duplicate_window: Duration,
    min_confidence: f64,
}

impl Default for SignalFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DUPLICATE_WINDOW_MINUTES, DEFAULT_FILTER_MIN_CONFIDENCE)
    }
}

impl SignalFilter {
    pub fn new(duplicate_window_minutes: i64, min_confidence: f64) -> Self {
        Self {
            duplicate_window: Duration::minutes(duplicate_window_minutes.max(0)),
            min_confidence,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.duplicate_window_minutes, config.min_confidence)
    }

    /// Check `signal` against the signals already emitted.
    ///
    /// A duplicate has the same symbol, timeframe and direction and was
    /// emitted less than the duplicate window before `signal`.
    pub fn check(&self, signal: &TimestampedSignal, recent: &[TimestampedSignal]) -> FilterDecision {
        let duplicate = recent.iter().any(|prev| {
            prev.symbol == signal.symbol
                && prev.timeframe == signal.timeframe
                && prev.direction == signal.direction
                && signal.timestamp - prev.timestamp < self.duplicate_window
        });
        if duplicate {
            info!(
                symbol = %signal.symbol,
                direction = %signal.direction,
                "Filtered out duplicate signal"
            );
            return FilterDecision::Duplicate;
        }

        if signal.direction.is_actionable() && signal.confidence < self.min_confidence {
            info!(
                symbol = %signal.symbol,
                direction = %signal.direction,
                confidence = signal.confidence,
                "Filtered out low confidence signal"
            );
            return FilterDecision::LowConfidence;
        }

        FilterDecision::Accept
    }
}
