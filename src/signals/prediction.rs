//! Adapters turning raw model outputs into [`ExternalPrediction`]s.

use crate::common::math;
use crate::indicators::error::IndicatorError;
use crate::indicators::validation::validate_prediction;
use crate::models::indicators::Candle;
use crate::models::signal::{ExternalPrediction, SignalDirection};

/// Bars used for the fallback volatility estimate
const LEVEL_LOOKBACK: usize = 14;
const FALLBACK_VOLATILITY: f64 = 0.02;
const MIN_VOLATILITY: f64 = 0.005;
const MAX_VOLATILITY: f64 = 0.05;
const STOP_VOLATILITY_MULTIPLE: f64 = 1.5;
const TARGET_VOLATILITY_MULTIPLE: f64 = 2.5;

/// Mean true range over the last 14 bars relative to the last close,
/// clamped to [0.5%, 5%]
pub fn relative_volatility(candles: &[Candle]) -> f64 {
    if candles.len() < LEVEL_LOOKBACK {
        return FALLBACK_VOLATILITY;
    }
    let recent = &candles[candles.len() - LEVEL_LOOKBACK..];
    let ranges: Vec<f64> = recent
        .windows(2)
        .map(|w| math::true_range(w[1].high, w[1].low, w[0].close))
        .collect();

    let last_close = recent[recent.len() - 1].close;
    match math::mean(&ranges) {
        Some(atr) if last_close > 0.0 => (atr / last_close).clamp(MIN_VOLATILITY, MAX_VOLATILITY),
        _ => FALLBACK_VOLATILITY,
    }
}

impl ExternalPrediction {
    /// From a sigmoid output: above 0.5 is long with confidence `p`,
    /// otherwise short with confidence `1 - p`
    pub fn from_probability(probability: f64) -> Result<Self, IndicatorError> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(IndicatorError::InvalidPrediction(format!(
                "probability must be within [0, 1], got {probability}"
            )));
        }
        Ok(if probability > 0.5 {
            Self::new(SignalDirection::Long, probability)
        } else {
            Self::new(SignalDirection::Short, 1.0 - probability)
        })
    }

    /// From a price forecast. Confidence grows with the forecast move,
    /// saturating at a 100% move.
    pub fn from_price_forecast(
        current_price: f64,
        predicted_price: f64,
        stop_fraction: f64,
        take_profit_fraction: f64,
    ) -> Result<Self, IndicatorError> {
        if !current_price.is_finite() || current_price <= 0.0 {
            return Err(IndicatorError::InvalidNumericValue {
                field: "current_price".to_string(),
                value: current_price,
            });
        }
        if !predicted_price.is_finite() {
            return Err(IndicatorError::InvalidNumericValue {
                field: "predicted_price".to_string(),
                value: predicted_price,
            });
        }

        let change = (predicted_price - current_price) / current_price;
        let confidence = (change.abs() * 100.0).min(100.0) / 100.0;
        let (stop_fraction, take_profit_fraction) = (stop_fraction.abs(), take_profit_fraction.abs());

        let prediction = if change > 0.0 {
            Self::new(SignalDirection::Long, confidence).with_levels(
                current_price * (1.0 - stop_fraction),
                current_price * (1.0 + take_profit_fraction),
            )
        } else {
            Self::new(SignalDirection::Short, confidence).with_levels(
                current_price * (1.0 + stop_fraction),
                current_price * (1.0 - take_profit_fraction),
            )
        };
        validate_prediction(&prediction)?;
        Ok(prediction)
    }

    /// Fill missing stop/target from recent volatility around the last close
    pub fn with_volatility_levels(self, candles: &[Candle]) -> Self {
        if self.has_levels() || !self.direction.is_actionable() {
            return self;
        }
        let Some(price) = candles.last().map(|c| c.close) else {
            return self;
        };

        let vol = relative_volatility(candles);
        let stop_distance = vol * STOP_VOLATILITY_MULTIPLE;
        let target_distance = vol * TARGET_VOLATILITY_MULTIPLE * self.confidence;

        let (stop_loss, take_profit) = match self.direction {
            SignalDirection::Long => (price * (1.0 - stop_distance), price * (1.0 + target_distance)),
            _ => (price * (1.0 + stop_distance), price * (1.0 - target_distance)),
        };
        self.with_levels(stop_loss, take_profit)
    }
}
