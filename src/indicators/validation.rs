//! Boundary checks for candles and predictions.
//!
//! The indicator math assumes well-formed bars and does not re-check them.

use crate::indicators::error::IndicatorError;
use crate::models::indicators::Candle;
use crate::models::signal::ExternalPrediction;

pub fn validate_price(field: &str, value: f64) -> Result<(), IndicatorError> {
    if !value.is_finite() || value < 0.0 {
        return Err(IndicatorError::InvalidNumericValue {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

pub fn validate_candle(index: usize, candle: &Candle) -> Result<(), IndicatorError> {
    for (field, value) in [
        ("open", candle.open),
        ("high", candle.high),
        ("low", candle.low),
        ("close", candle.close),
        ("volume", candle.volume),
    ] {
        validate_price(field, value)?;
    }

    let malformed = |reason: &str| IndicatorError::MalformedCandle {
        index,
        reason: reason.to_string(),
    };

    if candle.high < candle.low {
        return Err(malformed("high below low"));
    }
    if candle.high < candle.open.max(candle.close) {
        return Err(malformed("high below open/close"));
    }
    if candle.low > candle.open.min(candle.close) {
        return Err(malformed("low above open/close"));
    }
    Ok(())
}

/// Validate every bar and, where timestamps are present, their ordering
pub fn validate_candles(candles: &[Candle]) -> Result<(), IndicatorError> {
    if candles.is_empty() {
        return Err(IndicatorError::EmptyWindow);
    }

    for (index, candle) in candles.iter().enumerate() {
        validate_candle(index, candle)?;
    }

    for (index, pair) in candles.windows(2).enumerate() {
        if let (Some(prev), Some(next)) = (pair[0].timestamp, pair[1].timestamp) {
            if next <= prev {
                return Err(IndicatorError::UnorderedTimestamps { index: index + 1 });
            }
        }
    }
    Ok(())
}

pub fn validate_prediction(prediction: &ExternalPrediction) -> Result<(), IndicatorError> {
    if !prediction.confidence.is_finite() || !(0.0..=1.0).contains(&prediction.confidence) {
        return Err(IndicatorError::InvalidPrediction(format!(
            "confidence must be within [0, 1], got {}",
            prediction.confidence
        )));
    }
    if let Some(stop) = prediction.stop_loss {
        validate_price("stop_loss", stop)?;
    }
    if let Some(target) = prediction.take_profit {
        validate_price("take_profit", target)?;
    }
    Ok(())
}
