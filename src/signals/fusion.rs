//! Fusion of the indicator vote with an external prediction.
//!
//! The external model can carry at most half of the decision weight.
//! Agreement adds the two weighted confidences (capped at 0.99);
//! disagreement keeps the stronger side minus 0.3 × the weaker side.
//! Every result passes a minimum-confidence gate.

use tracing::debug;

use crate::models::indicators::Candle;
use crate::models::signal::{ExternalPrediction, FusedSignal, IndicatorSignal, SignalDirection};
use crate::signals::voter::SignalVoter;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;
/// Ceiling on combined confidence when both sources agree
pub const AGREEMENT_CAP: f64 = 0.99;
/// Share of the losing side's confidence subtracted on disagreement
pub const DISAGREEMENT_PENALTY: f64 = 0.3;

/// Weights derived from the external prediction's confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    pub ml_weight: f64,
    pub indicator_weight: f64,
    pub adjusted_indicator: f64,
    pub adjusted_ml: f64,
}

impl FusionWeights {
    pub fn new(indicator_confidence: f64, prediction: &ExternalPrediction) -> Self {
        let ml_weight = prediction.confidence;
        let indicator_weight = 1.0 - ml_weight * 0.5;
        Self {
            ml_weight,
            indicator_weight,
            adjusted_indicator: indicator_confidence * indicator_weight,
            adjusted_ml: prediction.confidence * ml_weight,
        }
    }

    /// Share of the decision attributed to the external model
    pub fn ml_contribution(&self) -> f64 {
        let total = self.indicator_weight + self.ml_weight;
        if total > 0.0 {
            self.ml_weight / total
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignalFusionOptimizer {
    voter: SignalVoter,
    min_confidence: f64,
}

impl Default for SignalFusionOptimizer {
    fn default() -> Self {
        Self::new(SignalVoter::default(), DEFAULT_MIN_CONFIDENCE)
    }
}

impl SignalFusionOptimizer {
    pub fn new(voter: SignalVoter, min_confidence: f64) -> Self {
        Self {
            voter,
            min_confidence,
        }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn voter(&self) -> &SignalVoter {
        &self.voter
    }

    /// Vote on the window, fuse with the prediction and round for output
    pub fn optimize(
        &self,
        candles: &[Candle],
        prediction: Option<&ExternalPrediction>,
    ) -> FusedSignal {
        let indicator = self.voter.vote(candles);
        self.fuse(&indicator, prediction).rounded()
    }

    /// Combine an indicator signal with an optional prediction.
    ///
    /// Values are left unrounded; callers producing output use
    /// [`FusedSignal::rounded`].
    pub fn fuse(
        &self,
        indicator: &IndicatorSignal,
        prediction: Option<&ExternalPrediction>,
    ) -> FusedSignal {
        match prediction {
            None => self.pass_through(indicator),
            Some(prediction) => self.combine(indicator, prediction),
        }
    }

    fn pass_through(&self, indicator: &IndicatorSignal) -> FusedSignal {
        let confidence = indicator.confidence.value();
        if confidence < self.min_confidence {
            debug!(
                confidence,
                min_confidence = self.min_confidence,
                "SignalFusionOptimizer: indicator confidence below threshold"
            );
            return FusedSignal {
                direction: SignalDirection::Neutral,
                confidence,
                reason: format!(
                    "Confidence below threshold ({:.2} < {})",
                    confidence, self.min_confidence
                ),
                stop_loss: None,
                take_profit: None,
                current_price: indicator.current_price,
                indicators: indicator.indicators.clone(),
                ml_contribution: 0.0,
            };
        }

        FusedSignal {
            direction: indicator.direction,
            confidence,
            reason: indicator.reason.clone(),
            stop_loss: indicator.stop_loss,
            take_profit: indicator.take_profit,
            current_price: indicator.current_price,
            indicators: indicator.indicators.clone(),
            ml_contribution: 0.0,
        }
    }

    fn combine(&self, indicator: &IndicatorSignal, prediction: &ExternalPrediction) -> FusedSignal {
        let weights = FusionWeights::new(indicator.confidence.value(), prediction);
        let ml_contribution = weights.ml_contribution();

        let (direction, confidence, reason) = if indicator.direction == prediction.direction {
            (
                indicator.direction,
                (weights.adjusted_indicator + weights.adjusted_ml).min(AGREEMENT_CAP),
                format!("Indicators and ML model agree on {} signal", indicator.direction),
            )
        } else if weights.adjusted_indicator > weights.adjusted_ml {
            (
                indicator.direction,
                weights.adjusted_indicator - weights.adjusted_ml * DISAGREEMENT_PENALTY,
                format!(
                    "Indicators suggest {} while ML suggests {}",
                    indicator.direction, prediction.direction
                ),
            )
        } else {
            (
                prediction.direction,
                weights.adjusted_ml - weights.adjusted_indicator * DISAGREEMENT_PENALTY,
                format!(
                    "ML model suggests {} while indicators suggest {}",
                    prediction.direction, indicator.direction
                ),
            )
        };

        debug!(
            direction = %direction,
            confidence,
            adjusted_indicator = weights.adjusted_indicator,
            adjusted_ml = weights.adjusted_ml,
            "SignalFusionOptimizer: combined signal"
        );

        if confidence < self.min_confidence {
            return FusedSignal {
                direction: SignalDirection::Neutral,
                confidence,
                reason: format!(
                    "Combined confidence below threshold ({:.2} < {})",
                    confidence, self.min_confidence
                ),
                stop_loss: None,
                take_profit: None,
                current_price: indicator.current_price,
                indicators: indicator.indicators.clone(),
                ml_contribution,
            };
        }

        let (stop_loss, take_profit) = merge_levels(direction, indicator, prediction);

        FusedSignal {
            direction,
            confidence,
            reason,
            stop_loss,
            take_profit,
            current_price: indicator.current_price,
            indicators: indicator.indicators.clone(),
            ml_contribution,
        }
    }
}

/// Stop/target for the fused direction.
///
/// Indicator levels apply only when the indicator voted the same way.
/// Prediction levels are used when it supplies both, keeping the tighter
/// stop and the nearer target.
fn merge_levels(
    direction: SignalDirection,
    indicator: &IndicatorSignal,
    prediction: &ExternalPrediction,
) -> (Option<f64>, Option<f64>) {
    if !direction.is_actionable() {
        return (None, None);
    }

    let (mut stop_loss, mut take_profit) = if indicator.direction == direction {
        (indicator.stop_loss, indicator.take_profit)
    } else {
        (None, None)
    };

    if let (Some(ml_stop), Some(ml_target)) = (prediction.stop_loss, prediction.take_profit) {
        let long = direction == SignalDirection::Long;
        stop_loss = Some(match stop_loss {
            Some(s) if long => s.max(ml_stop),
            Some(s) => s.min(ml_stop),
            None => ml_stop,
        });
        take_profit = Some(match take_profit {
            Some(t) if long => t.min(ml_target),
            Some(t) => t.max(ml_target),
            None => ml_target,
        });
    }

    (stop_loss, take_profit)
}
