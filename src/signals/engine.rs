//! Signal engine: price window → fused signal → position plan.

use tracing::debug;

use crate::config::EngineConfig;
use crate::indicators::bank::AdaptiveIndicatorBank;
use crate::indicators::structure::SupportResistanceDetector;
use crate::indicators::trend::TrendClassifier;
use crate::indicators::volatility::VolatilityEstimator;
use crate::models::indicators::PriceWindow;
use crate::models::signal::{ExternalPrediction, SignalEvaluation};
use crate::risk::position::PositionSizer;
use crate::signals::fusion::SignalFusionOptimizer;
use crate::signals::voter::SignalVoter;

/// Explicitly constructed engine; holds configuration only, no per-call state
#[derive(Debug, Clone)]
pub struct SignalEngine {
    optimizer: SignalFusionOptimizer,
    sizer: PositionSizer,
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SignalEngine {
    pub fn new(optimizer: SignalFusionOptimizer, sizer: PositionSizer) -> Self {
        Self { optimizer, sizer }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let ind = &config.indicators;
        let volatility = VolatilityEstimator::new(ind.volatility_window, ind.default_volatility);
        let bank = AdaptiveIndicatorBank::new(
            volatility.clone(),
            TrendClassifier::new(ind.trend_window),
            ind.base.clone(),
        );
        let levels = SupportResistanceDetector::new(ind.sr_sensitivity, volatility);
        let optimizer =
            SignalFusionOptimizer::new(SignalVoter::new(bank, levels), config.fusion.min_confidence);

        Self::new(
            optimizer,
            PositionSizer::new(config.risk.balance, config.risk.max_risk_per_trade),
        )
    }

    pub fn optimizer(&self) -> &SignalFusionOptimizer {
        &self.optimizer
    }

    pub fn sizer(&self) -> &PositionSizer {
        &self.sizer
    }

    /// Evaluate with the engine's configured account
    pub fn evaluate(
        &self,
        window: &PriceWindow,
        prediction: Option<&ExternalPrediction>,
    ) -> SignalEvaluation {
        self.evaluate_with_sizer(window, prediction, &self.sizer)
    }

    /// Evaluate and size against a caller-supplied account
    pub fn evaluate_with_sizer(
        &self,
        window: &PriceWindow,
        prediction: Option<&ExternalPrediction>,
        sizer: &PositionSizer,
    ) -> SignalEvaluation {
        let signal = self.optimizer.optimize(window, prediction);
        let position = sizer.plan(&signal);

        debug!(
            direction = %signal.direction,
            confidence = signal.confidence,
            size = position.size,
            "SignalEngine: evaluation complete"
        );

        SignalEvaluation { signal, position }
    }
}
