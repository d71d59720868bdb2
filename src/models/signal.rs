use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::math::round_to;
use crate::indicators::regime::{AdaptivePeriods, MarketRegime};

/// Decimal places for price-denominated output fields
pub const PRICE_DECIMALS: i32 = 8;
/// Decimal places for confidences and oscillator diagnostics
pub const SCORE_DECIMALS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Long,
    Short,
    Neutral,
}

impl SignalDirection {
    pub fn is_actionable(&self) -> bool {
        !matches!(self, SignalDirection::Neutral)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Long => "long",
            SignalDirection::Short => "short",
            SignalDirection::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unclamped confidence produced by the vote.
///
/// Strong trends with unanimous votes push this above 1.0; the value flows
/// into fusion as-is and is only rounded when reported.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfidence(f64);

impl RawConfidence {
    pub const ZERO: RawConfidence = RawConfidence(0.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Confidence as it appears in output
    pub fn reported(self) -> f64 {
        round_to(self.0, SCORE_DECIMALS)
    }
}

/// Outcome of a single indicator's vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Vote::Bullish => "bullish",
            Vote::Bearish => "bearish",
            Vote::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteBreakdown {
    pub rsi: Vote,
    pub macd: Vote,
    pub bollinger: Vote,
    pub stochastic: Vote,
    pub trend: Vote,
}

impl VoteBreakdown {
    pub fn all(&self) -> [Vote; 5] {
        [self.rsi, self.macd, self.bollinger, self.stochastic, self.trend]
    }

    pub fn bullish_count(&self) -> usize {
        self.all().iter().filter(|v| **v == Vote::Bullish).count()
    }

    pub fn bearish_count(&self) -> usize {
        self.all().iter().filter(|v| **v == Vote::Bearish).count()
    }
}

impl fmt::Display for VoteBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RSI={}, MACD={}, BB={}, Stoch={}, Trend={}",
            self.rsi, self.macd, self.bollinger, self.stochastic, self.trend
        )
    }
}

/// Per-indicator diagnostics attached to a signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub bb_width: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub trend: f64,
    pub volatility: f64,
    pub regime: MarketRegime,
    pub periods: AdaptivePeriods,
    pub votes: VoteBreakdown,
}

/// Signal derived from the adaptive indicator vote alone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSignal {
    pub direction: SignalDirection,
    pub confidence: RawConfidence,
    pub reason: String,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub current_price: f64,
    pub indicators: Option<IndicatorSnapshot>,
}

impl IndicatorSignal {
    pub fn insufficient_data(current_price: f64) -> Self {
        Self {
            direction: SignalDirection::Neutral,
            confidence: RawConfidence::ZERO,
            reason: "Insufficient data".to_string(),
            stop_loss: None,
            take_profit: None,
            current_price,
            indicators: None,
        }
    }
}

/// Prediction supplied by an external model, taken by value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalPrediction {
    pub direction: SignalDirection,
    pub confidence: f64,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
}

impl ExternalPrediction {
    pub fn new(direction: SignalDirection, confidence: f64) -> Self {
        Self {
            direction,
            confidence,
            stop_loss: None,
            take_profit: None,
        }
    }

    pub fn with_levels(mut self, stop_loss: f64, take_profit: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self.take_profit = Some(take_profit);
        self
    }

    /// Both a stop and a target are present
    pub fn has_levels(&self) -> bool {
        self.stop_loss.is_some() && self.take_profit.is_some()
    }
}

/// Final signal after fusion and the confidence gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedSignal {
    pub direction: SignalDirection,
    pub confidence: f64,
    pub reason: String,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub current_price: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub indicators: Option<IndicatorSnapshot>,
    pub ml_contribution: f64,
}

impl FusedSignal {
    /// Apply output rounding: prices to 8 places, scores to 2
    pub fn rounded(mut self) -> Self {
        self.confidence = round_to(self.confidence, SCORE_DECIMALS);
        self.ml_contribution = round_to(self.ml_contribution, SCORE_DECIMALS);
        self.current_price = round_to(self.current_price, PRICE_DECIMALS);
        self.stop_loss = self
            .stop_loss
            .filter(|v| v.is_finite())
            .map(|v| round_to(v, PRICE_DECIMALS));
        self.take_profit = self
            .take_profit
            .filter(|v| v.is_finite())
            .map(|v| round_to(v, PRICE_DECIMALS));
        self
    }
}

/// Trade size and reward/risk for a signal
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionPlan {
    pub size: f64,
    pub risk_reward_ratio: f64,
}

impl PositionPlan {
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalEvaluation {
    pub signal: FusedSignal,
    pub position: PositionPlan,
}
