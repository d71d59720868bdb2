//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{
    AtrIndicator, BollingerBandsIndicator, BollingerSeries, Candle, MacdIndicator, MacdSeries,
    PriceWindow, RsiIndicator, RsiSeries, StochasticIndicator, StochasticSeries,
    SupportResistanceLevels,
};
pub use signal::{
    ExternalPrediction, FusedSignal, IndicatorSignal, IndicatorSnapshot, PositionPlan,
    RawConfidence, SignalDirection, SignalEvaluation, Vote, VoteBreakdown,
};
