//! Indicator voting.
//!
//! Five indicators each cast a bullish, bearish or neutral vote. Side
//! confidence is the vote share, boosted by trend strength when the trend
//! points the same way. A side wins only above 0.6 and strictly above the
//! other side.

use tracing::debug;

use crate::common::math::round_to;
use crate::indicators::bank::{AdaptiveIndicatorBank, IndicatorReadings};
use crate::indicators::structure::SupportResistanceDetector;
use crate::indicators::trend::TrendState;
use crate::indicators::volatility::calculate_atr_default;
use crate::models::indicators::{BollingerBandsIndicator, Candle, StochasticIndicator};
use crate::models::signal::{
    IndicatorSignal, IndicatorSnapshot, RawConfidence, SignalDirection, Vote, VoteBreakdown,
    SCORE_DECIMALS,
};
use crate::signals::decision::StopLossTakeProfit;

/// Bars required before any direction is voted
pub const MIN_BARS: usize = 50;
/// Side confidence must exceed this to win
pub const VOTE_THRESHOLD: f64 = 0.6;

const VOTE_COUNT: f64 = 5.0;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const STOCH_OVERSOLD: f64 = 20.0;
const STOCH_OVERBOUGHT: f64 = 80.0;
const TREND_VOTE_THRESHOLD: f64 = 0.5;

pub fn rsi_vote(rsi: Option<f64>) -> Vote {
    match rsi {
        Some(v) if v < RSI_OVERSOLD => Vote::Bullish,
        Some(v) if v > RSI_OVERBOUGHT => Vote::Bearish,
        _ => Vote::Neutral,
    }
}

/// Histogram sign with momentum confirmed against the prior bar
pub fn macd_vote(histogram: Option<f64>, previous: Option<f64>) -> Vote {
    match (histogram, previous) {
        (Some(h), Some(p)) if h > 0.0 && h > p => Vote::Bullish,
        (Some(h), Some(p)) if h < 0.0 && h < p => Vote::Bearish,
        _ => Vote::Neutral,
    }
}

pub fn bollinger_vote(close: f64, bands: Option<&BollingerBandsIndicator>) -> Vote {
    match bands {
        Some(b) if close < b.lower => Vote::Bullish,
        Some(b) if close > b.upper => Vote::Bearish,
        _ => Vote::Neutral,
    }
}

pub fn stochastic_vote(stoch: Option<&StochasticIndicator>) -> Vote {
    match stoch {
        Some(s) if s.k < STOCH_OVERSOLD && s.d < STOCH_OVERSOLD && s.k > s.d => Vote::Bullish,
        Some(s) if s.k > STOCH_OVERBOUGHT && s.d > STOCH_OVERBOUGHT && s.k < s.d => Vote::Bearish,
        _ => Vote::Neutral,
    }
}

pub fn trend_vote(trend: TrendState) -> Vote {
    let value = trend.value();
    if value > TREND_VOTE_THRESHOLD {
        Vote::Bullish
    } else if value < -TREND_VOTE_THRESHOLD {
        Vote::Bearish
    } else {
        Vote::Neutral
    }
}

/// Unclamped confidence for each side: (long, short)
pub fn side_confidences(votes: &VoteBreakdown, trend: TrendState) -> (RawConfidence, RawConfidence) {
    let t = trend.value();
    let long_boost = if t > 0.0 { 1.0 + t.abs() * 0.5 } else { 1.0 };
    let short_boost = if t < 0.0 { 1.0 + t.abs() * 0.5 } else { 1.0 };

    (
        RawConfidence::new(votes.bullish_count() as f64 / VOTE_COUNT * long_boost),
        RawConfidence::new(votes.bearish_count() as f64 / VOTE_COUNT * short_boost),
    )
}

/// Winning direction and its confidence; neutral reports the larger side
pub fn decide(long: RawConfidence, short: RawConfidence) -> (SignalDirection, RawConfidence) {
    let (l, s) = (long.value(), short.value());
    if l > VOTE_THRESHOLD && l > s {
        (SignalDirection::Long, long)
    } else if s > VOTE_THRESHOLD && s > l {
        (SignalDirection::Short, short)
    } else {
        (SignalDirection::Neutral, RawConfidence::new(l.max(s)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalVoter {
    bank: AdaptiveIndicatorBank,
    levels: SupportResistanceDetector,
}

impl SignalVoter {
    pub fn new(bank: AdaptiveIndicatorBank, levels: SupportResistanceDetector) -> Self {
        Self { bank, levels }
    }

    pub fn bank(&self) -> &AdaptiveIndicatorBank {
        &self.bank
    }

    /// Vote on the window and propose stop-loss / take-profit
    pub fn vote(&self, candles: &[Candle]) -> IndicatorSignal {
        let current_price = candles.last().map(|c| c.close).unwrap_or_default();
        if candles.len() < MIN_BARS {
            debug!(bars = candles.len(), "SignalVoter: insufficient data");
            return IndicatorSignal::insufficient_data(current_price);
        }

        let readings = self.bank.compute(candles);
        let context = &readings.context;

        let rsi = readings.rsi.latest().map(|r| r.value);
        let macd = readings.macd.latest();
        let histogram = macd.as_ref().map(|m| m.histogram);
        let bands = readings.bollinger.latest();
        let stoch = readings.stochastic.latest();

        let votes = VoteBreakdown {
            rsi: rsi_vote(rsi),
            macd: macd_vote(histogram, readings.macd.previous_histogram()),
            bollinger: bollinger_vote(current_price, bands.as_ref()),
            stochastic: stochastic_vote(stoch.as_ref()),
            trend: trend_vote(context.trend),
        };

        let (long, short) = side_confidences(&votes, context.trend);
        let (direction, confidence) = decide(long, short);

        let reason = match direction {
            SignalDirection::Long => format!("Strong bullish signals: {votes}"),
            SignalDirection::Short => format!("Strong bearish signals: {votes}"),
            SignalDirection::Neutral => "Mixed signals, no clear direction".to_string(),
        };

        let sltp = if direction.is_actionable() {
            let atr = calculate_atr_default(candles).map(|a| a.value);
            let levels = self.levels.detect_with_volatility(candles, context.volatility);
            atr.and_then(|atr| {
                StopLossTakeProfit::for_direction(
                    direction,
                    current_price,
                    atr,
                    context.volatility,
                    &levels,
                )
            })
        } else {
            None
        };

        debug!(
            direction = %direction,
            long = long.value(),
            short = short.value(),
            votes = %votes,
            "SignalVoter: vote complete"
        );

        IndicatorSignal {
            direction,
            confidence,
            reason,
            stop_loss: sltp.map(|s| s.stop_loss),
            take_profit: sltp.map(|s| s.take_profit),
            current_price,
            indicators: Some(snapshot(&readings, rsi, histogram, bands.as_ref(), stoch.as_ref(), votes)),
        }
    }
}

fn snapshot(
    readings: &IndicatorReadings,
    rsi: Option<f64>,
    histogram: Option<f64>,
    bands: Option<&BollingerBandsIndicator>,
    stoch: Option<&StochasticIndicator>,
    votes: VoteBreakdown,
) -> IndicatorSnapshot {
    let context = &readings.context;
    IndicatorSnapshot {
        rsi: rsi.map(|v| round_to(v, SCORE_DECIMALS)),
        macd: histogram.map(|v| round_to(v, 8)),
        bb_width: bands.and_then(|b| b.width()).map(|w| round_to(w, 4)),
        stoch_k: stoch.map(|s| round_to(s.k, SCORE_DECIMALS)),
        stoch_d: stoch.map(|s| round_to(s.d, SCORE_DECIMALS)),
        trend: context.trend.value(),
        volatility: round_to(context.volatility.value(), SCORE_DECIMALS),
        regime: context.regime,
        periods: context.periods.clone(),
        votes,
    }
}
