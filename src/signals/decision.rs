//! Stop-loss and take-profit placement for a voted direction.
//!
//! The initial stop sits a volatility-scaled ATR multiple away from price.
//! Nearby support and resistance can only tighten the stop and cap the
//! target, never loosen them.

use serde::{Deserialize, Serialize};

use crate::indicators::volatility::VolatilityScore;
use crate::models::indicators::SupportResistanceLevels;
use crate::models::signal::SignalDirection;

/// Target distance as a multiple of stop distance
pub const REWARD_MULTIPLE: f64 = 2.0;
/// Buffer applied to a support/resistance level on the near side
const LEVEL_BUFFER: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLossTakeProfit {
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// ATR multiple for the initial stop: 2.5 + 2 × volatility
pub fn volatility_factor(volatility: VolatilityScore) -> f64 {
    2.5 + volatility.value() * 2.0
}

impl StopLossTakeProfit {
    /// Levels for an actionable direction, `None` for neutral
    pub fn for_direction(
        direction: SignalDirection,
        price: f64,
        atr: f64,
        volatility: VolatilityScore,
        levels: &SupportResistanceLevels,
    ) -> Option<Self> {
        let distance = atr * volatility_factor(volatility);
        match direction {
            SignalDirection::Long => Some(Self::long(price, distance, levels)),
            SignalDirection::Short => Some(Self::short(price, distance, levels)),
            SignalDirection::Neutral => None,
        }
    }

    fn long(price: f64, distance: f64, levels: &SupportResistanceLevels) -> Self {
        let mut stop_loss = price - distance;
        if let Some(support) = levels.nearest_support_below(price) {
            stop_loss = stop_loss.max(support * (1.0 - LEVEL_BUFFER));
        }

        let mut take_profit = price + (price - stop_loss) * REWARD_MULTIPLE;
        if let Some(resistance) = levels.nearest_resistance_above(price) {
            take_profit = take_profit.min(resistance * (1.0 - LEVEL_BUFFER));
        }

        Self {
            stop_loss,
            take_profit,
        }
    }

    fn short(price: f64, distance: f64, levels: &SupportResistanceLevels) -> Self {
        let mut stop_loss = price + distance;
        if let Some(resistance) = levels.nearest_resistance_above(price) {
            stop_loss = stop_loss.min(resistance * (1.0 + LEVEL_BUFFER));
        }

        let mut take_profit = price - (stop_loss - price) * REWARD_MULTIPLE;
        if let Some(support) = levels.nearest_support_below(price) {
            take_profit = take_profit.max(support * (1.0 + LEVEL_BUFFER));
        }

        Self {
            stop_loss,
            take_profit,
        }
    }
}
