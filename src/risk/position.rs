use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::signal::{FusedSignal, PositionPlan};

pub const DEFAULT_BALANCE: f64 = 1000.0;
pub const DEFAULT_MAX_RISK_PER_TRADE: f64 = 0.02;

/// Sizes a single position from account balance and risk budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSizer {
    pub balance: f64,
    pub max_risk_per_trade: f64,
}

impl Default for PositionSizer {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE, DEFAULT_MAX_RISK_PER_TRADE)
    }
}

impl PositionSizer {
    pub fn new(balance: f64, max_risk_per_trade: f64) -> Self {
        Self {
            balance,
            max_risk_per_trade,
        }
    }

    /// Size = balance × max risk × confidence / |entry − stop|.
    ///
    /// Zero when there is no stop or the stop equals the entry.
    pub fn calculate_position_size(&self, entry: f64, stop_loss: Option<f64>, confidence: f64) -> f64 {
        let Some(stop_loss) = stop_loss else {
            return 0.0;
        };
        let risk_per_unit = (entry - stop_loss).abs();
        if risk_per_unit == 0.0 || !risk_per_unit.is_finite() {
            return 0.0;
        }

        let risk_amount = self.balance * self.max_risk_per_trade;
        let adjusted_risk = risk_amount * confidence;
        let size = adjusted_risk / risk_per_unit;

        debug!(entry, stop_loss, risk_amount, adjusted_risk, size, "PositionSizer: sized position");
        size.max(0.0)
    }

    /// Reward over risk, read as a long when entry is above the stop and a
    /// short otherwise. Zero for missing prices or zero risk; a target on the
    /// wrong side of entry yields zero rather than a negative ratio.
    pub fn calculate_risk_reward(
        &self,
        entry: Option<f64>,
        stop_loss: Option<f64>,
        take_profit: Option<f64>,
    ) -> f64 {
        let (Some(entry), Some(stop_loss), Some(take_profit)) = (entry, stop_loss, take_profit) else {
            return 0.0;
        };

        let (risk, reward) = if entry > stop_loss {
            (entry - stop_loss, take_profit - entry)
        } else {
            (stop_loss - entry, entry - take_profit)
        };
        if risk == 0.0 {
            return 0.0;
        }
        (reward / risk).max(0.0)
    }

    /// Plan for a fused signal at its current price; neutral signals get none
    pub fn plan(&self, signal: &FusedSignal) -> PositionPlan {
        if !signal.direction.is_actionable() {
            return PositionPlan::none();
        }
        PositionPlan {
            size: self.calculate_position_size(signal.current_price, signal.stop_loss, signal.confidence),
            risk_reward_ratio: self.calculate_risk_reward(
                Some(signal.current_price),
                signal.stop_loss,
                signal.take_profit,
            ),
        }
    }
}
