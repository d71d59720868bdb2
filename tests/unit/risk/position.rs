//! Unit tests for position sizing

use adaptrix::models::signal::{FusedSignal, PositionPlan, SignalDirection};
use adaptrix::risk::position::PositionSizer;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn fused(direction: SignalDirection, stop: Option<f64>, target: Option<f64>) -> FusedSignal {
    FusedSignal {
        direction,
        confidence: 0.8,
        reason: "test".to_string(),
        stop_loss: stop,
        take_profit: target,
        current_price: 100.0,
        indicators: None,
        ml_contribution: 0.0,
    }
}

#[test]
fn test_position_size() {
    let sizer = PositionSizer::default();
    // 1000 × 0.02 × 0.8 / 5
    assert!(approx(sizer.calculate_position_size(100.0, Some(95.0), 0.8), 3.2));
    assert!(approx(sizer.calculate_position_size(100.0, Some(105.0), 0.8), 3.2));
}

#[test]
fn test_position_size_without_risk() {
    let sizer = PositionSizer::default();
    assert_eq!(sizer.calculate_position_size(100.0, Some(100.0), 0.9), 0.0);
    assert_eq!(sizer.calculate_position_size(100.0, None, 0.9), 0.0);
    assert_eq!(sizer.calculate_position_size(100.0, Some(f64::NAN), 0.9), 0.0);
}

#[test]
fn test_risk_reward_long_and_short() {
    let sizer = PositionSizer::default();
    assert!(approx(
        sizer.calculate_risk_reward(Some(100.0), Some(95.0), Some(110.0)),
        2.0
    ));
    assert!(approx(
        sizer.calculate_risk_reward(Some(100.0), Some(104.0), Some(94.0)),
        1.5
    ));
}

#[test]
fn test_risk_reward_degenerate_inputs() {
    let sizer = PositionSizer::default();
    assert_eq!(sizer.calculate_risk_reward(None, Some(95.0), Some(110.0)), 0.0);
    assert_eq!(sizer.calculate_risk_reward(Some(100.0), None, Some(110.0)), 0.0);
    assert_eq!(sizer.calculate_risk_reward(Some(100.0), Some(100.0), Some(110.0)), 0.0);
    // Target on the stop side
    assert_eq!(sizer.calculate_risk_reward(Some(100.0), Some(95.0), Some(98.0)), 0.0);
}

#[test]
fn test_plan_for_long_signal() {
    let sizer = PositionSizer::new(10_000.0, 0.01);
    let plan = sizer.plan(&fused(SignalDirection::Long, Some(98.0), Some(106.0)));
    // 10000 × 0.01 × 0.8 / 2
    assert!(approx(plan.size, 40.0));
    assert!(approx(plan.risk_reward_ratio, 3.0));
}

#[test]
fn test_plan_for_neutral_signal_is_empty() {
    let sizer = PositionSizer::default();
    let plan = sizer.plan(&fused(SignalDirection::Neutral, Some(95.0), Some(110.0)));
    assert_eq!(plan, PositionPlan::none());
}

#[test]
fn test_plan_without_levels() {
    let sizer = PositionSizer::default();
    let plan = sizer.plan(&fused(SignalDirection::Short, None, None));
    assert_eq!(plan.size, 0.0);
    assert_eq!(plan.risk_reward_ratio, 0.0);
}
