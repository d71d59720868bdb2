//! Unit tests for engine configuration

use adaptrix::config::{ConfigError, EngineConfig, IndicatorConfig};

#[test]
fn test_defaults_are_valid() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.indicators.volatility_window, 14);
    assert_eq!(config.indicators.trend_window, 50);
    assert_eq!(config.fusion.min_confidence, 0.7);
    assert_eq!(config.risk.balance, 1000.0);
    assert_eq!(config.risk.max_risk_per_trade, 0.02);
    assert_eq!(config.filter.duplicate_window_minutes, 15);
}

#[test]
fn test_validate_rejects_out_of_range_values() {
    let mut config = EngineConfig::default();
    config.fusion.min_confidence = 1.5;
    match config.validate() {
        Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "fusion.min_confidence"),
        other => panic!("expected invalid min_confidence, got {other:?}"),
    }

    let mut config = EngineConfig::default();
    config.indicators.trend_window = 3;
    assert!(config.validate().is_err());

    let mut config = EngineConfig::default();
    config.risk.max_risk_per_trade = 0.0;
    assert!(config.validate().is_err());

    let mut config = EngineConfig::default();
    config.indicators.base.macd_fast = 30;
    assert!(config.validate().is_err());
}

#[test]
fn test_from_env_overrides_and_ignores_garbage() {
    std::env::set_var("RISK_BALANCE", "2500");
    std::env::set_var("ENGINE_TREND_WINDOW", "notanumber");

    let config = EngineConfig::from_env();

    std::env::remove_var("RISK_BALANCE");
    std::env::remove_var("ENGINE_TREND_WINDOW");

    assert_eq!(config.risk.balance, 2500.0);
    assert_eq!(config.indicators.trend_window, 50);
}

#[test]
fn test_partial_json_uses_defaults() {
    let config: EngineConfig =
        serde_json::from_str(r#"{"fusion": {"min_confidence": 0.8}, "risk": {"balance": 50.0}}"#)
            .unwrap();
    assert_eq!(config.fusion.min_confidence, 0.8);
    assert_eq!(config.risk.balance, 50.0);
    assert_eq!(config.risk.max_risk_per_trade, 0.02);
    assert_eq!(config.indicators, IndicatorConfig::default());
}
