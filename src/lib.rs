//! Adaptive technical-indicator signal engine.
//!
//! A price window flows through volatility and trend estimation, a bank of
//! regime-adaptive indicators and a five-way vote. The vote can be fused with
//! an external model prediction, and the resulting signal is sized under a
//! fixed per-trade risk budget.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod risk;
pub mod signals;
