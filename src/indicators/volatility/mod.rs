//! Volatility indicators: ATR, volatility score, Bollinger Bands

pub mod atr;
pub mod bollinger;

pub use atr::*;
pub use bollinger::*;
