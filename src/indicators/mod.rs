pub mod error;
pub mod parser;
pub mod validation;

pub mod bank;
pub mod regime;

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod structure;

pub use bank::{AdaptiveIndicatorBank, IndicatorReadings, MarketContext};
pub use error::IndicatorError;
pub use parser::*;
pub use regime::{AdaptivePeriods, BaseParameters, MarketRegime};
pub use validation::*;
