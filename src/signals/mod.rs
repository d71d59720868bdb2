//! Signal synthesis: voting, fusion with external predictions, filtering.

pub mod decision;
pub mod engine;
pub mod filter;
pub mod fusion;
pub mod prediction;
pub mod voter;

pub use decision::*;
pub use engine::SignalEngine;
pub use filter::*;
pub use fusion::*;
pub use voter::SignalVoter;
