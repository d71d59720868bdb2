//! Position sizing under a fixed per-trade risk budget.

pub mod position;

pub use position::*;
