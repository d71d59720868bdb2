//! Serving layer

pub mod http;

pub use http::*;
