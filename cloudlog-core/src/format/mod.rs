//! Event formatting.
//!
//! Renders a `LogEvent` into the single-line JSON object expected by the
//! cloud logging backend.

pub mod json;

pub use json::*;
