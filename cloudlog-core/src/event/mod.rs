//! Log event data model.
//!
//! A `LogEvent` is created at the call site and never mutated once it has
//! been handed to the facility for dispatch.

pub mod fields;
pub mod record;

pub use fields::*;
pub use record::*;
