//! CloudLog Core - structured JSON logging for cloud log ingestion
//!
//! Every event becomes one JSON object on one line of stdout, with the
//! fixed keys `timestamp`, `level`, `message` and `logger`, plus any
//! contextual fields (`request_id`, `status_code`, ...) the caller attached.
//! Filtering and writing are done by an `env_logger` backend; this crate
//! supplies the JSON format and the wiring.
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `event` - Severity levels, the event record and its contextual fields
//! - `format` - JSON line formatter
//! - `facility` - The shared pipeline and named logger handles
//! - `config` - One-sink pipeline setup (safe to re-run)
//! - `request` - HTTP request/response logging
//! - `bridge` - `log` facade integration
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cloudlog_core::{configure_logging, get_logger, log_request, LogFacility, RequestIds};
//!
//! let facility = Arc::new(LogFacility::new());
//! configure_logging(&facility).expect("stdout logging");
//!
//! let logger = get_logger(&facility, "app::http");
//! log_request(&logger, "GET", "/health", 200, 12.5, RequestIds::new());
//! ```

use std::sync::Arc;

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod facility;
pub mod format;
pub mod request;

pub use config::{configure_logging, configure_with, LoggingConfig};
pub use error::LoggingError;
pub use event::{ContextFields, FieldValue, LogEvent, Severity};
pub use facility::{CaptureBuffer, LogFacility, Logger, ROOT_LOGGER_NAME};
pub use format::{JsonFormatter, DEFAULT_TIME_FORMAT};
pub use request::{log_request, request_severity, RequestIds};

/// Get the logger with the given name from `facility`.
///
/// Lookup only; no configuration happens here.
pub fn get_logger(facility: &Arc<LogFacility>, name: &str) -> Logger {
    Logger::new(name, Arc::clone(facility))
}
