//! Bridge from the `log` facade into a `LogFacility`.
//!
//! Record targets become logger names, so `log::info!` in module
//! `app::http` is rendered with `"logger": "app::http"`. Key-values named
//! like a contextual field (`request_id = "abc"`) are carried onto the line.

use std::sync::Arc;

use log::Log;

use crate::config::configure_logging;
use crate::error::LoggingError;
use crate::facility::{LogFacility, Logger};

/// `log::Log` implementation sharing a facility with `Logger` handles.
pub struct FacadeLogger {
    facility: Arc<LogFacility>,
}

impl FacadeLogger {
    pub fn new(facility: Arc<LogFacility>) -> Self {
        Self { facility }
    }
}

impl Log for FacadeLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.facility.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        self.facility.log(record);
    }

    fn flush(&self) {
        self.facility.flush();
    }
}

/// Route the `log` facade into `facility`. Can succeed once per process.
pub fn install(facility: Arc<LogFacility>) -> Result<(), LoggingError> {
    log::set_boxed_logger(Box::new(FacadeLogger::new(facility)))?;
    // Level filtering belongs to the facility's backend.
    log::set_max_level(log::LevelFilter::Trace);
    log::debug!("LOG_BRIDGE_INSTALLED");
    Ok(())
}

/// Build a facility writing to stdout and make it the `log` facade's backend.
///
/// Returns the configured root logger.
pub fn init() -> Result<Logger, LoggingError> {
    let facility = Arc::new(LogFacility::new());
    let root = configure_logging(&facility)?;
    install(facility)?;
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{configure_with, LoggingConfig};
    use crate::facility::CaptureBuffer;
    use log::kv::{ToValue, Value};
    use log::{Level, Record};

    fn configured() -> (FacadeLogger, CaptureBuffer) {
        let facility = Arc::new(LogFacility::new());
        let buffer = CaptureBuffer::new();
        configure_with(&facility, &LoggingConfig::default(), buffer.clone()).unwrap();
        (FacadeLogger::new(facility), buffer)
    }

    #[test]
    fn test_record_maps_to_line() {
        let (bridge, buffer) = configured();

        bridge.log(
            &Record::builder()
                .args(format_args!("cache warmed in {}ms", 40))
                .level(Level::Warn)
                .target("app::cache")
                .build(),
        );

        let lines = buffer.json_lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "WARNING");
        assert_eq!(lines[0]["logger"], "app::cache");
        assert_eq!(lines[0]["message"], "cache warmed in 40ms");
    }

    #[test]
    fn test_key_values_become_fields() {
        let (bridge, buffer) = configured();

        let status = 503u16;
        let kvs: &[(&str, Value)] = &[
            ("request_id", Value::from("abc123")),
            ("status_code", status.to_value()),
            ("tenant", Value::from("acme")),
        ];
        bridge.log(
            &Record::builder()
                .args(format_args!("POST /orders - 503"))
                .level(Level::Error)
                .target("app::http")
                .key_values(&kvs)
                .build(),
        );

        let lines = buffer.json_lines().unwrap();
        let obj = lines[0].as_object().unwrap();
        assert_eq!(obj["request_id"], "abc123");
        assert_eq!(obj["status_code"], 503);
        assert!(!obj.contains_key("tenant"));
        assert!(!obj.contains_key("user_id"));
    }

    #[test]
    fn test_trace_and_debug_below_threshold() {
        let (bridge, buffer) = configured();

        let metadata = log::Metadata::builder().level(Level::Debug).target("app").build();
        assert!(!bridge.enabled(&metadata));

        bridge.log(
            &Record::builder()
                .args(format_args!("noise"))
                .level(Level::Trace)
                .target("app")
                .build(),
        );
        bridge.flush();
        assert!(buffer.lines().is_empty());
    }
}
