//! Pipeline configuration.
//!
//! Builds an `env_logger` backend that renders every record as one JSON
//! line, and installs it as the facility's only sink. Running it again
//! replaces that sink instead of adding another.

use std::io::{self, Write};
use std::sync::Arc;

use env_logger::{Builder, Target};
use serde::Deserialize;

use crate::error::LoggingError;
use crate::event::{LogEvent, Severity};
use crate::facility::{LogFacility, Logger, ROOT_LOGGER_NAME};
use crate::format::{validate_time_format, JsonFormatter, DEFAULT_TIME_FORMAT};

/// Settings for the console pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Threshold for the root logger and its sink.
    pub level: Severity,
    /// strftime pattern for the `timestamp` field.
    pub time_format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Severity::Info,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn with_time_format(mut self, time_format: &str) -> Self {
        self.time_format = time_format.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), LoggingError> {
        validate_time_format(&self.time_format)
    }
}

/// Configure `facility` with the default settings, writing to stdout.
pub fn configure_logging(facility: &Arc<LogFacility>) -> Result<Logger, LoggingError> {
    install_backend(facility, &LoggingConfig::default(), Target::Stdout)
}

/// Configure `facility` to write JSON lines to `writer`.
///
/// Returns the configured root logger.
pub fn configure_with<W>(
    facility: &Arc<LogFacility>,
    config: &LoggingConfig,
    writer: W,
) -> Result<Logger, LoggingError>
where
    W: Write + Send + 'static,
{
    install_backend(facility, config, Target::Pipe(Box::new(writer)))
}

fn install_backend(
    facility: &Arc<LogFacility>,
    config: &LoggingConfig,
    target: Target,
) -> Result<Logger, LoggingError> {
    // Fail before touching the existing pipeline.
    let formatter = JsonFormatter::with_time_format(&config.time_format)?;
    let fallback = facility.fallback();

    let backend = Builder::new()
        .filter_level(config.level.to_level_filter())
        .target(target)
        .format(move |buf, record| {
            let event = LogEvent::from_record(record);
            match formatter.format(&event) {
                Ok(line) => writeln!(buf, "{}", line),
                Err(e) => {
                    fallback.report(&event, &e);
                    Err(io::Error::new(io::ErrorKind::InvalidData, e))
                }
            }
        })
        .build();

    let replaced = facility.replace_backend(backend);

    log::debug!(
        "LOGGING_CONFIGURED level={} time_format={:?} replaced={}",
        config.level,
        config.time_format,
        replaced
    );

    Ok(Logger::new(ROOT_LOGGER_NAME, Arc::clone(facility)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::CaptureBuffer;

    #[test]
    fn test_configure_sets_info_threshold() {
        let facility = Arc::new(LogFacility::new());
        let buffer = CaptureBuffer::new();
        let root = configure_with(&facility, &LoggingConfig::default(), buffer.clone()).unwrap();

        assert_eq!(root.name(), "root");
        assert_eq!(facility.level(), Some(Severity::Info));

        let logger = Logger::new("app", facility.clone());
        logger.debug("dropped");
        logger.info("kept");

        let lines = buffer.json_lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "INFO");
    }

    #[test]
    fn test_configure_twice_single_sink() {
        let facility = Arc::new(LogFacility::new());
        let first = CaptureBuffer::new();
        let second = CaptureBuffer::new();

        configure_with(&facility, &LoggingConfig::default(), first.clone()).unwrap();
        configure_with(&facility, &LoggingConfig::default(), second.clone()).unwrap();

        Logger::new("app", facility).info("once");

        assert!(first.lines().is_empty());
        assert_eq!(second.lines().len(), 1);
    }

    #[test]
    fn test_configure_logging_stdout_is_idempotent() {
        let facility = Arc::new(LogFacility::new());

        let first = configure_logging(&facility).unwrap();
        let second = configure_logging(&facility).unwrap();

        assert_eq!(first, second);
        assert!(facility.is_configured());
        assert_eq!(facility.level(), Some(Severity::Info));
        assert!(second.is_enabled_for(Severity::Info));
        assert!(!second.is_enabled_for(Severity::Debug));
    }

    #[test]
    fn test_custom_level() {
        let facility = Arc::new(LogFacility::new());
        let buffer = CaptureBuffer::new();
        let config = LoggingConfig::default().with_level(Severity::Warning);
        let root = configure_with(&facility, &config, buffer.clone()).unwrap();

        root.info("dropped");
        root.warning("kept");

        assert_eq!(buffer.lines().len(), 1);
        assert_eq!(facility.level(), Some(Severity::Warning));
    }

    #[test]
    fn test_invalid_config_keeps_existing_pipeline() {
        let facility = Arc::new(LogFacility::new());
        let buffer = CaptureBuffer::new();
        configure_with(&facility, &LoggingConfig::default(), buffer.clone()).unwrap();

        let bad = LoggingConfig::default().with_time_format("%Q");
        assert!(bad.validate().is_err());
        let result = configure_with(&facility, &bad, CaptureBuffer::new());
        assert!(matches!(result, Err(LoggingError::Configuration(_))));

        Logger::new("root", facility).info("still here");
        assert_eq!(buffer.lines().len(), 1);
    }

    #[test]
    fn test_render_failure_reported_to_fallback() {
        let fallback = CaptureBuffer::new();
        let facility = Arc::new(LogFacility::with_fallback(fallback.clone()));
        let buffer = CaptureBuffer::new();
        let root = configure_with(&facility, &LoggingConfig::default(), buffer.clone()).unwrap();

        let fields = crate::event::ContextFields::new().with_response_time_ms(f64::NAN);
        root.log(Severity::Info, "GET /slow - 200", fields);
        root.info("still logging");

        assert!(fallback.contents().starts_with("--- Logging error ---"));
        assert!(fallback.contents().contains("GET /slow - 200"));
        assert_eq!(buffer.lines().len(), 1);
    }

    #[test]
    fn test_config_deserialize() {
        let config: LoggingConfig = serde_json::from_str(r#"{"level": "warning"}"#).unwrap();
        assert_eq!(config.level, Severity::Warning);
        assert_eq!(config.time_format, DEFAULT_TIME_FORMAT);

        let bad: Result<LoggingConfig, _> = serde_json::from_str(r#"{"level": "loud"}"#);
        assert!(bad.is_err());
    }
}
