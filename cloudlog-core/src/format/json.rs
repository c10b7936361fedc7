//! Single-line JSON formatter.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::LoggingError;
use crate::event::{ContextFields, LogEvent};

/// Default timestamp pattern: wall-clock time with millisecond precision.
///
/// Timestamps are rendered in UTC, not the host's local time zone.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// The rendered shape of one log line.
#[derive(Serialize)]
struct JsonLine<'a> {
    timestamp: String,
    level: &'static str,
    message: &'a str,
    logger: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<&'a str>,
    #[serde(flatten)]
    fields: &'a ContextFields,
}

/// Formats events as JSON objects, one per line.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    time_format: String,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom strftime pattern for the `timestamp` field.
    pub fn with_time_format(time_format: &str) -> Result<Self, LoggingError> {
        validate_time_format(time_format)?;
        Ok(Self {
            time_format: time_format.to_string(),
        })
    }

    fn format_time(&self, timestamp: &DateTime<Utc>) -> Result<String, LoggingError> {
        let mut out = String::new();
        write!(out, "{}", timestamp.format(&self.time_format)).map_err(|_| {
            LoggingError::Configuration(format!("invalid time format: {}", self.time_format))
        })?;
        Ok(out)
    }

    /// Render an event as a single-line JSON object.
    pub fn format(&self, event: &LogEvent) -> Result<String, LoggingError> {
        let line = JsonLine {
            timestamp: self.format_time(&event.timestamp)?,
            level: event.severity.as_str(),
            message: &event.message,
            logger: &event.logger,
            exception: event.exception.as_deref(),
            fields: &event.fields,
        };

        Ok(serde_json::to_string(&line)?)
    }
}

/// Reject strftime patterns chrono cannot render.
pub fn validate_time_format(time_format: &str) -> Result<(), LoggingError> {
    if time_format.is_empty() {
        return Err(LoggingError::Configuration(
            "time format must not be empty".to_string(),
        ));
    }
    if StrftimeItems::new(time_format).any(|item| matches!(item, Item::Error)) {
        return Err(LoggingError::Configuration(format!(
            "invalid time format: {}",
            time_format
        )));
    }
    Ok(())
}
