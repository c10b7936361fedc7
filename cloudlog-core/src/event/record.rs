//! Severity levels and the immutable event record.

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::kv::{self, Key, Value, VisitSource};
use serde::{Deserialize, Deserializer};

use crate::error::LoggingError;

use super::fields::{ContextFields, FieldValue};

/// Record key carrying a severity `log::Level` cannot express (CRITICAL).
pub const SEVERITY_KEY: &str = "severity";

/// Record key carrying the rendered exception detail.
pub const EXCEPTION_KEY: &str = "exception";

/// Ordered severity of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// All levels in ascending order.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(LoggingError::Configuration(format!(
                "unknown severity: {}",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Severity {
    /// The `log` level events of this severity are dispatched at.
    pub fn to_level(self) -> log::Level {
        match self {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error | Severity::Critical => log::Level::Error,
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }

    /// Severity threshold of a level filter; `None` when everything is off.
    pub fn from_level_filter(filter: log::LevelFilter) -> Option<Severity> {
        filter.to_level().map(Severity::from)
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Severity::Debug,
            log::Level::Info => Severity::Info,
            log::Level::Warn => Severity::Warning,
            log::Level::Error => Severity::Error,
        }
    }
}

/// A single log event, as produced by the calling code.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
    pub logger: String,
    pub exception: Option<String>,
    pub fields: ContextFields,
}

impl LogEvent {
    /// Create an event stamped with the current time.
    pub fn new(severity: Severity, logger: &str, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            message: message.into(),
            logger: logger.to_string(),
            exception: None,
            fields: ContextFields::default(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_fields(mut self, fields: ContextFields) -> Self {
        self.fields = fields;
        self
    }

    /// Attach an error and its source chain as the exception detail.
    pub fn with_error(mut self, err: &(dyn StdError + 'static)) -> Self {
        self.exception = Some(render_error_chain(err));
        self
    }

    /// Attach a pre-rendered trace (e.g. a captured backtrace).
    pub fn with_exception_text(mut self, text: impl Into<String>) -> Self {
        self.exception = Some(text.into());
        self
    }

    /// Rebuild an event from a `log` record, stamped with the current time.
    ///
    /// Key-values named like a contextual field populate `fields`; other
    /// keys are ignored.
    pub fn from_record(record: &log::Record<'_>) -> Self {
        let mut collector = RecordCollector {
            severity: Severity::from(record.level()),
            exception: None,
            fields: ContextFields::default(),
        };
        // A failing key-value source costs its fields, not the message.
        let _ = record.key_values().visit(&mut collector);

        let event = LogEvent::new(collector.severity, record.target(), record.args().to_string())
            .with_fields(collector.fields);
        match collector.exception {
            Some(text) => event.with_exception_text(text),
            None => event,
        }
    }
}

/// Carries the event's extra data on a `log` record.
impl kv::Source for LogEvent {
    fn visit<'kvs>(&'kvs self, visitor: &mut dyn VisitSource<'kvs>) -> Result<(), kv::Error> {
        if self.severity == Severity::Critical {
            visitor.visit_pair(Key::from_str(SEVERITY_KEY), Value::from(self.severity.as_str()))?;
        }
        if let Some(exception) = &self.exception {
            visitor.visit_pair(Key::from_str(EXCEPTION_KEY), Value::from(exception.as_str()))?;
        }
        kv::Source::visit(&self.fields, visitor)
    }
}

struct RecordCollector {
    severity: Severity,
    exception: Option<String>,
    fields: ContextFields,
}

impl<'kvs> VisitSource<'kvs> for RecordCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        match key.as_str() {
            SEVERITY_KEY => {
                if let Ok(severity) = value.to_string().parse() {
                    self.severity = severity;
                }
            }
            EXCEPTION_KEY => self.exception = Some(value.to_string()),
            name => {
                self.fields.set(name, field_value(&value));
            }
        }
        Ok(())
    }
}

fn field_value(value: &Value<'_>) -> FieldValue {
    if let Some(s) = value.to_borrowed_str() {
        return FieldValue::Str(s.to_string());
    }
    if let Some(b) = value.to_bool() {
        return FieldValue::Bool(b);
    }
    if let Some(i) = value.to_i64() {
        return FieldValue::Int(i);
    }
    if let Some(u) = value.to_u64() {
        return match i64::try_from(u) {
            Ok(i) => FieldValue::Int(i),
            Err(_) => FieldValue::Str(u.to_string()),
        };
    }
    if let Some(f) = value.to_f64() {
        return FieldValue::Float(f);
    }
    FieldValue::Str(value.to_string())
}

/// Render an error followed by one `Caused by:` line per source.
pub fn render_error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\nCaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
