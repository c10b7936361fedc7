//! Named logger handles.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use log::Log;

use crate::event::{ContextFields, LogEvent, Severity};

use super::LogFacility;

pub const ROOT_LOGGER_NAME: &str = "root";

/// A named handle into a `LogFacility`.
///
/// The name becomes the record target, so names form the same `::`
/// hierarchy as Rust module paths. Handles carry no state beyond the name.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    facility: Arc<LogFacility>,
}

impl Logger {
    /// Handle for `name`; the empty name and "root" mean the root logger.
    pub fn new(name: &str, facility: Arc<LogFacility>) -> Self {
        let name = name.trim().trim_matches(':');
        let name = if name.is_empty() { ROOT_LOGGER_NAME } else { name };
        Self {
            name: Arc::from(name),
            facility,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled_for(&self, severity: Severity) -> bool {
        let metadata = log::Metadata::builder()
            .level(severity.to_level())
            .target(&self.name)
            .build();
        self.facility.enabled(&metadata)
    }

    /// Dispatch a prepared event under this logger's name.
    pub fn log_event(&self, event: &LogEvent) {
        self.facility.log(
            &log::Record::builder()
                .args(format_args!("{}", event.message))
                .level(event.severity.to_level())
                .target(&self.name)
                .key_values(event)
                .build(),
        );
    }

    pub fn log(&self, severity: Severity, message: impl Into<String>, fields: ContextFields) {
        if !self.is_enabled_for(severity) {
            return;
        }
        self.log_event(&LogEvent::new(severity, &self.name, message).with_fields(fields));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message, ContextFields::default());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message, ContextFields::default());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message, ContextFields::default());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message, ContextFields::default());
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Severity::Critical, message, ContextFields::default());
    }

    /// Log at ERROR with the error and its causes as exception detail.
    pub fn exception(&self, message: impl Into<String>, err: &(dyn StdError + 'static)) {
        if !self.is_enabled_for(Severity::Error) {
            return;
        }
        self.log_event(&LogEvent::new(Severity::Error, &self.name, message).with_error(err));
    }
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.facility, &other.facility)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}
