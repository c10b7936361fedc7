//! Shared logging facility.
//!
//! The facility owns the one active backend, an `env_logger::Logger`
//! built by the configurator. Reconfiguring swaps the backend, so the old
//! sink is detached before the new one receives anything. Named `Logger`
//! handles and the `log` facade bridge both dispatch through it.

pub mod capture;
pub mod logger;

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use log::Log;
use parking_lot::{Mutex, RwLock};

use crate::error::LoggingError;
use crate::event::{LogEvent, Severity};

pub use capture::*;
pub use logger::*;

/// Stream receiving diagnostics for events that could not be rendered.
#[derive(Clone)]
pub(crate) struct Fallback {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Fallback {
    fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub(crate) fn report(&self, event: &LogEvent, err: &LoggingError) {
        let report = format!(
            "--- Logging error ---\n{}\nLogger: {}, Level: {}\nMessage: {:?}\n",
            err, event.logger, event.severity, event.message
        );
        let mut writer = self.inner.lock();
        // Nowhere left to report a failure of the fallback itself.
        let _ = writer.write_all(report.as_bytes());
        let _ = writer.flush();
    }
}

/// The process's logging pipeline: at most one backend plus a fallback stream.
pub struct LogFacility {
    backend: RwLock<Option<env_logger::Logger>>,
    fallback: Fallback,
}

impl Default for LogFacility {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFacility {
    /// Unconfigured facility reporting render failures to stderr.
    pub fn new() -> Self {
        Self::with_fallback(io::stderr())
    }

    /// Unconfigured facility reporting render failures to `fallback`.
    pub fn with_fallback<W>(fallback: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            backend: RwLock::new(None),
            fallback: Fallback::new(fallback),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.read().is_some()
    }

    /// Threshold of the active backend, `None` while unconfigured.
    pub fn level(&self) -> Option<Severity> {
        self.backend
            .read()
            .as_ref()
            .and_then(|backend| Severity::from_level_filter(backend.filter()))
    }

    /// Install `backend`, returning whether a previous one was detached.
    pub(crate) fn replace_backend(&self, backend: env_logger::Logger) -> bool {
        self.backend.write().replace(backend).is_some()
    }

    pub(crate) fn fallback(&self) -> Fallback {
        self.fallback.clone()
    }
}

impl Log for LogFacility {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        match self.backend.read().as_ref() {
            Some(backend) => backend.enabled(metadata),
            None => false,
        }
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Some(backend) = self.backend.read().as_ref() {
            backend.log(record);
        }
    }

    fn flush(&self) {
        if let Some(backend) = self.backend.read().as_ref() {
            backend.flush();
        }
    }
}

impl fmt::Debug for LogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFacility")
            .field("configured", &self.is_configured())
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}
