//! The `log` facade routed through the bridge.
//!
//! Kept in its own test binary: the global logger can be set once per process.

use std::sync::Arc;

use cloudlog_core::bridge::install;
use cloudlog_core::{configure_with, CaptureBuffer, LogFacility, LoggingConfig};

#[test]
fn test_log_macros_reach_sink() {
    let facility = Arc::new(LogFacility::new());
    let buffer = CaptureBuffer::new();
    configure_with(&facility, &LoggingConfig::default(), buffer.clone()).unwrap();
    install(facility.clone()).unwrap();

    log::debug!(target: "app::http", "not emitted");
    log::info!(target: "app::http", request_id = "abc123", status_code = 200; "GET {} - {}", "/health", 200);
    log::error!(target: "app::db", "connection lost");

    let lines = buffer.json_lines().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["logger"], "app::http");
    assert_eq!(lines[0]["message"], "GET /health - 200");
    assert_eq!(lines[0]["request_id"], "abc123");
    assert_eq!(lines[0]["status_code"], 200);
    assert_eq!(lines[1]["level"], "ERROR");
    assert_eq!(lines[1]["logger"], "app::db");

    // Reconfiguring the installed facility swaps the facade's sink too
    let replacement = CaptureBuffer::new();
    configure_with(&facility, &LoggingConfig::default(), replacement.clone()).unwrap();
    log::warn!(target: "app", "after swap");
    assert_eq!(buffer.lines().len(), 2);
    assert_eq!(replacement.lines().len(), 1);

    // Second install is rejected
    assert!(install(Arc::new(LogFacility::new())).is_err());
}
