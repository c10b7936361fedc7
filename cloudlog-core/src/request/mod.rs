//! HTTP request logging.
//!
//! One event per request: ERROR for 5xx responses, INFO for everything
//! else.

use crate::event::{ContextFields, FieldValue, Severity};
use crate::facility::Logger;

/// Status codes at or above this are logged at ERROR.
pub const SERVER_ERROR_THRESHOLD: u16 = 500;

/// Optional identifiers attached to a request log line.
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestIds {
    pub request_id: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

impl RequestIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, id: &str) -> Self {
        self.request_id = Some(id.to_string());
        self
    }

    pub fn with_user_id(mut self, id: &str) -> Self {
        self.user_id = Some(id.to_string());
        self
    }

    pub fn with_session_id(mut self, id: &str) -> Self {
        self.session_id = Some(id.to_string());
        self
    }
}

/// Severity for a response status.
pub fn request_severity(status_code: u16) -> Severity {
    if status_code >= SERVER_ERROR_THRESHOLD {
        Severity::Error
    } else {
        Severity::Info
    }
}

/// Contextual fields for a request log line.
pub fn request_fields(
    method: &str,
    path: &str,
    status_code: u16,
    response_time_ms: f64,
    ids: RequestIds,
) -> ContextFields {
    let mut fields = ContextFields::new()
        .with_method(method)
        .with_path(path)
        .with_status_code(status_code)
        .with_response_time_ms(response_time_ms);

    fields.request_id = present(ids.request_id);
    fields.user_id = present(ids.user_id);
    fields.session_id = present(ids.session_id);
    fields
}

fn present(id: Option<String>) -> Option<FieldValue> {
    id.filter(|s| !s.is_empty()).map(Into::into)
}

/// Log one HTTP request/response pair as `"<method> <path> - <status>"`.
pub fn log_request(
    logger: &Logger,
    method: &str,
    path: &str,
    status_code: u16,
    response_time_ms: f64,
    ids: RequestIds,
) {
    let fields = request_fields(method, path, status_code, response_time_ms, ids);
    logger.log(
        request_severity(status_code),
        format!("{} {} - {}", method, path, status_code),
        fields,
    );
}
