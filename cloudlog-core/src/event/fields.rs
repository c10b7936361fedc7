//! Optional contextual fields attached to a single event.
//!
//! Each field is either explicitly present or absent. Absent fields are
//! omitted from the rendered JSON, never emitted as `null`.

use log::kv::{self, Key, ToValue, Value, VisitSource};
use serde::ser::{Error as SerError, Serializer};
use serde::Serialize;

/// Names of the recognised contextual fields, in render order.
pub const CONTEXT_FIELD_NAMES: [&str; 7] = [
    "request_id",
    "user_id",
    "session_id",
    "status_code",
    "response_time_ms",
    "method",
    "path",
];

/// A string or numeric value carried by a contextual field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            // serde_json would quietly write `null` for NaN/inf
            FieldValue::Float(f) if !f.is_finite() => Err(S::Error::custom(format!(
                "non-finite float {} is not representable in JSON",
                f
            ))),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl ToValue for FieldValue {
    fn to_value(&self) -> Value<'_> {
        match self {
            FieldValue::Str(s) => Value::from(s.as_str()),
            FieldValue::Int(i) => i.to_value(),
            FieldValue::Float(f) => f.to_value(),
            FieldValue::Bool(b) => b.to_value(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<u16> for FieldValue {
    fn from(v: u16) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

/// The contextual field set of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContextFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<FieldValue>,
}

impl ContextFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, v: impl Into<FieldValue>) -> Self {
        self.request_id = Some(v.into());
        self
    }

    pub fn with_user_id(mut self, v: impl Into<FieldValue>) -> Self {
        self.user_id = Some(v.into());
        self
    }

    pub fn with_session_id(mut self, v: impl Into<FieldValue>) -> Self {
        self.session_id = Some(v.into());
        self
    }

    pub fn with_status_code(mut self, v: impl Into<FieldValue>) -> Self {
        self.status_code = Some(v.into());
        self
    }

    pub fn with_response_time_ms(mut self, v: impl Into<FieldValue>) -> Self {
        self.response_time_ms = Some(v.into());
        self
    }

    pub fn with_method(mut self, v: impl Into<FieldValue>) -> Self {
        self.method = Some(v.into());
        self
    }

    pub fn with_path(mut self, v: impl Into<FieldValue>) -> Self {
        self.path = Some(v.into());
        self
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<FieldValue>> {
        match name {
            "request_id" => Some(&mut self.request_id),
            "user_id" => Some(&mut self.user_id),
            "session_id" => Some(&mut self.session_id),
            "status_code" => Some(&mut self.status_code),
            "response_time_ms" => Some(&mut self.response_time_ms),
            "method" => Some(&mut self.method),
            "path" => Some(&mut self.path),
            _ => None,
        }
    }

    /// Set a field by its name. Returns false if the name is not recognised.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        match name {
            "request_id" => self.request_id.as_ref(),
            "user_id" => self.user_id.as_ref(),
            "session_id" => self.session_id.as_ref(),
            "status_code" => self.status_code.as_ref(),
            "response_time_ms" => self.response_time_ms.as_ref(),
            "method" => self.method.as_ref(),
            "path" => self.path.as_ref(),
            _ => None,
        }
    }

    /// Names of the fields that are present.
    pub fn present(&self) -> Vec<&'static str> {
        CONTEXT_FIELD_NAMES
            .iter()
            .copied()
            .filter(|name| self.get(name).is_some())
            .collect()
    }
}

/// Present fields as `log` key-values, so they ride along on a record.
impl kv::Source for ContextFields {
    fn visit<'kvs>(&'kvs self, visitor: &mut dyn VisitSource<'kvs>) -> Result<(), kv::Error> {
        for name in CONTEXT_FIELD_NAMES {
            if let Some(value) = self.get(name) {
                visitor.visit_pair(Key::from_str(name), value.to_value())?;
            }
        }
        Ok(())
    }

    fn count(&self) -> usize {
        self.present().len()
    }
}
