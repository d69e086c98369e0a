//! Decoded connection configuration.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Value};

use crate::error::BackendError;

/// Structured config of one connection, decoded from its base64 JSON form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionConfig {
    values: Map<String, Value>,
}

impl ConnectionConfig {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Decode `base64(json object)`.
    ///
    /// An absent or blank config decodes to an empty map. Anything else that
    /// is not base64 of a JSON object is an error.
    pub fn decode(encoded: Option<&str>) -> Result<Self, BackendError> {
        let encoded = match encoded.map(str::trim) {
            None | Some("") => return Ok(Self::default()),
            Some(encoded) => encoded,
        };

        let raw = STANDARD.decode(encoded)?;
        match serde_json::from_slice(&raw)? {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(BackendError::NotAnObject),
        }
    }

    /// String field; blank strings and nulls count as absent.
    /// Numbers and booleans are rendered as strings.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn require(&self, key: &str) -> Result<String, BackendError> {
        self.get(key).ok_or_else(|| BackendError::missing(key))
    }

    /// Like [`get`](Self::get), but an empty string is a value.
    /// Used for credentials, where `""` is a legitimate password.
    pub fn get_verbatim(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) => Some(s.clone()),
            _ => self.get(key),
        }
    }

    pub fn require_verbatim(&self, key: &str) -> Result<String, BackendError> {
        self.get_verbatim(key).ok_or_else(|| BackendError::missing(key))
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
