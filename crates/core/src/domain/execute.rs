use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::error::CoreError;

/// The HTTP request that triggered an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Path parameters extracted by the calling host's router
    #[serde(default)]
    pub uri_fragments: BTreeMap<String, String>,
    /// Query parameters
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub body: Value,
}

impl ActionRequest {
    pub fn new(method: impl Into<String>, body: Value) -> Self {
        Self {
            method: method.into(),
            body,
            ..Default::default()
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A named external-service connection made available to an action.
///
/// `config` is base64 of a JSON object; decoding happens lazily when the
/// connection is first resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConnectionDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

impl ConnectionDescriptor {
    pub fn new(kind: impl Into<String>, config: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            config,
        }
    }

    /// Build a descriptor from a plain JSON config, encoding it the way callers do.
    pub fn from_json(kind: impl Into<String>, config: &Value) -> Self {
        use base64::Engine as _;

        let encoded = base64::engine::general_purpose::STANDARD.encode(config.to_string());
        Self::new(kind, Some(encoded))
    }
}

/// Decoded execution request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExecuteRequest {
    pub request: ActionRequest,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub context: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<BTreeMap<String, ConnectionDescriptor>>,
}

impl ExecuteRequest {
    pub fn new(request: ActionRequest) -> Self {
        Self {
            request,
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    pub fn with_connection(mut self, name: impl Into<String>, descriptor: ConnectionDescriptor) -> Self {
        self.connections
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), descriptor);
        self
    }

    /// Validate and decode a raw JSON payload.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn connection_names(&self) -> Vec<String> {
        self.connections
            .as_ref()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default()
    }
}
