use base64::Engine as _;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use utoipa::ToSchema;

use super::{Event, LogEntry};

pub const NO_CONTENT: u16 = 204;

/// Body of a response envelope.
///
/// `Empty` encodes as `null`, `Bytes` as a base64 string.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseBody {
    #[default]
    Empty,
    Json(Value),
    Bytes(Vec<u8>),
}

impl ResponseBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            other => Self::Json(other),
        }
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<()> for ResponseBody {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

impl Serialize for ResponseBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Json(value) => value.serialize(serializer),
            Self::Bytes(bytes) => serializer
                .serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes)),
        }
    }
}

impl<'de> Deserialize<'de> for ResponseBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Value::deserialize(deserializer)?.into())
    }
}

/// HTTP-shaped response produced by one execution.
///
/// Headers keep the order the action set them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    pub fn new(status_code: u16, headers: IndexMap<String, String>, body: ResponseBody) -> Self {
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// `204` with no headers and no body.
    pub fn no_content() -> Self {
        Self::new(NO_CONTENT, IndexMap::new(), ResponseBody::Empty)
    }
}

impl Default for ResponseEnvelope {
    fn default() -> Self {
        Self::no_content()
    }
}

/// Everything one execution produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExecutionResult {
    pub events: Vec<Event>,
    pub logs: Vec<LogEntry>,
    pub response: ResponseEnvelope,
}
