//! Response building and normalization.

use serde_json::Value;
use indexmap::IndexMap;
use worker_core::{ResponseBody, ResponseEnvelope};

/// What an action handed back.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActionOutput {
    /// A response built with [`ResponseBuilder`]
    Response(ResponseEnvelope),
    /// Any other value; not HTTP-shaped
    Value(Value),
    #[default]
    None,
}

impl From<ResponseEnvelope> for ActionOutput {
    fn from(response: ResponseEnvelope) -> Self {
        Self::Response(response)
    }
}

impl From<Option<ResponseEnvelope>> for ActionOutput {
    fn from(response: Option<ResponseEnvelope>) -> Self {
        response.map(Self::Response).unwrap_or_default()
    }
}

impl From<Value> for ActionOutput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<()> for ActionOutput {
    fn from(_: ()) -> Self {
        Self::None
    }
}

/// Capability handed to actions for building HTTP responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseBuilder;

impl ResponseBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build<K, V>(
        &self,
        status_code: u16,
        headers: impl IntoIterator<Item = (K, V)>,
        body: impl Into<ResponseBody>,
    ) -> ResponseEnvelope
    where
        K: Into<String>,
        V: Into<String>,
    {
        let headers: IndexMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        ResponseEnvelope::new(status_code, headers, body.into())
    }

    /// JSON body without extra headers
    pub fn json(&self, status_code: u16, body: Value) -> ResponseEnvelope {
        ResponseEnvelope::new(status_code, IndexMap::new(), body.into())
    }

    pub fn no_content(&self) -> ResponseEnvelope {
        ResponseEnvelope::no_content()
    }
}

/// Turns an action's output into the response envelope of the result.
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Responses are copied as-is; anything else becomes `204` with no
    /// headers and no body.
    pub fn normalize(output: ActionOutput) -> ResponseEnvelope {
        match output {
            ActionOutput::Response(response) => response,
            ActionOutput::Value(_) | ActionOutput::None => ResponseEnvelope::no_content(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_built_response_is_copied_verbatim() {
        let response = ResponseBuilder::new().build(201, [("X", "Y")], json!({"id": 1}));
        let normalized = ResponseNormalizer::normalize(response.clone().into());

        assert_eq!(normalized, response);
        assert_eq!(normalized.status_code, 201);
        assert_eq!(normalized.headers.get("X").map(String::as_str), Some("Y"));
        assert_eq!(normalized.body, ResponseBody::Json(json!({"id": 1})));
    }

    #[test]
    fn test_plain_value_becomes_no_content() {
        let normalized = ResponseNormalizer::normalize(json!(42).into());
        assert_eq!(normalized, ResponseEnvelope::no_content());
    }

    #[test]
    fn test_nothing_becomes_no_content() {
        let normalized = ResponseNormalizer::normalize(().into());
        assert_eq!(normalized.status_code, 204);
        assert!(normalized.headers.is_empty());
        assert!(normalized.body.is_empty());

        assert_eq!(
            ResponseNormalizer::normalize(ActionOutput::from(None::<ResponseEnvelope>)),
            ResponseEnvelope::no_content()
        );
    }

    #[test]
    fn test_builder_keeps_header_order() {
        let response = ResponseBuilder::new().build(
            200,
            [("Z-Last", "1"), ("A-First", "2"), ("M-Middle", "3")],
            (),
        );
        let names: Vec<&str> = response.headers.keys().map(String::as_str).collect();

        assert_eq!(names, vec!["Z-Last", "A-First", "M-Middle"]);
    }

    #[test]
    fn test_raw_bytes_body() {
        let response = ResponseBuilder::new().build(
            200,
            [("Content-Type", "text/plain")],
            b"hello".to_vec(),
        );
        assert_eq!(response.body, ResponseBody::Bytes(b"hello".to_vec()));
    }

    #[test]
    fn test_explicit_no_content_from_builder() {
        let response = ResponseBuilder::new().no_content();
        assert_eq!(ResponseNormalizer::normalize(response.into()), ResponseEnvelope::no_content());
    }
}
