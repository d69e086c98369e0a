use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A domain event dispatched by an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub name: String,
    #[schema(value_type = Object)]
    pub data: Value,
}

impl Event {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}
