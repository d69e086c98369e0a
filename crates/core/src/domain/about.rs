use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Worker protocol version reported to hosts.
pub const API_VERSION: &str = "1.0.0";

/// Implementation language reported to hosts.
pub const LANGUAGE: &str = "rust";

/// Static identity of the runtime, used by hosts to check protocol compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub api_version: String,
    pub language: String,
}

impl About {
    pub fn current() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            language: LANGUAGE.to_string(),
        }
    }
}

impl Default for About {
    fn default() -> Self {
        Self::current()
    }
}
