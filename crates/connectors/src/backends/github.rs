//! GitHub API connections.

use async_trait::async_trait;
use octocrab::Octocrab;
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::BackendError;
use crate::registry::Backend;

#[async_trait]
impl Connection for Octocrab {
    fn kind(&self) -> &'static str {
        "github"
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// `github`: optional `token`; without one the client is anonymous.
/// An optional `url` points the client at a GitHub Enterprise API.
pub struct GitHubBackend;

#[async_trait]
impl Backend for GitHubBackend {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>, BackendError> {
        let mut builder = match config.get("token") {
            Some(token) => Octocrab::builder().personal_token(token),
            None => {
                debug!("No GitHub token configured, using anonymous client");
                Octocrab::builder()
            }
        };

        if let Some(url) = config.get("url") {
            builder = builder.base_uri(url)?;
        }

        Ok(Arc::new(builder.build()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::ConnectionFactory;
    use crate::registry::{tags, BackendRegistry};
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use worker_core::ConnectionDescriptor;

    fn factory(config: Value) -> ConnectionFactory {
        let descriptors = BTreeMap::from([(
            "gh".to_string(),
            ConnectionDescriptor::from_json(tags::GITHUB, &config),
        )]);
        ConnectionFactory::new(descriptors, Arc::new(BackendRegistry::with_defaults()))
    }

    async fn mock_api() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;
        server
    }

    async fn authorization_sent(server: &MockServer) -> Option<String> {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        requests[0]
            .headers
            .get("authorization")
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_token_client_sends_credentials() {
        let server = mock_api().await;
        let factory = factory(json!({"token": "secret-token", "url": server.uri()}));

        let client = factory.resolve_as::<Octocrab>("gh").await.unwrap();
        assert_eq!(factory.resolve("gh").await.unwrap().kind(), "github");

        let body: Value = client.get("/rate_limit", None::<&()>).await.unwrap();
        assert_eq!(body, json!({"ok": true}));

        let auth = authorization_sent(&server).await.unwrap();
        assert!(auth.ends_with("secret-token"));
    }

    #[tokio::test]
    async fn test_missing_token_gives_anonymous_client() {
        let server = mock_api().await;
        let factory = factory(json!({"url": server.uri()}));

        let client = factory.resolve_as::<Octocrab>("gh").await.unwrap();
        let _: Value = client.get("/rate_limit", None::<&()>).await.unwrap();

        assert_eq!(authorization_sent(&server).await, None);
    }

    #[tokio::test]
    async fn test_empty_config_resolves_against_public_api() {
        let factory = factory(json!({}));

        assert!(factory.resolve_as::<Octocrab>("gh").await.is_ok());
        assert_eq!(factory.resolved_count().await, 1);
    }
}
