use connectors::{
    tags, AnyPool, BackendError, ConnectionFactory, ConnectorError, Elasticsearch, HttpClient,
    BackendRegistry,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use worker_core::ConnectionDescriptor;

fn factory(descriptors: Vec<(&str, ConnectionDescriptor)>) -> ConnectionFactory {
    let descriptors: BTreeMap<String, ConnectionDescriptor> = descriptors
        .into_iter()
        .map(|(name, d)| (name.to_string(), d))
        .collect();
    ConnectionFactory::new(descriptors, Arc::new(BackendRegistry::with_defaults()))
}

mod relational {
    use super::*;

    #[tokio::test]
    async fn test_simple_form_resolves_once_and_unknown_name_fails() {
        let factory = factory(vec![(
            "db",
            ConnectionDescriptor::from_json(
                tags::SQL,
                &json!({"host": "h", "database": "d", "username": "u", "password": "p", "type": "driverA"}),
            ),
        )]);

        let first = factory.resolve("db").await.unwrap();
        let second = factory.resolve("db").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let err = factory.resolve("cache").await.unwrap_err();
        assert!(matches!(err, ConnectorError::NotFound(ref n) if n == "cache"));

        factory.close().await;
    }

    #[tokio::test]
    async fn test_dsn_form_with_sqlite() {
        let factory = factory(vec![(
            "db",
            ConnectionDescriptor::from_json(tags::SQL_DSN, &json!({"url": "sqlite::memory:"})),
        )]);

        let pool = factory.resolve_as::<AnyPool>("db").await.unwrap();
        sqlx::query("SELECT 1").execute(&*pool).await.unwrap();

        factory.close().await;
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn test_legacy_tag_resolves_same_backend() {
        let factory = factory(vec![(
            "db",
            ConnectionDescriptor::from_json(
                tags::legacy::SQL,
                &json!({"type": "pdo_sqlite", "database": ":memory:"}),
            ),
        )]);

        let connection = factory.resolve("db").await.unwrap();
        assert_eq!(connection.kind(), "sql");
        factory.close().await;
    }

    #[tokio::test]
    async fn test_malformed_dsn_is_construction_failure() {
        let factory = factory(vec![(
            "db",
            ConnectionDescriptor::from_json(tags::SQL_DSN, &json!({"url": "mysql://[broken"})),
        )]);

        let err = factory.resolve("db").await.unwrap_err();
        assert!(matches!(err, ConnectorError::Construction { ref name, .. } if name == "db"));
    }
}

mod http {
    use super::*;

    #[tokio::test]
    async fn test_http_client_uses_base_url_and_basic_auth() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/items"))
            .and(header("authorization", "Basic dTpw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .mount(&mock)
            .await;

        let factory = factory(vec![(
            "api",
            ConnectionDescriptor::from_json(
                tags::HTTP,
                &json!({"url": format!("{}/api/", mock.uri()), "username": "u", "password": "p"}),
            ),
        )]);

        let client = factory.resolve_as::<HttpClient>("api").await.unwrap();
        let response = client.get("items").unwrap().send().await.unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_http_client_returns_error_statuses() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock)
            .await;

        let factory = factory(vec![(
            "api",
            ConnectionDescriptor::from_json(tags::legacy::HTTP, &json!({"url": mock.uri()})),
        )]);

        let client = factory.resolve_as::<HttpClient>("api").await.unwrap();
        let response = client.post("/missing").unwrap().send().await.unwrap();

        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_username_without_password_sends_no_auth() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock)
            .await;

        let factory = factory(vec![(
            "api",
            ConnectionDescriptor::from_json(tags::HTTP, &json!({"url": mock.uri(), "username": "u"})),
        )]);

        let client = factory.resolve_as::<HttpClient>("api").await.unwrap();
        client.get("/").unwrap().send().await.unwrap();

        let requests = mock.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_construction_failure() {
        let factory = factory(vec![(
            "api",
            ConnectionDescriptor::from_json(tags::HTTP, &json!({"url": "not a url"})),
        )]);

        let err = factory.resolve("api").await.unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::Construction { source: BackendError::Url(_), .. }
        ));
    }
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn test_search_engine_resolves() {
        let factory = factory(vec![(
            "search",
            ConnectionDescriptor::from_json(tags::ELASTICSEARCH, &json!({"host": "localhost:9200"})),
        )]);

        assert!(factory.resolve_as::<Elasticsearch>("search").await.is_ok());
    }

    #[tokio::test]
    async fn test_unregistered_type_is_rejected() {
        let factory = factory(vec![(
            "queue",
            ConnectionDescriptor::from_json("Fusio.Adapter.Amqp.Connection.Amqp", &json!({})),
        )]);

        let err = factory.resolve("queue").await.unwrap_err();
        assert!(matches!(
            err,
            ConnectorError::UnsupportedType { ref kind, .. } if kind == "Fusio.Adapter.Amqp.Connection.Amqp"
        ));
        assert_eq!(factory.resolved_count().await, 0);
    }

    #[tokio::test]
    async fn test_type_mismatch() {
        let factory = factory(vec![(
            "search",
            ConnectionDescriptor::from_json(tags::ELASTICSEARCH, &json!({"host": "localhost:9200"})),
        )]);

        let err = factory.resolve_as::<HttpClient>("search").await.unwrap_err();
        assert!(matches!(err, ConnectorError::TypeMismatch { ref name, .. } if name == "search"));
    }
}
