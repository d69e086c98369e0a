//! Preconfigured HTTP client connections.

use async_trait::async_trait;
use reqwest::{Client, Method, Proxy, RequestBuilder};
use std::any::Any;
use std::sync::Arc;
use url::Url;

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::BackendError;
use crate::registry::Backend;

/// HTTP client with an optional base URL, basic auth and proxy.
///
/// Non-2xx responses come back as regular responses; callers inspect the
/// status themselves.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Option<Url>,
    credentials: Option<(String, String)>,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: None,
            credentials: None,
        }
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Resolve `path` against the base URL (absolute URLs are used as-is).
    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(base) => base.join(path),
            None => Url::parse(path),
        }
    }

    /// Start a request, applying base URL and credentials.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, url::ParseError> {
        let mut builder = self.client.request(method, self.url(path)?);
        if let Some((username, password)) = &self.credentials {
            builder = builder.basic_auth(username, Some(password));
        }
        Ok(builder)
    }

    pub fn get(&self, path: &str) -> Result<RequestBuilder, url::ParseError> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> Result<RequestBuilder, url::ParseError> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> Result<RequestBuilder, url::ParseError> {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> Result<RequestBuilder, url::ParseError> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> Result<RequestBuilder, url::ParseError> {
        self.request(Method::DELETE, path)
    }
}

#[async_trait]
impl Connection for HttpClient {
    fn kind(&self) -> &'static str {
        "http"
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// `http-client`: optional `url`, `username` + `password`, `proxy`.
pub struct HttpBackend;

#[async_trait]
impl Backend for HttpBackend {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>, BackendError> {
        let mut builder = Client::builder();
        if let Some(proxy) = config.get("proxy") {
            builder = builder.proxy(Proxy::all(proxy.as_str())?);
        }

        let mut client = HttpClient::new(builder.build()?);

        if let Some(base) = config.get("url") {
            client = client.with_base_url(Url::parse(&base)?);
        }

        // Credentials only apply when both halves are present.
        if let (Some(username), Some(password)) = (config.get("username"), config.get("password")) {
            client = client.with_basic_auth(username, password);
        }

        Ok(Arc::new(client))
    }
}
