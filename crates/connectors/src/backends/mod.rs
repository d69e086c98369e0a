//! Built-in connection backends.

mod document_store;
mod github;
mod http;
mod search;
mod sql;

pub use document_store::{DocumentStore, MongoDbBackend};
pub use github::GitHubBackend;
pub use http::{HttpBackend, HttpClient};
pub use search::ElasticsearchBackend;
pub use sql::{SqlBackend, SqlDsnBackend};
