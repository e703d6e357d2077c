//! Execution shim between the builder and the search engine

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::search::SearchRequest;

/// Sends an assembled request and hands back the raw response document.
///
/// Failures are returned as-is; retries and timeouts belong to the
/// implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn search(&self, request: &SearchRequest, index: &str) -> Result<Value>;
}
