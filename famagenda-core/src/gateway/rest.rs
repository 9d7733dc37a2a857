//! REST gateway for a PostgREST-style backend.
//!
//! Wire contract:
//! - collection path: `{base_url}/rest/v1/{table}`
//! - filters and ordering in the query string (see [`Query`])
//! - `apikey` and `Authorization: Bearer` headers carry the access key
//! - POST and PATCH ask for `Prefer: return=representation` and receive the
//!   written rows as a JSON array
//! - DELETE asks for `Prefer: return=minimal` and expects no body

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::{with_timeout, Collection, Gateway, GatewayError, Query};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const REST_PREFIX: &str = "/rest/v1";
const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MINIMAL: &str = "return=minimal";

/// HTTP gateway. One request per call, no caching and no retries.
#[derive(Debug, Clone)]
pub struct RestGateway {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl RestGateway {
    /// Creates a gateway. Empty strings count as absent.
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.filter(|s| !s.trim().is_empty()),
            api_key: api_key.filter(|s| !s.trim().is_empty()),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the URL of a collection, or `None` if no endpoint is set.
    fn collection_url(&self, collection: Collection) -> Option<String> {
        self.base_url.as_ref().map(|base| {
            format!(
                "{}{}/{}",
                base.trim_end_matches('/'),
                REST_PREFIX,
                collection.table_name()
            )
        })
    }

    /// Performs one request and returns the parsed body, if any.
    async fn request(
        &self,
        collection: Collection,
        method: Method,
        query: String,
        body: Option<Value>,
    ) -> Result<Option<Value>, GatewayError> {
        let (Some(mut url), Some(key)) = (self.collection_url(collection), self.api_key.as_ref())
        else {
            return Err(GatewayError::NotConfigured);
        };
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let prefer = if method == Method::POST || method == Method::PATCH {
            PREFER_REPRESENTATION
        } else {
            PREFER_MINIMAL
        };

        tracing::debug!(%collection, %method, %url, "gateway request");

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Content-Type", "application/json")
            .header("Prefer", prefer);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await.map_err(|e| GatewayError::Transport {
                collection,
                message: e.to_string(),
            })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GatewayError::Status {
                    collection,
                    status: status.as_u16(),
                    body,
                });
            }

            if method == Method::DELETE || status == StatusCode::NO_CONTENT {
                return Ok(None);
            }

            let text = response.text().await.map_err(|e| GatewayError::Transport {
                collection,
                message: e.to_string(),
            })?;
            if text.trim().is_empty() {
                return Ok(None);
            }

            serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| GatewayError::Decode {
                    collection,
                    message: e.to_string(),
                })
        };

        let result = with_timeout(self.timeout, exchange)
            .await
            .unwrap_or(Err(GatewayError::Timeout {
                collection,
                timeout: self.timeout,
            }));

        if let Err(e) = &result {
            tracing::warn!(%collection, %method, "gateway request failed: {}", e);
        }
        result
    }
}

#[async_trait]
impl Gateway for RestGateway {
    fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    async fn select(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Value>, GatewayError> {
        match self
            .request(collection, Method::GET, query.to_query_string(), None)
            .await?
        {
            None => Ok(Vec::new()),
            Some(Value::Array(rows)) => Ok(rows),
            Some(other) => Err(GatewayError::Decode {
                collection,
                message: format!("expected an array of rows, got {}", other),
            }),
        }
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Value,
    ) -> Result<Option<Value>, GatewayError> {
        let echoed = self
            .request(collection, Method::POST, String::new(), Some(fields))
            .await?;
        Ok(first_row(echoed))
    }

    async fn update(
        &self,
        collection: Collection,
        id: i64,
        fields: Value,
    ) -> Result<Option<Value>, GatewayError> {
        let query = Query::new().eq("id", id).to_query_string();
        let echoed = self
            .request(collection, Method::PATCH, query, Some(fields))
            .await?;
        Ok(first_row(echoed))
    }

    async fn delete(&self, collection: Collection, id: i64) -> Result<(), GatewayError> {
        let query = Query::new().eq("id", id).to_query_string();
        self.request(collection, Method::DELETE, query, None)
            .await
            .map(|_| ())
    }
}

/// Write responses are arrays of rows; the first element is the written row.
fn first_row(echoed: Option<Value>) -> Option<Value> {
    match echoed? {
        Value::Array(rows) => rows.into_iter().next(),
        row @ Value::Object(_) => Some(row),
        _ => None,
    }
}
