//! Remote access gateway.
//!
//! A minimal REST abstraction over named remote collections. Two
//! implementations exist:
//!
//! - [`RestGateway`] talks to a PostgREST-style HTTP backend.
//! - [`MemoryGateway`] keeps rows in process and evaluates the same
//!   [`Query`] grammar locally.
//!
//! Every operation returns a `Result`: transport, HTTP and decoding failures
//! become a [`GatewayError`] at this boundary, so callers can tell "no rows"
//! from "request failed".

mod collection;
mod error;
mod memory;
mod query;
mod rest;

use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use collection::Collection;
pub use error::GatewayError;
pub use memory::MemoryGateway;
pub use query::{Direction, Filter, FilterOp, OrderBy, Query};
pub use rest::RestGateway;

/// Generic CRUD access to remote collections.
///
/// Rows travel as JSON; use [`select_as`], [`insert_as`] and [`update_as`]
/// for typed access.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Returns true when both an endpoint and an access key are present.
    fn is_configured(&self) -> bool;

    /// Lists rows of a collection matching the query, in the query's order.
    async fn select(&self, collection: Collection, query: &Query)
        -> Result<Vec<Value>, GatewayError>;

    /// Inserts a row and returns the echoed row, if the backend sent one.
    async fn insert(&self, collection: Collection, fields: Value)
        -> Result<Option<Value>, GatewayError>;

    /// Patches the row with the given id and returns the echoed row.
    async fn update(
        &self,
        collection: Collection,
        id: i64,
        fields: Value,
    ) -> Result<Option<Value>, GatewayError>;

    /// Deletes the row with the given id.
    async fn delete(&self, collection: Collection, id: i64) -> Result<(), GatewayError>;
}

/// A remote row: numeric id, entity fields and bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    #[serde(default)]
    pub id: i64,
    #[serde(flatten)]
    pub fields: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl<T> Record<T> {
    pub fn new(id: i64, fields: T) -> Self {
        Self {
            id,
            fields,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.fields
    }
}

impl<T> DerefMut for Record<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.fields
    }
}

/// Selects rows and decodes each into `T`.
pub async fn select_as<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    collection: Collection,
    query: &Query,
) -> Result<Vec<T>, GatewayError> {
    let rows = gateway.select(collection, query).await?;
    rows.into_iter()
        .map(|row| decode(collection, row))
        .collect()
}

/// Inserts `fields` and decodes the echoed row.
pub async fn insert_as<T: DeserializeOwned, F: Serialize + ?Sized>(
    gateway: &dyn Gateway,
    collection: Collection,
    fields: &F,
) -> Result<Option<T>, GatewayError> {
    let body = encode(collection, fields)?;
    gateway
        .insert(collection, body)
        .await?
        .map(|row| decode(collection, row))
        .transpose()
}

/// Patches row `id` with `fields` and decodes the echoed row.
pub async fn update_as<T: DeserializeOwned, F: Serialize + ?Sized>(
    gateway: &dyn Gateway,
    collection: Collection,
    id: i64,
    fields: &F,
) -> Result<Option<T>, GatewayError> {
    let body = encode(collection, fields)?;
    gateway
        .update(collection, id, body)
        .await?
        .map(|row| decode(collection, row))
        .transpose()
}

/// Awaits `future` for at most `limit`.
///
/// Returns `None` if the limit expires first; the future is dropped.
pub async fn with_timeout<F: Future>(limit: Duration, future: F) -> Option<F::Output> {
    tokio::time::timeout(limit, future).await.ok()
}

fn encode<F: Serialize + ?Sized>(collection: Collection, fields: &F) -> Result<Value, GatewayError> {
    serde_json::to_value(fields).map_err(|e| GatewayError::Encode {
        collection,
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(collection: Collection, row: Value) -> Result<T, GatewayError> {
    serde_json::from_value(row).map_err(|e| GatewayError::Decode {
        collection,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    #[serde(default)]
    struct Note {
        text: String,
        pinned: bool,
    }

    #[test]
    fn test_record_flattens_fields() {
        let record: Record<Note> = serde_json::from_value(json!({
            "id": 7,
            "text": "hello",
            "pinned": true,
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.id, 7);
        assert_eq!(record.text, "hello");
        assert!(record.pinned);
        assert_eq!(record.created_at.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_record_tolerates_missing_fields() {
        let record: Record<Note> = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(record.fields, Note::default());
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_secs(5)),
        )
        .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_with_timeout_completes() {
        let result = with_timeout(Duration::from_secs(5), async { 42 }).await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn test_select_as_reports_decode_error() {
        let gateway = MemoryGateway::new();
        gateway.seed(Collection::Events, vec![json!({"id": "not-a-number"})]);

        let result: Result<Vec<Record<Note>>, _> =
            select_as(&gateway, Collection::Events, &Query::new()).await;
        assert!(matches!(result, Err(GatewayError::Decode { .. })));
    }
}
