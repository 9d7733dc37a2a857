//! In-process gateway backed by JSON rows.
//!
//! Evaluates [`Query`] filters and ordering the same way the REST backend
//! does, assigns numeric ids on insert and can be told to fail requests for
//! specific collections.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};

use super::{Collection, Gateway, GatewayError, Query};

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<Collection, Vec<Value>>,
    next_id: i64,
    failing: HashSet<Collection>,
    calls: HashMap<Collection, usize>,
}

/// In-memory gateway.
#[derive(Debug)]
pub struct MemoryGateway {
    configured: bool,
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    /// Creates an empty, configured gateway.
    pub fn new() -> Self {
        Self {
            configured: true,
            state: Mutex::new(MemoryState {
                next_id: 1,
                ..MemoryState::default()
            }),
        }
    }

    /// Creates a gateway that reports itself as not configured.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Stores rows verbatim, bypassing id assignment.
    pub fn seed(&self, collection: Collection, rows: Vec<Value>) {
        let mut state = self.lock();
        let max_id = rows
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0);
        if max_id >= state.next_id {
            state.next_id = max_id + 1;
        }
        state.tables.entry(collection).or_default().extend(rows);
    }

    /// Returns a copy of every row stored for a collection, in storage order.
    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        self.lock()
            .tables
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes every subsequent request to `collection` fail with status 500.
    pub fn fail(&self, collection: Collection) {
        self.lock().failing.insert(collection);
    }

    /// Undoes [`MemoryGateway::fail`].
    pub fn recover(&self, collection: Collection) {
        self.lock().failing.remove(&collection);
    }

    /// Number of requests made against a collection.
    pub fn calls(&self, collection: Collection) -> usize {
        self.lock().calls.get(&collection).copied().unwrap_or(0)
    }

    /// Total number of requests made against any collection.
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call and checks configuration and injected failures.
    fn begin(&self, collection: Collection) -> Result<MutexGuard<'_, MemoryState>, GatewayError> {
        if !self.configured {
            return Err(GatewayError::NotConfigured);
        }
        let mut state = self.lock();
        *state.calls.entry(collection).or_insert(0) += 1;
        if state.failing.contains(&collection) {
            return Err(GatewayError::Status {
                collection,
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(state)
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn select(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Value>, GatewayError> {
        let state = self.begin(collection)?;
        let mut rows: Vec<Value> = state
            .tables
            .get(&collection)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| query.compare_rows(a, b));
        Ok(rows)
    }

    async fn insert(
        &self,
        collection: Collection,
        fields: Value,
    ) -> Result<Option<Value>, GatewayError> {
        let mut state = self.begin(collection)?;
        let mut row = into_object(collection, fields)?;

        let id = state.next_id;
        state.next_id += 1;
        let now = Utc::now().to_rfc3339();

        row.insert("id".to_string(), Value::from(id));
        row.entry("created_at")
            .or_insert_with(|| Value::from(now.clone()));
        row.insert("updated_at".to_string(), Value::from(now));

        let row = Value::Object(row);
        state.tables.entry(collection).or_default().push(row.clone());
        Ok(Some(row))
    }

    async fn update(
        &self,
        collection: Collection,
        id: i64,
        fields: Value,
    ) -> Result<Option<Value>, GatewayError> {
        let mut state = self.begin(collection)?;
        let patch = into_object(collection, fields)?;

        let Some(row) = state
            .tables
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
        else {
            return Ok(None);
        };

        if let Value::Object(existing) = &mut *row {
            for (key, value) in patch {
                if key != "id" {
                    existing.insert(key, value);
                }
            }
            existing.insert("updated_at".to_string(), Value::from(Utc::now().to_rfc3339()));
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, collection: Collection, id: i64) -> Result<(), GatewayError> {
        let mut state = self.begin(collection)?;
        if let Some(rows) = state.tables.get_mut(&collection) {
            rows.retain(|r| row_id(r) != Some(id));
        }
        Ok(())
    }
}

fn row_id(row: &Value) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

fn into_object(collection: Collection, fields: Value) -> Result<Map<String, Value>, GatewayError> {
    match fields {
        Value::Object(map) => Ok(map),
        other => Err(GatewayError::Encode {
            collection,
            message: format!("expected a JSON object, got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let gateway = MemoryGateway::new();
        let first = gateway
            .insert(Collection::Pets, json!({"name": "Rex"}))
            .await
            .unwrap()
            .unwrap();
        let second = gateway
            .insert(Collection::Pets, json!({"name": "Mia"}))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
        assert!(first["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_seed_advances_id_counter() {
        let gateway = MemoryGateway::new();
        gateway.seed(Collection::Pets, vec![json!({"id": 41, "name": "Rex"})]);

        let row = gateway
            .insert(Collection::Pets, json!({"name": "Mia"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row["id"], 42);
    }

    #[tokio::test]
    async fn test_select_filters_and_sorts() {
        let gateway = MemoryGateway::new();
        gateway.seed(
            Collection::Pets,
            vec![
                json!({"id": 1, "family_id": 1, "name": "Tom"}),
                json!({"id": 2, "family_id": 2, "name": "Bob"}),
                json!({"id": 3, "family_id": 1, "name": "Ana"}),
            ],
        );

        let rows = gateway
            .select(Collection::Pets, &Query::new().eq("family_id", 1).order_asc("name"))
            .await
            .unwrap();
        let names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["Ana", "Tom"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let gateway = MemoryGateway::new();
        gateway.seed(
            Collection::ShoppingItems,
            vec![json!({"id": 5, "name": "Milk", "completed": false})],
        );

        let row = gateway
            .update(Collection::ShoppingItems, 5, json!({"completed": true}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row["name"], "Milk");
        assert_eq!(row["completed"], true);

        let missing = gateway
            .update(Collection::ShoppingItems, 99, json!({"completed": true}))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let gateway = MemoryGateway::new();
        gateway.seed(Collection::Events, vec![json!({"id": 1}), json!({"id": 2})]);

        gateway.delete(Collection::Events, 1).await.unwrap();
        assert_eq!(gateway.rows(Collection::Events), vec![json!({"id": 2})]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let gateway = MemoryGateway::new();
        gateway.fail(Collection::Events);

        let result = gateway.select(Collection::Events, &Query::new()).await;
        assert!(matches!(result, Err(GatewayError::Status { status: 500, .. })));
        assert_eq!(gateway.calls(Collection::Events), 1);

        gateway.recover(Collection::Events);
        assert!(gateway.select(Collection::Events, &Query::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_unconfigured_rejects_requests() {
        let gateway = MemoryGateway::unconfigured();
        assert!(!gateway.is_configured());

        let result = gateway.select(Collection::Events, &Query::new()).await;
        assert_eq!(result, Err(GatewayError::NotConfigured));
        assert_eq!(gateway.total_calls(), 0);
    }
}
