//! Collection sync functions.
//!
//! One read/write set per remote collection. Every `sync_*` function fixes
//! the parent filter and the sort order for its collection; callers rely on
//! rows arriving pre-sorted and never re-sort them.

mod calendar;
mod family;
mod lists;
mod pets;
mod shopping;
mod transport;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::gateway::{self, Collection, Gateway, GatewayError, Query};

/// Typed access to every remote collection through one gateway.
#[derive(Clone)]
pub struct RemoteCollections {
    gateway: Arc<dyn Gateway>,
}

impl RemoteCollections {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.is_configured()
    }

    async fn list<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: Query,
    ) -> Result<Vec<T>, GatewayError> {
        gateway::select_as(self.gateway(), collection, &query).await
    }

    async fn create<T, F>(&self, collection: Collection, fields: &F) -> Result<Option<T>, GatewayError>
    where
        T: DeserializeOwned,
        F: Serialize + Sync + ?Sized,
    {
        gateway::insert_as(self.gateway(), collection, fields).await
    }

    async fn patch<T, F>(
        &self,
        collection: Collection,
        id: i64,
        fields: &F,
    ) -> Result<Option<T>, GatewayError>
    where
        T: DeserializeOwned,
        F: Serialize + Sync + ?Sized,
    {
        gateway::update_as(self.gateway(), collection, id, fields).await
    }

    async fn remove(&self, collection: Collection, id: i64) -> Result<(), GatewayError> {
        self.gateway.delete(collection, id).await
    }
}

impl std::fmt::Debug for RemoteCollections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCollections")
            .field("configured", &self.is_configured())
            .finish()
    }
}
