use serde::Serialize;

use super::RemoteCollections;
use crate::gateway::{Collection, GatewayError, Query};
use crate::sync::remote::{PickupFields, RemotePickup};

impl RemoteCollections {
    /// Pickups of a family, by day of week and then time of day.
    pub async fn sync_pickups(&self, family_id: i64) -> Result<Vec<RemotePickup>, GatewayError> {
        let query = Query::new()
            .eq("family_id", family_id)
            .order_asc("day_of_week")
            .order_asc("time");
        self.list(Collection::Pickups, query).await
    }

    pub async fn create_pickup(&self, pickup: &PickupFields) -> Result<Option<RemotePickup>, GatewayError> {
        self.create(Collection::Pickups, pickup).await
    }

    pub async fn update_pickup<F: Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemotePickup>, GatewayError> {
        self.patch(Collection::Pickups, id, updates).await
    }

    pub async fn delete_pickup(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::Pickups, id).await
    }
}
