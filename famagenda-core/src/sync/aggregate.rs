//! Aggregate fetch of the top-level per-family collections.

use super::collections::RemoteCollections;
use super::error::SyncError;
use super::remote::{
    RemoteCustomList, RemoteEvent, RemoteImportantDate, RemotePet, RemotePickup,
    RemoteWishlistItem,
};

/// The six top-level collections of one family, each in its sync order.
///
/// Second-level children (list items, vaccines, baths) are not included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyData {
    pub events: Vec<RemoteEvent>,
    pub pickups: Vec<RemotePickup>,
    pub important_dates: Vec<RemoteImportantDate>,
    pub custom_lists: Vec<RemoteCustomList>,
    pub pets: Vec<RemotePet>,
    pub wishlist_items: Vec<RemoteWishlistItem>,
}

impl FamilyData {
    pub fn total_rows(&self) -> usize {
        self.events.len()
            + self.pickups.len()
            + self.important_dates.len()
            + self.custom_lists.len()
            + self.pets.len()
            + self.wishlist_items.len()
    }
}

/// Fetches the six top-level collections of a family concurrently.
///
/// Fails as a whole if any single fetch fails.
pub async fn sync_all_family_data(
    remote: &RemoteCollections,
    family_id: i64,
) -> Result<FamilyData, SyncError> {
    let (events, pickups, important_dates, custom_lists, pets, wishlist_items) = futures::try_join!(
        remote.sync_events(family_id),
        remote.sync_pickups(family_id),
        remote.sync_important_dates(family_id),
        remote.sync_custom_lists(family_id),
        remote.sync_pets(family_id),
        remote.sync_wishlist_items(family_id),
    )
    .map_err(|e| {
        tracing::warn!(family_id, error = %e, "Family fetch failed");
        SyncError::FamilyFetch(e)
    })?;

    Ok(FamilyData {
        events,
        pickups,
        important_dates,
        custom_lists,
        pets,
        wishlist_items,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::gateway::{Collection, GatewayError, MemoryGateway};

    fn seeded() -> Arc<MemoryGateway> {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed(
            Collection::Events,
            vec![json!({"id": 1, "family_id": 1, "title": "Dentist", "start_time": "2025-03-10T09:30:00"})],
        );
        gateway.seed(
            Collection::Pets,
            vec![
                json!({"id": 2, "family_id": 1, "name": "Rex"}),
                json!({"id": 3, "family_id": 2, "name": "Not ours"}),
            ],
        );
        gateway.seed(
            Collection::CustomListItems,
            vec![json!({"id": 4, "list_id": 9, "text": "child row"})],
        );
        gateway
    }

    #[tokio::test]
    async fn test_fetches_all_six_collections_once() {
        let gateway = seeded();
        let remote = RemoteCollections::new(gateway.clone());

        let data = sync_all_family_data(&remote, 1).await.unwrap();
        assert_eq!(data.events.len(), 1);
        assert_eq!(data.pets.len(), 1);
        assert_eq!(data.total_rows(), 2);

        for collection in [
            Collection::Events,
            Collection::Pickups,
            Collection::ImportantDates,
            Collection::CustomLists,
            Collection::Pets,
            Collection::WishlistItems,
        ] {
            assert_eq!(gateway.calls(collection), 1, "{}", collection);
        }
        assert_eq!(gateway.calls(Collection::CustomListItems), 0);
        assert_eq!(gateway.calls(Collection::PetVaccines), 0);
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_whole_fetch() {
        let gateway = seeded();
        gateway.fail(Collection::ImportantDates);
        let remote = RemoteCollections::new(gateway);

        let err = sync_all_family_data(&remote, 1).await.unwrap_err();
        match err {
            SyncError::FamilyFetch(GatewayError::Status { collection, .. }) => {
                assert_eq!(collection, Collection::ImportantDates)
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
