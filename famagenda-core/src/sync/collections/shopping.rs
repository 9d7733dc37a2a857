use std::cmp::Reverse;

use serde::Serialize;

use super::RemoteCollections;
use crate::gateway::{Collection, GatewayError, Query};
use crate::models::WishlistPriority;
use crate::sync::remote::{
    RemoteShoppingItem, RemoteWishlistItem, ShoppingItemFields, WishlistItemFields,
};

impl RemoteCollections {
    /// Shopping items of a family, newest first.
    pub async fn sync_shopping_items(
        &self,
        family_id: i64,
    ) -> Result<Vec<RemoteShoppingItem>, GatewayError> {
        let query = Query::new()
            .eq("family_id", family_id)
            .order_desc("created_at");
        self.list(Collection::ShoppingItems, query).await
    }

    pub async fn create_shopping_item(
        &self,
        item: &ShoppingItemFields,
    ) -> Result<Option<RemoteShoppingItem>, GatewayError> {
        self.create(Collection::ShoppingItems, item).await
    }

    pub async fn update_shopping_item<F: Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemoteShoppingItem>, GatewayError> {
        self.patch(Collection::ShoppingItems, id, updates).await
    }

    pub async fn delete_shopping_item(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::ShoppingItems, id).await
    }

    /// Wishlist of a family, highest priority first, then newest first.
    ///
    /// Priority is a text column, so the backend only orders by creation
    /// time and the rank ordering is applied here. Unknown priorities rank
    /// as medium.
    pub async fn sync_wishlist_items(
        &self,
        family_id: i64,
    ) -> Result<Vec<RemoteWishlistItem>, GatewayError> {
        let query = Query::new()
            .eq("family_id", family_id)
            .order_desc("created_at");
        let mut rows: Vec<RemoteWishlistItem> = self.list(Collection::WishlistItems, query).await?;
        // Stable, so newest-first survives within each rank.
        rows.sort_by_key(|row| Reverse(priority_rank(&row.priority)));
        Ok(rows)
    }

    pub async fn create_wishlist_item(
        &self,
        item: &WishlistItemFields,
    ) -> Result<Option<RemoteWishlistItem>, GatewayError> {
        self.create(Collection::WishlistItems, item).await
    }

    pub async fn update_wishlist_item<F: Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemoteWishlistItem>, GatewayError> {
        self.patch(Collection::WishlistItems, id, updates).await
    }

    pub async fn delete_wishlist_item(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::WishlistItems, id).await
    }
}

fn priority_rank(priority: &str) -> WishlistPriority {
    priority.parse().unwrap_or_default()
}
