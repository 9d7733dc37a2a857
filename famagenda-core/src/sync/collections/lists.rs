use serde::Serialize;

use super::RemoteCollections;
use crate::gateway::{Collection, GatewayError, Query};
use crate::sync::remote::{
    CustomListFields, CustomListItemFields, RemoteCustomList, RemoteCustomListItem,
};

impl RemoteCollections {
    /// Custom lists of a family, newest first.
    pub async fn sync_custom_lists(
        &self,
        family_id: i64,
    ) -> Result<Vec<RemoteCustomList>, GatewayError> {
        let query = Query::new()
            .eq("family_id", family_id)
            .order_desc("created_at");
        self.list(Collection::CustomLists, query).await
    }

    pub async fn create_custom_list(
        &self,
        list: &CustomListFields,
    ) -> Result<Option<RemoteCustomList>, GatewayError> {
        self.create(Collection::CustomLists, list).await
    }

    pub async fn update_custom_list<F: Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemoteCustomList>, GatewayError> {
        self.patch(Collection::CustomLists, id, updates).await
    }

    pub async fn delete_custom_list(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::CustomLists, id).await
    }

    /// Items of one list, oldest first.
    pub async fn sync_custom_list_items(
        &self,
        list_id: i64,
    ) -> Result<Vec<RemoteCustomListItem>, GatewayError> {
        let query = Query::new().eq("list_id", list_id).order_asc("created_at");
        self.list(Collection::CustomListItems, query).await
    }

    pub async fn create_custom_list_item(
        &self,
        item: &CustomListItemFields,
    ) -> Result<Option<RemoteCustomListItem>, GatewayError> {
        self.create(Collection::CustomListItems, item).await
    }

    pub async fn update_custom_list_item<F: Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemoteCustomListItem>, GatewayError> {
        self.patch(Collection::CustomListItems, id, updates).await
    }

    pub async fn delete_custom_list_item(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::CustomListItems, id).await
    }
}
