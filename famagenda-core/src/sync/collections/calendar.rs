use serde::Serialize;

use super::RemoteCollections;
use crate::gateway::{Collection, GatewayError, Query};
use crate::sync::remote::{EventFields, ImportantDateFields, RemoteEvent, RemoteImportantDate};

impl RemoteCollections {
    /// Events of a family, earliest first.
    pub async fn sync_events(&self, family_id: i64) -> Result<Vec<RemoteEvent>, GatewayError> {
        let query = Query::new().eq("family_id", family_id).order_asc("start_time");
        self.list(Collection::Events, query).await
    }

    pub async fn create_event(&self, event: &EventFields) -> Result<Option<RemoteEvent>, GatewayError> {
        self.create(Collection::Events, event).await
    }

    pub async fn update_event<F: Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemoteEvent>, GatewayError> {
        self.patch(Collection::Events, id, updates).await
    }

    pub async fn delete_event(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::Events, id).await
    }

    /// Important dates of a family, by date.
    pub async fn sync_important_dates(
        &self,
        family_id: i64,
    ) -> Result<Vec<RemoteImportantDate>, GatewayError> {
        let query = Query::new().eq("family_id", family_id).order_asc("date");
        self.list(Collection::ImportantDates, query).await
    }

    pub async fn create_important_date(
        &self,
        date: &ImportantDateFields,
    ) -> Result<Option<RemoteImportantDate>, GatewayError> {
        self.create(Collection::ImportantDates, date).await
    }

    pub async fn update_important_date<F: Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemoteImportantDate>, GatewayError> {
        self.patch(Collection::ImportantDates, id, updates).await
    }

    pub async fn delete_important_date(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::ImportantDates, id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::gateway::MemoryGateway;

    #[tokio::test]
    async fn test_sync_events_filters_and_orders() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed(
            Collection::Events,
            vec![
                json!({"id": 1, "family_id": 1, "title": "Late", "start_time": "2025-03-10T18:00:00"}),
                json!({"id": 2, "family_id": 2, "title": "Other family", "start_time": "2025-03-01T08:00:00"}),
                json!({"id": 3, "family_id": 1, "title": "Early", "start_time": "2025-03-09T08:00:00"}),
            ],
        );
        let remote = RemoteCollections::new(gateway);

        let events = remote.sync_events(1).await.unwrap();
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }

    #[tokio::test]
    async fn test_event_crud() {
        let gateway = Arc::new(MemoryGateway::new());
        let remote = RemoteCollections::new(gateway.clone());

        let created = remote
            .create_event(&EventFields {
                family_id: 1,
                title: "Dentist".to_string(),
                start_time: "2025-03-10T09:30:00".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .unwrap();
        assert!(created.id > 0);
        assert!(created.created_at.is_some());

        let updated = remote
            .update_event(created.id, &json!({"title": "Orthodontist"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Orthodontist");
        assert_eq!(updated.start_time, "2025-03-10T09:30:00");

        remote.delete_event(created.id).await.unwrap();
        assert!(remote.sync_events(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_important_dates_ordered_by_date() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.seed(
            Collection::ImportantDates,
            vec![
                json!({"id": 1, "family_id": 4, "title": "B", "date": "11-02", "recurrence": "yearly"}),
                json!({"id": 2, "family_id": 4, "title": "A", "date": "02-14", "recurrence": "yearly"}),
            ],
        );
        let remote = RemoteCollections::new(gateway);

        let dates = remote.sync_important_dates(4).await.unwrap();
        assert_eq!(dates[0].title, "A");
        assert_eq!(dates[1].title, "B");
    }
}
