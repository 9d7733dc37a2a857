use super::RemoteCollections;
use crate::gateway::{Collection, GatewayError, Query};
use crate::models::family::{generate_invite_code, normalize_invite_code};
use crate::sync::remote::{FamilyFields, MemberFields, RemoteFamily, RemoteMember};

impl RemoteCollections {
    /// Creates a family with a fresh invite code.
    pub async fn create_family(&self, name: &str) -> Result<Option<RemoteFamily>, GatewayError> {
        let fields = FamilyFields {
            name: name.to_string(),
            invite_code: generate_invite_code(),
        };
        self.create(Collection::Families, &fields).await
    }

    pub async fn update_family<F: serde::Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemoteFamily>, GatewayError> {
        self.patch(Collection::Families, id, updates).await
    }

    /// Looks up a family by invite code. The code is matched case-insensitively.
    pub async fn find_family_by_code(&self, code: &str) -> Result<Option<RemoteFamily>, GatewayError> {
        let query = Query::new().eq("invite_code", normalize_invite_code(code));
        let mut families: Vec<RemoteFamily> = self.list(Collection::Families, query).await?;
        if families.is_empty() {
            return Ok(None);
        }
        Ok(Some(families.swap_remove(0)))
    }

    /// Members of a family in the order they joined. Never hydrated into the
    /// local store.
    pub async fn sync_members(&self, family_id: i64) -> Result<Vec<RemoteMember>, GatewayError> {
        let query = Query::new()
            .eq("family_id", family_id)
            .order_asc("created_at");
        self.list(Collection::Members, query).await
    }

    pub async fn create_member(&self, member: &MemberFields) -> Result<Option<RemoteMember>, GatewayError> {
        self.create(Collection::Members, member).await
    }

    pub async fn delete_member(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::Members, id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::gateway::MemoryGateway;

    #[tokio::test]
    async fn test_create_then_find_family() {
        let gateway = Arc::new(MemoryGateway::new());
        let remote = RemoteCollections::new(gateway);

        let family = remote.create_family("Silva").await.unwrap().unwrap();
        assert_eq!(family.invite_code.len(), 6);

        let lowered = family.invite_code.to_lowercase();
        let found = remote.find_family_by_code(&lowered).await.unwrap().unwrap();
        assert_eq!(found.id, family.id);
        assert_eq!(found.name, "Silva");
    }

    #[tokio::test]
    async fn test_find_unknown_code() {
        let remote = RemoteCollections::new(Arc::new(MemoryGateway::new()));
        assert!(remote.find_family_by_code("ZZZZZZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_members_round_trip() {
        let remote = RemoteCollections::new(Arc::new(MemoryGateway::new()));
        let member = remote
            .create_member(&MemberFields {
                family_id: 3,
                name: "Ana".to_string(),
                color: "#1B7C7C".to_string(),
                avatar: "A".to_string(),
                user_id: None,
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(remote.sync_members(3).await.unwrap().len(), 1);
        remote.delete_member(member.id).await.unwrap();
        assert!(remote.sync_members(3).await.unwrap().is_empty());
    }
}
