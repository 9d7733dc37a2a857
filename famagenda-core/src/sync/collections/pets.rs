use serde::Serialize;

use super::RemoteCollections;
use crate::gateway::{Collection, GatewayError, Query};
use crate::sync::remote::{
    PetBathFields, PetFields, PetVaccineFields, RemotePet, RemotePetBath, RemotePetVaccine,
};

impl RemoteCollections {
    /// Pets of a family, by name.
    pub async fn sync_pets(&self, family_id: i64) -> Result<Vec<RemotePet>, GatewayError> {
        let query = Query::new().eq("family_id", family_id).order_asc("name");
        self.list(Collection::Pets, query).await
    }

    pub async fn create_pet(&self, pet: &PetFields) -> Result<Option<RemotePet>, GatewayError> {
        self.create(Collection::Pets, pet).await
    }

    pub async fn update_pet<F: Serialize + Sync + ?Sized>(
        &self,
        id: i64,
        updates: &F,
    ) -> Result<Option<RemotePet>, GatewayError> {
        self.patch(Collection::Pets, id, updates).await
    }

    pub async fn delete_pet(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::Pets, id).await
    }

    /// Vaccines of one pet, most recent first.
    pub async fn sync_pet_vaccines(&self, pet_id: i64) -> Result<Vec<RemotePetVaccine>, GatewayError> {
        let query = Query::new().eq("pet_id", pet_id).order_desc("date");
        self.list(Collection::PetVaccines, query).await
    }

    pub async fn create_pet_vaccine(
        &self,
        vaccine: &PetVaccineFields,
    ) -> Result<Option<RemotePetVaccine>, GatewayError> {
        self.create(Collection::PetVaccines, vaccine).await
    }

    pub async fn delete_pet_vaccine(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::PetVaccines, id).await
    }

    /// Baths of one pet, most recent first.
    pub async fn sync_pet_baths(&self, pet_id: i64) -> Result<Vec<RemotePetBath>, GatewayError> {
        let query = Query::new().eq("pet_id", pet_id).order_desc("date");
        self.list(Collection::PetBaths, query).await
    }

    pub async fn create_pet_bath(&self, bath: &PetBathFields) -> Result<Option<RemotePetBath>, GatewayError> {
        self.create(Collection::PetBaths, bath).await
    }

    pub async fn delete_pet_bath(&self, id: i64) -> Result<(), GatewayError> {
        self.remove(Collection::PetBaths, id).await
    }
}
