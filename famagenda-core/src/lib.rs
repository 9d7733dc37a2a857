//! Famagenda Core Library
//!
//! Backend access, sync and local state for the Famagenda family organizer.

pub mod app;
pub mod gateway;
pub mod models;
pub mod store;
pub mod sync;

pub use app::{AppError, FamilyApp, SyncReport};
pub use gateway::{Collection, Gateway, GatewayError, MemoryGateway, Query, Record, RestGateway};
pub use models::{
    CalendarEvent, CustomList, CustomListItem, EventType, FamilyGroup, FamilyMember,
    ImportantDate, ImportantDateType, PendingInvite, Pet, PetBath, PetSpecies, PetVaccine,
    PickupDropoff, PickupKind, ShoppingCategory, ShoppingItem, User, WishlistItem,
    WishlistPriority,
};
pub use store::{AuthError, AuthStore, FamilyState, FamilyStore, PersistError};
pub use sync::{
    sync_all_family_data, FamilyData, HydrateStatus, Hydrator, RemoteCollections, SyncError,
    SyncOptions,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
