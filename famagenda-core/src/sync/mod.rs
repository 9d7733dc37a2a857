//! Remote sync: collection functions, shape mappers, the aggregate fetch
//! and store hydration.

pub mod aggregate;
pub mod collections;
pub mod error;
pub mod hydrator;
pub mod mapper;
pub mod remote;

pub use aggregate::{sync_all_family_data, FamilyData};
pub use collections::RemoteCollections;
pub use error::SyncError;
pub use hydrator::{
    HydrateCounts, HydrateStatus, Hydrator, SyncOptions, DEFAULT_MAX_CONCURRENT_FETCHES,
};
