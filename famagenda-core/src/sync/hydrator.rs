//! Store hydration.
//!
//! A pass fetches the six top-level collections, then the children of every
//! custom list and pet with bounded concurrency, maps everything to client
//! shape and replaces the hydrated slices of the [`FamilyStore`] in one
//! step. Any failure before that step leaves the store untouched.
//!
//! Every pass takes a generation number when it starts. A pass only applies
//! its payload if no newer pass has applied first, so an older, slower pass
//! can never overwrite fresher data.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::stream::{self, StreamExt, TryStreamExt};

use super::aggregate::{sync_all_family_data, FamilyData};
use super::collections::RemoteCollections;
use super::error::SyncError;
use super::mapper;
use super::remote::{RemoteCustomListItem, RemotePetBath, RemotePetVaccine};
use crate::gateway::Collection;
use crate::store::{FamilyStore, HydrationPayload};

/// Default cap on concurrent second-level fetches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Tuning for hydration passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Upper bound on in-flight child fetches. Zero is treated as one.
    pub max_concurrent_fetches: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

/// Row counts of a successful pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrateCounts {
    pub events: usize,
    pub pickups: usize,
    pub wishlist_items: usize,
    pub important_dates: usize,
    pub custom_lists: usize,
    pub list_items: usize,
    pub pets: usize,
    pub vaccines: usize,
    pub baths: usize,
}

impl fmt::Display for HydrateCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events, {} pickups, {} wishlist items, {} dates, {} lists ({} items), {} pets ({} vaccines, {} baths)",
            self.events,
            self.pickups,
            self.wishlist_items,
            self.important_dates,
            self.custom_lists,
            self.list_items,
            self.pets,
            self.vaccines,
            self.baths
        )
    }
}

/// How a hydration pass ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrateStatus {
    /// No backend configured; local data stays as it is.
    NotConfigured,
    /// The store now holds the fetched data.
    Hydrated(HydrateCounts),
    /// A newer pass applied first; this pass's data was discarded.
    Superseded { generation: u64 },
}

impl HydrateStatus {
    /// True for every outcome that should be reported as success.
    pub fn is_success(&self) -> bool {
        !matches!(self, HydrateStatus::Superseded { .. })
    }
}

/// Fetched second-level rows, flattened across parents.
#[derive(Default)]
struct Children {
    list_items: Vec<RemoteCustomListItem>,
    vaccines: Vec<RemotePetVaccine>,
    baths: Vec<RemotePetBath>,
}

/// Replaces the hydrated slices of a store with backend data.
pub struct Hydrator {
    remote: RemoteCollections,
    store: Arc<FamilyStore>,
    options: SyncOptions,
    started: AtomicU64,
    applied: Mutex<u64>,
}

impl Hydrator {
    pub fn new(remote: RemoteCollections, store: Arc<FamilyStore>, options: SyncOptions) -> Self {
        Self {
            remote,
            store,
            options,
            started: AtomicU64::new(0),
            applied: Mutex::new(0),
        }
    }

    pub fn store(&self) -> &Arc<FamilyStore> {
        &self.store
    }

    /// Fetches everything for `family_id` and hydrates the store.
    ///
    /// Returns `Ok(NotConfigured)` without touching the network when no
    /// backend is configured. On `Err` the store is unchanged.
    pub async fn sync_and_hydrate_store(&self, family_id: i64) -> Result<HydrateStatus, SyncError> {
        if !self.remote.is_configured() {
            tracing::debug!("Backend not configured, using local data");
            return Ok(HydrateStatus::NotConfigured);
        }

        let generation = self.begin_pass();
        tracing::debug!(family_id, generation, "Starting hydration");

        let data = sync_all_family_data(&self.remote, family_id).await?;
        let children = self.fetch_children(&data).await.map_err(|e| {
            tracing::warn!(family_id, error = %e, "Child fetch failed");
            e
        })?;

        let counts = HydrateCounts {
            events: data.events.len(),
            pickups: data.pickups.len(),
            wishlist_items: data.wishlist_items.len(),
            important_dates: data.important_dates.len(),
            custom_lists: data.custom_lists.len(),
            list_items: children.list_items.len(),
            pets: data.pets.len(),
            vaccines: children.vaccines.len(),
            baths: children.baths.len(),
        };
        let payload = build_payload(&data, &children);

        if !self.commit(generation, payload) {
            tracing::info!(family_id, generation, "Discarding superseded hydration");
            return Ok(HydrateStatus::Superseded { generation });
        }

        tracing::info!(family_id, generation, %counts, "Hydration complete");
        Ok(HydrateStatus::Hydrated(counts))
    }

    fn begin_pass(&self) -> u64 {
        self.started.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies `payload` unless a newer pass already has.
    fn commit(&self, generation: u64, payload: HydrationPayload) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if *applied > generation {
            return false;
        }
        self.store.apply_hydration(payload);
        *applied = generation;
        true
    }

    fn limit(&self) -> usize {
        self.options.max_concurrent_fetches.max(1)
    }

    async fn fetch_children(&self, data: &FamilyData) -> Result<Children, SyncError> {
        let (list_items, pet_records) =
            futures::try_join!(self.fetch_list_items(data), self.fetch_pet_records(data))?;

        let mut children = Children {
            list_items: list_items.into_iter().flatten().collect(),
            ..Children::default()
        };
        for (vaccines, baths) in pet_records {
            children.vaccines.extend(vaccines);
            children.baths.extend(baths);
        }
        Ok(children)
    }

    /// Items of every list, one result per list in list order.
    async fn fetch_list_items(
        &self,
        data: &FamilyData,
    ) -> Result<Vec<Vec<RemoteCustomListItem>>, SyncError> {
        stream::iter(data.custom_lists.iter().map(|list| {
            let list_id = list.id;
            async move {
                self.remote
                    .sync_custom_list_items(list_id)
                    .await
                    .map_err(|source| SyncError::ChildFetch {
                        parent: Collection::CustomLists,
                        parent_id: list_id,
                        source,
                    })
            }
        }))
        .buffered(self.limit())
        .try_collect()
        .await
    }

    /// Vaccines and baths of every pet, one result per pet in pet order.
    async fn fetch_pet_records(
        &self,
        data: &FamilyData,
    ) -> Result<Vec<(Vec<RemotePetVaccine>, Vec<RemotePetBath>)>, SyncError> {
        stream::iter(data.pets.iter().map(|pet| {
            let pet_id = pet.id;
            async move {
                futures::try_join!(
                    self.remote.sync_pet_vaccines(pet_id),
                    self.remote.sync_pet_baths(pet_id)
                )
                .map_err(|source| SyncError::ChildFetch {
                    parent: Collection::Pets,
                    parent_id: pet_id,
                    source,
                })
            }
        }))
        .buffered(self.limit())
        .try_collect()
        .await
    }
}

impl fmt::Debug for Hydrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hydrator")
            .field("remote", &self.remote)
            .field("options", &self.options)
            .field("started", &self.started.load(Ordering::SeqCst))
            .finish()
    }
}

fn build_payload(data: &FamilyData, children: &Children) -> HydrationPayload {
    HydrationPayload {
        events: data.events.iter().map(mapper::map_event).collect(),
        pickups: data.pickups.iter().map(mapper::map_pickup).collect(),
        wishlist_items: data
            .wishlist_items
            .iter()
            .map(mapper::map_wishlist_item)
            .collect(),
        important_dates: data
            .important_dates
            .iter()
            .map(mapper::map_important_date)
            .collect(),
        custom_lists: data
            .custom_lists
            .iter()
            .map(|list| mapper::map_custom_list(list, &children.list_items))
            .collect(),
        pets: data
            .pets
            .iter()
            .map(|pet| mapper::map_pet(pet, &children.vaccines, &children.baths))
            .collect(),
    }
}
