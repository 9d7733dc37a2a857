//! Local client store.
//!
//! Holds every client-shape collection behind one lock. Granular operations
//! always assign a fresh local id to new entities; the bulk setters and
//! [`FamilyStore::apply_hydration`] keep the ids of the incoming data. Local
//! ids and remote-derived ids never collide, so both kinds can live in the
//! same slice.
//!
//! Hydration replaces the events, pickups, wishlist, important dates,
//! custom lists and pets slices wholesale. Anything created locally in those
//! slices and not yet pushed is dropped by the next hydration. Members and
//! shopping items are never touched by hydration.

use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use super::persist::{Outcome, PersistError, Persister, StateFile, FAMILY_STORAGE_KEY};
use crate::models::id::{generate_local_id, now_timestamp};
use crate::models::{
    CalendarEvent, CustomList, CustomListItem, CustomListUpdate, EventUpdate, FamilyMember,
    ImportantDate, Pet, PetBath, PetUpdate, PetVaccine, PickupDropoff, PickupUpdate,
    ShoppingItem, WishlistItem,
};

/// Everything the client store holds. This is also the persisted form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyState {
    pub members: Vec<FamilyMember>,
    pub events: Vec<CalendarEvent>,
    pub pickups: Vec<PickupDropoff>,
    pub shopping_items: Vec<ShoppingItem>,
    pub wishlist_items: Vec<WishlistItem>,
    pub important_dates: Vec<ImportantDate>,
    pub custom_lists: Vec<CustomList>,
    pub pets: Vec<Pet>,
}

/// Replacement data for the six hydrated slices, already in client shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydrationPayload {
    pub events: Vec<CalendarEvent>,
    pub pickups: Vec<PickupDropoff>,
    pub wishlist_items: Vec<WishlistItem>,
    pub important_dates: Vec<ImportantDate>,
    pub custom_lists: Vec<CustomList>,
    pub pets: Vec<Pet>,
}

/// The local client store.
#[derive(Debug, Default)]
pub struct FamilyStore {
    state: RwLock<FamilyState>,
    file: Option<Persister>,
}

impl FamilyStore {
    /// Creates an empty store that is not persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store persisted under `data_dir`, starting empty if nothing
    /// was stored yet.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, PersistError> {
        let file = Persister::new(StateFile::new(data_dir, FAMILY_STORAGE_KEY));
        let state = file.load()?.unwrap_or_default();
        Ok(Self {
            state: RwLock::new(state),
            file: Some(file),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, FamilyState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FamilyState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` under the write lock. If the outcome reports a change,
    /// the new state is persisted after the lock is released.
    fn mutate<R: Outcome>(&self, f: impl FnOnce(&mut FamilyState) -> R) -> R {
        let mut state = self.write();
        let result = f(&mut state);
        let pending = match &self.file {
            Some(file) if result.changed() => Some((file, file.next_revision(), state.clone())),
            _ => None,
        };
        drop(state);

        if let Some((file, revision, snapshot)) = pending {
            if let Err(e) = file.write(revision, &snapshot) {
                tracing::warn!(error = %e, "Failed to persist family store");
            }
        }
        result
    }

    /// A consistent copy of the whole store.
    pub fn snapshot(&self) -> FamilyState {
        self.read().clone()
    }

    pub fn members(&self) -> Vec<FamilyMember> {
        self.read().members.clone()
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.read().events.clone()
    }

    pub fn pickups(&self) -> Vec<PickupDropoff> {
        self.read().pickups.clone()
    }

    pub fn shopping_items(&self) -> Vec<ShoppingItem> {
        self.read().shopping_items.clone()
    }

    pub fn wishlist_items(&self) -> Vec<WishlistItem> {
        self.read().wishlist_items.clone()
    }

    pub fn important_dates(&self) -> Vec<ImportantDate> {
        self.read().important_dates.clone()
    }

    pub fn custom_lists(&self) -> Vec<CustomList> {
        self.read().custom_lists.clone()
    }

    pub fn pets(&self) -> Vec<Pet> {
        self.read().pets.clone()
    }

    // Members

    /// Adds a member and returns its id. Blank color or avatar are filled in.
    pub fn add_member(&self, mut member: FamilyMember) -> String {
        let id = generate_local_id();
        member.id = id.clone();
        self.mutate(|s| {
            member.normalize(s.members.len());
            s.members.push(member);
        });
        id
    }

    pub fn remove_member(&self, id: &str) -> bool {
        self.mutate(|s| remove_by(&mut s.members, |m| m.id == id))
    }

    // Events

    pub fn add_event(&self, mut event: CalendarEvent) -> String {
        let id = generate_local_id();
        event.id = id.clone();
        self.mutate(|s| s.events.push(event));
        id
    }

    pub fn update_event(&self, id: &str, update: EventUpdate) -> bool {
        self.mutate(|s| match s.events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                update.apply(event);
                true
            }
            None => false,
        })
    }

    pub fn remove_event(&self, id: &str) -> bool {
        self.mutate(|s| remove_by(&mut s.events, |e| e.id == id))
    }

    /// Adds or removes a member from an event's participants.
    pub fn toggle_event_member(&self, event_id: &str, member_id: &str) -> bool {
        self.mutate(|s| match s.events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.toggle_member(member_id);
                true
            }
            None => false,
        })
    }

    // Pickups

    pub fn add_pickup(&self, mut pickup: PickupDropoff) -> String {
        let id = generate_local_id();
        pickup.id = id.clone();
        self.mutate(|s| s.pickups.push(pickup));
        id
    }

    pub fn update_pickup(&self, id: &str, update: PickupUpdate) -> bool {
        self.mutate(|s| match s.pickups.iter_mut().find(|p| p.id == id) {
            Some(pickup) => {
                update.apply(pickup);
                true
            }
            None => false,
        })
    }

    pub fn remove_pickup(&self, id: &str) -> bool {
        self.mutate(|s| remove_by(&mut s.pickups, |p| p.id == id))
    }

    // Shopping

    pub fn add_shopping_item(&self, mut item: ShoppingItem) -> String {
        let id = generate_local_id();
        item.id = id.clone();
        self.mutate(|s| s.shopping_items.push(item));
        id
    }

    /// Flips the completed flag and returns the new value.
    pub fn toggle_shopping_item(&self, id: &str) -> Option<bool> {
        self.mutate(|s| {
            s.shopping_items.iter_mut().find(|i| i.id == id).map(|item| {
                item.completed = !item.completed;
                item.completed
            })
        })
    }

    pub fn remove_shopping_item(&self, id: &str) -> bool {
        self.mutate(|s| remove_by(&mut s.shopping_items, |i| i.id == id))
    }

    /// Drops every completed item and returns how many were removed.
    pub fn clear_completed_shopping(&self) -> usize {
        self.mutate(|s| {
            let before = s.shopping_items.len();
            s.shopping_items.retain(|i| !i.completed);
            before - s.shopping_items.len()
        })
    }

    // Wishlist

    pub fn add_wishlist_item(&self, mut item: WishlistItem) -> String {
        let id = generate_local_id();
        item.id = id.clone();
        self.mutate(|s| s.wishlist_items.push(item));
        id
    }

    pub fn remove_wishlist_item(&self, id: &str) -> bool {
        self.mutate(|s| remove_by(&mut s.wishlist_items, |i| i.id == id))
    }

    // Important dates

    pub fn add_important_date(&self, mut date: ImportantDate) -> String {
        let id = generate_local_id();
        date.id = id.clone();
        self.mutate(|s| s.important_dates.push(date));
        id
    }

    pub fn remove_important_date(&self, id: &str) -> bool {
        self.mutate(|s| remove_by(&mut s.important_dates, |d| d.id == id))
    }

    // Custom lists

    /// Adds an empty list stamped with the current time.
    pub fn add_custom_list(&self, mut list: CustomList) -> String {
        let id = generate_local_id();
        list.id = id.clone();
        list.items.clear();
        list.created_at = now_timestamp();
        self.mutate(|s| s.custom_lists.push(list));
        id
    }

    pub fn update_custom_list(&self, id: &str, update: CustomListUpdate) -> bool {
        self.mutate(|s| match s.custom_lists.iter_mut().find(|l| l.id == id) {
            Some(list) => {
                update.apply(list);
                true
            }
            None => false,
        })
    }

    /// Removes a list together with its items.
    pub fn remove_custom_list(&self, id: &str) -> bool {
        self.mutate(|s| remove_by(&mut s.custom_lists, |l| l.id == id))
    }

    /// Appends an item to a list. Returns the item id, or `None` if the list
    /// does not exist.
    pub fn add_custom_list_item(
        &self,
        list_id: &str,
        text: impl Into<String>,
        added_by: Option<String>,
    ) -> Option<String> {
        let item = CustomListItem {
            id: generate_local_id(),
            text: text.into(),
            completed: false,
            added_by,
            created_at: now_timestamp(),
        };
        self.mutate(|s| {
            let list = s.custom_lists.iter_mut().find(|l| l.id == list_id)?;
            let id = item.id.clone();
            list.items.push(item);
            Some(id)
        })
    }

    pub fn toggle_custom_list_item(&self, list_id: &str, item_id: &str) -> Option<bool> {
        self.mutate(|s| {
            let list = s.custom_lists.iter_mut().find(|l| l.id == list_id)?;
            let item = list.find_item_mut(item_id)?;
            item.completed = !item.completed;
            Some(item.completed)
        })
    }

    pub fn remove_custom_list_item(&self, list_id: &str, item_id: &str) -> bool {
        self.mutate(|s| {
            s.custom_lists
                .iter_mut()
                .find(|l| l.id == list_id)
                .map(|list| remove_by(&mut list.items, |i| i.id == item_id))
                .unwrap_or(false)
        })
    }

    pub fn clear_completed_custom_list_items(&self, list_id: &str) -> usize {
        self.mutate(|s| {
            s.custom_lists
                .iter_mut()
                .find(|l| l.id == list_id)
                .map(|list| {
                    let before = list.items.len();
                    list.items.retain(|i| !i.completed);
                    before - list.items.len()
                })
                .unwrap_or(0)
        })
    }

    // Pets

    /// Adds a pet with no care records, stamped with the current time.
    pub fn add_pet(&self, mut pet: Pet) -> String {
        let id = generate_local_id();
        pet.id = id.clone();
        pet.vaccines.clear();
        pet.baths.clear();
        pet.created_at = now_timestamp();
        self.mutate(|s| s.pets.push(pet));
        id
    }

    pub fn update_pet(&self, id: &str, update: PetUpdate) -> bool {
        self.mutate(|s| match s.pets.iter_mut().find(|p| p.id == id) {
            Some(pet) => {
                update.apply(pet);
                true
            }
            None => false,
        })
    }

    /// Removes a pet together with its vaccines and baths.
    pub fn remove_pet(&self, id: &str) -> bool {
        self.mutate(|s| remove_by(&mut s.pets, |p| p.id == id))
    }

    pub fn add_pet_vaccine(&self, pet_id: &str, mut vaccine: PetVaccine) -> Option<String> {
        let id = generate_local_id();
        vaccine.id = id.clone();
        vaccine.pet_id = pet_id.to_string();
        self.mutate(|s| {
            let pet = s.pets.iter_mut().find(|p| p.id == pet_id)?;
            pet.vaccines.push(vaccine);
            Some(id)
        })
    }

    pub fn remove_pet_vaccine(&self, pet_id: &str, vaccine_id: &str) -> bool {
        self.mutate(|s| {
            s.pets
                .iter_mut()
                .find(|p| p.id == pet_id)
                .map(|pet| remove_by(&mut pet.vaccines, |v| v.id == vaccine_id))
                .unwrap_or(false)
        })
    }

    pub fn add_pet_bath(&self, pet_id: &str, mut bath: PetBath) -> Option<String> {
        let id = generate_local_id();
        bath.id = id.clone();
        bath.pet_id = pet_id.to_string();
        self.mutate(|s| {
            let pet = s.pets.iter_mut().find(|p| p.id == pet_id)?;
            pet.baths.push(bath);
            Some(id)
        })
    }

    pub fn remove_pet_bath(&self, pet_id: &str, bath_id: &str) -> bool {
        self.mutate(|s| {
            s.pets
                .iter_mut()
                .find(|p| p.id == pet_id)
                .map(|pet| remove_by(&mut pet.baths, |b| b.id == bath_id))
                .unwrap_or(false)
        })
    }

    // Bulk setters

    pub fn set_events(&self, events: Vec<CalendarEvent>) {
        self.mutate(|s| s.events = events);
    }

    pub fn set_pickups(&self, pickups: Vec<PickupDropoff>) {
        self.mutate(|s| s.pickups = pickups);
    }

    pub fn set_wishlist_items(&self, items: Vec<WishlistItem>) {
        self.mutate(|s| s.wishlist_items = items);
    }

    pub fn set_important_dates(&self, dates: Vec<ImportantDate>) {
        self.mutate(|s| s.important_dates = dates);
    }

    pub fn set_custom_lists(&self, lists: Vec<CustomList>) {
        self.mutate(|s| s.custom_lists = lists);
    }

    pub fn set_pets(&self, pets: Vec<Pet>) {
        self.mutate(|s| s.pets = pets);
    }

    /// Replaces the six hydrated slices in one state transition. Readers see
    /// either the old state or the new one, never a mix.
    pub fn apply_hydration(&self, payload: HydrationPayload) {
        self.mutate(|s| {
            s.events = payload.events;
            s.pickups = payload.pickups;
            s.wishlist_items = payload.wishlist_items;
            s.important_dates = payload.important_dates;
            s.custom_lists = payload.custom_lists;
            s.pets = payload.pets;
        });
    }
}

/// Removes the first element matching `pred`. Returns true if one was found.
fn remove_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    match items.iter().position(pred) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::id::is_local_id;
    use crate::models::{PetSpecies, PickupKind, ShoppingCategory};
    use tempfile::TempDir;

    #[test]
    fn test_add_assigns_fresh_local_ids() {
        let store = FamilyStore::in_memory();
        let mut event = CalendarEvent::new("Dentist", "2025-03-10");
        event.id = "99".to_string();

        let a = store.add_event(event.clone());
        let b = store.add_event(event);

        assert_ne!(a, b);
        assert!(is_local_id(&a));
        assert!(store.events().iter().all(|e| e.id != "99"));
    }

    #[test]
    fn test_add_member_fills_display_fields() {
        let store = FamilyStore::in_memory();
        let mut member = FamilyMember::new("Ana Paula", "");
        member.avatar.clear();
        store.add_member(member);

        let members = store.members();
        assert_eq!(members[0].avatar, "AP");
        assert!(!members[0].color.is_empty());
    }

    #[test]
    fn test_update_and_remove_event() {
        let store = FamilyStore::in_memory();
        let id = store.add_event(CalendarEvent::new("Dentist", "2025-03-10"));

        assert!(store.update_event(
            &id,
            EventUpdate {
                date: Some("2025-03-11".to_string()),
                ..Default::default()
            }
        ));
        assert_eq!(store.events()[0].date, "2025-03-11");

        assert!(store.toggle_event_member(&id, "m1"));
        assert_eq!(store.events()[0].members_involved, vec!["m1"]);

        assert!(!store.update_event("missing", EventUpdate::default()));
        assert!(store.remove_event(&id));
        assert!(!store.remove_event(&id));
    }

    #[test]
    fn test_pickup_update() {
        let store = FamilyStore::in_memory();
        let id = store.add_pickup(PickupDropoff::new("Leo", "m1", PickupKind::Pickup, 1, "17:00"));

        store.update_pickup(
            &id,
            PickupUpdate {
                kind: Some(PickupKind::Dropoff),
                time: Some("07:30".to_string()),
                ..Default::default()
            },
        );
        let pickups = store.pickups();
        let pickup = &pickups[0];
        assert_eq!(pickup.kind, PickupKind::Dropoff);
        assert_eq!(pickup.time, "07:30");
        assert_eq!(pickup.child_name, "Leo");
    }

    #[test]
    fn test_shopping_toggle_and_clear() {
        let store = FamilyStore::in_memory();
        let milk = store.add_shopping_item(ShoppingItem::new("Milk", ShoppingCategory::Grocery));
        store.add_shopping_item(ShoppingItem::new("Soap", ShoppingCategory::Household));

        assert_eq!(store.toggle_shopping_item(&milk), Some(true));
        assert_eq!(store.toggle_shopping_item("missing"), None);
        assert_eq!(store.clear_completed_shopping(), 1);

        let names: Vec<_> = store.shopping_items().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Soap"]);
    }

    #[test]
    fn test_custom_list_items() {
        let store = FamilyStore::in_memory();
        let list_id = store.add_custom_list(CustomList::new("Packing", "bag", "#1B7C7C"));
        assert!(!store.custom_lists()[0].created_at.is_empty());

        let a = store.add_custom_list_item(&list_id, "Sunscreen", None).unwrap();
        let b = store
            .add_custom_list_item(&list_id, "Towels", Some("m1".to_string()))
            .unwrap();
        assert!(store.add_custom_list_item("missing", "x", None).is_none());

        assert_eq!(store.toggle_custom_list_item(&list_id, &a), Some(true));
        assert_eq!(store.clear_completed_custom_list_items(&list_id), 1);
        assert!(store.remove_custom_list_item(&list_id, &b));
        assert!(store.custom_lists()[0].items.is_empty());

        assert!(store.update_custom_list(
            &list_id,
            CustomListUpdate {
                color: Some("#0D3B5C".to_string()),
                ..Default::default()
            }
        ));
        assert_eq!(store.custom_lists()[0].color, "#0D3B5C");

        assert!(store.remove_custom_list(&list_id));
        assert!(store.custom_lists().is_empty());
    }

    #[test]
    fn test_pet_care_records() {
        let store = FamilyStore::in_memory();
        let pet_id = store.add_pet(Pet::new("Rex", PetSpecies::Dog, "brown"));

        let vaccine = store
            .add_pet_vaccine(&pet_id, PetVaccine::new("Rabies", "2025-01-10"))
            .unwrap();
        let bath = store.add_pet_bath(&pet_id, PetBath::new("2025-02-01")).unwrap();
        assert!(store.add_pet_bath("missing", PetBath::new("2025-02-01")).is_none());

        let pets = store.pets();
        let pet = &pets[0];
        assert_eq!(pet.vaccines[0].pet_id, pet_id);
        assert_eq!(pet.baths[0].id, bath);

        assert!(store.update_pet(
            &pet_id,
            PetUpdate {
                breed: Some(Some("Beagle".to_string())),
                ..Default::default()
            }
        ));
        assert!(store.remove_pet_vaccine(&pet_id, &vaccine));
        assert!(store.remove_pet_bath(&pet_id, &bath));

        let pets = store.pets();
        let pet = &pets[0];
        assert_eq!(pet.breed.as_deref(), Some("Beagle"));
        assert!(pet.vaccines.is_empty() && pet.baths.is_empty());
    }

    #[test]
    fn test_apply_hydration_leaves_members_and_shopping() {
        let store = FamilyStore::in_memory();
        store.add_member(FamilyMember::new("Ana", "#1B7C7C"));
        store.add_shopping_item(ShoppingItem::new("Milk", ShoppingCategory::Grocery));
        store.add_event(CalendarEvent::new("Local only", "2025-03-10"));

        let mut remote_event = CalendarEvent::new("From backend", "2025-03-12");
        remote_event.id = "17".to_string();
        store.apply_hydration(HydrationPayload {
            events: vec![remote_event.clone()],
            ..Default::default()
        });

        assert_eq!(store.events(), vec![remote_event]);
        assert_eq!(store.members().len(), 1);
        assert_eq!(store.shopping_items().len(), 1);
    }

    #[test]
    fn test_no_op_mutations_do_not_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("family-storage.json");
        let store = FamilyStore::open(temp.path()).unwrap();

        assert!(!store.remove_event("missing"));
        assert_eq!(store.toggle_shopping_item("missing"), None);
        assert_eq!(store.clear_completed_shopping(), 0);
        assert_eq!(store.add_pet_bath("missing", PetBath::new("2025-02-01")), None);
        assert!(!path.exists());

        let id = store.add_event(CalendarEvent::new("Dentist", "2025-03-10"));
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();

        assert!(!store.update_event("missing", EventUpdate::default()));
        assert!(!path.exists());
        assert!(store.remove_event(&id));
        assert!(path.exists());
    }

    #[test]
    fn test_state_persists_across_open() {
        let temp = TempDir::new().unwrap();
        {
            let store = FamilyStore::open(temp.path()).unwrap();
            store.add_shopping_item(ShoppingItem::new("Milk", ShoppingCategory::Grocery));
            store.set_pets(vec![Pet::new("Rex", PetSpecies::Dog, "brown")]);
        }

        let store = FamilyStore::open(temp.path()).unwrap();
        assert_eq!(store.shopping_items()[0].name, "Milk");
        assert_eq!(store.pets()[0].name, "Rex");
        assert!(temp.path().join("family-storage.json").exists());
    }
}
