//! Remote row to client entity mappers.
//!
//! All mappers are total: a missing or unrecognised field falls back to an
//! empty or default value instead of failing, so one odd row cannot abort
//! the hydration of unrelated collections.

use crate::models::pickup::day_of_week_or_fallback;
use crate::models::{
    CalendarEvent, CustomList, CustomListItem, EventType, ImportantDate, Pet, PetBath,
    PetVaccine, PickupDropoff, WishlistItem,
};
use crate::sync::remote::{
    RemoteCustomList, RemoteCustomListItem, RemoteEvent, RemoteImportantDate, RemotePet,
    RemotePetBath, RemotePetVaccine, RemotePickup, RemoteWishlistItem,
};

/// Recurrence value marking a one-off date.
const NO_RECURRENCE: &str = "none";

fn optional_id(id: Option<i64>) -> Option<String> {
    id.map(|id| id.to_string())
}

/// Splits a combined ISO datetime into `YYYY-MM-DD` and `HH:MM`.
fn split_start_time(start_time: &str) -> (String, Option<String>) {
    match start_time.split_once('T') {
        Some((date, rest)) => {
            let time: String = rest.chars().take(5).collect();
            let time = if time.is_empty() { None } else { Some(time) };
            (date.to_string(), time)
        }
        None => (start_time.to_string(), None),
    }
}

/// Participants are not reconstructed and the type always comes back as
/// [`EventType::Event`]; the backend stores neither.
pub fn map_event(row: &RemoteEvent) -> CalendarEvent {
    let (date, time) = split_start_time(&row.start_time);
    CalendarEvent {
        id: row.id.to_string(),
        title: row.title.clone(),
        date,
        time,
        members_involved: Vec::new(),
        description: row.description.clone(),
        event_type: EventType::Event,
    }
}

/// A day outside 0-6 becomes Sunday; the row is still kept.
pub fn map_pickup(row: &RemotePickup) -> PickupDropoff {
    let day_of_week = day_of_week_or_fallback(row.day_of_week);
    if i64::from(day_of_week) != row.day_of_week {
        tracing::warn!(
            id = row.id,
            day_of_week = row.day_of_week,
            "Pickup has an out-of-range day, using Sunday"
        );
    }
    PickupDropoff {
        id: row.id.to_string(),
        child_name: row.child_name.clone(),
        responsible_member_id: optional_id(row.responsible_member_id).unwrap_or_default(),
        kind: row.kind.parse().unwrap_or_default(),
        location: row.location.clone(),
        time: row.time.clone(),
        day_of_week,
        recurring: row.recurring,
    }
}

pub fn map_wishlist_item(row: &RemoteWishlistItem) -> WishlistItem {
    WishlistItem {
        id: row.id.to_string(),
        name: row.name.clone(),
        description: row.description.clone(),
        price: row.price.clone(),
        link: row.link.clone(),
        added_by: optional_id(row.added_by).unwrap_or_default(),
        priority: row.priority.parse().unwrap_or_default(),
    }
}

pub fn map_important_date(row: &RemoteImportantDate) -> ImportantDate {
    ImportantDate {
        id: row.id.to_string(),
        title: row.title.clone(),
        date: row.date.clone(),
        recurring: row.recurrence != NO_RECURRENCE,
        date_type: row.kind.parse().unwrap_or_default(),
        member_id: optional_id(row.member_id),
    }
}

pub fn map_custom_list_item(row: &RemoteCustomListItem) -> CustomListItem {
    CustomListItem {
        id: row.id.to_string(),
        text: row.text.clone(),
        completed: row.completed,
        added_by: optional_id(row.added_by),
        created_at: row.created_at.clone().unwrap_or_default(),
    }
}

/// Builds a list with the items whose `list_id` matches it, in the order
/// given.
pub fn map_custom_list(row: &RemoteCustomList, items: &[RemoteCustomListItem]) -> CustomList {
    CustomList {
        id: row.id.to_string(),
        name: row.name.clone(),
        icon: row.icon.clone(),
        color: row.color.clone(),
        items: items
            .iter()
            .filter(|item| item.list_id == row.id)
            .map(map_custom_list_item)
            .collect(),
        created_at: row.created_at.clone().unwrap_or_default(),
    }
}

pub fn map_pet_vaccine(row: &RemotePetVaccine) -> PetVaccine {
    PetVaccine {
        id: row.id.to_string(),
        pet_id: row.pet_id.to_string(),
        name: row.name.clone(),
        vaccine_type: row.kind.clone().unwrap_or_default(),
        date: row.date.clone(),
        next_date: row.next_date.clone(),
        notes: row.notes.clone(),
    }
}

pub fn map_pet_bath(row: &RemotePetBath) -> PetBath {
    PetBath {
        id: row.id.to_string(),
        pet_id: row.pet_id.to_string(),
        date: row.date.clone(),
        location: row.location.clone(),
        notes: row.notes.clone(),
    }
}

/// Builds a pet with the vaccines and baths that reference it.
pub fn map_pet(row: &RemotePet, vaccines: &[RemotePetVaccine], baths: &[RemotePetBath]) -> Pet {
    Pet {
        id: row.id.to_string(),
        name: row.name.clone(),
        species: row.species.parse().unwrap_or_default(),
        breed: row.breed.clone(),
        birth_date: row.birth_date.clone(),
        color: row.color.clone(),
        photo: row.photo_url.clone(),
        vaccines: vaccines
            .iter()
            .filter(|v| v.pet_id == row.id)
            .map(map_pet_vaccine)
            .collect(),
        baths: baths
            .iter()
            .filter(|b| b.pet_id == row.id)
            .map(map_pet_bath)
            .collect(),
        created_at: row.created_at.clone().unwrap_or_default(),
    }
}
