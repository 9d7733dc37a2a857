//! Remote-shape rows.
//!
//! Field structs are wrapped in [`Record`] to pick up the numeric id and
//! timestamps. Every field defaults when absent, and non-optional fields
//! also default when the column is `null`, so a sparse row still decodes.
//! Enum-like columns stay plain strings and are interpreted by the mappers.

use serde::{Deserialize, Deserializer, Serialize};

use crate::gateway::Record;

/// Reads a nullable column into a non-optional field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFields {
    #[serde(deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Combined ISO datetime.
    #[serde(deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupFields {
    #[serde(deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub child_name: String,
    pub responsible_member_id: Option<i64>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub day_of_week: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub recurring: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingItemFields {
    #[serde(deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WishlistItemFields {
    #[serde(deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportantDateFields {
    #[serde(deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    /// `"none"` for one-off dates; anything else (`"yearly"`, ...) recurs.
    #[serde(deserialize_with = "null_as_default")]
    pub recurrence: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomListFields {
    #[serde(deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomListItemFields {
    #[serde(deserialize_with = "null_as_default")]
    pub list_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetFields {
    #[serde(deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub species: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetVaccineFields {
    #[serde(deserialize_with = "null_as_default")]
    pub pet_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetBathFields {
    #[serde(deserialize_with = "null_as_default")]
    pub pet_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyFields {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub invite_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberFields {
    #[serde(deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

pub type RemoteEvent = Record<EventFields>;
pub type RemotePickup = Record<PickupFields>;
pub type RemoteShoppingItem = Record<ShoppingItemFields>;
pub type RemoteWishlistItem = Record<WishlistItemFields>;
pub type RemoteImportantDate = Record<ImportantDateFields>;
pub type RemoteCustomList = Record<CustomListFields>;
pub type RemoteCustomListItem = Record<CustomListItemFields>;
pub type RemotePet = Record<PetFields>;
pub type RemotePetVaccine = Record<PetVaccineFields>;
pub type RemotePetBath = Record<PetBathFields>;
pub type RemoteFamily = Record<FamilyFields>;
pub type RemoteMember = Record<MemberFields>;
