//! Client-shape domain types.

pub mod custom_list;
pub mod event;
pub mod family;
pub mod id;
pub mod important_date;
pub mod member;
pub mod pet;
pub mod pickup;
pub mod shopping;

pub use custom_list::{CustomList, CustomListItem, CustomListUpdate};
pub use event::{CalendarEvent, EventType, EventUpdate};
pub use family::{generate_invite_code, FamilyGroup, PendingInvite, User};
pub use id::{generate_local_id, is_local_id, is_remote_id, remote_id};
pub use important_date::{ImportantDate, ImportantDateType};
pub use member::{FamilyMember, MEMBER_COLORS};
pub use pet::{Pet, PetBath, PetSpecies, PetUpdate, PetVaccine};
pub use pickup::{PickupDropoff, PickupKind, PickupUpdate};
pub use shopping::{ShoppingCategory, ShoppingItem, WishlistItem, WishlistPriority};
