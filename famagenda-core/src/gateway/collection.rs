//! Remote collection registry.

use std::fmt;

/// Remote collections the gateway can address.
///
/// Every collection maps to exactly one backend table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Families,
    Members,
    Events,
    Pickups,
    ShoppingItems,
    WishlistItems,
    ImportantDates,
    CustomLists,
    CustomListItems,
    Pets,
    PetVaccines,
    PetBaths,
}

impl Collection {
    /// All collections, in registry order.
    pub const ALL: [Collection; 12] = [
        Collection::Families,
        Collection::Members,
        Collection::Events,
        Collection::Pickups,
        Collection::ShoppingItems,
        Collection::WishlistItems,
        Collection::ImportantDates,
        Collection::CustomLists,
        Collection::CustomListItems,
        Collection::Pets,
        Collection::PetVaccines,
        Collection::PetBaths,
    ];

    /// Returns the backend table name for this collection.
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Families => "families",
            Collection::Members => "family_members",
            Collection::Events => "events",
            Collection::Pickups => "pickups",
            Collection::ShoppingItems => "shopping_items",
            Collection::WishlistItems => "wishlist_items",
            Collection::ImportantDates => "important_dates",
            Collection::CustomLists => "custom_lists",
            Collection::CustomListItems => "custom_list_items",
            Collection::Pets => "pets",
            Collection::PetVaccines => "pet_vaccines",
            Collection::PetBaths => "pet_baths",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
