//! Shopping list and wishlist items.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShoppingCategory {
    #[default]
    Grocery,
    Household,
    Other,
}

impl fmt::Display for ShoppingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShoppingCategory::Grocery => write!(f, "grocery"),
            ShoppingCategory::Household => write!(f, "household"),
            ShoppingCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ShoppingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grocery" => Ok(ShoppingCategory::Grocery),
            "household" => Ok(ShoppingCategory::Household),
            "other" => Ok(ShoppingCategory::Other),
            _ => Err(format!(
                "Invalid category '{}'. Valid options: grocery, household, other",
                s
            )),
        }
    }
}

/// An item on the shared shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    pub completed: bool,
    /// Id of the member who added the item.
    pub added_by: String,
    pub category: ShoppingCategory,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, category: ShoppingCategory) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            quantity: None,
            completed: false,
            added_by: String::new(),
            category,
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_added_by(mut self, member_id: impl Into<String>) -> Self {
        self.added_by = member_id.into();
        self
    }
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = if self.completed { "[x]" } else { "[ ]" };
        match self.quantity {
            Some(qty) => write!(f, "{} {:<20} {} ({})", check, self.name, qty, self.category),
            None => write!(f, "{} {:<20} ({})", check, self.name, self.category),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for WishlistPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WishlistPriority::Low => write!(f, "low"),
            WishlistPriority::Medium => write!(f, "medium"),
            WishlistPriority::High => write!(f, "high"),
        }
    }
}

impl FromStr for WishlistPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(WishlistPriority::Low),
            "medium" => Ok(WishlistPriority::Medium),
            "high" => Ok(WishlistPriority::High),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options: low, medium, high",
                s
            )),
        }
    }
}

/// A wished-for item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub added_by: String,
    pub priority: WishlistPriority,
}

impl WishlistItem {
    pub fn new(name: impl Into<String>, priority: WishlistPriority) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: None,
            price: None,
            link: None,
            added_by: String::new(),
            priority,
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_added_by(mut self, member_id: impl Into<String>) -> Self {
        self.added_by = member_id.into();
        self
    }
}

impl fmt::Display for WishlistItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.priority)?;
        if let Some(price) = &self.price {
            write!(f, " {}", price)?;
        }
        Ok(())
    }
}
