use serde::{Deserialize, Serialize};
use std::fmt;

/// A free-form checklist. Items are owned by the list and go away with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomList {
    pub id: String,
    pub name: String,
    /// Icon key understood by the front end.
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub items: Vec<CustomListItem>,
    #[serde(default)]
    pub created_at: String,
}

impl CustomList {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            items: Vec::new(),
            created_at: String::new(),
        }
    }

    pub fn find_item_mut(&mut self, item_id: &str) -> Option<&mut CustomListItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }
}

impl fmt::Display for CustomList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{} open)",
            self.name,
            self.pending_count(),
            self.items.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomListItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Partial update for a list's display fields.
#[derive(Debug, Clone, Default)]
pub struct CustomListUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl CustomListUpdate {
    pub(crate) fn apply(self, list: &mut CustomList) {
        if let Some(name) = self.name {
            list.name = name;
        }
        if let Some(icon) = self.icon {
            list.icon = icon;
        }
        if let Some(color) = self.color {
            list.color = color;
        }
    }
}
