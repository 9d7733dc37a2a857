//! Account and family-group types held by the auth store.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INVITE_CODE_LEN: usize = 6;

/// Invite code alphabet. Excludes `I`, `O`, `0` and `1`.
pub const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generates a fresh 6-character invite code.
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LEN)
        .map(|_| INVITE_CODE_ALPHABET[rng.random_range(0..INVITE_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalizes user input to the stored invite code form.
pub fn normalize_invite_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub color: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// The family the current user belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyGroup {
    pub id: String,
    /// Backend id, present once the family exists remotely. Sync is only
    /// attempted when this is set.
    #[serde(default, rename = "dbId", skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<i64>,
    pub name: String,
    pub invite_code: String,
    pub created_by: String,
    /// User ids.
    #[serde(default)]
    pub members: Vec<String>,
}

impl fmt::Display for FamilyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.name, self.invite_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvite {
    pub id: String,
    pub family_group_id: String,
    pub family_group_name: String,
    pub invited_by: String,
    pub invited_by_name: String,
    pub created_at: String,
}
