use serde::{Deserialize, Serialize};
use std::fmt;

/// Display colors assigned to members that were created without one.
pub const MEMBER_COLORS: [&str; 6] = [
    "#1B7C7C", "#6FA899", "#0D3B5C", "#E8A0BF", "#F59E0B", "#8B5CF6",
];

/// A member of the family. Members stay locally authoritative; hydration
/// never replaces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Initials shown in place of a photo.
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_adult: Option<bool>,
}

impl FamilyMember {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: String::new(),
            avatar: initials(&name),
            name,
            color: color.into(),
            is_adult: None,
        }
    }

    pub fn with_adult(mut self, is_adult: bool) -> Self {
        self.is_adult = Some(is_adult);
        self
    }

    /// Fills in color and avatar if either is blank.
    pub(crate) fn normalize(&mut self, index: usize) {
        if self.avatar.trim().is_empty() {
            self.avatar = initials(&self.name);
        }
        if self.color.trim().is_empty() {
            self.color = MEMBER_COLORS[index % MEMBER_COLORS.len()].to_string();
        }
    }
}

impl fmt::Display for FamilyMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.avatar, self.name, self.color)
    }
}

/// Up to two upper-case initials; `?` for a blank name.
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials("maria clara souza"), "MC");
        assert_eq!(initials("Ana"), "A");
        assert_eq!(initials("   "), "?");
    }

    #[test]
    fn test_normalize_fills_blanks() {
        let mut member = FamilyMember::new("Joao Pedro", "");
        member.avatar.clear();
        member.normalize(1);

        assert_eq!(member.avatar, "JP");
        assert_eq!(member.color, MEMBER_COLORS[1]);
    }

    #[test]
    fn test_member_json_uses_camel_case() {
        let member = FamilyMember::new("Ana", "#1B7C7C").with_adult(true);
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["isAdult"], true);
    }
}
