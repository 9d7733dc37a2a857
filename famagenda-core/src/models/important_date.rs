use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportantDateType {
    Birthday,
    Anniversary,
    Holiday,
    #[default]
    Other,
}

impl fmt::Display for ImportantDateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportantDateType::Birthday => write!(f, "birthday"),
            ImportantDateType::Anniversary => write!(f, "anniversary"),
            ImportantDateType::Holiday => write!(f, "holiday"),
            ImportantDateType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ImportantDateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "birthday" => Ok(ImportantDateType::Birthday),
            "anniversary" => Ok(ImportantDateType::Anniversary),
            "holiday" => Ok(ImportantDateType::Holiday),
            "other" => Ok(ImportantDateType::Other),
            _ => Err(format!(
                "Invalid date type '{}'. Valid options: birthday, anniversary, holiday, other",
                s
            )),
        }
    }
}

/// A birthday, anniversary or other date worth remembering.
///
/// Recurring dates are stored as `MM-DD`; one-off dates carry the full
/// ISO date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantDate {
    pub id: String,
    pub title: String,
    pub date: String,
    pub recurring: bool,
    #[serde(rename = "type")]
    pub date_type: ImportantDateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

impl ImportantDate {
    pub fn new(title: impl Into<String>, date: impl Into<String>, date_type: ImportantDateType) -> Self {
        let date = date.into();
        Self {
            id: String::new(),
            title: title.into(),
            recurring: date.len() == 5,
            date,
            date_type,
            member_id: None,
        }
    }

    pub fn with_member(mut self, member_id: impl Into<String>) -> Self {
        self.member_id = Some(member_id.into());
        self
    }

    /// The `MM-DD` part of the date, whichever form it is stored in.
    pub fn month_day(&self) -> &str {
        let len = self.date.len();
        if len >= 5 {
            &self.date[len - 5..]
        } else {
            &self.date
        }
    }
}

impl fmt::Display for ImportantDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.date, self.title, self.date_type)
    }
}
