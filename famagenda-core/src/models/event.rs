use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of calendar entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Event,
    Appointment,
    Activity,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Event => write!(f, "event"),
            EventType::Appointment => write!(f, "appointment"),
            EventType::Activity => write!(f, "activity"),
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "event" => Ok(EventType::Event),
            "appointment" => Ok(EventType::Appointment),
            "activity" => Ok(EventType::Activity),
            _ => Err(format!(
                "Invalid event type '{}'. Valid options: event, appointment, activity",
                s
            )),
        }
    }
}

/// A calendar event in client shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    /// Time of day (`HH:MM`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Ids of the members taking part.
    #[serde(default)]
    pub members_involved: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            date: date.into(),
            time: None,
            members_involved: Vec::new(),
            description: None,
            event_type: EventType::Event,
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members_involved = members;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds the member if absent, removes it otherwise.
    pub fn toggle_member(&mut self, member_id: &str) {
        let before = self.members_involved.len();
        self.members_involved.retain(|m| m != member_id);
        if self.members_involved.len() == before {
            self.members_involved.push(member_id.to_string());
        }
    }
}

/// Partial update for a calendar event. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub event_type: Option<EventType>,
    pub members_involved: Option<Vec<String>>,
}

impl EventUpdate {
    pub(crate) fn apply(self, event: &mut CalendarEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = self.time {
            event.time = time;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(event_type) = self.event_type {
            event.event_type = event_type;
        }
        if let Some(members) = self.members_involved {
            event.members_involved = members;
        }
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.time {
            Some(time) => write!(f, "{} {} {} ({})", self.date, time, self.title, self.event_type),
            None => write!(f, "{} {} ({})", self.date, self.title, self.event_type),
        }
    }
}
