use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a school run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupKind {
    #[default]
    Pickup,
    Dropoff,
}

impl fmt::Display for PickupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickupKind::Pickup => write!(f, "pickup"),
            PickupKind::Dropoff => write!(f, "dropoff"),
        }
    }
}

impl FromStr for PickupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pickup" => Ok(PickupKind::Pickup),
            "dropoff" => Ok(PickupKind::Dropoff),
            _ => Err(format!(
                "Invalid transport type '{}'. Valid options: pickup, dropoff",
                s
            )),
        }
    }
}

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Day used when a stored day-of-week is outside 0-6.
pub const FALLBACK_DAY: u8 = 0;

/// Validates a day-of-week index (0 = Sunday).
///
/// Out-of-range values become [`FALLBACK_DAY`] rather than wrapping onto
/// some other real weekday.
pub fn day_of_week_or_fallback(day: i64) -> u8 {
    u8::try_from(day)
        .ok()
        .filter(|day| usize::from(*day) < DAY_NAMES.len())
        .unwrap_or(FALLBACK_DAY)
}

/// Name of a day-of-week index (0 = Sunday).
pub fn day_name(day_of_week: u8) -> &'static str {
    DAY_NAMES
        .get(usize::from(day_of_week))
        .copied()
        .unwrap_or(DAY_NAMES[usize::from(FALLBACK_DAY)])
}

/// A weekly pickup or dropoff. Recurrence is implicit: the record repeats
/// every week on `day_of_week` with no end date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupDropoff {
    pub id: String,
    pub child_name: String,
    pub responsible_member_id: String,
    #[serde(rename = "type")]
    pub kind: PickupKind,
    pub location: String,
    /// Time of day (`HH:MM`).
    pub time: String,
    /// 0-6, Sunday to Saturday.
    pub day_of_week: u8,
    pub recurring: bool,
}

impl PickupDropoff {
    pub fn new(
        child_name: impl Into<String>,
        responsible_member_id: impl Into<String>,
        kind: PickupKind,
        day_of_week: u8,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            child_name: child_name.into(),
            responsible_member_id: responsible_member_id.into(),
            kind,
            location: String::new(),
            time: time.into(),
            day_of_week: day_of_week_or_fallback(i64::from(day_of_week)),
            recurring: true,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// Partial update for a pickup.
#[derive(Debug, Clone, Default)]
pub struct PickupUpdate {
    pub child_name: Option<String>,
    pub responsible_member_id: Option<String>,
    pub kind: Option<PickupKind>,
    pub location: Option<String>,
    pub time: Option<String>,
    pub day_of_week: Option<u8>,
    pub recurring: Option<bool>,
}

impl PickupUpdate {
    pub(crate) fn apply(self, pickup: &mut PickupDropoff) {
        if let Some(child_name) = self.child_name {
            pickup.child_name = child_name;
        }
        if let Some(member_id) = self.responsible_member_id {
            pickup.responsible_member_id = member_id;
        }
        if let Some(kind) = self.kind {
            pickup.kind = kind;
        }
        if let Some(location) = self.location {
            pickup.location = location;
        }
        if let Some(time) = self.time {
            pickup.time = time;
        }
        if let Some(day) = self.day_of_week {
            pickup.day_of_week = day_of_week_or_fallback(i64::from(day));
        }
        if let Some(recurring) = self.recurring {
            pickup.recurring = recurring;
        }
    }
}

impl fmt::Display for PickupDropoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            day_name(self.day_of_week),
            self.time,
            self.kind,
            self.child_name
        )?;
        if !self.location.is_empty() {
            write!(f, " @ {}", self.location)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_day_falls_back_to_sunday() {
        let pickup = PickupDropoff::new("Leo", "m1", PickupKind::Pickup, 9, "07:30");
        assert_eq!(pickup.day_of_week, FALLBACK_DAY);
        assert_eq!(day_name(pickup.day_of_week), "Sunday");

        assert_eq!(day_of_week_or_fallback(6), 6);
        assert_eq!(day_of_week_or_fallback(7), FALLBACK_DAY);
        assert_eq!(day_of_week_or_fallback(-1), FALLBACK_DAY);
        assert_eq!(day_name(42), "Sunday");
    }

    #[test]
    fn test_update_rejects_out_of_range_day() {
        let mut pickup = PickupDropoff::new("Leo", "m1", PickupKind::Pickup, 3, "07:30");
        PickupUpdate {
            day_of_week: Some(8),
            ..Default::default()
        }
        .apply(&mut pickup);
        assert_eq!(pickup.day_of_week, FALLBACK_DAY);
    }

    #[test]
    fn test_display() {
        let pickup = PickupDropoff::new("Leo", "m1", PickupKind::Dropoff, 1, "07:30")
            .with_location("School");
        assert_eq!(pickup.to_string(), "Monday 07:30 dropoff Leo @ School");
    }

    #[test]
    fn test_json_type_field() {
        let pickup = PickupDropoff::new("Leo", "m1", PickupKind::Dropoff, 1, "07:30");
        let json = serde_json::to_value(&pickup).unwrap();
        assert_eq!(json["type"], "dropoff");
        assert_eq!(json["dayOfWeek"], 1);
    }
}
