//! Local identifier generation.
//!
//! Entities created on this device get a random base-36 id whose first
//! character is always a letter. Ids of entities that came from the backend
//! are stringified integers, so the two id spaces never overlap.

use chrono::{SecondsFormat, Utc};
use rand::Rng;

const LOCAL_ID_LEN: usize = 12;
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh local id.
pub fn generate_local_id() -> String {
    let mut rng = rand::rng();
    let mut id = String::with_capacity(LOCAL_ID_LEN);
    id.push(LETTERS[rng.random_range(0..LETTERS.len())] as char);
    for _ in 1..LOCAL_ID_LEN {
        id.push(BASE36[rng.random_range(0..BASE36.len())] as char);
    }
    id
}

/// Returns true if `id` was generated on this device.
pub fn is_local_id(id: &str) -> bool {
    id.len() == LOCAL_ID_LEN
        && id.starts_with(|c: char| c.is_ascii_lowercase())
        && id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
}

/// Returns true if `id` is a stringified remote id.
pub fn is_remote_id(id: &str) -> bool {
    remote_id(id).is_some()
}

/// Parses a stringified remote id back into its numeric form.
pub fn remote_id(id: &str) -> Option<i64> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// Current time as an ISO-8601 timestamp with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_id_shape() {
        for _ in 0..200 {
            let id = generate_local_id();
            assert_eq!(id.len(), LOCAL_ID_LEN);
            assert!(is_local_id(&id));
            assert!(!is_remote_id(&id));
        }
    }

    #[test]
    fn test_local_ids_are_unique() {
        let a = generate_local_id();
        let b = generate_local_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_remote_id() {
        assert_eq!(remote_id("42"), Some(42));
        assert_eq!(remote_id("abc"), None);
        assert_eq!(remote_id("-1"), None);
        assert_eq!(remote_id(""), None);
        assert!(!is_local_id("42"));
    }
}
