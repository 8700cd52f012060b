use chrono::{DateTime, Utc};

/// Parses the backend's RFC 3339 timestamps (`2025-01-01T10:00:00.000Z`).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if value.is_empty() {
        None
    } else {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}
