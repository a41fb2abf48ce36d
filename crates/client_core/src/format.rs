use chrono::{DateTime, Utc};

const NANOS_PER_MILLI: i64 = 1_000_000;

fn from_nanos(timestamp_nanos: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp_nanos / NANOS_PER_MILLI)
}

/// `05 Mar 2024`, from a backend timestamp in nanoseconds.
pub fn format_date(timestamp_nanos: i64) -> String {
    from_nanos(timestamp_nanos)
        .map(|at| at.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "-".into())
}

/// `05 Mar 2024, 14:30` (UTC).
pub fn format_date_time(timestamp_nanos: i64) -> String {
    from_nanos(timestamp_nanos)
        .map(|at| at.format("%d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
