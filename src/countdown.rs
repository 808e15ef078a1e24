//! Time left until the daily shop rotation at 00:00 UTC.

use chrono::{DateTime, Duration, Timelike, Utc};

/// Duration until the next 00:00 UTC. Exactly at midnight this is zero.
pub fn until_rotation(now: DateTime<Utc>) -> Duration {
    let elapsed = i64::from(now.num_seconds_from_midnight());
    let remaining = (86_400 - elapsed) % 86_400;
    Duration::seconds(remaining)
}

/// `Refreshes in: HH:MM:SS`, hours taken modulo 24.
pub fn format_countdown(now: DateTime<Utc>) -> String {
    let total = until_rotation(now).num_seconds();
    let hours = (total / 3600) % 24;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("Refreshes in: {hours:02}:{minutes:02}:{seconds:02}")
}
