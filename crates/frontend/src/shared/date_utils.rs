/// Utilities for date and time formatting
///
/// Timestamps arrive as UTC and are shown in the same DD.MM.YYYY layout everywhere
use chrono::{DateTime, Utc};

/// Format a timestamp as DD.MM.YYYY HH:MM
/// Example: 2024-03-15T14:02:26.123Z -> "15.03.2024 14:02"
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%d.%m.%Y %H:%M").to_string()
}
