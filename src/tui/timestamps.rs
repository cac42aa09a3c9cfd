use chrono::{DateTime, Datelike, Utc};

/// Tiered display for list rows: relative under a week ("2h ago", "3d ago"),
/// otherwise "Jan 15" this year or "Dec 3, 2023" for older years
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_at(timestamp, &Utc::now())
}

pub(crate) fn format_timestamp_at(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*timestamp);

    if elapsed.num_days() >= 7 || elapsed.num_seconds() < 0 {
        return if timestamp.year() == now.year() {
            timestamp.format("%b %-d").to_string()
        } else {
            timestamp.format("%b %-d, %Y").to_string()
        };
    }

    match (elapsed.num_days(), elapsed.num_hours(), elapsed.num_minutes()) {
        (d, _, _) if d > 0 => format!("{}d ago", d),
        (_, h, _) if h > 0 => format!("{}h ago", h),
        (_, _, m) if m > 0 => format!("{}m ago", m),
        _ => "just now".to_string(),
    }
}

/// Exact time for the detail pane and CLI output
pub fn format_full(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
