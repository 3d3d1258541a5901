//! Formatting helpers shared by dashboard front ends.

use chrono::{DateTime, Utc};

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Highlight,
    Pending,
    Neutral,
}

/// Rate as the backend sends it (already a percentage), with a `%` suffix.
pub fn format_percent(rate: f64) -> String {
    format!("{}%", rate)
}

pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

pub fn message_status_tone(status: &str) -> StatusTone {
    match status {
        "sent" => StatusTone::Positive,
        "draft" => StatusTone::Pending,
        _ => StatusTone::Neutral,
    }
}

pub fn post_status_tone(status: &str) -> StatusTone {
    match status {
        "published" => StatusTone::Positive,
        "approved" => StatusTone::Highlight,
        _ => StatusTone::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(66.67), "66.67%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(100.0), "100%");
    }

    #[test]
    fn test_format_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(format_date(&at), "Mar 7, 2024");
    }

    #[test]
    fn test_status_tones() {
        assert_eq!(message_status_tone("sent"), StatusTone::Positive);
        assert_eq!(message_status_tone("draft"), StatusTone::Pending);
        assert_eq!(message_status_tone("replied"), StatusTone::Neutral);
        assert_eq!(post_status_tone("published"), StatusTone::Positive);
        assert_eq!(post_status_tone("approved"), StatusTone::Highlight);
        assert_eq!(post_status_tone("draft"), StatusTone::Pending);
    }
}
