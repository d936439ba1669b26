//! Small display helpers for timestamps.

use chrono::{DateTime, Local, LocalResult, TimeZone, Utc};

/// Formats epoch milliseconds as a local date-time string.
///
/// Out-of-range timestamps fall back to the raw number.
pub fn format_date(ts_ms: i64) -> String {
    match Local.timestamp_millis_opt(ts_ms) {
        LocalResult::Single(value) | LocalResult::Ambiguous(value, _) => {
            value.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        LocalResult::None => ts_ms.to_string(),
    }
}

/// Export file name for a dump taken at `now_ms`, dated in UTC.
pub fn export_file_name(now_ms: i64) -> String {
    let date: DateTime<Utc> = DateTime::from_timestamp_millis(now_ms).unwrap_or_default();
    format!("blog-posts-{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, format_date};

    #[test]
    fn export_file_name_uses_utc_date() {
        // 2024-03-05T23:59:59Z
        assert_eq!(export_file_name(1_709_683_199_000), "blog-posts-2024-03-05.json");
    }

    #[test]
    fn format_date_has_date_and_time() {
        let text = format_date(1_709_683_199_000);
        assert_eq!(text.len(), "2024-03-05 23:59:59".len());
    }

    #[test]
    fn format_date_falls_back_for_out_of_range() {
        assert_eq!(format_date(i64::MAX), i64::MAX.to_string());
    }
}
