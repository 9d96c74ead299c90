//! Date/time utilities for Dewdrop.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format a DateTime<Utc> to the specified timezone.
///
/// # Arguments
///
/// * `dt` - DateTime in UTC
/// * `timezone` - Timezone name (e.g., "America/New_York", "UTC")
/// * `format` - Output format string (e.g., "%B %-d, %Y")
///
/// # Returns
///
/// Formatted datetime string. Falls back to UTC if the timezone name
/// does not parse.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => Tz::UTC,
    };
    dt.with_timezone(&tz).format(format).to_string()
}

/// Format a digest date for display in a title (e.g., "September 28, 2025").
pub fn format_digest_date(dt: &DateTime<Utc>, timezone: &str) -> String {
    format_utc_datetime(dt, timezone, "%B %-d, %Y")
}

/// Format a digest date as the ISO calendar date (YYYY-MM-DD) in the
/// given timezone. Used for content fingerprints and file names.
pub fn digest_date_key(dt: &DateTime<Utc>, timezone: &str) -> String {
    format_utc_datetime(dt, timezone, "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_utc_datetime() {
        let dt = Utc.with_ymd_and_hms(2025, 9, 28, 12, 0, 0).unwrap();
        assert_eq!(
            format_utc_datetime(&dt, "UTC", "%Y/%m/%d %H:%M"),
            "2025/09/28 12:00"
        );
    }

    #[test]
    fn test_format_utc_datetime_timezone_shift() {
        // 2025-09-28 02:00 UTC is still 2025-09-27 in New York (EDT, UTC-4)
        let dt = Utc.with_ymd_and_hms(2025, 9, 28, 2, 0, 0).unwrap();
        assert_eq!(
            format_utc_datetime(&dt, "America/New_York", "%Y-%m-%d"),
            "2025-09-27"
        );
    }

    #[test]
    fn test_format_utc_datetime_invalid_timezone_falls_back_to_utc() {
        let dt = Utc.with_ymd_and_hms(2025, 9, 28, 12, 0, 0).unwrap();
        assert_eq!(
            format_utc_datetime(&dt, "Not/AZone", "%Y-%m-%d"),
            "2025-09-28"
        );
    }

    #[test]
    fn test_format_digest_date() {
        let dt = Utc.with_ymd_and_hms(2025, 9, 28, 12, 0, 0).unwrap();
        assert_eq!(format_digest_date(&dt, "UTC"), "September 28, 2025");

        let early = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(format_digest_date(&early, "UTC"), "March 5, 2025");
    }

    #[test]
    fn test_digest_date_key() {
        let dt = Utc.with_ymd_and_hms(2025, 9, 28, 12, 0, 0).unwrap();
        assert_eq!(digest_date_key(&dt, "UTC"), "2025-09-28");
    }
}
