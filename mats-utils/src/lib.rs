//! Shared utility functions for MATS crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};

    /// Date format used by the metadata-derived date pickers: "MM/DD/YYYY HH:mm"
    pub const METADATA_DATE_FORMAT: &str = "%m/%d/%Y %H:%M";

    /// Longest default window offered before the user picks dates.
    pub const DEFAULT_WINDOW_DAYS: i64 = 30;

    const DATE_TIME_FORMATS: [&str; 5] = [
        METADATA_DATE_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

    /// Inclusive range of valid times, in unix seconds (UTC).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DateRangeSecs {
        pub from_seconds: i64,
        pub to_seconds: i64,
    }

    /// Parse a single date in any of the accepted formats, as UTC.
    ///
    /// Accepts RFC 3339, ISO `YYYY-MM-DD[THH:MM[:SS]]`, and the app's
    /// `MM/DD/YYYY HH:mm`. Date-only values mean midnight.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDateTime> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.naive_utc());
        }
        for format in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(dt);
            }
        }
        for format in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(s, format) {
                return Ok(d.and_time(chrono::NaiveTime::MIN));
            }
        }
        anyhow::bail!("unrecognized date '{}'", s)
    }

    /// Parse a `"<start> - <end>"` plot date range into unix seconds.
    pub fn parse_plot_date_range(dates: &str) -> anyhow::Result<DateRangeSecs> {
        let (start, end) = dates
            .split_once(" - ")
            .ok_or_else(|| anyhow::anyhow!("date range '{}' is not '<start> - <end>'", dates))?;
        let from_seconds = parse_date(start)?.and_utc().timestamp();
        let to_seconds = parse_date(end)?.and_utc().timestamp();
        if from_seconds > to_seconds {
            anyhow::bail!("date range '{}' ends before it starts", dates);
        }
        Ok(DateRangeSecs {
            from_seconds,
            to_seconds,
        })
    }

    /// Format unix seconds as "MM/DD/YYYY HH:mm" (UTC).
    pub fn format_metadata_date(seconds: i64) -> anyhow::Result<String> {
        let dt = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| anyhow::anyhow!("timestamp {} out of range", seconds))?;
        Ok(dt.format(METADATA_DATE_FORMAT).to_string())
    }

    /// Clamp a metadata date range to at most [`DEFAULT_WINDOW_DAYS`] ending at `max_date`.
    pub fn default_date_window(min_date: &str, max_date: &str) -> anyhow::Result<(String, String)> {
        let min = NaiveDateTime::parse_from_str(min_date, METADATA_DATE_FORMAT)?;
        let max = NaiveDateTime::parse_from_str(max_date, METADATA_DATE_FORMAT)?;
        if (max - min).num_days() > DEFAULT_WINDOW_DAYS {
            let start = max - TimeDelta::days(DEFAULT_WINDOW_DAYS);
            return Ok((
                start.format(METADATA_DATE_FORMAT).to_string(),
                max_date.to_string(),
            ));
        }
        Ok((min_date.to_string(), max_date.to_string()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_iso_range() {
            let range = parse_plot_date_range("2020-01-01 - 2020-01-02").unwrap();
            assert_eq!(range.from_seconds, 1577836800);
            assert_eq!(range.to_seconds, 1577923200);
        }

        #[test]
        fn test_parse_app_range() {
            let range = parse_plot_date_range("01/01/2020 00:00 - 01/01/2020 12:00").unwrap();
            assert_eq!(range.from_seconds, 1577836800);
            assert_eq!(range.to_seconds, 1577836800 + 12 * 3600);
        }

        #[test]
        fn test_parse_rfc3339_range() {
            let range =
                parse_plot_date_range("2020-01-01T00:00:00Z - 2020-01-01T06:00:00+00:00").unwrap();
            assert_eq!(range.to_seconds - range.from_seconds, 6 * 3600);
        }

        #[test]
        fn test_reversed_and_malformed_ranges() {
            assert!(parse_plot_date_range("2020-02-01 - 2020-01-01").is_err());
            assert!(parse_plot_date_range("2020-01-01").is_err());
            assert!(parse_plot_date_range("yesterday - today").is_err());
        }

        #[test]
        fn test_format_metadata_date() {
            assert_eq!(format_metadata_date(1577836800).unwrap(), "01/01/2020 00:00");
            assert_eq!(format_metadata_date(1577880000).unwrap(), "01/01/2020 12:00");
        }

        #[test]
        fn test_default_date_window() {
            let (min, max) = default_date_window("01/01/2020 00:00", "06/01/2020 00:00").unwrap();
            assert_eq!(min, "05/02/2020 00:00");
            assert_eq!(max, "06/01/2020 00:00");

            let (min, max) = default_date_window("05/20/2020 00:00", "06/01/2020 00:00").unwrap();
            assert_eq!(min, "05/20/2020 00:00");
            assert_eq!(max, "06/01/2020 00:00");
        }
    }
}

/// Metadata column helpers
pub mod lists {
    /// Parse a list column stored as a Python list literal, e.g. `"['P500', 'P850']"`.
    ///
    /// Items are trimmed and stripped of quotes and brackets; empty items are dropped.
    pub fn parse_list_column(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|item| {
                item.trim()
                    .chars()
                    .filter(|c| !matches!(c, '\'' | '[' | ']'))
                    .collect::<String>()
            })
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }

    /// Render values back into the Python list literal form used in the metadata tables.
    pub fn to_list_column(values: &[String]) -> String {
        let items: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
        format!("[{}]", items.join(", "))
    }

    /// Displayed forecast lead for a raw stored lead.
    ///
    /// Some databases store leads as HHMMSS; whole hours stored that way are
    /// shown as plain hours.
    pub fn display_forecast_lead(raw: i64) -> i64 {
        if raw != 0 && raw % 10000 == 0 {
            raw / 10000
        } else {
            raw
        }
    }

}
