use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp formats tried in order against the date column. Outlook
/// exports vary by locale and client version; the fixed order is the
/// documented tie-break for strings that are valid under both day/month
/// and month/day readings.
const DATE_TIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
];

/// Fallback formats for generic ISO-8601 strings.
const ISO_FALLBACK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses free-text timestamps from the configured date column.
#[derive(Debug, Default)]
pub struct DateParser;

impl DateParser {
    pub fn new() -> Self {
        Self
    }

    /// Tries each known format in order, then a date-only form, then a
    /// generic ISO fallback. Returns None for empty or unparseable input;
    /// downstream treats that as "unknown recency", not an error.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        for format in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(dt);
            }
        }

        // ISO date-only, midnight
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0);
        }

        for format in ISO_FALLBACK_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Some(dt);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_us_twelve_hour_clock() {
        let parser = DateParser::new();
        assert_eq!(
            parser.parse("01/15/2024 10:30:00 AM"),
            Some(ymd_hms(2024, 1, 15, 10, 30, 0))
        );
        assert_eq!(
            parser.parse("01/15/2024 02:30:00 PM"),
            Some(ymd_hms(2024, 1, 15, 14, 30, 0))
        );
    }

    #[test]
    fn ambiguous_day_month_resolves_by_try_order() {
        let parser = DateParser::new();
        // Valid under both readings; month/day 24h is tried before day/month,
        // but "03/04/2024 10:00" has no seconds so %m/%d/%Y %H:%M wins.
        assert_eq!(
            parser.parse("03/04/2024 10:00"),
            Some(ymd_hms(2024, 3, 4, 10, 0, 0))
        );
        // Day > 12 only fits the day/month reading
        assert_eq!(
            parser.parse("25/04/2024 10:00"),
            Some(ymd_hms(2024, 4, 25, 10, 0, 0))
        );
    }

    #[test]
    fn parses_iso_date_time_and_date_only() {
        let parser = DateParser::new();
        assert_eq!(
            parser.parse("2024-01-15 10:00:00"),
            Some(ymd_hms(2024, 1, 15, 10, 0, 0))
        );
        assert_eq!(
            parser.parse("2024-01-15"),
            Some(ymd_hms(2024, 1, 15, 0, 0, 0))
        );
    }

    #[test]
    fn iso_fallback_with_t_separator_and_fraction() {
        let parser = DateParser::new();
        assert_eq!(
            parser.parse("2024-01-15T10:00:00"),
            Some(ymd_hms(2024, 1, 15, 10, 0, 0))
        );
        assert_eq!(
            parser.parse("2024-01-15T10:00:00.123"),
            Some(
                ymd_hms(2024, 1, 15, 10, 0, 0)
                    + chrono::Duration::milliseconds(123)
            )
        );
    }

    #[test]
    fn empty_and_garbage_return_none() {
        let parser = DateParser::new();
        assert_eq!(parser.parse(""), None);
        assert_eq!(parser.parse("   "), None);
        assert_eq!(parser.parse("next tuesday"), None);
        assert_eq!(parser.parse("15/45/2024 10:00"), None);
    }
}
