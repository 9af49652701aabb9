//! Calendar-date parsing for source-native date strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ParseError;

/// Date-only formats, most common first. `DD.MM.YYYY` is what the scrapers emit.
const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Date + time formats seen from older scrapers and JSON feeds.
const DATETIME_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a scraped date string into a calendar date.
///
/// Any time component is discarded; RFC 3339 timestamps keep the calendar day
/// of their own offset, since that is the day the source reported.
pub fn parse_event_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(ParseError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dotted_date() {
        assert_eq!(parse_event_date("04.01.2026"), Ok(ymd(2026, 1, 4)));
        assert_eq!(parse_event_date(" 4.1.2026 "), Ok(ymd(2026, 1, 4)));
    }

    #[test]
    fn test_other_date_formats() {
        assert_eq!(parse_event_date("04/01/2026"), Ok(ymd(2026, 1, 4)));
        assert_eq!(parse_event_date("2026-01-04"), Ok(ymd(2026, 1, 4)));
        assert_eq!(parse_event_date("04.01.2026 20:45"), Ok(ymd(2026, 1, 4)));
        assert_eq!(parse_event_date("2026-01-04T20:45:00"), Ok(ymd(2026, 1, 4)));
    }

    #[test]
    fn test_rfc3339_keeps_reported_day() {
        assert_eq!(
            parse_event_date("2026-01-04T23:30:00+03:00"),
            Ok(ymd(2026, 1, 4))
        );
        assert_eq!(parse_event_date("2026-01-04T20:00:00Z"), Ok(ymd(2026, 1, 4)));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_event_date(""), Err(ParseError::Empty));
        assert!(matches!(
            parse_event_date("32.01.2026"),
            Err(ParseError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_event_date("tomorrow"),
            Err(ParseError::InvalidDate(_))
        ));
    }
}
