use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::AppError;

/// Date-time layouts accepted in the timestamp column, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts, read as midnight
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Slash layouts with the year last, month first (01/02/2024 is January 2nd)
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];
const MONTH_FIRST_DATE: &str = "%m/%d/%Y";

/// Same layouts read day first (01/02/2024 is February 1st)
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];
const DAY_FIRST_DATE: &str = "%d/%m/%Y";

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    let s = s.trim();
    // Try YYYYMMDD
    if s.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: s.to_string(),
    })
}

/// Parse a reading timestamp, `None` when no known layout matches.
///
/// Offsets are dropped after conversion: the wall-clock time of the meter is what gets bucketed.
/// `DD/MM/YYYY` is only read when `day_first` is set; otherwise slash dates are `MM/DD/YYYY`.
pub(crate) fn parse_timestamp(s: &str, day_first: bool) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    let (slash_formats, slash_date) = if day_first {
        (DAY_FIRST_FORMATS, DAY_FIRST_DATE)
    } else {
        (MONTH_FIRST_FORMATS, MONTH_FIRST_DATE)
    };
    DATETIME_FORMATS
        .iter()
        .chain(slash_formats)
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .chain(std::iter::once(&slash_date))
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ymd_hm(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parse_date_compact_and_dashed() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("20240115").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date(" 2024-01-15 ").unwrap(), expected);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let err = parse_date("15/01/2024").unwrap_err();
        assert!(err.to_string().contains("15/01/2024"));
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn parse_timestamp_iso_variants() {
        let expected = ymd_hm(2024, 1, 1, 13, 30);
        assert_eq!(parse_timestamp("2024-01-01 13:30:00", false), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 13:30", false), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T13:30:00", false), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T13:30", false), Some(expected));
        assert_eq!(parse_timestamp("2024/01/01 13:30", false), Some(expected));
    }

    #[test]
    fn parse_timestamp_fractional_seconds() {
        let parsed = parse_timestamp("2024-01-01 13:30:00.250", false).unwrap();
        assert_eq!(parsed.hour(), 13);
        assert_eq!(parsed.nanosecond(), 250_000_000);
    }

    #[test]
    fn parse_timestamp_keeps_wall_clock_of_offset() {
        let parsed = parse_timestamp("2024-01-01T23:15:00-03:00", false).unwrap();
        assert_eq!(parsed, ymd_hm(2024, 1, 1, 23, 15));
    }

    #[test]
    fn parse_timestamp_slash_dates_are_month_first() {
        assert_eq!(
            parse_timestamp("01/02/2024 10:00", false),
            Some(ymd_hm(2024, 1, 2, 10, 0))
        );
        assert_eq!(
            parse_timestamp("12/31/2024", false),
            Some(ymd_hm(2024, 12, 31, 0, 0))
        );
        assert_eq!(parse_timestamp("31/01/2024 08:00", false), None);
    }

    #[test]
    fn parse_timestamp_day_first() {
        assert_eq!(
            parse_timestamp("01/02/2024 10:00", true),
            Some(ymd_hm(2024, 2, 1, 10, 0))
        );
        assert_eq!(
            parse_timestamp("31/01/2024 08:00:30", true).map(|t| t.date()),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
        assert_eq!(
            parse_timestamp("31/01/2024", true),
            Some(ymd_hm(2024, 1, 31, 0, 0))
        );
        // ISO layouts do not depend on the flag
        assert_eq!(
            parse_timestamp("2024-01-02 10:00", true),
            Some(ymd_hm(2024, 1, 2, 10, 0))
        );
    }

    #[test]
    fn parse_timestamp_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2024-01-02", false), Some(ymd_hm(2024, 1, 2, 0, 0)));
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-date", false), None);
        assert_eq!(parse_timestamp("", false), None);
        assert_eq!(parse_timestamp("2024-13-01 10:00", false), None);
        assert_eq!(parse_timestamp("2024-01-01 25:00", false), None);
    }
}
