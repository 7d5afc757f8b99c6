//! Local calendar-date helpers
//!
//! Timestamps are stored as UTC instants, but every calendar question (which
//! day, which month) is answered in a caller-supplied time zone. Date keys are
//! built from the local date fields directly and never go through a UTC
//! string, which would shift the day near midnight.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, SubsecRound, TimeZone, Utc};

/// Format used for date keys (`2024-02-29`)
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Current time truncated to whole milliseconds, the resolution records
/// are stored at.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// The calendar date of `ts` as seen in `tz`
pub fn local_date<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Zero-padded `YYYY-MM-DD` key for a date
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `YYYY-MM-DD` key back into a date
pub fn parse_date_key(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
}

/// The instant at which `date` begins in `tz`.
///
/// When local midnight does not exist (a DST gap), the first valid instant
/// after the gap is used.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(ts) = tz.from_local_datetime(&midnight).earliest() {
        return ts.with_timezone(&Utc);
    }

    (1..=3)
        .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
        .find_map(|dt| tz.from_local_datetime(&dt).earliest())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Number of days in a month (`month` is 1-based)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_date_key_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(date_key(date), "2024-03-05");
        assert_eq!(parse_date_key("2024-03-05").unwrap(), date);
        assert!(parse_date_key("2024-3-5x").is_err());
    }

    #[test]
    fn test_local_date_differs_from_utc_near_midnight() {
        // 02:30 UTC on Jan 10 is still Jan 9 in UTC-3
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 2, 30, 0).unwrap();
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(local_date(ts, &brt), NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(local_date(ts, &Utc), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_local_midnight() {
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let ts = local_midnight(date, &brt);
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 9, 3, 0, 0).unwrap());
        assert_eq!(local_date(ts, &brt), date);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }
}
