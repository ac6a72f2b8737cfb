use chrono::NaiveDate;

const UTC_MIDNIGHT_FORMAT: &str = "%Y-%m-%dT00:00:00Z";

/// Timestamp for midnight UTC, January 1 of the given year.
///
/// Returns `None` for years outside chrono's supported range.
pub fn january_first_utc(year: i32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.format(UTC_MIDNIGHT_FORMAT).to_string())
}

/// Timestamp for midnight UTC on the given date.
pub fn midnight_utc(date: NaiveDate) -> String {
    date.format(UTC_MIDNIGHT_FORMAT).to_string()
}
