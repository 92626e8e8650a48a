//! Date helpers for list filters, file names and exports.

use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::server::error::Error;

/// Half-open `[start, end)` range of stored UTC timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Parses a `YYYY-MM-DD_YYYY-MM-DD` filter value.
///
/// Both dates are local calendar days and the end date is inclusive, so the returned range runs
/// from local midnight of the first day to local midnight after the last one, in UTC.
pub fn parse_date_range(value: &str) -> Result<DateRange, Error> {
    let invalid = || Error::Validation(format!("invalid date range {}", value));

    let (start, end) = value.split_once('_').ok_or_else(invalid)?;
    let start = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
    let end = NaiveDate::parse_from_str(end.trim(), "%Y-%m-%d").map_err(|_| invalid())?;

    if end < start {
        return Err(invalid());
    }

    let midnight_utc = |day: NaiveDate| {
        day.and_hms_opt(0, 0, 0)
            .and_then(|midnight| local_offset().from_local_datetime(&midnight).single())
            .map(|midnight| midnight.naive_utc())
            .ok_or_else(invalid)
    };

    Ok(DateRange {
        start: midnight_utc(start)?,
        end: midnight_utc(end + Duration::days(1))?,
    })
}

/// Suffix appended to uploaded file names, e.g. `20240115093000`
pub fn file_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

/// Date prefix of export file names, e.g. `20240115`
pub fn export_date(now: NaiveDateTime) -> String {
    now.format("%Y%m%d").to_string()
}

/// Offset of the operating site's local time (WIB) from UTC
const LOCAL_OFFSET_SECS: i32 = 7 * 3600;

fn local_offset() -> FixedOffset {
    FixedOffset::east_opt(LOCAL_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

const DAY_NAMES: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];
const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Converts a stored UTC timestamp to local time
pub fn to_local(utc: NaiveDateTime) -> NaiveDateTime {
    local_offset().from_utc_datetime(&utc).naive_local()
}

/// Indonesian long date, e.g. `Senin, 15 Januari 2024`
pub fn indonesian_date(value: NaiveDateTime) -> String {
    let day = DAY_NAMES[value.weekday().num_days_from_monday() as usize];
    let month = MONTH_NAMES[value.month0() as usize];

    format!("{}, {} {} {}", day, value.day(), month, value.year())
}

/// Indonesian long form used in reports, e.g. `Senin, 15 Januari 2024 09:30`
pub fn indonesian_datetime(value: NaiveDateTime) -> String {
    format!("{} {}", indonesian_date(value), value.format("%H:%M"))
}
