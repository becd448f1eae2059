//! Calendar helpers.
//!
//! Two clocks are involved and must not be mixed up:
//! - the civil "today" in the configured timezone drives year selection and
//!   gap detection
//! - elapsed UTC time drives the provider's "older than a month" routing

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

/// Days after which a date is served from the yearly archive.
const ARCHIVE_AGE_DAYS: i64 = 31;

/// Today's civil date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Years an incremental run should touch.
///
/// On January 1 and 2 the previous year is included so late year-end data
/// still lands in its own document.
pub fn years_to_update(today: NaiveDate) -> Vec<i32> {
    let y = today.year();
    if today.month() == 1 && today.day() <= 2 {
        vec![y - 1, y]
    } else {
        vec![y]
    }
}

/// Every date of `year` up to `today` inclusive (or through December 31 for
/// past years). Empty for future years.
pub fn year_dates(year: i32, today: NaiveDate) -> Vec<NaiveDate> {
    if year > today.year() {
        return Vec::new();
    }
    let (Some(start), Some(dec31)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Vec::new();
    };
    let end = if year == today.year() { today } else { dec31 };

    start.iter_days().take_while(|d| *d <= end).collect()
}

/// `YYYYMMDD` key used in the document.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y%m%d").ok()
}

/// Whether `date` (taken as UTC midnight) is more than 31 whole days before `now`.
pub fn is_more_than_one_month_old(date: NaiveDate, now: DateTime<Utc>) -> bool {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return false;
    };
    (now - midnight.and_utc()).num_days() > ARCHIVE_AGE_DAYS
}
