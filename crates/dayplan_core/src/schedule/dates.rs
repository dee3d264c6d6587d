//! Calendar date helpers.
//!
//! Pure functions; nothing here reads stored state. Only `is_today` looks at
//! the clock.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

const DATE_FORMAT: &str = "%Y-%m-%d";

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// True when both values fall on the same calendar date.
///
/// Accepts any `Datelike`; for `DateTime<Local>` this is the local date.
pub fn is_same_day(a: &impl Datelike, b: &impl Datelike) -> bool {
    a.year() == b.year() && a.ordinal() == b.ordinal()
}

/// True when `date` is the current local date.
pub fn is_today(date: &impl Datelike) -> bool {
    is_same_day(date, &Local::now())
}

/// Weekday index with Sunday = 0.
pub fn weekday_number(date: &impl Datelike) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// English long weekday name, e.g. `Monday`.
pub fn day_name(date: &impl Datelike) -> &'static str {
    WEEKDAY_NAMES[weekday_number(date) as usize]
}

/// English long month name, e.g. `January`.
pub fn month_name(date: &impl Datelike) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Heading for a day view, e.g. `Monday, January 15`.
pub fn day_heading(date: &impl Datelike) -> String {
    format!("{}, {} {}", day_name(date), month_name(date), date.day())
}

/// Next date strictly after `from` that falls on `target`.
///
/// When `from` is already a `target` day the result is a full week later,
/// never `from` itself. Returns `None` only past the representable
/// calendar range.
pub fn next_occurrence_of_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let current = from.weekday().num_days_from_sunday();
    let wanted = target.num_days_from_sunday();
    let delta = match (wanted + 7 - current) % 7 {
        0 => 7,
        days => days,
    };
    from.checked_add_days(Days::new(u64::from(delta)))
}

/// Shifts `date` by `days`, saturating at the ends of the calendar.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

pub fn previous_day(date: NaiveDate) -> NaiveDate {
    add_days(date, -1)
}

pub fn next_day(date: NaiveDate) -> NaiveDate {
    add_days(date, 1)
}

/// ISO calendar date string (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD`, ignoring any `T...` time suffix.
pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = value.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
}

/// Truncates a time string to `HH:MM`.
pub fn format_time(value: &str) -> &str {
    value.get(..5).unwrap_or(value)
}
