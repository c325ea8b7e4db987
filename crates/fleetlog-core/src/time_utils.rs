use chrono::{Datelike, Local, NaiveDate};
use tracing::warn;

// ── Year handling ─────────────────────────────────────────────────────────────

/// Calendar year of the local clock.
///
/// Device syslog headers carry no year, so every log date is placed in this
/// year. Logs that cross a year boundary land in the wrong year.
pub fn current_year() -> i32 {
    Local::now().year()
}

// ── Month/day parsing ─────────────────────────────────────────────────────────

/// Parse a `"<month-abbrev> <day>"` string (e.g. `"Oct 15"`, `"oct 5"`) in
/// the given year.
///
/// Returns `None` for anything that is not a real calendar date, including
/// Feb 29 in a non-leap year. Month and day must be separate tokens and the
/// day must be one or two digits, so `"Oct16"` is rejected.
pub fn parse_month_day(date_part: &str, year: i32) -> Option<NaiveDate> {
    let mut tokens = date_part.split_whitespace();
    let (month, day) = (tokens.next()?, tokens.next()?);
    if tokens.next().is_some()
        || day.is_empty()
        || day.len() > 2
        || !day.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{} {} {}", month, day, year), "%b %d %Y").ok()
}

/// Build the cutoff date from its configured components.
///
/// Logs a warning and returns `None` when the month abbreviation or day is
/// invalid.
pub fn cutoff_date(month: &str, day: u32, year: i32) -> Option<NaiveDate> {
    let parsed = parse_month_day(&format!("{} {}", month, day), year);
    if parsed.is_none() {
        warn!("Invalid cutoff date: {} {} {}", month, day, year);
    }
    parsed
}

/// Numeric day component of a date key: `"Oct 15"` → `15`.
pub fn day_of_date_key(date_key: &str) -> Option<u32> {
    date_key.split_whitespace().nth(1)?.parse().ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
