use chrono::NaiveDate;
use log::debug;

/// Accepted textual date layouts, tried in order.
pub const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Fixed month length used by the ceiling rule in [`months_ceil_between`].
pub const DAYS_PER_MONTH: i64 = 30;

/// Parses a date string against [`DATE_FORMATS`].
///
/// Returns `None` for empty input or when no format matches. Never fails.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok());

    if parsed.is_none() {
        debug!("Unparseable date string '{}', treating as absent", raw);
    }

    parsed
}

/// Elapsed days from `start` to `end`.
///
/// `None` when either date is absent or `end` is before `start`.
pub fn days_between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<i64> {
    let (start, end) = (start?, end?);
    if end < start {
        return None;
    }
    Some(end.signed_duration_since(start).num_days())
}

/// Elapsed months rounded up against a fixed 30-day month.
///
/// 0 days is 0 months, 1..=30 days is 1 month, 31..=60 days is 2 months, and so on.
/// Not calendar-aware.
pub fn months_ceil_between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<i64> {
    let days = days_between(start, end)?;
    if days == 0 {
        return Some(0);
    }
    Some((days - 1) / DAYS_PER_MONTH + 1)
}

/// Sort key for chain ordering: absent dates sort after every real date.
pub fn chain_sort_key(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or(NaiveDate::MAX)
}
