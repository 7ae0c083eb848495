// Date resolver
// Total function from a record to a calendar date. Formats are tried in
// order against the date portion of the field; anything unresolvable maps to
// the sentinel, which sorts after every real date in descending order.

use chrono::NaiveDate;
use tracing::warn;

use crate::entities::Record;
use crate::value_objects::EVENT_DATE;

/// ISO first, then day-first, then month-first.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

pub const SENTINEL_DATE: NaiveDate = NaiveDate::MIN;

pub fn resolve_date(record: &Record) -> NaiveDate {
    let Some(raw) = record.lookup_text(&EVENT_DATE) else {
        return SENTINEL_DATE;
    };
    parse_date_text(&raw).unwrap_or_else(|| {
        warn!(value = %raw, "could not parse event date, using sentinel");
        SENTINEL_DATE
    })
}

pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let date_part = date_portion(raw)?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

pub fn is_sentinel(date: NaiveDate) -> bool {
    date == SENTINEL_DATE
}

/// The date as stored: `None` when only the sentinel was resolved.
pub fn storable_date(date: NaiveDate) -> Option<NaiveDate> {
    (!is_sentinel(date)).then_some(date)
}

fn date_portion(raw: &str) -> Option<&str> {
    let first = raw.split_whitespace().next()?;
    // ISO timestamps glue the time on with a `T`
    match first.split_once('T') {
        Some((date, _)) if date.contains('-') => Some(date),
        _ => Some(first),
    }
}
