//! Start-date normalization to the simulator's Gregorian format `DD Mon YYYY HH:MM:SS.mmm`.

use log::warn;
use mission_core::constants::{DEFAULT_EPOCH, DEFAULT_TIME_OF_DAY};
use mission_core::tables::month_abbreviation;

/// Normalize a form start date.
///
/// * `DD/MM/YYYY [HH:MM:SS]` becomes `DD Mon YYYY HH:MM:SS.000` (noon when no time is given).
/// * Anything else containing `:` is assumed to be formatted already and gets `.000` appended
///   unless it already ends with it.
/// * Everything else, and slash dates that cannot be decomposed, yields [`DEFAULT_EPOCH`].
pub fn normalize_epoch(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains('/') {
        return slash_date(raw).unwrap_or_else(|| {
            warn!("unrecognized start date `{raw}`, using {DEFAULT_EPOCH}");
            DEFAULT_EPOCH.to_string()
        });
    }
    if raw.contains(':') {
        return if raw.ends_with(".000") {
            raw.to_string()
        } else {
            format!("{raw}.000")
        };
    }
    DEFAULT_EPOCH.to_string()
}

fn slash_date(raw: &str) -> Option<String> {
    let mut parts = raw.split_whitespace();
    let date = parts.next()?;
    let time = parts.next().unwrap_or(DEFAULT_TIME_OF_DAY);

    let mut fields = date.split('/');
    let (day, month, year) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }
    let month = month_abbreviation(month)?;
    Some(format!("{day} {month} {year} {time}.000"))
}
