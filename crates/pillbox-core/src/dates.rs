//! Conversions between the canonical storage form (`YYYY-MM-DD`) and the
//! display form (`DD/MM/YYYY`).
//!
//! Both directions are lenient: input that does not parse is returned as-is.

use chrono::NaiveDate;

pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// `2024-01-05` -> `05/01/2024`. Anything else passes through unchanged.
pub fn to_display(canonical: &str) -> String {
    match NaiveDate::parse_from_str(canonical, CANONICAL_FORMAT) {
        Ok(date) => date.format(DISPLAY_FORMAT).to_string(),
        Err(_) => canonical.to_string(),
    }
}

/// Normalise operator input to canonical form.
///
/// Accepts either canonical or display form; unparseable input is stored
/// exactly as typed.
pub fn to_canonical(input: &str) -> String {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, CANONICAL_FORMAT) {
        return date.format(CANONICAL_FORMAT).to_string();
    }
    match NaiveDate::parse_from_str(trimmed, DISPLAY_FORMAT) {
        Ok(date) => date.format(CANONICAL_FORMAT).to_string(),
        Err(_) => input.to_string(),
    }
}

/// Today's local date in canonical form.
pub fn today_canonical() -> String {
    chrono::Local::now()
        .date_naive()
        .format(CANONICAL_FORMAT)
        .to_string()
}
