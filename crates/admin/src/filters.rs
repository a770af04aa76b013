//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a number of minutes as `45 min` or `3 hr 15 min`.
///
/// Usage in templates: `{{ cook_time|minutes }}`
#[askama::filter_fn]
pub fn minutes(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    let Ok(total) = raw.parse::<u32>() else {
        return Ok(raw);
    };
    Ok(format_minutes(total))
}

fn format_minutes(total: u32) -> String {
    let (hours, mins) = (total / 60, total % 60);
    match (hours, mins) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} hr"),
        (h, m) => format!("{h} hr {m} min"),
    }
}
