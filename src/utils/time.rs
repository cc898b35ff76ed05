//! Time utilities: parsing clock labels, splitting ranges, 5-minute ticks.

use chrono::NaiveTime;

/// Separator between the two ends of a schedule range ("09.00 - 09.30").
pub const RANGE_SEPARATOR: &str = " - ";

/// Length of one duration unit, in minutes.
pub const TICK_MINUTES: i64 = 5;

/// Parse a clock label written either as `HH.MM` or `HH:MM`.
pub fn parse_clock(t: &str) -> Option<NaiveTime> {
    let normalized = t.trim().replace('.', ":");
    NaiveTime::parse_from_str(&normalized, "%H:%M").ok()
}

/// Split a range label into its start and end labels.
/// Returns None when the separator is missing or appears more than once.
pub fn split_range(range: &str) -> Option<(&str, &str)> {
    let (start, end) = range.split_once(RANGE_SEPARATOR)?;
    if end.contains(RANGE_SEPARATOR) {
        return None;
    }
    Some((start.trim(), end.trim()))
}

pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    let duration = end - start;
    duration.num_minutes()
}

/// Number of whole 5-minute ticks between `start` and `end` (floor division).
pub fn duration_units(start: NaiveTime, end: NaiveTime) -> i64 {
    minutes_between(start, end).div_euclid(TICK_MINUTES)
}

pub fn format_clock(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}
