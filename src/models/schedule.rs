use crate::utils::time::{RANGE_SEPARATOR, duration_units, format_clock};
use chrono::NaiveTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// One schedule record as read from the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRow {
    pub line: usize, // ⇔ source line in the CSV, for error messages
    pub time_range: String,
    pub location: String,
    pub activity: String,
    pub extra: BTreeMap<String, String>, // ⇔ every unmapped column, verbatim
}

impl RawRow {
    pub fn new(
        line: usize,
        time_range: impl Into<String>,
        location: impl Into<String>,
        activity: impl Into<String>,
    ) -> Self {
        Self {
            line,
            time_range: time_range.into(),
            location: location.into(),
            activity: activity.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Rows without a `-` carry no time range and never reach the output.
    pub fn has_range(&self) -> bool {
        self.time_range.contains('-')
    }
}

/// One row of the compacted schedule, as handed to the templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub time_range: String,
    pub start: String, // "HH:MM"
    pub end: String,   // "HH:MM"
    pub location: String,
    pub activity: String,
    pub duration_units: i64,
    pub idle: bool,
    pub extra: BTreeMap<String, String>,

    #[serde(skip)]
    pub start_label: String,
    #[serde(skip)]
    pub start_time: NaiveTime,
    #[serde(skip)]
    pub end_time: NaiveTime,
}

impl DisplayRow {
    pub fn new(
        raw: &RawRow,
        location: String,
        start_label: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        idle: bool,
    ) -> Self {
        Self {
            time_range: raw.time_range.clone(),
            start: format_clock(start_time),
            end: format_clock(end_time),
            location,
            activity: raw.activity.clone(),
            duration_units: duration_units(start_time, end_time),
            idle,
            extra: raw.extra.clone(),
            start_label: start_label.to_string(),
            start_time,
            end_time,
        }
    }

    /// Stretch this row so it ends where a following idle slot ends.
    /// The displayed range keeps the original start label.
    pub fn extend_to(&mut self, end_label: &str, end_time: NaiveTime) {
        self.time_range = format!("{}{}{}", self.start_label, RANGE_SEPARATOR, end_label);
        self.end = format_clock(end_time);
        self.end_time = end_time;
        self.duration_units = duration_units(self.start_time, end_time);
    }
}
