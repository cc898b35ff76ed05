// src/export/model.rs

use crate::models::schedule::DisplayRow;
use crate::models::supporter::Supporter;
use serde::Serialize;

/// Flat view of a compacted schedule row. Passthrough columns are left out
/// so the CSV header stays stable.
#[derive(Serialize, Clone, Debug)]
pub struct ScheduleExport {
    pub time_range: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub activity: String,
    pub duration_units: i64,
    pub idle: bool,
}

/// Flat view of an active supporter.
#[derive(Serialize, Clone, Debug)]
pub struct SupporterExport {
    pub organization: String,
    pub website: String,
    pub link: String,
    pub contact: String,
    pub contact_from_us: String,
}

impl From<&DisplayRow> for ScheduleExport {
    fn from(r: &DisplayRow) -> Self {
        Self {
            time_range: r.time_range.clone(),
            start: r.start.clone(),
            end: r.end.clone(),
            location: r.location.clone(),
            activity: r.activity.clone(),
            duration_units: r.duration_units,
            idle: r.idle,
        }
    }
}

impl From<&Supporter> for SupporterExport {
    fn from(s: &Supporter) -> Self {
        Self {
            organization: s.organization.clone(),
            website: s.website.clone().unwrap_or_default(),
            link: s.link.clone().unwrap_or_default(),
            contact: s.contact.clone(),
            contact_from_us: s.contact_from_us.clone(),
        }
    }
}
