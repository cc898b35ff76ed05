//! Schedule compaction: fills forward missing locations and merges
//! consecutive idle slots into a single display row.

use crate::config::ScheduleConfig;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{DisplayRow, RawRow};
use crate::utils::time::{minutes_between, parse_clock, split_range};
use chrono::NaiveTime;

/// How two idle slots are judged to be back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// The next slot must start exactly when the previous one ended.
    Strict,
    /// The next slot may start up to `tolerance_minutes` after the previous
    /// end, never before it.
    Lenient { tolerance_minutes: i64 },
}

impl MergePolicy {
    pub fn from_tolerance(tolerance_minutes: i64) -> Self {
        if tolerance_minutes > 0 {
            MergePolicy::Lenient { tolerance_minutes }
        } else {
            MergePolicy::Strict
        }
    }

    fn adjacent(&self, previous_end: NaiveTime, start: NaiveTime) -> bool {
        match self {
            MergePolicy::Strict => start == previous_end,
            MergePolicy::Lenient { tolerance_minutes } => {
                (0..=*tolerance_minutes).contains(&minutes_between(previous_end, start))
            }
        }
    }
}

pub struct ScheduleCompactor {
    free_label: String,
    policy: MergePolicy,
}

/// Running state of one compaction pass.
#[derive(Default)]
struct Compaction {
    last_location: String,
    last_end: Option<NaiveTime>,
    rows: Vec<DisplayRow>,
}

impl ScheduleCompactor {
    pub fn new(free_label: impl Into<String>) -> Self {
        Self {
            free_label: free_label.into(),
            policy: MergePolicy::Strict,
        }
    }

    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn from_config(cfg: &ScheduleConfig) -> Self {
        Self::new(cfg.free_label.clone())
            .with_policy(MergePolicy::from_tolerance(cfg.merge_tolerance_minutes))
    }

    /// Compact `rows` in one pass. Fails on the first malformed time range;
    /// nothing is returned for a failed pass.
    pub fn compact(&self, rows: &[RawRow]) -> AppResult<Vec<DisplayRow>> {
        let state = rows
            .iter()
            .try_fold(Compaction::default(), |mut state, row| {
                self.step(&mut state, row)?;
                Ok::<_, AppError>(state)
            })?;
        Ok(state.rows)
    }

    fn step(&self, state: &mut Compaction, row: &RawRow) -> AppResult<()> {
        if !row.has_range() {
            return Ok(());
        }

        let invalid = || AppError::InvalidTimeRange {
            row: row.line,
            value: row.time_range.clone(),
        };
        let (start_label, end_label) = split_range(&row.time_range).ok_or_else(invalid)?;
        let start = parse_clock(start_label).ok_or_else(invalid)?;
        let end = parse_clock(end_label).ok_or_else(invalid)?;

        let location = if row.location.is_empty() && !state.last_location.is_empty() {
            state.last_location.clone()
        } else {
            row.location.clone()
        };
        state.last_location = location.clone();

        let idle = row.activity == self.free_label;

        let merged = if idle
            && let Some(previous) = state.rows.last_mut()
            && previous.idle
            && let Some(previous_end) = state.last_end
            && self.policy.adjacent(previous_end, start)
        {
            previous.extend_to(end_label, end);
            true
        } else {
            false
        };

        if !merged {
            state
                .rows
                .push(DisplayRow::new(row, location, start_label, start, end, idle));
        }

        state.last_end = Some(end);
        Ok(())
    }
}
