//! Statistics derived from the task history.
//!
//! Everything here is a pure function of `(tasks, today)`. Results are
//! recomputed after every change to the history and never stored as truth.

mod heatmap;
mod sessions;
mod streak;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::Task;
use crate::session::{SessionConfig, SessionId};

pub use heatmap::{darkest_day, heatmap, rolling_average, today_count, window_start, DayCount, WINDOW_DAYS};
pub use sessions::{session_breakdown, SessionSummary, DEFAULT_SESSION_TARGET};
pub use streak::{current_streak, MAX_STREAK_DAYS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub streak: u32,
    /// Tasks in the trailing window divided by [`WINDOW_DAYS`].
    pub rolling_average: f64,
}

/// Compute the streak and rolling average for `today`.
pub fn compute_stats(tasks: &[Task], today: NaiveDate) -> Stats {
    Stats {
        streak: current_streak(tasks, today),
        rolling_average: rolling_average(tasks, today),
    }
}

/// Everything the stats panel shows, in one serializable bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub day: NaiveDate,
    pub streak: u32,
    pub rolling_average: f64,
    pub today_count: u32,
    pub total_tasks: usize,
    pub darkest_day: DayCount,
    pub heatmap: Vec<DayCount>,
    pub sessions: Vec<SessionSummary>,
}

impl StatsReport {
    pub fn build(
        tasks: &[Task],
        sessions: &[SessionConfig],
        targets: &BTreeMap<SessionId, u32>,
        today: NaiveDate,
    ) -> Self {
        let Stats {
            streak,
            rolling_average,
        } = compute_stats(tasks, today);
        Self {
            day: today,
            streak,
            rolling_average,
            today_count: today_count(tasks, today),
            total_tasks: tasks.len(),
            darkest_day: darkest_day(tasks, today),
            heatmap: heatmap(tasks, today),
            sessions: session_breakdown(tasks, sessions, targets, today),
        }
    }
}

/// Number of tasks logged per calendar day.
pub(crate) fn day_counts(tasks: &[Task]) -> BTreeMap<NaiveDate, u32> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        *counts.entry(task.day).or_insert(0) += 1;
    }
    counts
}
