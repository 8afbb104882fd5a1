//! Trailing 30-day window: rolling average, heatmap and darkest day.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::day_counts;
use crate::app::Task;

/// Length of the trailing window, today included.
pub const WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: u32,
}

/// Oldest day of the window ending at `today`.
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(WINDOW_DAYS - 1)))
        .unwrap_or(NaiveDate::MIN)
}

/// Tasks in the window divided by [`WINDOW_DAYS`].
///
/// The divisor is always the full window, even for a history shorter than
/// 30 days: three days with ten tasks averages 10/30, not 10/3. New users
/// start with a damped average instead of an inflated one.
pub fn rolling_average(tasks: &[Task], today: NaiveDate) -> f64 {
    let start = window_start(today);
    let total = tasks
        .iter()
        .filter(|task| task.day >= start && task.day <= today)
        .count();
    total as f64 / f64::from(WINDOW_DAYS)
}

/// One entry per window day, oldest first.
pub fn heatmap(tasks: &[Task], today: NaiveDate) -> Vec<DayCount> {
    let counts = day_counts(tasks);
    (0..u64::from(WINDOW_DAYS))
        .rev()
        .filter_map(|ago| today.checked_sub_days(Days::new(ago)))
        .map(|day| DayCount {
            day,
            count: counts.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

/// Window day with the fewest tasks; ties go to the oldest day.
pub fn darkest_day(tasks: &[Task], today: NaiveDate) -> DayCount {
    heatmap(tasks, today)
        .into_iter()
        .min_by_key(|entry| entry.count)
        .unwrap_or(DayCount { day: today, count: 0 })
}

pub fn today_count(tasks: &[Task], today: NaiveDate) -> u32 {
    tasks.iter().filter(|task| task.day == today).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::testutil::*;

    #[test]
    fn five_tasks_today_average_over_thirty() {
        let tasks = history(&[0, 0, 0, 0, 0]);
        let avg = rolling_average(&tasks, today());
        assert!((avg - 5.0 / 30.0).abs() < 1e-9);
        assert!((avg - 0.1667).abs() < 1e-4);
    }

    #[test]
    fn short_history_is_damped_by_full_window() {
        let tasks = history(&[0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
        assert!((rolling_average(&tasks, today()) - 10.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn window_includes_day_29_and_excludes_day_30() {
        let tasks = history(&[29, 30]);
        assert!((rolling_average(&tasks, today()) - 1.0 / 30.0).abs() < 1e-9);
        assert_eq!(window_start(today()), days_ago(29));
    }

    #[test]
    fn heatmap_is_oldest_first_and_complete() {
        let tasks = history(&[0, 0, 29, 45]);
        let map = heatmap(&tasks, today());
        assert_eq!(map.len(), 30);
        assert_eq!(map[0], DayCount { day: days_ago(29), count: 1 });
        assert_eq!(map[29], DayCount { day: today(), count: 2 });
        assert_eq!(map.iter().map(|d| d.count).sum::<u32>(), 3);
    }

    #[test]
    fn darkest_day_prefers_oldest_on_tie() {
        let tasks = history(&[0, 1, 2]);
        let darkest = darkest_day(&tasks, today());
        assert_eq!(darkest, DayCount { day: days_ago(29), count: 0 });
    }

    #[test]
    fn darkest_day_with_full_window() {
        let mut offsets: Vec<u64> = (0..30).collect();
        offsets.extend((0..30).filter(|&n| n != 7));
        let tasks = history(&offsets);
        assert_eq!(darkest_day(&tasks, today()), DayCount { day: days_ago(7), count: 1 });
    }

    #[test]
    fn today_count_ignores_other_days() {
        let tasks = history(&[0, 0, 1]);
        assert_eq!(today_count(&tasks, today()), 2);
        assert_eq!(today_count(&[], today()), 0);
    }
}
