//! Consecutive-day streak.

use chrono::NaiveDate;

use super::day_counts;
use crate::app::Task;

/// Upper bound on how far back the streak walk goes (about ten years).
pub const MAX_STREAK_DAYS: u32 = 3650;

/// Count consecutive days with at least one task, walking back from `today`.
///
/// An empty `today` is skipped rather than treated as a gap, so a user who
/// has not logged anything yet today still sees yesterday's streak. The walk
/// stops at the first earlier day without tasks.
pub fn current_streak(tasks: &[Task], today: NaiveDate) -> u32 {
    if tasks.is_empty() {
        return 0;
    }

    let counts = day_counts(tasks);
    let mut streak = 0;
    let mut day = today;

    for _ in 0..=MAX_STREAK_DAYS {
        if counts.contains_key(&day) {
            streak += 1;
        } else if day != today {
            break;
        }
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }

    streak.min(MAX_STREAK_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::testutil::*;

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(current_streak(&[], today()), 0);
    }

    #[test]
    fn empty_today_keeps_yesterdays_streak() {
        let tasks = history(&[1, 2]);
        assert_eq!(current_streak(&tasks, today()), 2);
    }

    #[test]
    fn gap_yesterday_stops_after_today() {
        let tasks = history(&[0, 2, 3]);
        assert_eq!(current_streak(&tasks, today()), 1);
    }

    #[test]
    fn gap_two_days_ago_stops_the_walk() {
        let tasks = history(&[0, 1, 3, 4]);
        assert_eq!(current_streak(&tasks, today()), 2);
    }

    #[test]
    fn multiple_tasks_per_day_count_once() {
        let tasks = history(&[0, 0, 0, 1, 1]);
        assert_eq!(current_streak(&tasks, today()), 2);
    }

    #[test]
    fn only_old_history_means_zero() {
        let tasks = history(&[5, 6, 7]);
        assert_eq!(current_streak(&tasks, today()), 0);
    }

    #[test]
    fn future_tasks_do_not_count() {
        let tomorrow = today().succ_opt().unwrap();
        let tasks = vec![task_on(tomorrow, crate::session::SessionId::Morning)];
        assert_eq!(current_streak(&tasks, today()), 0);
    }

    #[test]
    fn streak_is_capped() {
        let offsets: Vec<u64> = (0..4000).collect();
        let tasks = history(&offsets);
        assert_eq!(current_streak(&tasks, today()), MAX_STREAK_DAYS);
    }
}
