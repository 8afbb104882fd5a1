//! Per-session counts for today against the user's targets.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::Task;
use crate::session::{SessionConfig, SessionId};

/// Target used for a session the user never set one for.
pub const DEFAULT_SESSION_TARGET: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session: SessionId,
    pub name: String,
    pub time_range: String,
    pub count: u32,
    pub target: u32,
    pub target_met: bool,
}

/// Today's task count for every configured session, in configuration order.
pub fn session_breakdown(
    tasks: &[Task],
    sessions: &[SessionConfig],
    targets: &BTreeMap<SessionId, u32>,
    today: NaiveDate,
) -> Vec<SessionSummary> {
    sessions
        .iter()
        .map(|config| {
            let count = tasks
                .iter()
                .filter(|task| task.day == today && task.session == config.id)
                .count() as u32;
            let target = targets
                .get(&config.id)
                .copied()
                .unwrap_or(DEFAULT_SESSION_TARGET);
            SessionSummary {
                session: config.id,
                name: config.name.clone(),
                time_range: config.time_range.clone(),
                count,
                target,
                target_met: count >= target,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::default_sessions;
    use crate::stats::testutil::*;

    #[test]
    fn counts_only_today_per_session() {
        let tasks = vec![
            task_on(today(), SessionId::Morning),
            task_on(today(), SessionId::Morning),
            task_on(today(), SessionId::Night),
            task_on(days_ago(1), SessionId::Morning),
        ];
        let mut targets = BTreeMap::new();
        targets.insert(SessionId::Morning, 2);

        let summary = session_breakdown(&tasks, &default_sessions(), &targets, today());
        assert_eq!(summary.len(), 4);

        assert_eq!(summary[0].session, SessionId::Morning);
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[0].target, 2);
        assert!(summary[0].target_met);

        assert_eq!(summary[1].count, 0);
        assert_eq!(summary[1].target, DEFAULT_SESSION_TARGET);
        assert!(!summary[1].target_met);

        assert_eq!(summary[3].session, SessionId::Night);
        assert_eq!(summary[3].count, 1);
        assert_eq!(summary[3].time_range, "8PM - 5AM");
    }
}
