//! The persisted application aggregate and its reducer.
//!
//! An [`AppAggregate`] is an immutable snapshot. Every change goes through
//! [`AppAggregate::reduce`], which builds the next snapshot from the current
//! one plus an [`Action`] and then re-derives the streak and rolling average
//! from the task list.

mod store;
mod task;

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::events::TaskCompletion;
use crate::gateway::IdGenerator;
use crate::session::{default_sessions, SessionConfig, SessionId};
use crate::stats::{compute_stats, StatsReport, DEFAULT_SESSION_TARGET};
use crate::timer::{FocusTask, PomodoroSettings};

pub use store::AppStore;
pub use task::{Task, MAX_TASK_TEXT_LEN};

pub const DEFAULT_MAIN_GOAL: &str = "Focus on what matters most today";

/// Everything persisted between sessions.
///
/// Deserialization never rejects a stored blob wholesale: each top-level
/// field is read on its own and falls back to its default when unreadable,
/// and task entries are kept or dropped one by one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppAggregate {
    /// Task history in insertion order.
    pub tasks: Vec<Task>,
    pub streak: u32,
    pub rolling_average: f64,
    pub last_active: Option<NaiveDate>,
    pub main_goal: String,
    pub sessions: Vec<SessionConfig>,
    pub pomodoro_settings: PomodoroSettings,
    pub templates: Vec<String>,
    pub session_targets: BTreeMap<SessionId, u32>,
}

fn default_main_goal() -> String {
    DEFAULT_MAIN_GOAL.to_string()
}

fn default_templates() -> Vec<String> {
    ["Check email", "Review today's plan", "Exercise", "Read 20 pages"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_session_targets() -> BTreeMap<SessionId, u32> {
    SessionId::ALL
        .into_iter()
        .map(|id| (id, DEFAULT_SESSION_TARGET))
        .collect()
}

impl<'de> Deserialize<'de> for AppAggregate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_json(Value::deserialize(deserializer)?))
    }
}

impl AppAggregate {
    fn from_json(value: Value) -> Self {
        let mut state = Self::default();
        let Value::Object(mut fields) = value else {
            tracing::warn!("stored state is not an object, using defaults");
            return state;
        };

        if let Some(raw) = fields.remove("tasks") {
            state.tasks = lenient_tasks(raw);
        }
        take_field(&mut fields, "streak", &mut state.streak);
        if !take_field(&mut fields, "rollingAverage", &mut state.rolling_average) {
            take_field(&mut fields, "avgTasksPerDay", &mut state.rolling_average);
        }
        take_field(&mut fields, "lastActive", &mut state.last_active);
        take_field(&mut fields, "mainGoal", &mut state.main_goal);
        take_field(&mut fields, "pomodoroSettings", &mut state.pomodoro_settings);
        take_field(&mut fields, "templates", &mut state.templates);
        take_field(&mut fields, "sessionTargets", &mut state.session_targets);

        let mut sessions: Vec<SessionConfig> = Vec::new();
        if take_field(&mut fields, "sessions", &mut sessions) {
            if !sessions.is_empty() && sessions.iter().all(|s| s.validate().is_ok()) {
                state.sessions = sessions;
            } else {
                tracing::warn!("stored sessions are invalid, using defaults");
            }
        }
        state
    }
}

/// Read `key` into `slot`, leaving the default in place when the value is
/// missing or has the wrong shape. Returns whether `slot` was written.
fn take_field<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str, slot: &mut T) -> bool {
    let Some(raw) = fields.remove(key) else {
        return false;
    };
    match serde_json::from_value(raw) {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(e) => {
            tracing::warn!(field = key, error = %e, "unreadable field, using default");
            false
        }
    }
}

/// Keep every task entry that parses and drop the rest, so one damaged
/// entry does not cost the whole history.
fn lenient_tasks(raw: Value) -> Vec<Task> {
    let Value::Array(entries) = raw else {
        tracing::warn!("stored task history is not a list, starting empty");
        return Vec::new();
    };
    let total = entries.len();
    let tasks: Vec<Task> = entries
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::warn!(error = %e, "dropping unreadable task entry");
                None
            }
        })
        .collect();
    if tasks.len() < total {
        tracing::warn!(kept = tasks.len(), total, "task history partially repaired");
    }
    tasks
}

impl Default for AppAggregate {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            streak: 0,
            rolling_average: 0.0,
            last_active: None,
            main_goal: default_main_goal(),
            sessions: default_sessions(),
            pomodoro_settings: PomodoroSettings::default(),
            templates: default_templates(),
            session_targets: default_session_targets(),
        }
    }
}

/// A change to the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Log a task at `at`, in the submitter's local offset.
    AddTask {
        text: String,
        at: DateTime<FixedOffset>,
    },
    /// Remove the task at this position in the history.
    DeleteTask { index: usize },
    RecordFocus(TaskCompletion),
    SetMainGoal { goal: String },
    SetSessions { sessions: Vec<SessionConfig> },
    SetPomodoroSettings { settings: PomodoroSettings },
    AddTemplate { text: String },
    RemoveTemplate { index: usize },
    SetSessionTarget { session: SessionId, target: u32 },
}

/// What the reducer needs from the outside world.
pub struct ReduceContext<'a> {
    pub today: NaiveDate,
    pub ids: &'a dyn IdGenerator,
}

impl AppAggregate {
    /// Build the next snapshot. `self` is left untouched, also on error.
    pub fn reduce(&self, action: Action, ctx: &ReduceContext<'_>) -> Result<AppAggregate, ValidationError> {
        let mut next = self.clone();
        match action {
            Action::AddTask { text, at } => {
                let task = Task::new(ctx.ids.generate(), &text, &at, &next.sessions)?;
                tracing::debug!(id = %task.id, session = %task.session, "task added");
                next.last_active = Some(task.day);
                next.tasks.push(task);
            }
            Action::DeleteTask { index } => {
                check_index("tasks", index, next.tasks.len())?;
                let removed = next.tasks.remove(index);
                tracing::debug!(id = %removed.id, index, "task deleted");
            }
            Action::RecordFocus(completion) => {
                match next.tasks.iter_mut().find(|t| t.id == completion.task_id) {
                    Some(task) => task.record_focus(completion.focus_minutes_added),
                    None => tracing::debug!(id = %completion.task_id, "focus credited to unknown task"),
                }
            }
            Action::SetMainGoal { goal } => {
                let goal = goal.trim();
                next.main_goal = if goal.is_empty() {
                    default_main_goal()
                } else {
                    goal.to_string()
                };
            }
            Action::SetSessions { sessions } => {
                if sessions.is_empty() {
                    return Err(ValidationError::invalid("sessions", "at least one session is required"));
                }
                for session in &sessions {
                    session.validate()?;
                }
                next.sessions = sessions;
            }
            Action::SetPomodoroSettings { settings } => {
                settings.validate()?;
                next.pomodoro_settings = settings;
            }
            Action::AddTemplate { text } => {
                let text = text.trim();
                if !text.is_empty() && !next.templates.iter().any(|t| t == text) {
                    next.templates.push(text.to_string());
                }
            }
            Action::RemoveTemplate { index } => {
                check_index("templates", index, next.templates.len())?;
                next.templates.remove(index);
            }
            Action::SetSessionTarget { session, target } => {
                next.session_targets.insert(session, target);
            }
        }
        Ok(next.refreshed(ctx.today))
    }

    /// Re-derive the streak and rolling average for `today`.
    pub fn refreshed(mut self, today: NaiveDate) -> Self {
        let stats = compute_stats(&self.tasks, today);
        self.streak = stats.streak;
        self.rolling_average = stats.rolling_average;
        self
    }

    /// Today's tasks with their positions in the full history.
    pub fn tasks_on(&self, day: NaiveDate) -> impl Iterator<Item = (usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(move |(_, task)| task.day == day)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// The pomodoro view of a task.
    pub fn focus_task(&self, id: &str) -> Option<FocusTask> {
        self.task(id).map(|task| FocusTask {
            id: task.id.clone(),
            text: task.text.clone(),
        })
    }

    pub fn report(&self, today: NaiveDate) -> StatsReport {
        StatsReport::build(&self.tasks, &self.sessions, &self.session_targets, today)
    }
}

fn check_index(collection: &str, index: usize, len: usize) -> Result<(), ValidationError> {
    if index >= len {
        return Err(ValidationError::OutOfBounds {
            collection: collection.to_string(),
            index,
            len,
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::cell::Cell;

    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

    use crate::gateway::IdGenerator;

    /// Sequential ids: `task-1`, `task-2`, ...
    #[derive(Default)]
    pub struct SeqIds(Cell<u32>);

    impl IdGenerator for SeqIds {
        fn generate(&self) -> String {
            self.0.set(self.0.get() + 1);
            format!("task-{}", self.0.get())
        }
    }

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 10).unwrap()
    }

    pub fn at(day: NaiveDate, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .from_local_datetime(&day.and_hms_opt(hour, 15, 0).unwrap())
            .single()
            .unwrap()
    }
}
