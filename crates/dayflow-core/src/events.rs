use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::BreakKind;

/// Every pomodoro state change produces an Event.
/// The CLI prints them; the aggregate consumes `FocusCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        duration_secs: u32,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        time_left: u32,
        at: DateTime<Utc>,
    },
    /// A focus segment ran to zero; the break has started.
    FocusCompleted {
        task_id: Option<String>,
        focus_minutes: u32,
        sessions_completed: u32,
        break_kind: BreakKind,
        break_secs: u32,
        at: DateTime<Utc>,
    },
    /// A break ran to zero; the timer is idle again.
    BreakCompleted {
        at: DateTime<Utc>,
    },
    TimerStopped {
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        time_left: u32,
        at: DateTime<Utc>,
    },
    TaskAttached {
        task_id: String,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        time_left: u32,
        at: DateTime<Utc>,
    },
}

/// Focus time to credit to a task after a completed work segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub task_id: String,
    pub focus_minutes_added: u32,
}

impl Event {
    /// The task-completion payload, if this event carries one.
    pub fn completion(&self) -> Option<TaskCompletion> {
        match self {
            Event::FocusCompleted {
                task_id: Some(task_id),
                focus_minutes,
                ..
            } => Some(TaskCompletion {
                task_id: task_id.clone(),
                focus_minutes_added: *focus_minutes,
            }),
            _ => None,
        }
    }

    /// Whether the audible cue should fire for this event.
    pub fn is_segment_end(&self) -> bool {
        matches!(self, Event::FocusCompleted { .. } | Event::BreakCompleted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_requires_a_task() {
        let with_task = Event::FocusCompleted {
            task_id: Some("t-1".into()),
            focus_minutes: 25,
            sessions_completed: 1,
            break_kind: BreakKind::Short,
            break_secs: 300,
            at: Utc::now(),
        };
        assert_eq!(
            with_task.completion(),
            Some(TaskCompletion {
                task_id: "t-1".into(),
                focus_minutes_added: 25
            })
        );

        let without = Event::FocusCompleted {
            task_id: None,
            focus_minutes: 25,
            sessions_completed: 1,
            break_kind: BreakKind::Short,
            break_secs: 300,
            at: Utc::now(),
        };
        assert_eq!(without.completion(), None);
        assert!(without.is_segment_end());
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::BreakCompleted { at: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "break_completed");
    }
}
