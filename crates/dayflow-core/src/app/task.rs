use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::session::{classify_session, SessionConfig, SessionId};

/// Longest accepted task text, in characters.
pub const MAX_TASK_TEXT_LEN: usize = 280;

/// A logged task.
///
/// `session` and `day` are derived once at creation from the submitter's
/// local time and never recomputed, so later edits to the session windows
/// do not re-file history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Histories written before ids existed get a fresh one on load.
    #[serde(default = "fresh_id")]
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionId,
    pub day: NaiveDate,
    /// Focus minutes credited by completed pomodoros.
    #[serde(default)]
    pub focus_minutes: u32,
    #[serde(default)]
    pub pomodoro_completed: bool,
}

impl Task {
    pub fn new<Tz: TimeZone>(
        id: String,
        text: &str,
        at: &DateTime<Tz>,
        sessions: &[SessionConfig],
    ) -> Result<Self, ValidationError> {
        let text = validate_text(text)?;
        Ok(Self {
            id,
            text,
            timestamp: at.with_timezone(&Utc),
            session: classify_session(at, sessions),
            day: at.date_naive(),
            focus_minutes: 0,
            pomodoro_completed: false,
        })
    }

    /// Credit a finished focus segment to this task.
    pub fn record_focus(&mut self, minutes: u32) {
        self.focus_minutes = self.focus_minutes.saturating_add(minutes);
        self.pomodoro_completed = true;
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn validate_text(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::invalid("text", "task text must not be empty"));
    }
    let len = trimmed.chars().count();
    if len > MAX_TASK_TEXT_LEN {
        return Err(ValidationError::invalid(
            "text",
            format!("task text is {len} characters, limit is {MAX_TASK_TEXT_LEN}"),
        ));
    }
    Ok(trimmed.to_string())
}
