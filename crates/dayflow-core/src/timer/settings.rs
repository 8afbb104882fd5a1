use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Pomodoro durations, persisted as part of the app aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    /// Focus segment length in minutes.
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_work_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
            sound_enabled: true,
        }
    }
}

/// Which break follows a completed focus segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakKind {
    Short,
    Long,
}

impl PomodoroSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("workDuration", self.work_duration),
            ("shortBreak", self.short_break),
            ("longBreak", self.long_break),
            ("sessionsBeforeLongBreak", self.sessions_before_long_break),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ValidationError::invalid(field, "must be a positive integer"));
            }
        }
        Ok(())
    }

    pub fn work_secs(&self) -> u32 {
        self.work_duration.saturating_mul(60)
    }

    /// Break kind after `sessions_completed` focus segments.
    pub fn break_kind(&self, sessions_completed: u32) -> BreakKind {
        // `max(1)` keeps a hand-edited zero from dividing by zero.
        if sessions_completed % self.sessions_before_long_break.max(1) == 0 {
            BreakKind::Long
        } else {
            BreakKind::Short
        }
    }

    pub fn break_secs(&self, kind: BreakKind) -> u32 {
        let minutes = match kind {
            BreakKind::Short => self.short_break,
            BreakKind::Long => self.long_break,
        };
        minutes.saturating_mul(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let s = PomodoroSettings::default();
        assert_eq!(
            (s.work_duration, s.short_break, s.long_break, s.sessions_before_long_break),
            (25, 5, 15, 4)
        );
        assert!(s.sound_enabled);
        assert_eq!(s.work_secs(), 1500);
    }

    #[test]
    fn every_fourth_session_earns_long_break() {
        let s = PomodoroSettings::default();
        assert_eq!(s.break_kind(1), BreakKind::Short);
        assert_eq!(s.break_kind(3), BreakKind::Short);
        assert_eq!(s.break_kind(4), BreakKind::Long);
        assert_eq!(s.break_kind(8), BreakKind::Long);
        assert_eq!(s.break_secs(BreakKind::Long), 900);
    }

    #[test]
    fn zero_values_are_rejected() {
        let s = PomodoroSettings {
            short_break: 0,
            ..PomodoroSettings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "shortBreak"
        ));
        assert!(PomodoroSettings::default().validate().is_ok());
    }

    #[test]
    fn partial_json_is_back_filled() {
        let s: PomodoroSettings = serde_json::from_str(r#"{"workDuration": 50}"#).unwrap();
        assert_eq!(s.work_duration, 50);
        assert_eq!(s.long_break, 15);
        assert!(s.sound_enabled);
    }
}
