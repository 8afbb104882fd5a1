//! Pomodoro state machine.
//!
//! The machine counts down in whole seconds and has no clock of its own:
//! the host calls `tick()` once per elapsed second (see [`super::TickHost`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -start-> Focusing <-pause/resume-> FocusingPaused
//! Focusing -0s-> OnBreak <-pause/resume-> OnBreakPaused
//! OnBreak -0s-> Idle
//! any active -stop-> Idle
//! ```
//!
//! Commands that make no sense in the current state are no-ops and still
//! return a snapshot; nothing here fails.
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = PomodoroTimer::new(PomodoroSettings::default());
//! timer.start();
//! // once per second:
//! if let Some(done) = timer.tick().completion() { /* credit done.task_id */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::PomodoroSettings;
use crate::error::ValidationError;
use crate::events::{Event, TaskCompletion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Idle,
    Focusing,
    FocusingPaused,
    OnBreak,
    OnBreakPaused,
}

/// The task a focus segment is credited to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTask {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroState {
    pub is_active: bool,
    pub is_paused: bool,
    pub is_break: bool,
    /// Seconds left in the current segment.
    pub time_left: u32,
    /// Focus segments completed since the machine was created.
    pub sessions_completed: u32,
    pub current_task: Option<FocusTask>,
}

impl PomodoroState {
    pub fn phase(&self) -> PomodoroPhase {
        match (self.is_active, self.is_break, self.is_paused) {
            (false, _, _) => PomodoroPhase::Idle,
            (true, false, false) => PomodoroPhase::Focusing,
            (true, false, true) => PomodoroPhase::FocusingPaused,
            (true, true, false) => PomodoroPhase::OnBreak,
            (true, true, true) => PomodoroPhase::OnBreakPaused,
        }
    }

    /// Whether a tick source should currently be running.
    pub fn is_counting(&self) -> bool {
        self.is_active && !self.is_paused
    }
}

/// Result of a command: the new snapshot plus the event it produced, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PomodoroState,
    pub event: Option<Event>,
}

impl Transition {
    pub fn completion(&self) -> Option<TaskCompletion> {
        self.event.as_ref().and_then(Event::completion)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroTimer {
    settings: PomodoroSettings,
    state: PomodoroState,
}

impl PomodoroTimer {
    /// Create an idle machine with a full focus segment queued.
    pub fn new(settings: PomodoroSettings) -> Self {
        let time_left = settings.work_secs();
        Self {
            settings,
            state: PomodoroState {
                is_active: false,
                is_paused: false,
                is_break: false,
                time_left,
                sessions_completed: 0,
                current_task: None,
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &PomodoroState {
        &self.state
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.state.phase()
    }

    pub fn snapshot(&self) -> PomodoroState {
        self.state.clone()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Transition {
        if self.state.is_active {
            return self.unchanged();
        }
        self.state.is_active = true;
        self.state.is_paused = false;
        self.state.is_break = false;
        self.state.time_left = self.settings.work_secs();
        tracing::debug!(time_left = self.state.time_left, "focus started");
        let event = Event::TimerStarted {
            duration_secs: self.state.time_left,
            task_id: self.current_task_id(),
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// Toggle pause. Calling it twice restores the original state.
    pub fn pause(&mut self) -> Transition {
        if !self.state.is_active {
            return self.unchanged();
        }
        self.state.is_paused = !self.state.is_paused;
        let time_left = self.state.time_left;
        let event = if self.state.is_paused {
            Event::TimerPaused { time_left, at: Utc::now() }
        } else {
            Event::TimerResumed { time_left, at: Utc::now() }
        };
        self.emit(event)
    }

    pub fn resume(&mut self) -> Transition {
        if !(self.state.is_active && self.state.is_paused) {
            return self.unchanged();
        }
        self.state.is_paused = false;
        let event = Event::TimerResumed {
            time_left: self.state.time_left,
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// Advance one second. Reaching zero completes the current segment.
    pub fn tick(&mut self) -> Transition {
        if !self.state.is_counting() {
            return self.unchanged();
        }
        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left == 0 {
            return self.complete();
        }
        self.unchanged()
    }

    /// Go idle. Stopping a break queues a fresh focus segment; stopping
    /// mid-focus leaves the remaining time in place.
    pub fn stop(&mut self) -> Transition {
        if !self.state.is_active {
            return self.unchanged();
        }
        self.state.is_active = false;
        self.state.is_paused = false;
        if self.state.is_break {
            self.state.is_break = false;
            self.state.time_left = self.settings.work_secs();
        }
        let event = Event::TimerStopped {
            time_left: self.state.time_left,
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// Refill the current segment without touching the active/paused flags.
    pub fn reset(&mut self) -> Transition {
        self.state.time_left = if self.state.is_break {
            let kind = self.settings.break_kind(self.state.sessions_completed);
            self.settings.break_secs(kind)
        } else {
            self.settings.work_secs()
        };
        let event = Event::TimerReset {
            time_left: self.state.time_left,
            at: Utc::now(),
        };
        self.emit(event)
    }

    /// Point the machine at a task.
    ///
    /// While idle this replaces any previous task and queues a fresh focus
    /// segment. A running segment with no task adopts the task without
    /// touching the clock; a running segment that already has one is left
    /// alone.
    pub fn attach_task(&mut self, task: FocusTask) -> Transition {
        if self.state.is_active {
            if self.state.current_task.is_some() {
                return self.unchanged();
            }
        } else {
            self.state.time_left = self.settings.work_secs();
            self.state.is_break = false;
        }
        let task_id = task.id.clone();
        self.state.current_task = Some(task);
        self.emit(Event::TaskAttached { task_id, at: Utc::now() })
    }

    /// Store new durations. They only change the visible countdown when the
    /// machine is idle and not on a break; otherwise they apply from the
    /// next transition.
    pub fn apply_settings(&mut self, settings: PomodoroSettings) -> Result<Transition, ValidationError> {
        settings.validate()?;
        self.settings = settings;
        if !self.state.is_active && !self.state.is_break {
            self.state.time_left = self.settings.work_secs();
        }
        let event = Event::SettingsApplied {
            time_left: self.state.time_left,
            at: Utc::now(),
        };
        Ok(self.emit(event))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Transition {
        if self.state.is_break {
            self.state.is_break = false;
            self.state.is_active = false;
            self.state.is_paused = false;
            self.state.time_left = self.settings.work_secs();
            tracing::debug!("break completed");
            return self.emit(Event::BreakCompleted { at: Utc::now() });
        }

        self.state.sessions_completed = self.state.sessions_completed.saturating_add(1);
        let break_kind = self.settings.break_kind(self.state.sessions_completed);
        let break_secs = self.settings.break_secs(break_kind);
        self.state.time_left = break_secs;
        self.state.is_break = true;
        self.state.is_active = true;
        tracing::debug!(
            sessions_completed = self.state.sessions_completed,
            ?break_kind,
            "focus segment completed"
        );
        let event = Event::FocusCompleted {
            task_id: self.current_task_id(),
            focus_minutes: self.settings.work_duration,
            sessions_completed: self.state.sessions_completed,
            break_kind,
            break_secs,
            at: Utc::now(),
        };
        self.emit(event)
    }

    fn current_task_id(&self) -> Option<String> {
        self.state.current_task.as_ref().map(|t| t.id.clone())
    }

    fn emit(&self, event: Event) -> Transition {
        Transition {
            state: self.snapshot(),
            event: Some(event),
        }
    }

    fn unchanged(&self) -> Transition {
        Transition {
            state: self.snapshot(),
            event: None,
        }
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(PomodoroSettings::default())
    }
}
