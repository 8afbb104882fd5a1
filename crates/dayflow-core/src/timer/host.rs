//! Owner of a running pomodoro: the machine plus its tick source.
//!
//! Every command rearms the ticker: a fresh [`TickHandle`] and channel when
//! the machine is counting, none otherwise. Ticks queued by a cancelled
//! ticker die with its channel and never reach the machine.

use std::time::Duration;

use tokio::sync::mpsc;

use super::engine::{FocusTask, PomodoroTimer, Transition};
use super::settings::PomodoroSettings;
use super::ticker::{TickHandle, TICK_PERIOD};
use crate::error::ValidationError;

#[derive(Debug)]
struct Armed {
    // Held for its Drop; aborting the task closes `rx`.
    _handle: TickHandle,
    rx: mpsc::Receiver<()>,
}

/// Drives a [`PomodoroTimer`] from a tokio tick task.
///
/// Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct TickHost {
    timer: PomodoroTimer,
    period: Duration,
    ticker: Option<Armed>,
}

impl TickHost {
    pub fn new(timer: PomodoroTimer) -> Self {
        Self::with_period(timer, TICK_PERIOD)
    }

    pub fn with_period(timer: PomodoroTimer, period: Duration) -> Self {
        let mut host = Self {
            timer,
            period,
            ticker: None,
        };
        host.rearm();
        host
    }

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    pub fn is_armed(&self) -> bool {
        self.ticker.is_some()
    }

    /// Run a command against the machine, then rearm the ticker.
    pub fn apply<F>(&mut self, command: F) -> Transition
    where
        F: FnOnce(&mut PomodoroTimer) -> Transition,
    {
        let transition = command(&mut self.timer);
        self.rearm();
        transition
    }

    pub fn start(&mut self) -> Transition {
        self.apply(PomodoroTimer::start)
    }

    pub fn pause(&mut self) -> Transition {
        self.apply(PomodoroTimer::pause)
    }

    pub fn resume(&mut self) -> Transition {
        self.apply(PomodoroTimer::resume)
    }

    pub fn stop(&mut self) -> Transition {
        self.apply(PomodoroTimer::stop)
    }

    pub fn reset(&mut self) -> Transition {
        self.apply(PomodoroTimer::reset)
    }

    pub fn attach_task(&mut self, task: FocusTask) -> Transition {
        self.apply(|timer| timer.attach_task(task))
    }

    pub fn apply_settings(&mut self, settings: PomodoroSettings) -> Result<Transition, ValidationError> {
        let transition = self.timer.apply_settings(settings)?;
        self.rearm();
        Ok(transition)
    }

    /// Wait for the next tick and apply it.
    ///
    /// Returns `None` straight away when the machine is not counting.
    pub async fn next_tick(&mut self) -> Option<Transition> {
        let armed = self.ticker.as_mut()?;
        armed.rx.recv().await?;
        let transition = self.timer.tick();
        if !self.timer.state().is_counting() {
            self.ticker = None;
        }
        Some(transition)
    }

    /// Cancel the ticker and hand back the machine.
    pub fn into_timer(self) -> PomodoroTimer {
        let Self { timer, ticker, .. } = self;
        drop(ticker);
        timer
    }

    fn rearm(&mut self) {
        self.ticker = None;
        if self.timer.state().is_counting() {
            let (tx, rx) = mpsc::channel(1);
            self.ticker = Some(Armed {
                _handle: TickHandle::spawn(self.period, tx),
                rx,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::timer::PomodoroPhase;

    fn quick_settings() -> PomodoroSettings {
        PomodoroSettings {
            work_duration: 1,
            short_break: 1,
            long_break: 2,
            sessions_before_long_break: 2,
            sound_enabled: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_host_is_not_armed() {
        let mut host = TickHost::new(PomodoroTimer::default());
        assert!(!host.is_armed());
        assert!(host.next_tick().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn runs_focus_then_break_then_disarms() {
        let mut host = TickHost::new(PomodoroTimer::new(quick_settings()));
        host.attach_task(FocusTask {
            id: "t-9".into(),
            text: "write tests".into(),
        });
        host.start();
        assert!(host.is_armed());

        let mut events = Vec::new();
        let mut ticks = 0;
        while let Some(transition) = host.next_tick().await {
            ticks += 1;
            if let Some(event) = transition.event {
                events.push(event);
            }
        }

        assert_eq!(ticks, 120);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            Event::FocusCompleted { task_id: Some(id), focus_minutes: 1, .. } if id == "t-9"
        ));
        assert!(matches!(events[1], Event::BreakCompleted { .. }));
        assert_eq!(host.timer().phase(), PomodoroPhase::Idle);
        assert!(!host.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_cancels_and_resume_rearms() {
        let mut host = TickHost::new(PomodoroTimer::default());
        host.start();
        host.next_tick().await.unwrap();
        assert_eq!(host.timer().state().time_left, 1499);

        host.pause();
        assert!(!host.is_armed());
        assert!(host.next_tick().await.is_none());

        host.resume();
        assert!(host.is_armed());
        host.next_tick().await.unwrap();
        assert_eq!(host.timer().state().time_left, 1498);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_ticker() {
        let mut host = TickHost::new(PomodoroTimer::default());
        host.start();
        host.stop();
        assert!(!host.is_armed());
        let timer = host.into_timer();
        assert_eq!(timer.phase(), PomodoroPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn restored_running_timer_arms_on_creation() {
        let mut timer = PomodoroTimer::default();
        timer.start();
        let mut host = TickHost::with_period(timer, Duration::from_millis(5));
        assert!(host.is_armed());
        host.next_tick().await.unwrap();
        assert_eq!(host.into_timer().state().time_left, 1499);
    }
}
