use std::io::Write;

use clap::Subcommand;
use dayflow_core::{
    Action, AppStore, Config, Database, Event, Notifier, PomodoroSettings, PomodoroState, PomodoroTimer,
    TickHost, Transition, UuidGenerator,
};

use super::{open_store, today};
use crate::bell::TerminalBell;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start a focus segment
    Start,
    /// Toggle pause
    Pause,
    /// Resume a paused segment
    Resume,
    /// Stop the timer
    Stop,
    /// Refill the current segment
    Reset,
    /// Credit focus time to a task
    Attach {
        /// Task ID (see `task list --json`)
        task_id: String,
    },
    /// Change pomodoro durations
    Settings {
        /// Focus length in minutes
        #[arg(long)]
        work: Option<u32>,
        /// Short break in minutes
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break in minutes
        #[arg(long)]
        long_break: Option<u32>,
        /// Focus segments before a long break
        #[arg(long)]
        sessions: Option<u32>,
        /// Sound on completion
        #[arg(long)]
        sound: Option<bool>,
    },
    /// Run the timer in the foreground until the segment pair ends or Ctrl-C
    Run,
}

fn print_transition(transition: &Transition) -> Result<(), serde_json::Error> {
    match &transition.event {
        Some(event) => println!("{}", serde_json::to_string_pretty(event)?),
        None => println!("{}", serde_json::to_string_pretty(&transition.state)?),
    }
    Ok(())
}

fn merged_settings(
    current: &PomodoroSettings,
    work: Option<u32>,
    short_break: Option<u32>,
    long_break: Option<u32>,
    sessions: Option<u32>,
    sound: Option<bool>,
) -> PomodoroSettings {
    PomodoroSettings {
        work_duration: work.unwrap_or(current.work_duration),
        short_break: short_break.unwrap_or(current.short_break),
        long_break: long_break.unwrap_or(current.long_break),
        sessions_before_long_break: sessions.unwrap_or(current.sessions_before_long_break),
        sound_enabled: sound.unwrap_or(current.sound_enabled),
    }
}

fn countdown(state: &PomodoroState) -> String {
    let label = if state.is_break { "break" } else { "focus" };
    format!("{label} {:02}:{:02}", state.time_left / 60, state.time_left % 60)
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let mut timer = store.gateway().load_timer(&store.state().pomodoro_settings);

    let transition = match action {
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(timer.state())?);
            return Ok(());
        }
        TimerAction::Start => timer.start(),
        TimerAction::Pause => timer.pause(),
        TimerAction::Resume => timer.resume(),
        TimerAction::Stop => timer.stop(),
        TimerAction::Reset => timer.reset(),
        TimerAction::Attach { task_id } => {
            let task = store
                .state()
                .focus_task(&task_id)
                .ok_or_else(|| format!("task not found: {task_id}"))?;
            timer.attach_task(task)
        }
        TimerAction::Settings {
            work,
            short_break,
            long_break,
            sessions,
            sound,
        } => {
            let settings = merged_settings(
                &store.state().pomodoro_settings,
                work,
                short_break,
                long_break,
                sessions,
                sound,
            );
            store.dispatch(
                Action::SetPomodoroSettings {
                    settings: settings.clone(),
                },
                today(),
                &UuidGenerator,
            )?;
            timer.apply_settings(settings)?
        }
        TimerAction::Run => {
            let config = Config::load_or_default();
            let runtime = tokio::runtime::Runtime::new()?;
            let timer = runtime.block_on(run_foreground(&mut store, timer, &config))?;
            store.gateway().save_timer(&timer);
            return Ok(());
        }
    };

    print_transition(&transition)?;
    store.gateway().save_timer(&timer);
    Ok(())
}

/// Drive the timer from a tick host until it goes idle or Ctrl-C arrives.
///
/// Completed focus segments are credited to the attached task as they
/// happen, so an interrupted run keeps what it finished.
async fn run_foreground(
    store: &mut AppStore<Database>,
    timer: PomodoroTimer,
    config: &Config,
) -> Result<PomodoroTimer, Box<dyn std::error::Error>> {
    let bell = TerminalBell::from_config(config);
    let mut host = TickHost::with_period(timer, config.tick_period());
    if !host.timer().state().is_active {
        print_transition(&host.start())?;
    } else if host.timer().state().is_paused {
        print_transition(&host.resume())?;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            tick = host.next_tick() => {
                let Some(transition) = tick else { break };
                if transition.event.is_none() {
                    eprint!("\r{}  ", countdown(&transition.state));
                    std::io::stderr().flush()?;
                    continue;
                }
                eprintln!();
                print_transition(&transition)?;
                if let Some(completion) = transition.completion() {
                    store.dispatch(Action::RecordFocus(completion), today(), &UuidGenerator)?;
                }
                if transition.event.as_ref().is_some_and(Event::is_segment_end) {
                    bell.notify(host.timer().settings().sound_enabled);
                }
                store.gateway().save_timer(host.timer());
            }
            signal = &mut ctrl_c => {
                signal?;
                eprintln!();
                tracing::info!("interrupted, saving timer");
                break;
            }
        }
    }

    Ok(host.into_timer())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_settings_keeps_unset_fields() {
        let current = PomodoroSettings::default();
        let merged = merged_settings(&current, Some(50), None, Some(20), None, Some(false));
        assert_eq!(merged.work_duration, 50);
        assert_eq!(merged.short_break, current.short_break);
        assert_eq!(merged.long_break, 20);
        assert_eq!(merged.sessions_before_long_break, current.sessions_before_long_break);
        assert!(!merged.sound_enabled);
    }

    #[test]
    fn countdown_formats_minutes_and_seconds() {
        let mut timer = PomodoroTimer::default();
        timer.start();
        timer.tick();
        assert_eq!(countdown(timer.state()), "focus 24:59");
    }
}
