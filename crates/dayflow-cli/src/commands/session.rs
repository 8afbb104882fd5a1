use clap::Subcommand;
use dayflow_core::stats::DEFAULT_SESSION_TARGET;
use dayflow_core::{Action, SessionConfig, SessionId, UuidGenerator};

use super::{open_store, today};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List session windows and their daily targets
    List,
    /// Set the daily task target for a session
    Target {
        /// Session name (morning, midday, afternoon, night)
        session: SessionId,
        /// Tasks per day
        target: u32,
    },
    /// Change the hour window of a session
    Set {
        /// Session name (morning, midday, afternoon, night)
        session: SessionId,
        /// First hour, 0-23
        start: u8,
        /// Exclusive end hour; above 24 runs past midnight
        end: u8,
        /// Display label, derived from the hours when omitted
        #[arg(long)]
        label: Option<String>,
    },
}

/// `0` -> "12AM", `13` -> "1PM", `26` -> "2AM".
fn hour_label(hour: u8) -> String {
    match hour % 24 {
        0 => "12AM".to_string(),
        h @ 1..=11 => format!("{h}AM"),
        12 => "12PM".to_string(),
        h => format!("{}PM", h - 12),
    }
}

fn range_label(start: u8, end: u8) -> String {
    format!("{} - {}", hour_label(start), hour_label(end))
}

/// The configured sessions with `updated` swapped in for its id, or
/// appended when that session was not configured.
fn with_session(sessions: &[SessionConfig], updated: SessionConfig) -> Vec<SessionConfig> {
    let mut next = sessions.to_vec();
    match next.iter_mut().find(|s| s.id == updated.id) {
        Some(slot) => *slot = updated,
        None => next.push(updated),
    }
    next
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        SessionAction::List => {
            let state = store.state();
            for session in &state.sessions {
                let target = state
                    .session_targets
                    .get(&session.id)
                    .copied()
                    .unwrap_or(DEFAULT_SESSION_TARGET);
                println!(
                    "{:<9}  {:<11}  {:02}-{:02}  target {target}",
                    session.name, session.time_range, session.start_hour, session.end_hour
                );
            }
        }
        SessionAction::Target { session, target } => {
            store.dispatch(
                Action::SetSessionTarget { session, target },
                today(),
                &UuidGenerator,
            )?;
            println!("{session} target: {target}");
        }
        SessionAction::Set {
            session,
            start,
            end,
            label,
        } => {
            let label = label.unwrap_or_else(|| range_label(start, end));
            let updated = SessionConfig::new(session, &label, start, end);
            let sessions = with_session(&store.state().sessions, updated);
            store.dispatch(Action::SetSessions { sessions }, today(), &UuidGenerator)?;
            println!("{session}: {label}");
        }
    }
    Ok(())
}
