//! Task management commands for CLI.

use chrono::Local;
use clap::Subcommand;
use dayflow_core::{Action, Config, Notifier, Task, UuidGenerator};
use serde::Serialize;

use super::{join_words, open_store, today};
use crate::bell::TerminalBell;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Log a task at the current time
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List logged tasks with their indices
    List {
        /// Only tasks logged today
        #[arg(long)]
        today: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a task by the index shown in `task list`
    Delete {
        /// Task index
        index: usize,
    },
}

#[derive(Serialize)]
struct ListedTask<'a> {
    index: usize,
    #[serde(flatten)]
    task: &'a Task,
}

fn describe(index: usize, task: &Task) -> String {
    let mut line = format!("{index:>4}  {}  {:<9}  {}", task.day, task.session, task.text);
    if task.focus_minutes > 0 {
        line.push_str(&format!("  [{} min focus]", task.focus_minutes));
    }
    line
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        TaskAction::Add { text } => {
            let state = store.dispatch(
                Action::AddTask {
                    text: join_words(&text),
                    at: Local::now().fixed_offset(),
                },
                today(),
                &UuidGenerator,
            )?;
            let sound = state.pomodoro_settings.sound_enabled;
            if let Some(task) = state.tasks.last() {
                println!("Task added: {} ({})", task.id, task.session);
            }
            TerminalBell::from_config(&Config::load_or_default()).notify(sound);
        }
        TaskAction::List { today: only_today, json } => {
            let state = store.state();
            let listed: Vec<ListedTask<'_>> = if only_today {
                state
                    .tasks_on(today())
                    .map(|(index, task)| ListedTask { index, task })
                    .collect()
            } else {
                state
                    .tasks
                    .iter()
                    .enumerate()
                    .map(|(index, task)| ListedTask { index, task })
                    .collect()
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else if listed.is_empty() {
                println!("No tasks logged.");
            } else {
                for item in &listed {
                    println!("{}", describe(item.index, item.task));
                }
            }
        }
        TaskAction::Delete { index } => {
            let removed = store
                .state()
                .tasks
                .get(index)
                .map(|task| task.text.clone());
            store.dispatch(Action::DeleteTask { index }, today(), &UuidGenerator)?;
            if let Some(text) = removed {
                println!("Task deleted: {text}");
            }
        }
    }
    Ok(())
}
