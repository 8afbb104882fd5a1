use clap::Subcommand;
use dayflow_core::{Action, UuidGenerator};

use super::{join_words, open_store, today};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Print the main goal
    Get,
    /// Replace the main goal; an empty goal restores the default
    Set {
        /// Goal text
        text: Vec<String>,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        GoalAction::Get => println!("{}", store.state().main_goal),
        GoalAction::Set { text } => {
            let state = store.dispatch(
                Action::SetMainGoal {
                    goal: join_words(&text),
                },
                today(),
                &UuidGenerator,
            )?;
            println!("Goal: {}", state.main_goal);
        }
    }
    Ok(())
}
