//! Quick-add template commands for CLI.

use clap::Subcommand;
use dayflow_core::{Action, UuidGenerator};

use super::{join_words, open_store, today};

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List templates with their indices
    List,
    /// Add a template
    Add {
        /// Template text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Remove a template by index
    Remove {
        /// Template index
        index: usize,
    },
}

pub fn run(action: TemplateAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        TemplateAction::List => {
            let templates = &store.state().templates;
            if templates.is_empty() {
                println!("No templates. Use 'template add' to create one.");
            }
            for (index, text) in templates.iter().enumerate() {
                println!("{index:>3}  {text}");
            }
        }
        TemplateAction::Add { text } => {
            let before = store.state().templates.len();
            let state = store.dispatch(
                Action::AddTemplate {
                    text: join_words(&text),
                },
                today(),
                &UuidGenerator,
            )?;
            if state.templates.len() > before {
                println!("Template added.");
            } else {
                println!("Template already exists.");
            }
        }
        TemplateAction::Remove { index } => {
            store.dispatch(Action::RemoveTemplate { index }, today(), &UuidGenerator)?;
            println!("Template removed.");
        }
    }
    Ok(())
}
