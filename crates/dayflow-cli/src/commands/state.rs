use clap::Subcommand;
use dayflow_core::Database;

#[derive(Subcommand)]
pub enum StateAction {
    /// Print the stored app state as JSON
    Export,
}

pub fn run(action: StateAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_or_memory()?;

    match action {
        StateAction::Export => match db.export_state()? {
            Some(json) => match serde_json::from_str::<serde_json::Value>(&json) {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                // Damaged blobs are exported verbatim so they can be inspected.
                Err(_) => println!("{json}"),
            },
            None => println!("{{}}"),
        },
    }
    Ok(())
}
