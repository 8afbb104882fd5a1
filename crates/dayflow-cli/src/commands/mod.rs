pub mod config;
pub mod goal;
pub mod session;
pub mod state;
pub mod stats;
pub mod task;
pub mod template;
pub mod timer;

use chrono::{Local, NaiveDate};
use dayflow_core::{AppStore, CoreError, Database};

/// Today's date on the local clock.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn open_store() -> Result<AppStore<Database>, CoreError> {
    Ok(AppStore::open(Database::open_or_memory()?, today()))
}

/// Positional arguments joined back into one line of text.
pub(crate) fn join_words(words: &[String]) -> String {
    words.join(" ")
}
