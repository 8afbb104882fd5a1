//! SQLite key-value storage.
//!
//! The app aggregate and the pomodoro machine are each stored as one JSON
//! blob in the `kv` table. Reads that fail or do not parse fall back to
//! defaults; writes that fail are logged and dropped.

use std::path::Path;

use rusqlite::{params, Connection};

use super::data_dir;
use crate::app::AppAggregate;
use crate::error::{DatabaseError, Result};
use crate::gateway::StateGateway;
use crate::timer::{PomodoroSettings, PomodoroTimer};

/// Key holding the app aggregate.
pub const APP_STATE_KEY: &str = "app_state";
/// Key holding the pomodoro machine between CLI invocations.
pub const TIMER_KEY: &str = "pomodoro";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/dayflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("dayflow.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open the on-disk database, or an in-memory one if the data directory
    /// or the database file cannot be used.
    pub fn open_or_memory() -> Result<Self> {
        Self::or_memory(Self::open())
    }

    fn or_memory(opened: Result<Self>) -> Result<Self> {
        match opened {
            Ok(db) => Ok(db),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to in-memory storage");
                Self::open_memory()
            }
        }
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Raw JSON of the stored aggregate, if any.
    pub fn export_state(&self) -> Result<Option<String>> {
        Ok(self.kv_get(APP_STATE_KEY)?)
    }

    /// The stored pomodoro machine, or a fresh idle one built from `settings`.
    pub fn load_timer(&self, settings: &PomodoroSettings) -> PomodoroTimer {
        match self.read_json::<PomodoroTimer>(TIMER_KEY) {
            Some(timer) => timer,
            None => PomodoroTimer::new(settings.clone()),
        }
    }

    pub fn save_timer(&self, timer: &PomodoroTimer) {
        self.write_json(TIMER_KEY, timer);
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.kv_get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "read failed, using defaults");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value unreadable, using defaults");
                None
            }
        }
    }

    fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(crate::error::CoreError::from)
            .and_then(|json| Ok(self.kv_set(key, &json)?));
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "write failed, change not persisted");
        }
    }
}

impl StateGateway for Database {
    fn load(&self) -> AppAggregate {
        self.read_json(APP_STATE_KEY).unwrap_or_default()
    }

    fn save(&self, state: &AppAggregate) {
        self.write_json(APP_STATE_KEY, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn empty_database_loads_defaults() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.load(), AppAggregate::default());
        assert!(db.export_state().unwrap().is_none());
    }

    #[test]
    fn corrupt_blob_degrades_to_default() {
        let db = Database::open_memory().unwrap();
        db.kv_set(APP_STATE_KEY, "{not json").unwrap();
        assert_eq!(db.load(), AppAggregate::default());

        db.kv_set(TIMER_KEY, "[]").unwrap();
        let timer = db.load_timer(&PomodoroSettings::default());
        assert_eq!(timer, PomodoroTimer::default());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dayflow.db");
        {
            let db = Database::open_at(&path).unwrap();
            let mut state = AppAggregate::default();
            state.main_goal = "finish thesis".into();
            db.save(&state);

            let mut timer = PomodoroTimer::default();
            timer.start();
            timer.tick();
            db.save_timer(&timer);
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.load().main_goal, "finish thesis");
        assert_eq!(db.load_timer(&PomodoroSettings::default()).state().time_left, 1499);
    }

    #[test]
    fn load_timer_uses_settings_when_missing() {
        let db = Database::open_memory().unwrap();
        let settings = PomodoroSettings {
            work_duration: 40,
            ..PomodoroSettings::default()
        };
        assert_eq!(db.load_timer(&settings).state().time_left, 2400);
    }

    #[test]
    fn open_at_bad_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("dayflow.db");
        assert!(Database::open_at(&path).is_err());
    }

    #[test]
    fn unusable_location_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();

        let db = Database::or_memory(Database::open_at(&file.join("dayflow.db"))).unwrap();
        let mut state = AppAggregate::default();
        state.main_goal = "in memory".into();
        db.save(&state);
        assert_eq!(db.load().main_goal, "in memory");
    }

    #[test]
    fn damaged_field_keeps_history_across_dispatch() {
        use crate::app::{Action, AppStore};
        use crate::gateway::UuidGenerator;
        use chrono::NaiveDate;

        let db = Database::open_memory().unwrap();
        db.kv_set(
            APP_STATE_KEY,
            r#"{"tasks": [{"id": "t-1", "text": "keep me", "timestamp": "2026-09-10T07:00:00Z",
                "session": "Morning", "day": "2026-09-10"}],
                "mainGoal": null}"#,
        )
        .unwrap();
        assert_eq!(db.load().tasks.len(), 1);

        let today = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();
        let mut store = AppStore::open(db, today);
        store
            .dispatch(Action::SetMainGoal { goal: "new goal".into() }, today, &UuidGenerator)
            .unwrap();

        let stored = store.gateway().export_state().unwrap().unwrap();
        assert!(stored.contains("keep me"));
        assert_eq!(store.gateway().load().main_goal, "new goal");
    }
}
