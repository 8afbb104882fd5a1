//! # Dayflow Core Library
//!
//! Business logic for Dayflow, a personal tracker where short tasks are
//! logged through the day, filed into time-of-day sessions, and optionally
//! worked through with a pomodoro timer. The `dayflow` CLI is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Sessions**: classify an instant into a named hour window, with
//!   windows allowed to run past midnight
//! - **Stats**: streak, 30-day rolling average, heatmap and per-session
//!   counts, all pure functions of the task list
//! - **Timer**: a second-granular pomodoro state machine, plus a tokio host
//!   that owns the cancellable tick source
//! - **App**: the persisted aggregate and the reducer every change goes
//!   through
//! - **Storage**: SQLite key-value storage and TOML configuration
//!
//! ## Key Components
//!
//! - [`classify_session`]: session classifier
//! - [`compute_stats`]: streak and rolling average
//! - [`PomodoroTimer`]: pomodoro state machine
//! - [`AppAggregate`]: application state snapshot and reducer
//! - [`Database`]: default [`StateGateway`] implementation

pub mod app;
pub mod error;
pub mod events;
pub mod gateway;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use app::{Action, AppAggregate, AppStore, ReduceContext, Task};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, TaskCompletion};
pub use gateway::{IdGenerator, MemoryGateway, Notifier, StateGateway, UuidGenerator};
pub use session::{classify_session, default_sessions, SessionConfig, SessionId, FALLBACK_SESSION};
pub use stats::{compute_stats, Stats, StatsReport};
pub use storage::{Config, Database};
pub use timer::{
    BreakKind, FocusTask, PomodoroPhase, PomodoroSettings, PomodoroState, PomodoroTimer, TickHost, Transition,
};
