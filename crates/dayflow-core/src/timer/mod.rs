mod engine;
mod host;
mod settings;
mod ticker;

pub use engine::{FocusTask, PomodoroPhase, PomodoroState, PomodoroTimer, Transition};
pub use host::TickHost;
pub use settings::{BreakKind, PomodoroSettings};
pub use ticker::{TickHandle, TICK_PERIOD};
