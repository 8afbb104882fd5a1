//! Collaborator interfaces the core consumes.
//!
//! The core never touches storage, sound or id generation directly; it
//! goes through these traits so the front-end can plug in its own.

use std::cell::RefCell;

use uuid::Uuid;

use crate::app::AppAggregate;

/// Loads and saves the aggregate application state.
///
/// Neither call may fail: `load` degrades to a default aggregate and `save`
/// logs and swallows errors.
pub trait StateGateway {
    fn load(&self) -> AppAggregate;
    fn save(&self, state: &AppAggregate);
}

/// Optional audible cue on timer completion and task creation.
pub trait Notifier {
    fn notify(&self, sound_enabled: bool);
}

/// Produces unique opaque task identifiers.
pub trait IdGenerator {
    fn generate(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Keeps the aggregate in memory only. Useful for front-ends that manage
/// storage themselves and for tests.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: RefCell<Option<AppAggregate>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppAggregate) -> Self {
        Self {
            state: RefCell::new(Some(state)),
        }
    }

    /// The last saved aggregate, if any.
    pub fn saved(&self) -> Option<AppAggregate> {
        self.state.borrow().clone()
    }
}

impl StateGateway for MemoryGateway {
    fn load(&self) -> AppAggregate {
        self.state.borrow().clone().unwrap_or_default()
    }

    fn save(&self, state: &AppAggregate) {
        *self.state.borrow_mut() = Some(state.clone());
    }
}
