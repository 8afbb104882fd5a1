use chrono::NaiveDate;

use super::{Action, AppAggregate, ReduceContext};
use crate::error::ValidationError;
use crate::gateway::{IdGenerator, StateGateway};

/// Current snapshot plus the gateway it is persisted through.
///
/// `dispatch` reduces, swaps in the new snapshot and saves it. A rejected
/// action leaves both the snapshot and storage untouched.
pub struct AppStore<G: StateGateway> {
    gateway: G,
    state: AppAggregate,
}

impl<G: StateGateway> AppStore<G> {
    /// Load through the gateway and re-derive stats for `today`.
    pub fn open(gateway: G, today: NaiveDate) -> Self {
        let state = gateway.load().refreshed(today);
        Self { gateway, state }
    }

    pub fn state(&self) -> &AppAggregate {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn dispatch(
        &mut self,
        action: Action,
        today: NaiveDate,
        ids: &dyn IdGenerator,
    ) -> Result<&AppAggregate, ValidationError> {
        let ctx = ReduceContext { today, ids };
        self.state = self.state.reduce(action, &ctx)?;
        self.gateway.save(&self.state);
        Ok(&self.state)
    }
}
