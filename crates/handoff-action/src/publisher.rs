//! Agent-side writer for pending actions.
//!
//! The agent is short-lived and has no way to report failure to the user, so
//! [`ActionPublisher::submit`] logs and drops errors. There is no retry.

use std::sync::Arc;

use tracing::{info, warn};

use handoff_core::store::SharedActionStore;
use handoff_core::types::PendingAction;

use crate::codec;
use crate::error::DispatchError;

/// Writes pending actions into the shared store on behalf of the agent.
pub struct ActionPublisher {
    store: Arc<dyn SharedActionStore>,
}

impl ActionPublisher {
    pub fn new(store: Arc<dyn SharedActionStore>) -> Self {
        Self { store }
    }

    /// Validate, encode, and write `action` under its kind's key.
    ///
    /// Overwrites any unconsumed action of the same kind.
    pub fn try_submit(&self, action: &PendingAction) -> Result<(), DispatchError> {
        match action {
            PendingAction::Order(order) => codec::validate_order(order)
                .map_err(|e| DispatchError::InvalidAction(e.to_string()))?,
            PendingAction::Search(search) if search.query.trim().is_empty() => {
                return Err(DispatchError::InvalidAction(
                    "Search query must not be empty".to_string(),
                ));
            }
            _ => {}
        }

        let kind = action.kind();
        let value = codec::encode_action(action)?;
        self.store.write(kind, value)?;
        info!(key = kind.store_key(), "Pending action submitted");
        Ok(())
    }

    /// Like [`try_submit`](Self::try_submit), but a failure only gets logged.
    ///
    /// Returns whether the action reached the store.
    pub fn submit(&self, action: &PendingAction) -> bool {
        match self.try_submit(action) {
            Ok(()) => true,
            Err(e) => {
                warn!(kind = %action.kind(), error = %e, "Pending action dropped");
                false
            }
        }
    }
}
