//! Result of resolving a pending-action snapshot to a single action.

use handoff_core::types::{ActionKind, PendingAction};

/// The one action to route, plus every other kind that was pending in the
/// same snapshot and will be dropped by the next `clear()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Highest-precedence pending action, if any.
    pub primary: Option<PendingAction>,
    /// Lower-precedence kinds, highest first.
    pub discarded: Vec<ActionKind>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }

    pub fn primary_kind(&self) -> Option<ActionKind> {
        self.primary.as_ref().map(PendingAction::kind)
    }
}
