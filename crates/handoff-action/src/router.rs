//! Seam between the dispatcher and in-app navigation.

use handoff_core::types::PendingAction;

/// Opens the UI surface for a resolved action.
///
/// Implemented by the host. Receives exactly one action per handoff cycle, and
/// only well-formed ones: orders always carry a non-blank item and restaurant
/// and a quantity of at least 1; searches carry a non-empty query.
pub trait ActionRouter {
    fn route(&mut self, action: &PendingAction);
}

impl<F> ActionRouter for F
where
    F: FnMut(&PendingAction),
{
    fn route(&mut self, action: &PendingAction) {
        self(action)
    }
}
