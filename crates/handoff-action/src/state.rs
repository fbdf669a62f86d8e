//! In-memory snapshot of what the last `check()` found in the store.

use handoff_core::types::{ActionKind, OrderRequest, PendingAction, SearchRequest};

use crate::resolution::Resolution;

/// Which kinds are pending and their decoded payloads.
///
/// Holds at most one entry per kind, mirroring the one-key-per-kind layout of
/// the shared store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingActionState {
    order: Option<OrderRequest>,
    search: Option<SearchRequest>,
    reorder: bool,
    check_status: bool,
}

impl PendingActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decoded action, replacing any earlier one of the same kind.
    pub fn insert(&mut self, action: PendingAction) {
        match action {
            PendingAction::Order(order) => self.order = Some(order),
            PendingAction::Search(search) => self.search = Some(search),
            PendingAction::Reorder => self.reorder = true,
            PendingAction::CheckStatus => self.check_status = true,
        }
    }

    pub fn has_pending_action(&self) -> bool {
        self.order.is_some() || self.search.is_some() || self.reorder || self.check_status
    }

    pub fn pending_order(&self) -> Option<&OrderRequest> {
        self.order.as_ref()
    }

    pub fn pending_search(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.query.as_str())
    }

    pub fn pending_reorder(&self) -> bool {
        self.reorder
    }

    pub fn pending_check_status(&self) -> bool {
        self.check_status
    }

    pub fn is_pending(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Order => self.order.is_some(),
            ActionKind::Search => self.search.is_some(),
            ActionKind::Reorder => self.reorder,
            ActionKind::CheckStatus => self.check_status,
        }
    }

    /// Pending kinds in precedence order, highest first.
    pub fn pending_kinds(&self) -> Vec<ActionKind> {
        ActionKind::PRECEDENCE
            .into_iter()
            .filter(|kind| self.is_pending(*kind))
            .collect()
    }

    /// Pick the single action to route.
    ///
    /// Order beats search, search beats check-status, check-status beats
    /// reorder. Everything below the winner is listed as discarded.
    pub fn resolve(&self) -> Resolution {
        let mut kinds = self.pending_kinds().into_iter();
        let Some(winner) = kinds.next() else {
            return Resolution::default();
        };
        Resolution {
            primary: self.action(winner),
            discarded: kinds.collect(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn action(&self, kind: ActionKind) -> Option<PendingAction> {
        match kind {
            ActionKind::Order => self.order.clone().map(PendingAction::Order),
            ActionKind::Search => self.search.clone().map(PendingAction::Search),
            ActionKind::Reorder => self.reorder.then_some(PendingAction::Reorder),
            ActionKind::CheckStatus => self.check_status.then_some(PendingAction::CheckStatus),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> PendingAction {
        PendingAction::Order(OrderRequest::new("Burger", "Joe's Diner", 2))
    }

    fn search(query: &str) -> PendingAction {
        PendingAction::Search(SearchRequest {
            query: query.to_string(),
        })
    }

    #[test]
    fn test_empty_state() {
        let state = PendingActionState::new();
        assert!(!state.has_pending_action());
        assert!(state.pending_kinds().is_empty());
        assert_eq!(state.resolve(), Resolution::default());
        assert!(state.resolve().is_empty());
    }

    #[test]
    fn test_accessors() {
        let mut state = PendingActionState::new();
        state.insert(order());
        state.insert(search("pizza"));
        state.insert(PendingAction::Reorder);

        assert!(state.has_pending_action());
        assert_eq!(state.pending_order().unwrap().food_item, "Burger");
        assert_eq!(state.pending_search(), Some("pizza"));
        assert!(state.pending_reorder());
        assert!(!state.pending_check_status());
    }

    #[test]
    fn test_order_beats_check_status() {
        let mut state = PendingActionState::new();
        state.insert(PendingAction::CheckStatus);
        state.insert(order());

        let resolution = state.resolve();
        assert_eq!(resolution.primary, Some(order()));
        assert_eq!(resolution.discarded, vec![ActionKind::CheckStatus]);
    }

    #[test]
    fn test_check_status_beats_reorder() {
        let mut state = PendingActionState::new();
        state.insert(PendingAction::Reorder);
        state.insert(PendingAction::CheckStatus);

        let resolution = state.resolve();
        assert_eq!(resolution.primary, Some(PendingAction::CheckStatus));
        assert_eq!(resolution.discarded, vec![ActionKind::Reorder]);
    }

    #[test]
    fn test_full_precedence_chain() {
        let mut state = PendingActionState::new();
        state.insert(PendingAction::Reorder);
        state.insert(PendingAction::CheckStatus);
        state.insert(search("tacos"));
        state.insert(order());

        let resolution = state.resolve();
        assert_eq!(resolution.primary_kind(), Some(ActionKind::Order));
        assert_eq!(
            resolution.discarded,
            vec![
                ActionKind::Search,
                ActionKind::CheckStatus,
                ActionKind::Reorder
            ]
        );
    }

    #[test]
    fn test_only_search_pending() {
        let mut state = PendingActionState::new();
        state.insert(search("pizza"));

        assert_eq!(state.pending_search(), Some("pizza"));
        assert!(state.pending_order().is_none());
        assert!(!state.pending_reorder());
        assert!(!state.pending_check_status());
        let resolution = state.resolve();
        assert_eq!(resolution.primary, Some(search("pizza")));
        assert!(resolution.discarded.is_empty());
    }

    #[test]
    fn test_insert_same_kind_replaces() {
        let mut state = PendingActionState::new();
        state.insert(search("sushi"));
        state.insert(search("ramen"));
        assert_eq!(state.pending_search(), Some("ramen"));
        assert_eq!(state.pending_kinds(), vec![ActionKind::Search]);
    }

    #[test]
    fn test_resolve_does_not_consume() {
        let mut state = PendingActionState::new();
        state.insert(PendingAction::Reorder);
        let first = state.resolve();
        let second = state.resolve();
        assert_eq!(first, second);
        assert!(state.has_pending_action());
    }

    #[test]
    fn test_clear_resets_every_kind() {
        let mut state = PendingActionState::new();
        state.insert(order());
        state.insert(search("pizza"));
        state.insert(PendingAction::Reorder);
        state.insert(PendingAction::CheckStatus);

        state.clear();
        assert_eq!(state, PendingActionState::default());
        for kind in ActionKind::READ_ORDER {
            assert!(!state.is_pending(kind));
        }
    }
}
