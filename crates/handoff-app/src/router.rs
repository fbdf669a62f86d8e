//! Console stand-in for in-app navigation.

use std::fmt;

use handoff_action::ActionRouter;
use handoff_core::types::{OrderRequest, PendingAction};

/// UI surface a resolved action opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Quick-order composer. Reorders open it empty: no last-order snapshot
    /// is available to pre-fill from.
    OrderComposer { prefill: Option<OrderRequest> },
    Search { query: String },
    OrderStatus,
}

impl Destination {
    pub fn for_action(action: &PendingAction) -> Self {
        match action {
            PendingAction::Order(order) => Destination::OrderComposer {
                prefill: Some(order.clone()),
            },
            PendingAction::Search(search) => Destination::Search {
                query: search.query.clone(),
            },
            PendingAction::CheckStatus => Destination::OrderStatus,
            PendingAction::Reorder => Destination::OrderComposer { prefill: None },
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::OrderComposer {
                prefill: Some(order),
            } => write!(
                f,
                "order composer: {} x {} from {}",
                order.quantity, order.food_item, order.restaurant
            ),
            Destination::OrderComposer { prefill: None } => write!(f, "order composer"),
            Destination::Search { query } => write!(f, "search: {}", query),
            Destination::OrderStatus => write!(f, "order status"),
        }
    }
}

/// Router that records where it navigated and prints it.
#[derive(Debug, Default)]
pub struct ConsoleRouter {
    pub visited: Vec<Destination>,
}

impl ActionRouter for ConsoleRouter {
    fn route(&mut self, action: &PendingAction) {
        let destination = Destination::for_action(action);
        tracing::info!(%destination, "Navigating");
        println!("-> {}", destination);
        self.visited.push(destination);
    }
}
