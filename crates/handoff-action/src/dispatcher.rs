//! The application-side dispatcher.
//!
//! Lifecycle of one handoff cycle:
//! - Idle -> Checked (`check()` found at least one pending action)
//! - Checked -> Idle (`clear()`)
//!
//! `check()` drains the store key by key with an atomic take, so every write
//! from the agent is observed by at most one `check()`.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use handoff_core::store::SharedActionStore;
use handoff_core::types::{ActionKind, OrderRequest};

use crate::codec;
use crate::resolution::Resolution;
use crate::state::PendingActionState;

/// Where the dispatcher is in the check / clear cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatcherPhase {
    /// No pending state materialized.
    Idle,
    /// A snapshot with at least one pending action is waiting to be routed.
    Checked,
}

impl fmt::Display for DispatcherPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatcherPhase::Idle => write!(f, "Idle"),
            DispatcherPhase::Checked => write!(f, "Checked"),
        }
    }
}

/// What a single `check()` saw, per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Kinds that decoded into a pending action.
    pub observed: Vec<ActionKind>,
    /// Kinds whose value was taken but could not be decoded.
    pub rejected: Vec<ActionKind>,
    /// Kinds whose key could not be read; they stay in the store.
    pub unreadable: Vec<ActionKind>,
}

impl CheckReport {
    /// True when no key at all could be read.
    pub fn store_unavailable(&self) -> bool {
        self.unreadable.len() == ActionKind::READ_ORDER.len()
    }
}

/// Drains pending actions from the shared store into an in-memory snapshot.
///
/// Constructed once by the host with the store it should read, then passed by
/// reference to whatever handles lifecycle events.
pub struct ActionDispatcher {
    store: Arc<dyn SharedActionStore>,
    state: PendingActionState,
    phase: DispatcherPhase,
}

impl ActionDispatcher {
    pub fn new(store: Arc<dyn SharedActionStore>) -> Self {
        Self {
            store,
            state: PendingActionState::new(),
            phase: DispatcherPhase::Idle,
        }
    }

    /// Take every pending key from the store and rebuild the snapshot.
    ///
    /// Keys are visited in [`ActionKind::READ_ORDER`]. A value that fails to
    /// decode is dropped and treated as absent. A key that cannot be read is
    /// left in the store for the next check; if no key can be read at all the
    /// previous snapshot is kept as it was.
    pub fn check(&mut self) -> CheckReport {
        let mut report = CheckReport::default();
        let mut next = PendingActionState::new();

        for kind in ActionKind::READ_ORDER {
            let value = match self.store.take(kind) {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key = kind.store_key(), error = %e, "Failed to read pending action");
                    report.unreadable.push(kind);
                    continue;
                }
            };

            match codec::decode_stored(kind, value) {
                Ok(Some(action)) => {
                    debug!(key = kind.store_key(), "Pending action observed");
                    next.insert(action);
                    report.observed.push(kind);
                }
                Ok(None) => {
                    debug!(key = kind.store_key(), "Lowered flag removed");
                }
                Err(failure) => {
                    warn!(
                        key = kind.store_key(),
                        error = %failure,
                        "Discarding undecodable pending action"
                    );
                    report.rejected.push(kind);
                }
            }
        }

        if report.store_unavailable() {
            warn!("Shared store unavailable; pending action state left unchanged");
            return report;
        }

        self.state = next;
        self.phase = if self.state.has_pending_action() {
            DispatcherPhase::Checked
        } else {
            DispatcherPhase::Idle
        };

        if !report.observed.is_empty() {
            info!(
                observed = ?report.observed,
                phase = %self.phase,
                "Pending actions checked"
            );
        }

        report
    }

    /// Discard the snapshot for every kind, routed or not.
    ///
    /// Does not touch the store: `check()` already removed what it read.
    pub fn clear(&mut self) {
        if self.state.has_pending_action() {
            debug!(pending = ?self.state.pending_kinds(), "Clearing pending action state");
        }
        self.state.clear();
        self.phase = DispatcherPhase::Idle;
    }

    /// Resolve the snapshot to the single highest-precedence action.
    pub fn resolve(&self) -> Resolution {
        self.state.resolve()
    }

    pub fn phase(&self) -> DispatcherPhase {
        self.phase
    }

    pub fn state(&self) -> &PendingActionState {
        &self.state
    }

    pub fn has_pending_action(&self) -> bool {
        self.state.has_pending_action()
    }

    pub fn pending_order(&self) -> Option<&OrderRequest> {
        self.state.pending_order()
    }

    pub fn pending_search(&self) -> Option<&str> {
        self.state.pending_search()
    }

    pub fn pending_reorder(&self) -> bool {
        self.state.pending_reorder()
    }

    pub fn pending_check_status(&self) -> bool {
        self.state.pending_check_status()
    }
}

impl fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .finish()
    }
}
