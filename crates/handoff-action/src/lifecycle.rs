//! Reacting to host lifecycle signals.
//!
//! The host reports two events: `Ready` once initial UI setup is finished, and
//! `Foreground` on every return to the foreground. Each accepted event runs one
//! handoff cycle: check, resolve, route the winner, clear.

use std::fmt;

use tracing::{debug, info};

use handoff_core::config::DispatchConfig;
use handoff_core::types::{ActionKind, PendingAction};

use crate::dispatcher::ActionDispatcher;
use crate::router::ActionRouter;

/// Lifecycle signal from the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Ready,
    Foreground,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Ready => write!(f, "ready"),
            LifecycleEvent::Foreground => write!(f, "foreground"),
        }
    }
}

impl std::str::FromStr for LifecycleEvent {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(LifecycleEvent::Ready),
            "foreground" => Ok(LifecycleEvent::Foreground),
            _ => Err(format!("Unknown lifecycle event: {}", s)),
        }
    }
}

/// What one lifecycle event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffOutcome {
    pub event: LifecycleEvent,
    /// Whether a check ran at all.
    pub checked: bool,
    pub routed: Option<PendingAction>,
    /// Kinds that were pending but lost to `routed` and were cleared.
    pub discarded: Vec<ActionKind>,
}

impl HandoffOutcome {
    fn skipped(event: LifecycleEvent) -> Self {
        Self {
            event,
            checked: false,
            routed: None,
            discarded: Vec::new(),
        }
    }
}

/// Runs a handoff cycle for each lifecycle event the config enables.
///
/// `Foreground` events that arrive before `Ready` are ignored: the UI is not
/// set up yet, and the `Ready` check will pick up anything they would have.
#[derive(Debug, Clone)]
pub struct LifecycleHandler {
    config: DispatchConfig,
    ready: bool,
}

impl LifecycleHandler {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            ready: false,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn handle(
        &mut self,
        event: LifecycleEvent,
        dispatcher: &mut ActionDispatcher,
        router: &mut dyn ActionRouter,
    ) -> HandoffOutcome {
        let enabled = match event {
            LifecycleEvent::Ready => {
                self.ready = true;
                self.config.check_on_ready
            }
            LifecycleEvent::Foreground => {
                if !self.ready {
                    debug!("Foreground before ready; skipping check");
                    return HandoffOutcome::skipped(event);
                }
                self.config.check_on_foreground
            }
        };

        if !enabled {
            debug!(%event, "Pending action check disabled for event");
            return HandoffOutcome::skipped(event);
        }

        dispatcher.check();
        let resolution = dispatcher.resolve();

        if let Some(action) = &resolution.primary {
            info!(%event, kind = %action.kind(), "Routing pending action");
            router.route(action);
        }
        if !resolution.discarded.is_empty() {
            info!(
                %event,
                discarded = ?resolution.discarded,
                "Lower-precedence pending actions dropped"
            );
        }

        dispatcher.clear();

        HandoffOutcome {
            event,
            checked: true,
            routed: resolution.primary,
            discarded: resolution.discarded,
        }
    }
}
