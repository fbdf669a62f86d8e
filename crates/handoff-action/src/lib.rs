//! Deferred action handoff for the application side.
//!
//! The agent process leaves at most one pending action per kind in the shared
//! store. At lifecycle moments the application drains the store with
//! [`ActionDispatcher::check`], resolves the single action to route, hands it
//! to an [`ActionRouter`], and discards the snapshot with
//! [`ActionDispatcher::clear`].

pub mod codec;
pub mod dispatcher;
pub mod error;
pub mod lifecycle;
pub mod publisher;
pub mod resolution;
pub mod router;
pub mod state;

pub use dispatcher::{ActionDispatcher, CheckReport, DispatcherPhase};
pub use error::{DecodeFailure, DispatchError};
pub use lifecycle::{HandoffOutcome, LifecycleEvent, LifecycleHandler};
pub use publisher::ActionPublisher;
pub use resolution::Resolution;
pub use router::ActionRouter;
pub use state::PendingActionState;
