//! Error types for the action handoff.

use handoff_core::error::HandoffError;
use handoff_core::types::ActionKind;

/// Why a stored value could not be turned into a pending action.
///
/// Never reaches the router: the dispatcher logs it and treats the key as absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
    #[error("Malformed payload: {0}")]
    Malformed(String),
    #[error("Unsupported payload version: {0}")]
    UnsupportedVersion(u64),
    #[error("Missing or blank field: {0}")]
    MissingField(&'static str),
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),
    #[error("Search query is empty")]
    EmptyQuery,
    #[error("Expected {expected} value for {kind}, found {found}")]
    WrongValueType {
        kind: ActionKind,
        expected: &'static str,
        found: &'static str,
    },
}

/// Errors surfaced to callers that publish actions.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Store error: {0}")]
    Store(#[from] HandoffError),
}
