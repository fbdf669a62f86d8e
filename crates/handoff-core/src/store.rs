//! Contract of the shared, process-wide action store.
//!
//! The agent writes into it, the application drains it. Every key is
//! independent; no multi-key transaction is assumed.

use crate::error::Result;
use crate::types::{ActionKind, StoredValue};

/// Durable key/value store reachable from both the agent and the application.
///
/// Implementations must make [`take`](SharedActionStore::take) atomic per key:
/// no other caller, in this process or another, may observe the value between
/// the read and the delete. A backend without a native primitive must serialize
/// the read and the delete under a lock.
pub trait SharedActionStore: Send + Sync {
    /// Store `value` under the key for `kind`, replacing any unconsumed value.
    fn write(&self, kind: ActionKind, value: StoredValue) -> Result<()>;

    /// Read the value for `kind`, leaving it in place.
    fn peek(&self, kind: ActionKind) -> Result<Option<StoredValue>>;

    /// Read and remove the value for `kind` in one step.
    fn take(&self, kind: ActionKind) -> Result<Option<StoredValue>>;

    /// Remove the value for `kind`. Removing an absent key is not an error.
    fn remove(&self, kind: ActionKind) -> Result<()>;

    fn exists(&self, kind: ActionKind) -> Result<bool> {
        Ok(self.peek(kind)?.is_some())
    }

    /// Read the value for `kind`, removing it when `remove` is set.
    fn read(&self, kind: ActionKind, remove: bool) -> Result<Option<StoredValue>> {
        if remove {
            self.take(kind)
        } else {
            self.peek(kind)
        }
    }
}
