//! In-process shared action store.
//!
//! For hosts that run the producer and the consumer in one process (and for
//! tests). Not durable. The map lives behind a single mutex, so `take`
//! performs its read and delete without releasing the lock in between.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use handoff_core::error::{HandoffError, Result};
use handoff_core::store::SharedActionStore;
use handoff_core::types::{ActionKind, StoredEntry, StoredValue};

/// Mutex-guarded map from action kind to its pending entry.
#[derive(Debug, Default)]
pub struct MemoryActionStore {
    entries: Mutex<HashMap<ActionKind, StoredEntry>>,
}

impl MemoryActionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every pending entry, oldest first.
    pub fn entries(&self) -> Result<Vec<StoredEntry>> {
        let entries = self.lock()?;
        let mut list: Vec<StoredEntry> = entries.values().cloned().collect();
        list.sort_by_key(|e| (e.written_at, e.kind.rank()));
        Ok(list)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ActionKind, StoredEntry>>> {
        self.entries
            .lock()
            .map_err(|e| HandoffError::StoreUnavailable(format!("Lock poisoned: {}", e)))
    }
}

impl SharedActionStore for MemoryActionStore {
    fn write(&self, kind: ActionKind, value: StoredValue) -> Result<()> {
        let entry = StoredEntry {
            kind,
            value,
            written_at: Utc::now(),
        };
        self.lock()?.insert(kind, entry);
        Ok(())
    }

    fn peek(&self, kind: ActionKind) -> Result<Option<StoredValue>> {
        Ok(self.lock()?.get(&kind).map(|e| e.value.clone()))
    }

    fn take(&self, kind: ActionKind) -> Result<Option<StoredValue>> {
        Ok(self.lock()?.remove(&kind).map(|e| e.value))
    }

    fn remove(&self, kind: ActionKind) -> Result<()> {
        self.lock()?.remove(&kind);
        Ok(())
    }

    fn exists(&self, kind: ActionKind) -> Result<bool> {
        Ok(self.lock()?.contains_key(&kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_take_is_at_most_once() {
        let store = MemoryActionStore::new();
        store
            .write(ActionKind::Reorder, StoredValue::Flag(true))
            .unwrap();
        assert_eq!(
            store.take(ActionKind::Reorder).unwrap(),
            Some(StoredValue::Flag(true))
        );
        assert_eq!(store.take(ActionKind::Reorder).unwrap(), None);
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_kinds_are_independent() {
        let store = MemoryActionStore::new();
        store
            .write(ActionKind::Search, StoredValue::Text("pho".into()))
            .unwrap();
        store
            .write(ActionKind::CheckStatus, StoredValue::Flag(true))
            .unwrap();
        assert_eq!(store.len().unwrap(), 2);

        store.remove(ActionKind::Search).unwrap();
        assert!(!store.exists(ActionKind::Search).unwrap());
        assert!(store.exists(ActionKind::CheckStatus).unwrap());
    }

    #[test]
    fn test_last_write_wins() {
        let store = MemoryActionStore::new();
        store
            .write(ActionKind::Search, StoredValue::Text("first".into()))
            .unwrap();
        store
            .write(ActionKind::Search, StoredValue::Text("second".into()))
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(
            store.peek(ActionKind::Search).unwrap(),
            Some(StoredValue::Text("second".into()))
        );
    }

    #[test]
    fn test_concurrent_takers_see_value_once() {
        let store = Arc::new(MemoryActionStore::new());
        store
            .write(ActionKind::CheckStatus, StoredValue::Flag(true))
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.take(ActionKind::CheckStatus).unwrap())
            })
            .collect();

        let seen = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .count();
        assert_eq!(seen, 1);
    }
}
