//! Handoff storage crate - the durable shared action store.
//!
//! Provides a WAL-mode SQLite database that the agent and the application
//! open from separate processes, plus a mutex-guarded in-memory store for
//! hosts that run both sides in one process.

pub mod action_store;
pub mod db;
pub mod memory;
pub mod migrations;

pub use action_store::SqliteActionStore;
pub use db::Database;
pub use memory::MemoryActionStore;
