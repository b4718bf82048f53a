//! Auction State Store
//!
//! Durable mapping from a small fixed set of logical keys to their current
//! JSON value, with atomic replace per key. Callers serialize their own
//! writers; the store only guarantees that a completed write is durable and
//! that a failed write is reported.
//!
//! - `store`: the `StateStore` trait, keys, errors and typed helpers
//! - `file`: one JSON file per key, atomic temp-file + rename writes
//! - `memory`: in-process store for tests and ephemeral runs

pub mod file;
pub mod memory;
pub mod store;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{load, save, StateStore, StoreError, StoreKey};
