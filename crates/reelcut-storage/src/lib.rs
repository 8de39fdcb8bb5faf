//! Persistent clip store.
//!
//! This crate provides:
//! - The store document (`clips`, `schedule`, `runs`) and its serde shape
//! - Idempotent clip append keyed by the derived clip id
//! - Schedule and run bookkeeping
//! - Full-rewrite atomic writes behind a single critical section

pub mod document;
pub mod error;
pub mod store;

pub use document::StoreDocument;
pub use error::{StorageError, StorageResult};
pub use store::{AppendOutcome, ClipStore};
