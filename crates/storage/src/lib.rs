#![forbid(unsafe_code)]

//! Persistence for the TechElevate portal.
//!
//! The whole application state is one JSON document in a single slot of a
//! [`KvStore`]. [`DocumentStore`] owns the slot keys and the load/save
//! contract, including recovery from unreadable slots and the one-time
//! upgrade of the older split-slot layout.

pub mod document_store;
pub mod kv;
pub mod records;

pub use document_store::{
    DOCUMENT_KEY, DocumentStore, LEGACY_PROGRESS_KEY, LEGACY_QUESTIONS_KEY,
};
pub use kv::{FileStore, KvStore, MemoryStore, StorageError};
pub use records::{DocumentRecord, RecordError, SCHEMA_VERSION};
