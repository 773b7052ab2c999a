//! In-memory storage backend.
//!
//! Keeps every table in a `BTreeMap` behind a `tokio::sync::RwLock`. Used by
//! the test suite and for local runs; data is lost when the backend is
//! dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use jobli::storage::inmemory::InMemoryBackend;
//! use jobli_core::storage::TableSchema;
//!
//! let schema = TableSchema::single_table("jobli", "GSI1");
//! let backend = InMemoryBackend::new(100).with_table(&schema);
//! ```

mod backend;

pub use backend::InMemoryBackend;
