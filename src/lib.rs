//! # jsonstore
//!
//! Minimal embedded persistence: a homogeneous collection of records stored
//! as a single human-readable JSON array on disk, keyed by a function
//! supplied at construction. No database engine, no index, no cache —
//! every operation is a whole-file read-modify-write.
//!
//! ```
//! use jsonstore::{JsonStore, JsonStoreOptions};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
//! struct Widget {
//!     id: u32,
//!     name: String,
//! }
//!
//! # fn main() -> jsonstore::Result<()> {
//! # let content_root = tempfile::tempdir().unwrap();
//! # let content_root = content_root.path();
//! let options = JsonStoreOptions::default();
//! let store = JsonStore::open(content_root, &options, |w: &Widget| w.id)?;
//!
//! store.upsert(Widget { id: 1, name: "A".into() })?;
//! store.upsert(Widget { id: 1, name: "A2".into() })?;
//! assert_eq!(store.list()?.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Each store owns one backing file (`<CollectionName>.json`) inside a
//! directory resolved from host configuration. See [`JsonStore`] for the
//! operation contracts and the concurrency discipline.

mod config;
mod error;
mod lock;
mod store;

pub use config::JsonStoreOptions;
pub use error::{Result, StoreError};
pub use store::JsonStore;
