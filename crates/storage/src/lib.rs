//! Remote-file storage for book assets.
//!
//! Wraps the object store's HTTP API behind the [`object_store::ObjectStore`]
//! trait, resolves stored references back to serving URLs with tiered
//! fallback, and stages uploads through scoped temp files.

pub mod error;
pub mod imagekit;
pub mod ingestion;
pub mod object_store;
pub mod resolver;

#[cfg(test)]
pub(crate) mod mock;

pub use error::StorageError;
pub use object_store::{FileDetails, ObjectStore, UploadedObject};
