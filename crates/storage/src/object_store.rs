//! The object-store seam.
//!
//! Handlers and ingestion depend on this trait rather than the concrete
//! HTTP client, so tests can inject an in-memory store and the provider
//! can be swapped without touching business logic.

use std::path::Path;

use crate::error::StorageError;

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadedObject {
    /// Path within the store, used for URL construction.
    pub stored_path: String,
    /// The store's opaque file id, used for delete and metadata lookups.
    pub external_id: String,
    /// URL the store reported it will serve the file from.
    pub served_url: String,
    /// Stored size in bytes.
    pub size_bytes: u64,
}

/// Metadata for a stored file, as reported by the store.
#[derive(Debug, Clone)]
pub struct FileDetails {
    /// Canonical path within the store. Can differ from the path recorded
    /// at upload time if the file was moved provider-side.
    pub stored_path: String,
    pub name: String,
    pub size_bytes: u64,
}

/// Remote blob-storage operations. Pure adapter, no business logic.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file into `folder` under `file_name`.
    ///
    /// Errors on transport failure or any non-2xx response; there is no
    /// partial success.
    async fn upload(
        &self,
        local_path: &Path,
        file_name: &str,
        folder: &str,
        mime_type: &str,
    ) -> Result<UploadedObject, StorageError>;

    /// Delete a stored file by its external id.
    ///
    /// Returns false rather than erroring on failure: every caller treats
    /// remote deletion as best-effort, because a dangling remote object is
    /// preferable to blocking a local database mutation.
    async fn delete(&self, external_id: &str) -> bool;

    /// Fetch the store's metadata for a file, re-deriving the canonical
    /// stored path before URL construction.
    async fn file_details(&self, external_id: &str) -> Result<FileDetails, StorageError>;
}
