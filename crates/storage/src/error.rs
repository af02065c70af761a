//! Errors from the storage layer.

/// Errors from object-store calls, resolution, and ingestion.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store rejected or never received an upload. The caller must not
    /// assume partial success; no book row is created on this path.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// A metadata lookup failed (transport, non-2xx, or malformed JSON).
    /// View-URL resolution downgrades this to the next tier.
    #[error("File lookup failed: {0}")]
    Lookup(String),

    /// No resolution tier produced a usable file. Carries the per-tier
    /// trail so a storage-provider outage is diagnosable from one log line.
    #[error("Could not resolve a download URL: {}", attempts.join(" | "))]
    Resolution { attempts: Vec<String> },

    /// Local filesystem failure while staging or reading an upload.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
