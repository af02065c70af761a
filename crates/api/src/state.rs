use std::sync::Arc;

use libris_storage::ingestion::Ingestor;
use libris_storage::object_store::ObjectStore;
use libris_storage::resolver::FileResolver;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: libris_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Object-store client for uploads and deletes.
    pub store: Arc<dyn ObjectStore>,
    /// Tiered asset-reference-to-URL resolver.
    pub resolver: Arc<FileResolver>,
    /// Upload staging and validation pipeline.
    pub ingestor: Arc<Ingestor>,
}
