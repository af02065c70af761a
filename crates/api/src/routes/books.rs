//! Route definitions for books.
//!
//! Mounted at `/books` in the API route tree.
//!
//! ```text
//! GET    /                  list_books
//! POST   /                  create_book (multipart)
//! GET    /mine              my_books
//! GET    /{id}              get_book
//! PUT    /{id}              update_book
//! DELETE /{id}              delete_book
//! POST   /{id}/approve      approve_book
//! POST   /{id}/reject       reject_book
//! GET    /{id}/download     download_book
//! POST   /{id}/favorite     toggle_favorite
//! ```

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use libris_storage::ingestion::IngestionConfig;

use crate::config::ServerConfig;
use crate::handlers::{books, favorites};
use crate::state::AppState;

/// Headroom for multipart boundaries, part headers, and metadata fields
/// on top of the raw file payloads.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Request body cap for the submission route.
///
/// axum's default limit is 2 MB, far below a full-size PDF; the cap has
/// to track the configured per-file limits so the handler's own size
/// checks stay reachable.
fn upload_body_limit(ingestion: &IngestionConfig) -> usize {
    (ingestion.max_pdf_mb + ingestion.max_cover_mb) as usize * 1024 * 1024
        + MULTIPART_OVERHEAD_BYTES
}

pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(books::list_books)
                .post(books::create_book)
                .layer(DefaultBodyLimit::max(upload_body_limit(&config.ingestion))),
        )
        .route("/mine", get(books::my_books))
        .route(
            "/{id}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/{id}/approve", post(books::approve_book))
        .route("/{id}/reject", post(books::reject_book))
        .route("/{id}/download", get(books::download_book))
        .route("/{id}/favorite", post(favorites::toggle_favorite))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn body_limit_covers_both_configured_files() {
        let ingestion = IngestionConfig::new(PathBuf::from("/tmp/staging"));
        let limit = upload_body_limit(&ingestion);
        let files = (ingestion.max_pdf_mb + ingestion.max_cover_mb) as usize * 1024 * 1024;
        assert_eq!(limit, files + MULTIPART_OVERHEAD_BYTES);
        // Well above axum's 2 MB default.
        assert!(limit > 2 * 1024 * 1024);
    }
}
