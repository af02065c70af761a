pub mod admin;
pub mod auth;
pub mod books;
pub mod categories;
pub mod downloads;
pub mod favorites;
pub mod health;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/session                        provision user, issue token (POST)
///
/// /books                               browse, submit (GET, POST)
/// /books/mine                          caller's own books (GET)
/// /books/{id}                          detail, patch, delete (GET, PUT, DELETE)
/// /books/{id}/approve                  approve pending book (POST, admin)
/// /books/{id}/reject                   reject pending book (POST, admin)
/// /books/{id}/download                 record + redirect (GET)
/// /books/{id}/favorite                 toggle favorite (POST)
///
/// /favorites                           caller's favorited books (GET)
/// /downloads/mine                      caller's download history (GET)
///
/// /categories                          list, create (GET, POST)
/// /categories/{id}                     update, delete (PUT, DELETE)
///
/// /admin/books/pending                 review queue (GET, admin)
/// /admin/users                         user listing (GET, admin)
/// /admin/users/{id}/role               role change (PUT, admin)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        // Session provisioning (token issuance).
        .nest("/auth", auth::router())
        // Book browse, submission, lifecycle, and per-book actions.
        .nest("/books", books::router(config))
        // Caller-scoped favorites and download history.
        .nest("/favorites", favorites::router())
        .nest("/downloads", downloads::router())
        // Category reads are open; writes are admin-only in the handlers.
        .nest("/categories", categories::router())
        // Review queue and user management.
        .nest("/admin", admin::router())
}
