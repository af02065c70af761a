//! Route definitions for the admin surface.
//!
//! Mounted at `/admin`. Every route requires the admin role via
//! [`crate::middleware::rbac::RequireAdmin`] in the handlers.
//!
//! ```text
//! GET /books/pending        pending_books
//! GET /users                list_users
//! PUT /users/{id}/role      set_user_role
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{books, users};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books/pending", get(books::pending_books))
        .route("/users", get(users::list_users))
        .route("/users/{id}/role", put(users::set_user_role))
}
