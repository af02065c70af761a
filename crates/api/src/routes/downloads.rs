//! Route definitions for download history.
//!
//! Recording happens as a side effect of `GET /books/{id}/download`; this
//! router only exposes the caller's ledger.

use axum::routing::get;
use axum::Router;

use crate::handlers::downloads;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/mine", get(downloads::my_downloads))
}
