//! Route definitions for the caller's favorites list.
//!
//! The toggle itself lives under `/books/{id}/favorite`; this router only
//! carries the listing.

use axum::routing::get;
use axum::Router;

use crate::handlers::favorites;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(favorites::list_favorites))
}
