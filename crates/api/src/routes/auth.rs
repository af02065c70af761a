//! Route definitions for session provisioning.
//!
//! ```text
//! POST /session    create_session
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/session", post(session::create_session))
}
