//! Handlers for the download ledger.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use libris_db::repositories::DownloadRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /downloads/mine
// ---------------------------------------------------------------------------

/// The caller's download history, most recent first. One entry per book
/// regardless of how many times it was downloaded.
pub async fn my_downloads(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let downloads = DownloadRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: downloads }))
}
