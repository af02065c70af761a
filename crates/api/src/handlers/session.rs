//! Session provisioning.
//!
//! The OAuth exchange happens in the excluded web layer; it calls this
//! endpoint with the verified identity profile. The handler upserts the
//! user row (repeat logins refresh email and display name, never the
//! role) and issues the access token the other endpoints consume.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use libris_db::models::user::{UpsertUser, User};
use libris_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for a provisioned session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub user: User,
}

// ---------------------------------------------------------------------------
// POST /auth/session
// ---------------------------------------------------------------------------

/// Provision (or refresh) a user from an identity profile and issue a token.
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<UpsertUser>,
) -> AppResult<impl IntoResponse> {
    if input.external_id.trim().is_empty() || input.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Identity profile must carry external_id and email".into(),
        ));
    }

    let user = UserRepo::upsert_from_identity(&state.pool, &input).await?;
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "Session issued");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionResponse { access_token, user },
        }),
    ))
}
