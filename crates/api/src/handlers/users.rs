//! Handlers for admin user management.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use libris_core::error::CoreError;
use libris_core::roles::{ROLE_ADMIN, ROLE_STUDENT};
use libris_core::types::DbId;
use libris_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /admin/users
// ---------------------------------------------------------------------------

/// List all users, newest first (admin only).
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

// ---------------------------------------------------------------------------
// PUT /admin/users/{id}/role
// ---------------------------------------------------------------------------

/// Request body for a role change.
#[derive(Debug, Deserialize)]
pub struct SetRole {
    pub role: String,
}

/// Change a user's role (admin only).
///
/// Admins may not demote themselves; losing the last admin would lock the
/// review queue.
pub async fn set_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetRole>,
) -> AppResult<impl IntoResponse> {
    if input.role != ROLE_ADMIN && input.role != ROLE_STUDENT {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role: {}",
            input.role
        ))));
    }
    if id == admin.user_id && input.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Conflict(
            "Administrators cannot demote themselves".into(),
        )));
    }

    let updated = UserRepo::set_role(&state.pool, id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    tracing::info!(user_id = id, role = %updated.role, "User role changed");
    Ok(Json(DataResponse { data: updated }))
}
