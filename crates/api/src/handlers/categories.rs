//! Handlers for category administration.
//!
//! Reads are open (the browse page needs the category list before login);
//! writes require the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use libris_core::error::CoreError;
use libris_core::types::DbId;
use libris_core::validation::{check_category_name, FieldErrors};
use libris_db::models::category::{CreateCategory, UpdateCategory};
use libris_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_name(name: &str) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    check_category_name(&mut errors, name);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.into_messages()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /categories
// ---------------------------------------------------------------------------

/// List all categories with their usage counts, alphabetical.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

// ---------------------------------------------------------------------------
// POST /categories
// ---------------------------------------------------------------------------

/// Create a category (admin only). Duplicate names surface as 409 via the
/// unique constraint.
pub async fn create_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    let created = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PUT /categories/{id}
// ---------------------------------------------------------------------------

/// Rename a category (admin only).
pub async fn update_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    let updated = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    tracing::info!(id, name = %updated.name, "Category renamed");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /categories/{id}
// ---------------------------------------------------------------------------

/// Delete a category (admin only).
///
/// Refused while any book still references it; reassign or delete those
/// books first.
pub async fn delete_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let in_use = CategoryRepo::book_count(&state.pool, id).await?;
    if in_use > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category is still referenced by {in_use} book(s)"
        ))));
    }

    let deleted = CategoryRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    tracing::info!(id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
