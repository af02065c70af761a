//! Handlers for favorites.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use libris_core::types::DbId;
use libris_db::repositories::FavoriteRepo;

use crate::error::AppResult;
use crate::handlers::books::BookSummary;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /books/{id}/favorite
// ---------------------------------------------------------------------------

/// Toggle the caller's favorite mark on a book.
///
/// The book must be visible to the caller; favoriting an invisible book
/// would leak its existence.
pub async fn toggle_favorite(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    super::books::find_visible_book(&state.pool, id, Some(auth.actor())).await?;
    let result = FavoriteRepo::toggle(&state.pool, auth.user_id, id).await?;
    tracing::debug!(
        book_id = id,
        user_id = auth.user_id,
        favorited = result.favorited,
        "Favorite toggled",
    );
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// GET /favorites
// ---------------------------------------------------------------------------

/// The caller's favorited books. Only approved books are listed; a book
/// pulled back into review disappears from the list without unfavoriting.
pub async fn list_favorites(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let books = FavoriteRepo::list_books_for_user(&state.pool, auth.user_id).await?;
    let data: Vec<BookSummary> = books.into_iter().map(BookSummary::from).collect();
    Ok(Json(DataResponse { data }))
}
