//! Handlers for book browse, submission, lifecycle, and download.
//!
//! Submission is a multipart form carrying metadata fields plus a `pdf`
//! part and an optional `cover` part. Visibility follows the core's
//! access-control rules: approved books are public, everything else is
//! visible only to admins and the owning uploader, and hidden books
//! surface as 404 rather than 403 so their existence is not leaked.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use serde::Serialize;

use libris_core::asset_ref::AssetReference;
use libris_core::error::CoreError;
use libris_core::lifecycle::{self, Actor, BookStatus};
use libris_core::types::{DbId, Timestamp};
use libris_core::validation::{
    check_category_selected, check_published_year, check_required_text, FieldErrors,
};
use libris_db::models::book::{Book, BookFields, BookSearchParams, NewBook, UpdateBook};
use libris_db::repositories::{BookRepo, CategoryRepo, DownloadRepo, FavoriteRepo};
use libris_storage::imagekit::Transformations;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeUser};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Cover thumbnail width used on book detail.
const COVER_THUMB_WIDTH: u32 = 300;

// ---------------------------------------------------------------------------
// Response shaping
// ---------------------------------------------------------------------------

/// Book payload exposed over the API.
///
/// The raw `asset_ref`/`cover_ref` columns stay internal; clients get
/// resolved URLs on the detail endpoint instead.
#[derive(Debug, Serialize)]
pub struct BookSummary {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub edition: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub status: String,
    pub category_id: Option<DbId>,
    pub owner_id: DbId,
    pub file_size_kb: Option<i32>,
    pub page_count: Option<i32>,
    pub has_cover: bool,
    pub created_at: Timestamp,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            edition: book.edition,
            description: book.description,
            published_year: book.published_year,
            status: book.status,
            category_id: book.category_id,
            owner_id: book.owner_id,
            file_size_kb: book.file_size_kb,
            page_count: book.page_count,
            has_cover: book.cover_ref.is_some(),
            created_at: book.created_at,
        }
    }
}

/// Detail payload: summary plus resolved URLs and viewer-specific extras.
#[derive(Debug, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: BookSummary,
    /// Inline-view URL for the PDF; `None` when no tier could produce one.
    pub view_url: Option<String>,
    /// Cover thumbnail URL, when a cover exists and resolves.
    pub cover_url: Option<String>,
    /// Whether the caller has favorited this book. Absent for anonymous.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorited: Option<bool>,
    /// Whether the caller has downloaded this book before. Absent for anonymous.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded: Option<bool>,
    /// Total distinct downloaders. Admin-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_count: Option<i64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a book and enforce visibility, hiding inaccessible rows as 404.
///
/// Owners see their own pending/rejected uploads; everyone else follows
/// `can_view`.
pub(crate) async fn find_visible_book(
    pool: &sqlx::PgPool,
    id: DbId,
    actor: Option<Actor>,
) -> AppResult<Book> {
    let not_found = || AppError::Core(CoreError::NotFound { entity: "Book", id });

    let book = BookRepo::find_by_id(pool, id).await?.ok_or_else(not_found)?;
    let status = book.book_status().map_err(AppError::Core)?;

    let visible = lifecycle::can_view(status, actor)
        || actor.is_some_and(|a| lifecycle::can_mutate(book.owner_id, a));
    if !visible {
        return Err(not_found());
    }
    Ok(book)
}

// ---------------------------------------------------------------------------
// GET /books
// ---------------------------------------------------------------------------

/// Browse books with optional search/category filters and pagination.
/// Non-admin viewers (including anonymous) only see approved books.
pub async fn list_books(
    viewer: MaybeUser,
    State(state): State<AppState>,
    Query(params): Query<BookSearchParams>,
) -> AppResult<impl IntoResponse> {
    let approved_only = !viewer.is_admin();
    let books = BookRepo::search(&state.pool, &params, approved_only).await?;
    let data: Vec<BookSummary> = books.into_iter().map(BookSummary::from).collect();
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /books/mine
// ---------------------------------------------------------------------------

/// The caller's own uploads, all statuses included.
pub async fn my_books(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let books = BookRepo::list_by_owner(&state.pool, auth.user_id).await?;
    let data: Vec<BookSummary> = books.into_iter().map(BookSummary::from).collect();
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// GET /admin/books/pending
// ---------------------------------------------------------------------------

/// The review queue: pending books, oldest first.
pub async fn pending_books(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let books = BookRepo::list_pending(&state.pool).await?;
    let data: Vec<BookSummary> = books.into_iter().map(BookSummary::from).collect();
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// POST /books
// ---------------------------------------------------------------------------

/// Accept a multipart book submission: metadata fields, a `pdf` part, and
/// an optional `cover` part.
///
/// Metadata problems are collected and reported together rather than
/// first-failure-wins. No book row is created unless the PDF (and the
/// cover, when present) made it into the object store.
pub async fn create_book(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut fields = BookFields::default();
    let mut pdf_bytes: Option<Vec<u8>> = None;
    let mut cover_bytes: Option<Vec<u8>> = None;
    let mut errors = FieldErrors::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "pdf" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                pdf_bytes = Some(data.to_vec());
            }
            "cover" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !data.is_empty() {
                    cover_bytes = Some(data.to_vec());
                }
            }
            other => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match other {
                    "title" => fields.title = text,
                    "author" => fields.author = text,
                    "edition" => fields.edition = Some(text).filter(|s| !s.is_empty()),
                    "description" => fields.description = Some(text).filter(|s| !s.is_empty()),
                    "published_year" => match text.parse::<i32>() {
                        Ok(year) => fields.published_year = Some(year),
                        Err(_) if text.is_empty() => {}
                        Err(_) => errors.push("Published year must be a number"),
                    },
                    "category_id" => match text.parse::<DbId>() {
                        Ok(id) => fields.category_id = Some(id),
                        Err(_) => errors.push("Category selection is invalid"),
                    },
                    _ => {}
                }
            }
        }
    }

    check_required_text(&mut errors, "Title", &fields.title);
    check_required_text(&mut errors, "Author", &fields.author);
    check_category_selected(&mut errors, fields.category_id);
    check_published_year(&mut errors, fields.published_year);
    if pdf_bytes.is_none() {
        errors.push("A PDF file is required");
    }
    if let Some(category_id) = fields.category_id {
        if CategoryRepo::find_by_id(&state.pool, category_id)
            .await?
            .is_none()
        {
            errors.push("Selected category does not exist");
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.into_messages()));
    }
    let pdf_bytes = pdf_bytes.expect("checked above");

    let actor = auth.actor();
    let pdf = state
        .ingestor
        .ingest_pdf(state.store.as_ref(), &fields.title, &pdf_bytes)
        .await?;

    // A submission with an unstorable cover is rejected whole; a book that
    // claims a cover it does not have is worse than asking the user to retry.
    let cover_ref = match cover_bytes {
        Some(bytes) => Some(
            state
                .ingestor
                .ingest_cover(state.store.as_ref(), &fields.title, &bytes)
                .await?
                .to_encoded(),
        ),
        None => None,
    };

    let new_book = NewBook {
        fields,
        status: lifecycle::initial_status(actor),
        owner_id: auth.user_id,
        asset_ref: pdf.asset_ref.to_encoded(),
        cover_ref,
        file_size_kb: Some(pdf.file_size_kb),
        page_count: pdf.page_count,
    };
    let created = BookRepo::create(&state.pool, &new_book).await?;
    tracing::info!(
        id = created.id,
        title = %created.title,
        status = %created.status,
        "Book submitted",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BookSummary::from(created),
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /books/{id}
// ---------------------------------------------------------------------------

/// Book detail with resolved view and cover URLs.
pub async fn get_book(
    viewer: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = find_visible_book(&state.pool, id, viewer.actor()).await?;

    let view_url = state
        .resolver
        .resolve_view_url(&book.pdf_ref(), &Transformations::default())
        .await;
    let cover_url = match book.cover_reference() {
        Some(cover) => {
            state
                .resolver
                .resolve_view_url(&cover, &Transformations::thumbnail(COVER_THUMB_WIDTH))
                .await
        }
        None => None,
    };

    let (favorited, downloaded) = match &viewer.0 {
        Some(user) => (
            Some(FavoriteRepo::is_favorited(&state.pool, user.user_id, id).await?),
            Some(DownloadRepo::has_downloaded(&state.pool, user.user_id, id).await?),
        ),
        None => (None, None),
    };
    let download_count = if viewer.is_admin() {
        Some(DownloadRepo::count_for_book(&state.pool, id).await?)
    } else {
        None
    };

    Ok(Json(DataResponse {
        data: BookDetail {
            book: BookSummary::from(book),
            view_url,
            cover_url,
            favorited,
            downloaded,
            download_count,
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /books/{id}
// ---------------------------------------------------------------------------

/// Patch book metadata. Owner or admin only.
///
/// A `status` field in the patch is honored only for admins (validated as
/// a transition); for everyone else it is silently ignored so the endpoint
/// stays uniform for both roles.
pub async fn update_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBook>,
) -> AppResult<impl IntoResponse> {
    let actor = auth.actor();
    let book = find_visible_book(&state.pool, id, Some(actor)).await?;
    if !lifecycle::can_mutate(book.owner_id, actor) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the uploader or an administrator may modify this book".into(),
        )));
    }

    let mut errors = FieldErrors::new();
    if let Some(ref title) = input.title {
        check_required_text(&mut errors, "Title", title);
    }
    if let Some(ref author) = input.author {
        check_required_text(&mut errors, "Author", author);
    }
    check_published_year(&mut errors, input.published_year);
    if let Some(category_id) = input.category_id {
        if CategoryRepo::find_by_id(&state.pool, category_id)
            .await?
            .is_none()
        {
            errors.push("Selected category does not exist");
        }
    }
    // Status rides along in the same patch for admin clients. It is
    // resolved before the metadata commit so a bad transition fails the
    // whole request instead of landing on an already-patched row, and a
    // client echoing the current status back (the normal PUT round trip)
    // is a no-op rather than a conflict.
    let mut status_change = None;
    if let (Some(raw), true) = (&input.status, actor.is_admin) {
        match BookStatus::parse(raw) {
            Ok(target) => {
                let current = book.book_status().map_err(AppError::Core)?;
                status_change =
                    lifecycle::patch_transition(current, target, actor).map_err(AppError::Core)?;
            }
            Err(_) => errors.push("Status must be pending, approved, or rejected"),
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.into_messages()));
    }

    let updated = BookRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))?;

    let updated = match status_change {
        Some(target) => BookRepo::set_status(&state.pool, id, target)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))?,
        None => updated,
    };

    tracing::info!(id, "Book updated");
    Ok(Json(DataResponse {
        data: BookSummary::from(updated),
    }))
}

// ---------------------------------------------------------------------------
// DELETE /books/{id}
// ---------------------------------------------------------------------------

/// Delete a book. Owner or admin only.
///
/// Remote assets are deleted best-effort first; a store refusal leaves an
/// orphaned blob and a warning, never a half-deleted row.
pub async fn delete_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = auth.actor();
    let book = find_visible_book(&state.pool, id, Some(actor)).await?;
    if !lifecycle::can_mutate(book.owner_id, actor) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the uploader or an administrator may delete this book".into(),
        )));
    }

    for asset in [Some(book.pdf_ref()), book.cover_reference()]
        .into_iter()
        .flatten()
    {
        if let AssetReference::Remote { external_id, .. } = asset {
            if !state.store.delete(&external_id).await {
                tracing::warn!(book_id = id, external_id, "Remote asset not deleted");
            }
        }
    }

    BookRepo::delete(&state.pool, id).await?;
    tracing::info!(id, title = %book.title, "Book deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /books/{id}/approve, POST /books/{id}/reject
// ---------------------------------------------------------------------------

async fn transition_book(
    admin: AuthUser,
    state: &AppState,
    id: DbId,
    target: BookStatus,
) -> AppResult<Json<DataResponse<BookSummary>>> {
    let book = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))?;
    let current = book.book_status().map_err(AppError::Core)?;
    lifecycle::validate_transition(current, target, admin.actor()).map_err(AppError::Core)?;

    let updated = BookRepo::set_status(&state.pool, id, target)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))?;
    tracing::info!(id, from = %current, to = %target, "Book status changed");
    Ok(Json(DataResponse {
        data: BookSummary::from(updated),
    }))
}

/// Approve a book (admin only).
pub async fn approve_book(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    transition_book(admin, &state, id, BookStatus::Approved).await
}

/// Reject a book (admin only).
pub async fn reject_book(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    transition_book(admin, &state, id, BookStatus::Rejected).await
}

// ---------------------------------------------------------------------------
// GET /books/{id}/download
// ---------------------------------------------------------------------------

/// Record the download and redirect to an attachment URL.
///
/// The ledger write happens before resolution: "user asked for the file"
/// is worth recording even if the store then fails, and repeat downloads
/// only refresh the row's timestamp.
pub async fn download_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: axum::http::HeaderMap,
) -> AppResult<impl IntoResponse> {
    let book = find_visible_book(&state.pool, id, Some(auth.actor())).await?;

    let client_ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);
    DownloadRepo::record(&state.pool, auth.user_id, id, client_ip).await?;

    let url = state.resolver.resolve_download_url(&book.pdf_ref()).await?;
    tracing::info!(book_id = id, user_id = auth.user_id, "Download served");
    Ok(Redirect::temporary(&url))
}
