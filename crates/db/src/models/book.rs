//! Book models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use libris_core::asset_ref::AssetReference;
use libris_core::lifecycle::BookStatus;
use libris_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `books` table.
///
/// `asset_ref` and `cover_ref` hold encoded [`AssetReference`] strings;
/// use [`Book::pdf_ref`] / [`Book::cover_ref`] to decode them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub title: String,
    pub author: String,
    pub edition: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub status: String,
    pub category_id: Option<DbId>,
    pub owner_id: DbId,
    pub asset_ref: String,
    pub cover_ref: Option<String>,
    pub file_size_kb: Option<i32>,
    pub page_count: Option<i32>,
    pub created_at: Timestamp,
}

impl Book {
    /// Decode the review status column.
    pub fn book_status(&self) -> Result<BookStatus, libris_core::error::CoreError> {
        BookStatus::parse(&self.status)
    }

    /// Decode the PDF asset reference.
    pub fn pdf_ref(&self) -> AssetReference {
        AssetReference::decode(&self.asset_ref)
    }

    /// Decode the cover asset reference, if a cover was uploaded.
    pub fn cover_reference(&self) -> Option<AssetReference> {
        self.cover_ref.as_deref().map(AssetReference::decode)
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Metadata fields of a book submission, extracted from the multipart form
/// alongside the file parts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub edition: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub category_id: Option<DbId>,
}

/// Fully validated insert payload, produced by ingestion.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub fields: BookFields,
    pub status: BookStatus,
    pub owner_id: DbId,
    pub asset_ref: String,
    pub cover_ref: Option<String>,
    pub file_size_kb: Option<i32>,
    pub page_count: Option<i32>,
}

/// DTO for updating book metadata.
///
/// `status` is only honored for admin actors; for everyone else it is
/// silently ignored so the endpoint stays uniform for both roles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub edition: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    pub category_id: Option<DbId>,
    pub status: Option<String>,
}

/// Query parameters for listing/searching books.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSearchParams {
    /// Filter by title/author substring (ILIKE).
    pub search: Option<String>,
    /// Filter by category id.
    pub category_id: Option<DbId>,
    /// Maximum results (default 20, max 100).
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}
