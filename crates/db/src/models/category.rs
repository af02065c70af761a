//! Category models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use libris_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
///
/// `usage_count` is a denormalized count of books referencing the category,
/// maintained transactionally by [`crate::repositories::BookRepo`] on
/// create, category change, and delete.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub usage_count: i64,
    pub created_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

/// DTO for renaming a category.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub name: String,
}
