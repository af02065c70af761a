//! Favorite models.

use serde::Serialize;

use libris_core::types::DbId;

/// Result of a toggle operation.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleResult {
    pub book_id: DbId,
    pub favorited: bool,
}
