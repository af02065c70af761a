//! Download ledger models.

use serde::Serialize;
use sqlx::FromRow;

use libris_core::types::{DbId, Timestamp};

/// A row from the `downloads` table.
///
/// The ledger tracks "has this user downloaded this book, and when last" --
/// at most one row per (user, book), with `downloaded_at` refreshed on
/// repeat downloads. It is not a full audit trail.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DownloadRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub book_id: DbId,
    pub client_ip: Option<String>,
    pub downloaded_at: Timestamp,
}

/// A ledger row joined with the book it refers to, for history listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DownloadedBook {
    pub book_id: DbId,
    pub title: String,
    pub author: String,
    pub downloaded_at: Timestamp,
}
