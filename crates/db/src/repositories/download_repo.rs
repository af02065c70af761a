//! Repository for the idempotent download ledger.

use sqlx::PgPool;

use libris_core::types::DbId;

use crate::models::download::{DownloadRecord, DownloadedBook};

/// Column list for `downloads` queries.
const DOWNLOAD_COLUMNS: &str = "id, user_id, book_id, client_ip, downloaded_at";

/// Provides ledger operations for downloads.
pub struct DownloadRepo;

impl DownloadRepo {
    /// Record a download.
    ///
    /// A single upsert keyed on `(user_id, book_id)`: the first download
    /// inserts a row, every later one refreshes `downloaded_at` and
    /// nothing else; `client_ip` stays whatever the first download
    /// recorded. One statement, so concurrent downloads of the same book
    /// by the same user cannot race into duplicate rows.
    pub async fn record(
        pool: &PgPool,
        user_id: DbId,
        book_id: DbId,
        client_ip: Option<&str>,
    ) -> Result<DownloadRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO downloads (user_id, book_id, client_ip) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, book_id) \
             DO UPDATE SET downloaded_at = now() \
             RETURNING {DOWNLOAD_COLUMNS}"
        );
        sqlx::query_as::<_, DownloadRecord>(&query)
            .bind(user_id)
            .bind(book_id)
            .bind(client_ip)
            .fetch_one(pool)
            .await
    }

    /// Whether the user has ever downloaded the book.
    pub async fn has_downloaded(
        pool: &PgPool,
        user_id: DbId,
        book_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM downloads WHERE user_id = $1 AND book_id = $2",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0 > 0)
    }

    /// Number of distinct users who downloaded the book.
    pub async fn count_for_book(pool: &PgPool, book_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM downloads WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }

    /// The user's download history, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DownloadedBook>, sqlx::Error> {
        sqlx::query_as::<_, DownloadedBook>(
            "SELECT d.book_id, b.title, b.author, d.downloaded_at \
             FROM downloads d \
             JOIN books b ON b.id = d.book_id \
             WHERE d.user_id = $1 \
             ORDER BY d.downloaded_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
