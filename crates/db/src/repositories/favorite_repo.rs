//! Repository for the `favorites` table.

use sqlx::PgPool;

use libris_core::types::DbId;

use crate::models::book::Book;
use crate::models::favorite::ToggleResult;

/// Provides toggle/list operations for favorites.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Toggle a favorite: delete the pair if it exists, insert otherwise.
    ///
    /// The delete-first form makes the toggle a two-statement idempotent
    /// flip; `ON CONFLICT DO NOTHING` covers the insert race.
    pub async fn toggle(
        pool: &PgPool,
        user_id: DbId,
        book_id: DbId,
    ) -> Result<ToggleResult, sqlx::Error> {
        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(pool)
            .await?;

        if removed.rows_affected() > 0 {
            return Ok(ToggleResult {
                book_id,
                favorited: false,
            });
        }

        sqlx::query(
            "INSERT INTO favorites (user_id, book_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, book_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(book_id)
        .execute(pool)
        .await?;

        Ok(ToggleResult {
            book_id,
            favorited: true,
        })
    }

    /// Whether the user has favorited the book.
    pub async fn is_favorited(
        pool: &PgPool,
        user_id: DbId,
        book_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM favorites WHERE user_id = $1 AND book_id = $2",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0 > 0)
    }

    /// The user's favorited books that are still approved, newest first.
    pub async fn list_books_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            "SELECT b.id, b.title, b.author, b.edition, b.description, \
                    b.published_year, b.status, b.category_id, b.owner_id, \
                    b.asset_ref, b.cover_ref, b.file_size_kb, b.page_count, \
                    b.created_at \
             FROM favorites f \
             JOIN books b ON b.id = f.book_id \
             WHERE f.user_id = $1 AND b.status = 'approved' \
             ORDER BY f.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
