//! Repository for the `books` table and its category-count bookkeeping.
//!
//! `categories.usage_count` is the number of books referencing a category,
//! whatever their status. Every write that changes a book's category
//! membership (create, category change, delete) adjusts the counter inside
//! the same transaction, so a handled failure can never leave it skewed.

use sqlx::{PgPool, Postgres, Transaction};

use libris_core::lifecycle::BookStatus;
use libris_core::types::DbId;

use crate::models::book::{Book, BookSearchParams, NewBook, UpdateBook};

/// Column list for `books` queries.
const BOOK_COLUMNS: &str = "\
    id, title, author, edition, description, published_year, \
    status, category_id, owner_id, asset_ref, cover_ref, \
    file_size_kb, page_count, created_at";

/// Default page size for book listing.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for book listing.
const MAX_LIMIT: i64 = 100;

/// Provides CRUD operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a book row and bump the targeted category's usage count in
    /// one transaction.
    pub async fn create(pool: &PgPool, input: &NewBook) -> Result<Book, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO books (\
                title, author, edition, description, published_year, \
                status, category_id, owner_id, asset_ref, cover_ref, \
                file_size_kb, page_count\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {BOOK_COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(input.fields.title.trim())
            .bind(input.fields.author.trim())
            .bind(input.fields.edition.as_deref())
            .bind(input.fields.description.as_deref())
            .bind(input.fields.published_year)
            .bind(input.status.as_str())
            .bind(input.fields.category_id)
            .bind(input.owner_id)
            .bind(&input.asset_ref)
            .bind(input.cover_ref.as_deref())
            .bind(input.file_size_kb)
            .bind(input.page_count)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(category_id) = input.fields.category_id {
            adjust_usage_count(&mut tx, category_id, 1).await?;
        }

        tx.commit().await?;
        Ok(book)
    }

    /// Find a book by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search books with optional filters and pagination.
    ///
    /// With `approved_only` the query is restricted to approved books;
    /// admin listings pass `false` to see the full catalog.
    pub async fn search(
        pool: &PgPool,
        params: &BookSearchParams,
        approved_only: bool,
    ) -> Result<Vec<Book>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if approved_only {
            conditions.push("status = 'approved'".to_string());
        }
        if params.search.is_some() {
            conditions.push(format!(
                "(title ILIKE ${bind_idx} OR author ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.category_id.is_some() {
            conditions.push(format!("category_id = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Book>(&query);

        // Bind dynamic parameters in order.
        if let Some(ref search) = params.search {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(category_id) = params.category_id {
            q = q.bind(category_id);
        }

        q = q.bind(limit).bind(offset);
        q.fetch_all(pool).await
    }

    /// List all books owned by a user, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List books awaiting review, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE status = 'pending' ORDER BY created_at"
        );
        sqlx::query_as::<_, Book>(&query).fetch_all(pool).await
    }

    /// Patch book metadata.
    ///
    /// If the patch moves the book to a different category, both usage
    /// counts are adjusted in the same transaction as the row update.
    /// The `status` field of the patch is ignored here; status changes go
    /// through [`BookRepo::set_status`].
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT category_id FROM books WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((old_category,)) = old else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE books SET \
                title = COALESCE($2, title), \
                author = COALESCE($3, author), \
                edition = COALESCE($4, edition), \
                description = COALESCE($5, description), \
                published_year = COALESCE($6, published_year), \
                category_id = COALESCE($7, category_id) \
             WHERE id = $1 \
             RETURNING {BOOK_COLUMNS}"
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.author.as_deref())
            .bind(input.edition.as_deref())
            .bind(input.description.as_deref())
            .bind(input.published_year)
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(new_category) = input.category_id {
            if old_category != Some(new_category) {
                if let Some(old_id) = old_category {
                    adjust_usage_count(&mut tx, old_id, -1).await?;
                }
                adjust_usage_count(&mut tx, new_category, 1).await?;
            }
        }

        tx.commit().await?;
        Ok(Some(book))
    }

    /// Set the review status. Status changes do not touch usage counts.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: BookStatus,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET status = $2 WHERE id = $1 RETURNING {BOOK_COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a book row, decrementing its category's usage count in the
    /// same transaction. Downloads and favorites cascade at the schema
    /// level. Returns true if a row was deleted.
    ///
    /// Remote asset deletion happens before this call (best-effort); the
    /// acceptable direction of inconsistency is an orphaned remote blob,
    /// never a dangling usage count.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT category_id FROM books WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((category_id,)) = old else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(category_id) = category_id {
            adjust_usage_count(&mut tx, category_id, -1).await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}

/// Adjust a category's denormalized usage count, clamping at zero.
async fn adjust_usage_count(
    tx: &mut Transaction<'_, Postgres>,
    category_id: DbId,
    delta: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE categories \
         SET usage_count = GREATEST(usage_count + $2, 0) \
         WHERE id = $1",
    )
    .bind(category_id)
    .bind(delta)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
