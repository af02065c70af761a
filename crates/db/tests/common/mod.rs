//! Shared fixtures for the database-backed repository tests.
//!
//! The suite runs against a real Postgres named by `DATABASE_URL` and
//! applies the crate's migrations before the first query. When the
//! variable is unset each test returns early, so `cargo test` stays
//! green on machines without a provisioned database.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use libris_core::lifecycle::BookStatus;
use libris_core::types::DbId;
use libris_db::models::book::{BookFields, NewBook};
use libris_db::models::category::{Category, CreateCategory};
use libris_db::models::user::{UpsertUser, User};
use libris_db::repositories::{CategoryRepo, UserRepo};

pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to test database");
    libris_db::run_migrations(&pool)
        .await
        .expect("apply migrations");
    Some(pool)
}

/// Unique fixture name so tests can share one database.
pub fn unique(prefix: &str) -> String {
    static SEQ: AtomicU32 = AtomicU32::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock")
        .subsec_nanos();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{seq}")
}

pub async fn seed_user(pool: &PgPool) -> User {
    let external_id = unique("ext");
    UserRepo::upsert_from_identity(
        pool,
        &UpsertUser {
            email: format!("{external_id}@example.test"),
            display_name: "Test Reader".to_string(),
            external_id,
        },
    )
    .await
    .expect("seed user")
}

pub async fn seed_category(pool: &PgPool) -> Category {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: unique("category"),
        },
    )
    .await
    .expect("seed category")
}

pub fn new_book(owner_id: DbId, category_id: Option<DbId>) -> NewBook {
    NewBook {
        fields: BookFields {
            title: unique("title"),
            author: "Test Author".to_string(),
            edition: None,
            description: None,
            published_year: Some(2020),
            category_id,
        },
        status: BookStatus::Pending,
        owner_id,
        asset_ref: "books/test.pdf|file-1".to_string(),
        cover_ref: None,
        file_size_kb: Some(128),
        page_count: Some(12),
    }
}
