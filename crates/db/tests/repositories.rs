//! Database-backed tests for the download ledger and the denormalized
//! category usage counts.

mod common;

use libris_db::models::book::UpdateBook;
use libris_core::lifecycle::BookStatus;
use libris_db::repositories::{BookRepo, CategoryRepo, DownloadRepo};

/// Repeated downloads by the same user collapse into one ledger row.
/// Only `downloaded_at` moves on repeats; the recorded client IP stays
/// whatever the first download carried.
#[tokio::test]
async fn repeat_downloads_keep_a_single_ledger_row() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let user = common::seed_user(&pool).await;
    let book = BookRepo::create(&pool, &common::new_book(user.id, None))
        .await
        .expect("create book");

    let first = DownloadRepo::record(&pool, user.id, book.id, Some("203.0.113.7"))
        .await
        .expect("first download");
    let second = DownloadRepo::record(&pool, user.id, book.id, Some("198.51.100.9"))
        .await
        .expect("second download");
    let third = DownloadRepo::record(&pool, user.id, book.id, None)
        .await
        .expect("third download");

    assert_eq!(DownloadRepo::count_for_book(&pool, book.id).await.unwrap(), 1);
    assert_eq!(second.id, first.id);
    assert_eq!(third.id, first.id);
    assert!(third.downloaded_at >= first.downloaded_at);
    assert_eq!(third.client_ip.as_deref(), Some("203.0.113.7"));
    assert!(DownloadRepo::has_downloaded(&pool, user.id, book.id)
        .await
        .unwrap());
}

/// Ledger rows are per (user, book): a second user downloading the same
/// book adds a row instead of touching the first user's.
#[tokio::test]
async fn downloads_by_different_users_stay_separate() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let alice = common::seed_user(&pool).await;
    let bob = common::seed_user(&pool).await;
    let book = BookRepo::create(&pool, &common::new_book(alice.id, None))
        .await
        .expect("create book");

    DownloadRepo::record(&pool, alice.id, book.id, None)
        .await
        .expect("alice downloads");
    DownloadRepo::record(&pool, bob.id, book.id, None)
        .await
        .expect("bob downloads");

    assert_eq!(DownloadRepo::count_for_book(&pool, book.id).await.unwrap(), 2);
    assert!(!DownloadRepo::has_downloaded(&pool, bob.id, alice.id + 1_000_000)
        .await
        .unwrap());
}

/// Usage counts follow the book through its whole lifecycle: +1 on
/// create (even while pending), moved on a category change, untouched
/// by status transitions, and -1 on delete.
#[tokio::test]
async fn usage_counts_are_conserved_across_book_lifecycle() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let owner = common::seed_user(&pool).await;
    let fiction = common::seed_category(&pool).await;
    let science = common::seed_category(&pool).await;

    let book = BookRepo::create(&pool, &common::new_book(owner.id, Some(fiction.id)))
        .await
        .expect("create book");
    assert_eq!(usage(&pool, fiction.id).await, 1);
    assert_eq!(usage(&pool, science.id).await, 0);

    let patch = UpdateBook {
        category_id: Some(science.id),
        ..Default::default()
    };
    BookRepo::update(&pool, book.id, &patch)
        .await
        .expect("move category")
        .expect("book exists");
    assert_eq!(usage(&pool, fiction.id).await, 0);
    assert_eq!(usage(&pool, science.id).await, 1);

    BookRepo::set_status(&pool, book.id, BookStatus::Approved)
        .await
        .expect("approve")
        .expect("book exists");
    assert_eq!(usage(&pool, science.id).await, 1);

    assert!(BookRepo::delete(&pool, book.id).await.expect("delete"));
    assert_eq!(usage(&pool, science.id).await, 0);
}

/// A metadata-only patch leaves the category counts where they were.
#[tokio::test]
async fn metadata_patch_without_category_keeps_counts() {
    let Some(pool) = common::test_pool().await else {
        return;
    };
    let owner = common::seed_user(&pool).await;
    let category = common::seed_category(&pool).await;
    let book = BookRepo::create(&pool, &common::new_book(owner.id, Some(category.id)))
        .await
        .expect("create book");

    let patch = UpdateBook {
        title: Some("Revised Title".to_string()),
        ..Default::default()
    };
    BookRepo::update(&pool, book.id, &patch)
        .await
        .expect("patch")
        .expect("book exists");
    assert_eq!(usage(&pool, category.id).await, 1);
}

async fn usage(pool: &sqlx::PgPool, category_id: libris_core::types::DbId) -> i64 {
    CategoryRepo::find_by_id(pool, category_id)
        .await
        .expect("load category")
        .expect("category exists")
        .usage_count
}
