//! HTTP-level tests for the book submission route's request body handling.
//!
//! The submission cap is sized from the configured per-file limits; a
//! PDF-sized body has to make it past the framework's body cap and into
//! the handler's own field validation.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use libris_core::roles::ROLE_STUDENT;

fn submission_request(auth: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/books")
        .header(header::AUTHORIZATION, auth)
        .header(
            header::CONTENT_TYPE,
            format!(
                "multipart/form-data; boundary={}",
                common::MULTIPART_BOUNDARY
            ),
        )
        .body(Body::from(body))
        .expect("build request")
}

/// A 3 MB PDF is above axum's built-in 2 MB body cap but well inside the
/// configured submission limit: the request must reach field validation
/// instead of dying in the multipart parser.
#[tokio::test]
async fn pdf_sized_submission_reaches_field_validation() {
    let staging = tempfile::tempdir().expect("staging dir");
    let config = common::test_config(staging.path().to_path_buf());
    let auth = common::bearer_token(&config, 1, ROLE_STUDENT);
    let app = common::build_test_app(config);

    let pdf = vec![0u8; 3 * 1024 * 1024];
    let body = common::MultipartBody::new()
        .file("pdf", "draft.pdf", "application/pdf", &pdf)
        .finish();

    let response = app
        .oneshot(submission_request(&auth, body))
        .await
        .expect("request app");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let details = json["details"].as_array().expect("details array");
    assert!(details
        .iter()
        .any(|d| d.as_str().unwrap_or_default().contains("Title")));
}

/// A body beyond the configured cap is still refused.
#[tokio::test]
async fn oversized_submission_is_rejected() {
    let staging = tempfile::tempdir().expect("staging dir");
    let config = common::test_config(staging.path().to_path_buf());
    let auth = common::bearer_token(&config, 1, ROLE_STUDENT);
    let cap = (config.ingestion.max_pdf_mb + config.ingestion.max_cover_mb) as usize * 1024 * 1024;
    let app = common::build_test_app(config);

    let pdf = vec![0u8; cap + 2 * 1024 * 1024];
    let body = common::MultipartBody::new()
        .file("pdf", "huge.pdf", "application/pdf", &pdf)
        .finish();

    let response = app
        .oneshot(submission_request(&auth, body))
        .await
        .expect("request app");

    // The limited body surfaces as a multipart read failure in the handler.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Small submissions with complete metadata problems still validate as
/// before; the raised cap changes nothing under 2 MB.
#[tokio::test]
async fn small_submission_still_validates_fields() {
    let staging = tempfile::tempdir().expect("staging dir");
    let config = common::test_config(staging.path().to_path_buf());
    let auth = common::bearer_token(&config, 1, ROLE_STUDENT);
    let app = common::build_test_app(config);

    let body = common::MultipartBody::new()
        .text("title", "Incomplete")
        .finish();

    let response = app
        .oneshot(submission_request(&auth, body))
        .await
        .expect("request app");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = common::body_json(response).await;
    let details = json["details"].as_array().expect("details array");
    assert!(details
        .iter()
        .any(|d| d.as_str().unwrap_or_default().contains("PDF")));
}
