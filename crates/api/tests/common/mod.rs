//! Shared fixtures for the HTTP surface tests.
//!
//! The requests exercised here are rejected before any SQL runs, so the
//! pool is a lazy connection to a placeholder URL and no database needs
//! to be provisioned.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use axum::Router;
use sqlx::postgres::PgPoolOptions;

use libris_api::auth::jwt::{generate_access_token, JwtConfig};
use libris_api::config::ServerConfig;
use libris_api::router::build_app_router;
use libris_api::state::AppState;
use libris_core::types::DbId;
use libris_storage::imagekit::{ImageKitConfig, ImageKitStore};
use libris_storage::ingestion::{IngestionConfig, Ingestor};
use libris_storage::resolver::FileResolver;

pub fn test_config(staging_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        storage: ImageKitConfig {
            private_key: "private_test".to_string(),
            url_endpoint: "https://ik.example.test/libris".to_string(),
            api_base: "https://api.example.test/v1".to_string(),
            upload_url: "https://upload.example.test/api/v1/files/upload".to_string(),
        },
        ingestion: IngestionConfig::new(staging_dir),
        legacy_book_dir: PathBuf::from("./legacy/books"),
        legacy_serve_prefix: "/files/books".to_string(),
    }
}

/// Assemble the full application router the way `main.rs` does, minus the
/// live database and object store.
pub fn build_test_app(config: ServerConfig) -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/placeholder")
        .expect("lazy pool");
    let config = Arc::new(config);
    let store = Arc::new(ImageKitStore::new(config.storage.clone()));
    let resolver = Arc::new(FileResolver::new(
        store.clone(),
        store.url_endpoint().to_string(),
        config.legacy_book_dir.clone(),
        config.legacy_serve_prefix.clone(),
    ));
    let ingestor = Arc::new(Ingestor::new(config.ingestion.clone()));
    let state = AppState {
        pool,
        config: config.clone(),
        store,
        resolver,
        ingestor,
    };
    build_app_router(state, &config)
}

pub fn bearer_token(config: &ServerConfig, user_id: DbId, role: &str) -> String {
    let token = generate_access_token(user_id, role, &config.jwt).expect("sign token");
    format!("Bearer {token}")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("JSON response body")
}

pub const MULTIPART_BOUNDARY: &str = "test-upload-boundary";

/// Hand-rolled `multipart/form-data` body, enough for submission tests.
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
                 {value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}
