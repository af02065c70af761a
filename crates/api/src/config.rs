use std::path::PathBuf;

use libris_core::validation::{DEFAULT_MAX_COVER_MB, DEFAULT_MAX_PDF_MB};
use libris_storage::imagekit::ImageKitConfig;
use libris_storage::ingestion::IngestionConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the storage and JWT secrets have sensible defaults
/// suitable for local development. In production, override via environment
/// variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry duration).
    pub jwt: JwtConfig,
    /// Object-store connection settings.
    pub storage: ImageKitConfig,
    /// Upload staging location and size limits.
    pub ingestion: IngestionConfig,
    /// Directory pre-migration book files live in.
    pub legacy_book_dir: PathBuf,
    /// Route prefix the web layer serves `legacy_book_dir` under.
    pub legacy_serve_prefix: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                             |
    /// |------------------------|-------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                           |
    /// | `PORT`                 | `3000`                              |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`             |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                |
    /// | `STORAGE_PRIVATE_KEY`  | (required)                          |
    /// | `STORAGE_URL_ENDPOINT` | (required)                          |
    /// | `STORAGE_API_BASE`     | `https://api.imagekit.io/v1`        |
    /// | `STORAGE_UPLOAD_URL`   | `https://upload.imagekit.io/api/v1/files/upload` |
    /// | `UPLOAD_STAGING_DIR`   | `./staging`                         |
    /// | `MAX_PDF_UPLOAD_MB`    | `50`                                |
    /// | `MAX_COVER_UPLOAD_MB`  | `5`                                 |
    /// | `LEGACY_BOOK_DIR`      | `./legacy/books`                    |
    /// | `LEGACY_SERVE_PREFIX`  | `/files/books`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let storage = ImageKitConfig {
            private_key: std::env::var("STORAGE_PRIVATE_KEY")
                .expect("STORAGE_PRIVATE_KEY must be set"),
            url_endpoint: std::env::var("STORAGE_URL_ENDPOINT")
                .expect("STORAGE_URL_ENDPOINT must be set"),
            api_base: std::env::var("STORAGE_API_BASE")
                .unwrap_or_else(|_| "https://api.imagekit.io/v1".into()),
            upload_url: std::env::var("STORAGE_UPLOAD_URL")
                .unwrap_or_else(|_| "https://upload.imagekit.io/api/v1/files/upload".into()),
        };

        let staging_dir: PathBuf = std::env::var("UPLOAD_STAGING_DIR")
            .unwrap_or_else(|_| "./staging".into())
            .into();

        let max_pdf_mb: u64 = std::env::var("MAX_PDF_UPLOAD_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_PDF_MB.to_string())
            .parse()
            .expect("MAX_PDF_UPLOAD_MB must be a valid u64");

        let max_cover_mb: u64 = std::env::var("MAX_COVER_UPLOAD_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_COVER_MB.to_string())
            .parse()
            .expect("MAX_COVER_UPLOAD_MB must be a valid u64");

        let ingestion = IngestionConfig {
            staging_dir,
            max_pdf_mb,
            max_cover_mb,
        };

        let legacy_book_dir: PathBuf = std::env::var("LEGACY_BOOK_DIR")
            .unwrap_or_else(|_| "./legacy/books".into())
            .into();

        let legacy_serve_prefix =
            std::env::var("LEGACY_SERVE_PREFIX").unwrap_or_else(|_| "/files/books".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            storage,
            ingestion,
            legacy_book_dir,
            legacy_serve_prefix,
        }
    }
}
