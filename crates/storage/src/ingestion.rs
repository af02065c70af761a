//! Upload ingestion: validate, stage, derive metadata, upload, clean up.
//!
//! Incoming payloads are validated by content (the client-supplied MIME
//! type is never trusted), staged to a collision-resistant temp file,
//! measured, and handed to the object store. The staged file is a scoped
//! resource -- it is removed on every exit path, success or failure.
//! No book row is ever created without a successfully stored PDF; the
//! caller only gets an [`AssetReference`] back once the store confirmed
//! the upload.

use std::path::{Path, PathBuf};

use image::ImageFormat;

use libris_core::asset_ref::AssetReference;
use libris_core::error::CoreError;
use libris_core::pdf;
use libris_core::validation::{
    check_upload_size, is_pdf, slugify_title, FieldErrors, DEFAULT_MAX_COVER_MB,
    DEFAULT_MAX_PDF_MB,
};

use crate::error::StorageError;
use crate::object_store::ObjectStore;

/// Object-store folder for book PDFs.
const BOOK_FOLDER: &str = "/books";

/// Object-store folder for cover images.
const COVER_FOLDER: &str = "/covers";

/// Cover formats accepted after content sniffing.
const COVER_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Errors from ingestion: user input on one channel, infrastructure on the
/// other.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Ingestion limits and staging location.
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Directory staged uploads are written to.
    pub staging_dir: PathBuf,
    /// Maximum PDF size in megabytes.
    pub max_pdf_mb: u64,
    /// Maximum cover image size in megabytes.
    pub max_cover_mb: u64,
}

impl IngestionConfig {
    pub fn new(staging_dir: PathBuf) -> Self {
        Self {
            staging_dir,
            max_pdf_mb: DEFAULT_MAX_PDF_MB,
            max_cover_mb: DEFAULT_MAX_COVER_MB,
        }
    }
}

/// Result of a successful PDF ingestion.
#[derive(Debug, Clone)]
pub struct PdfIngest {
    pub asset_ref: AssetReference,
    pub file_size_kb: i32,
    /// Best-effort; `None` when the heuristic scan was indeterminate.
    pub page_count: Option<i32>,
}

// ---------------------------------------------------------------------------
// Scoped staging
// ---------------------------------------------------------------------------

/// A staged temp file, removed when the guard drops.
///
/// The remove also runs on the success path: once the store holds the
/// bytes, the local copy has no further use.
struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    async fn write(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged file");
            }
        }
    }
}

/// Collision-resistant staging name: `{uuid}_{slug}_{yyyymmdd}.{ext}`.
fn staging_name(title: &str, extension: &str) -> String {
    format!(
        "{}_{}_{}.{extension}",
        uuid::Uuid::new_v4().simple(),
        slugify_title(title),
        chrono::Utc::now().format("%Y%m%d"),
    )
}

// ---------------------------------------------------------------------------
// Ingestor
// ---------------------------------------------------------------------------

/// Stages and uploads validated book payloads.
pub struct Ingestor {
    config: IngestionConfig,
}

impl Ingestor {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    /// Validate, stage, and upload a book PDF.
    ///
    /// Validation failures (wrong type, oversized) are collected and
    /// reported together, and no upload is attempted. On upload failure
    /// the staged file is still removed before the error propagates.
    pub async fn ingest_pdf(
        &self,
        store: &dyn ObjectStore,
        title: &str,
        bytes: &[u8],
    ) -> Result<PdfIngest, IngestError> {
        let mut errors = FieldErrors::new();
        if !is_pdf(bytes) {
            errors.push("Uploaded file is not a PDF");
        }
        check_upload_size(&mut errors, "PDF", bytes.len() as u64, self.config.max_pdf_mb);
        errors.into_result()?;

        // Derived metadata comes from the payload itself; indeterminate
        // page counts never block ingestion.
        let page_count = pdf::page_count(bytes);
        let file_size_kb = pdf::size_kb(bytes.len() as u64);

        let file_name = staging_name(title, "pdf");
        let staged = StagedFile::write(&self.config.staging_dir, &file_name, bytes)
            .await
            .map_err(IngestError::Storage)?;

        let uploaded = store
            .upload(staged.path(), &file_name, BOOK_FOLDER, "application/pdf")
            .await?;

        tracing::info!(
            file_name = %file_name,
            external_id = %uploaded.external_id,
            size_kb = file_size_kb,
            "Book PDF stored",
        );

        Ok(PdfIngest {
            asset_ref: AssetReference::Remote {
                stored_path: uploaded.stored_path,
                external_id: uploaded.external_id,
            },
            file_size_kb,
            page_count,
        })
    }

    /// Validate, stage, and upload an optional cover image.
    ///
    /// Runs independently of the PDF; whether a cover failure sinks the
    /// whole submission is the caller's decision.
    pub async fn ingest_cover(
        &self,
        store: &dyn ObjectStore,
        title: &str,
        bytes: &[u8],
    ) -> Result<AssetReference, IngestError> {
        let format = image::guess_format(bytes).ok();
        let mut errors = FieldErrors::new();
        let format = match format {
            Some(f) if COVER_FORMATS.contains(&f) => Some(f),
            _ => {
                errors.push("Cover must be a JPEG, PNG, GIF, or WebP image");
                None
            }
        };
        check_upload_size(
            &mut errors,
            "Cover image",
            bytes.len() as u64,
            self.config.max_cover_mb,
        );
        errors.into_result()?;
        let format = format.expect("validated above");

        let file_name = staging_name(title, format.extensions_str()[0]);
        let staged = StagedFile::write(&self.config.staging_dir, &file_name, bytes)
            .await
            .map_err(IngestError::Storage)?;

        let uploaded = store
            .upload(
                staged.path(),
                &file_name,
                COVER_FOLDER,
                format.to_mime_type(),
            )
            .await?;

        tracing::info!(
            file_name = %file_name,
            external_id = %uploaded.external_id,
            "Cover image stored",
        );

        Ok(AssetReference::Remote {
            stored_path: uploaded.stored_path,
            external_id: uploaded.external_id,
        })
    }
}
