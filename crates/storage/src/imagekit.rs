//! HTTP client for the ImageKit-style object store.
//!
//! Wraps the store's REST API (multipart upload, delete, file details) using
//! [`reqwest`], plus the pure transformation-URL builder. Authentication is
//! basic auth with the private API key as the username.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::StorageError;
use crate::object_store::{FileDetails, ObjectStore, UploadedObject};

/// Timeout for multipart uploads.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for metadata and delete calls.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameter that forces `Content-Disposition: attachment`.
const ATTACHMENT_PARAM: &str = "ik-attachment=true";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Transformation parameters for served URLs.
///
/// Unset parameters are omitted from the URL entirely; the store treats a
/// missing parameter as "no transformation", whereas an empty value is an
/// error on its side.
#[derive(Debug, Clone, Default)]
pub struct Transformations {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Quality, e.g. `"80"` or `"auto"`.
    pub quality: Option<String>,
    /// Output format, e.g. `"webp"` or `"auto"`.
    pub format: Option<String>,
}

impl Transformations {
    /// Thumbnail preset used for cover images.
    pub fn thumbnail(width: u32) -> Self {
        Self {
            width: Some(width),
            quality: Some("auto".to_string()),
            format: Some("auto".to_string()),
            ..Self::default()
        }
    }

    fn segment(&self) -> Option<String> {
        let mut params = Vec::new();
        if let Some(w) = self.width {
            params.push(format!("w-{w}"));
        }
        if let Some(h) = self.height {
            params.push(format!("h-{h}"));
        }
        if let Some(ref q) = self.quality {
            params.push(format!("q-{q}"));
        }
        if let Some(ref f) = self.format {
            params.push(format!("f-{f}"));
        }
        if params.is_empty() {
            None
        } else {
            Some(format!("tr:{}", params.join(",")))
        }
    }
}

/// Build a serving URL: `{endpoint}/tr:{params}/{path}`, with the `tr:`
/// segment omitted when no transformation is set. Pure string
/// construction; never makes a network call, never fails.
pub fn build_url(endpoint: &str, stored_path: &str, transformations: &Transformations) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    let path = stored_path.trim_start_matches('/');
    match transformations.segment() {
        Some(segment) => format!("{endpoint}/{segment}/{path}"),
        None => format!("{endpoint}/{path}"),
    }
}

/// [`build_url`] with the attachment-forcing query parameter appended, for
/// download URLs.
pub fn build_download_url(
    endpoint: &str,
    stored_path: &str,
    transformations: &Transformations,
) -> String {
    let url = build_url(endpoint, stored_path, transformations);
    let joiner = if url.contains('?') { '&' } else { '?' };
    format!("{url}{joiner}{ATTACHMENT_PARAM}")
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Connection settings for the store.
#[derive(Debug, Clone)]
pub struct ImageKitConfig {
    /// Private API key (basic-auth username).
    pub private_key: String,
    /// Public serving endpoint, e.g. `https://ik.imagekit.io/libris`.
    pub url_endpoint: String,
    /// Management API base, e.g. `https://api.imagekit.io/v1`.
    pub api_base: String,
    /// Upload API endpoint.
    pub upload_url: String,
}

/// HTTP client for the store's REST API.
pub struct ImageKitStore {
    client: reqwest::Client,
    config: ImageKitConfig,
}

/// Response from the upload endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_id: String,
    file_path: String,
    url: String,
    size: u64,
}

/// Response from the file-details endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsResponse {
    file_path: String,
    name: String,
    size: u64,
}

impl ImageKitStore {
    pub fn new(config: ImageKitConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// The public serving endpoint, for URL construction by the resolver.
    pub fn url_endpoint(&self) -> &str {
        &self.config.url_endpoint
    }

    async fn read_error_body(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        format!("status {status}: {body}")
    }
}

#[async_trait::async_trait]
impl ObjectStore for ImageKitStore {
    async fn upload(
        &self,
        local_path: &Path,
        file_name: &str,
        folder: &str,
        mime_type: &str,
    ) -> Result<UploadedObject, StorageError> {
        let bytes = tokio::fs::read(local_path).await?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| StorageError::Upload(format!("invalid MIME type: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("fileName", file_name.to_string())
            .text("folder", folder.to_string())
            .text("useUniqueFileName", "false");

        let response = self
            .client
            .post(&self.config.upload_url)
            .basic_auth(&self.config.private_key, Some(""))
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Upload(format!("transport error: {e}")))?;

        if !response.status().is_success() {
            return Err(StorageError::Upload(Self::read_error_body(response).await));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Upload(format!("malformed upload response: {e}")))?;

        Ok(UploadedObject {
            stored_path: body.file_path,
            external_id: body.file_id,
            served_url: body.url,
            size_bytes: body.size,
        })
    }

    async fn delete(&self, external_id: &str) -> bool {
        let url = format!("{}/files/{external_id}", self.config.api_base);
        let result = self
            .client
            .delete(&url)
            .basic_auth(&self.config.private_key, Some(""))
            .timeout(API_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(
                    external_id,
                    status = %response.status(),
                    "Remote delete rejected; leaving dangling object",
                );
                false
            }
            Err(e) => {
                tracing::warn!(external_id, error = %e, "Remote delete failed");
                false
            }
        }
    }

    async fn file_details(&self, external_id: &str) -> Result<FileDetails, StorageError> {
        let url = format!("{}/files/{external_id}/details", self.config.api_base);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.private_key, Some(""))
            .timeout(API_TIMEOUT)
            .send()
            .await
            .map_err(|e| StorageError::Lookup(format!("transport error: {e}")))?;

        if !response.status().is_success() {
            return Err(StorageError::Lookup(Self::read_error_body(response).await));
        }

        let body: DetailsResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Lookup(format!("malformed details response: {e}")))?;

        Ok(FileDetails {
            stored_path: body.file_path,
            name: body.name,
            size_bytes: body.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_transformations_has_no_tr_segment() {
        let url = build_url(
            "https://ik.example.com/libris",
            "/books/a.pdf",
            &Transformations::default(),
        );
        assert_eq!(url, "https://ik.example.com/libris/books/a.pdf");
    }

    #[test]
    fn url_with_width_and_quality() {
        let tr = Transformations {
            width: Some(300),
            quality: Some("auto".to_string()),
            ..Transformations::default()
        };
        let url = build_url("https://ik.example.com/libris", "/covers/c.jpg", &tr);
        assert_eq!(
            url,
            "https://ik.example.com/libris/tr:w-300,q-auto/covers/c.jpg"
        );
    }

    #[test]
    fn unset_parameters_are_omitted_not_empty() {
        let tr = Transformations {
            height: Some(400),
            ..Transformations::default()
        };
        let url = build_url("https://ik.example.com/libris", "/covers/c.jpg", &tr);
        assert!(!url.contains("w-"));
        assert!(!url.contains("q-"));
        assert!(url.contains("tr:h-400/"));
    }

    #[test]
    fn thumbnail_preset_sets_auto_quality_and_format() {
        let url = build_url(
            "https://ik.example.com/libris",
            "/covers/c.jpg",
            &Transformations::thumbnail(300),
        );
        assert_eq!(
            url,
            "https://ik.example.com/libris/tr:w-300,q-auto,f-auto/covers/c.jpg"
        );
    }

    #[test]
    fn download_url_forces_attachment() {
        let url = build_download_url(
            "https://ik.example.com/libris",
            "/books/a.pdf",
            &Transformations::default(),
        );
        assert_eq!(
            url,
            "https://ik.example.com/libris/books/a.pdf?ik-attachment=true"
        );
    }

    #[test]
    fn trailing_and_leading_slashes_normalize() {
        let url = build_url(
            "https://ik.example.com/libris/",
            "books/a.pdf",
            &Transformations::default(),
        );
        assert_eq!(url, "https://ik.example.com/libris/books/a.pdf");
    }
}
