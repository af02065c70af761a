//! Tiered resolution of asset references into serving URLs.
//!
//! An [`AssetReference`] is turned into a URL by trying an ordered list of
//! tiers, logging what each one did:
//!
//! 1. `remote-verified` -- confirm the object exists via the store's
//!    metadata API and build the URL from its canonical path;
//! 2. `remote-direct` -- build the URL from the recorded path without
//!    verification (used when the store's API is down);
//! 3. `legacy-local` -- pre-migration rows: check the local filesystem and
//!    serve through the local file route.
//!
//! View resolution degrades tier by tier and returns `None` at the end --
//! an unverified URL is better than blocking the viewer, and a broken
//! inline preview is tolerable. Download resolution must produce a usable
//! file or fail loudly, so it returns [`StorageError::Resolution`] carrying
//! the per-tier trail instead of degrading silently.

use std::path::PathBuf;
use std::sync::Arc;

use libris_core::asset_ref::AssetReference;

use crate::error::StorageError;
use crate::imagekit::{build_download_url, build_url, Transformations};
use crate::object_store::ObjectStore;

/// Whether the resolved URL is for inline viewing or a forced download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlIntent {
    View,
    Download,
}

/// Resolution tiers, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    RemoteVerified,
    RemoteDirect,
    LegacyLocal,
}

impl Tier {
    fn name(self) -> &'static str {
        match self {
            Tier::RemoteVerified => "remote-verified",
            Tier::RemoteDirect => "remote-direct",
            Tier::LegacyLocal => "legacy-local",
        }
    }
}

/// Turns stored asset references into serving URLs.
pub struct FileResolver {
    store: Arc<dyn ObjectStore>,
    /// Public serving endpoint for URL construction.
    url_endpoint: String,
    /// Directory legacy (pre-migration) files live in.
    legacy_dir: PathBuf,
    /// Route prefix the web layer serves `legacy_dir` under.
    legacy_serve_prefix: String,
}

impl FileResolver {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        url_endpoint: String,
        legacy_dir: PathBuf,
        legacy_serve_prefix: String,
    ) -> Self {
        Self {
            store,
            url_endpoint,
            legacy_dir,
            legacy_serve_prefix,
        }
    }

    /// Resolve a URL for inline viewing.
    ///
    /// Returns `None` when no tier produced a URL; callers surface that as
    /// "unavailable" rather than an error.
    pub async fn resolve_view_url(
        &self,
        asset_ref: &AssetReference,
        transformations: &Transformations,
    ) -> Option<String> {
        match self
            .resolve(asset_ref, UrlIntent::View, transformations)
            .await
        {
            Ok(url) => Some(url),
            Err(StorageError::Resolution { attempts }) => {
                tracing::warn!(trail = ?attempts, "No tier produced a view URL");
                None
            }
            Err(other) => {
                tracing::warn!(error = %other, "View URL resolution failed");
                None
            }
        }
    }

    /// Resolve a URL that forces a download.
    ///
    /// Errors with the full per-tier trail when nothing worked.
    pub async fn resolve_download_url(
        &self,
        asset_ref: &AssetReference,
    ) -> Result<String, StorageError> {
        self.resolve(asset_ref, UrlIntent::Download, &Transformations::default())
            .await
    }

    /// Try each applicable tier in order, collecting a failure note per
    /// tier for the resolution trail.
    async fn resolve(
        &self,
        asset_ref: &AssetReference,
        intent: UrlIntent,
        transformations: &Transformations,
    ) -> Result<String, StorageError> {
        let tiers: &[Tier] = match asset_ref {
            AssetReference::Remote { .. } => &[Tier::RemoteVerified, Tier::RemoteDirect],
            AssetReference::LegacyLocal { .. } => &[Tier::LegacyLocal],
        };

        let mut attempts = Vec::new();
        for &tier in tiers {
            match self.try_tier(tier, asset_ref, intent, transformations).await {
                Ok(url) => {
                    tracing::debug!(tier = tier.name(), %url, "Resolved asset URL");
                    if !attempts.is_empty() {
                        tracing::info!(
                            tier = tier.name(),
                            skipped = ?attempts,
                            "Asset URL resolved after fallback",
                        );
                    }
                    return Ok(url);
                }
                Err(note) => {
                    tracing::warn!(tier = tier.name(), reason = %note, "Resolution tier failed");
                    attempts.push(format!("{}: {note}", tier.name()));
                }
            }
        }

        Err(StorageError::Resolution { attempts })
    }

    async fn try_tier(
        &self,
        tier: Tier,
        asset_ref: &AssetReference,
        intent: UrlIntent,
        transformations: &Transformations,
    ) -> Result<String, String> {
        match (tier, asset_ref) {
            (Tier::RemoteVerified, AssetReference::Remote { external_id, .. }) => {
                let details = self
                    .store
                    .file_details(external_id)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(self.remote_url(&details.stored_path, intent, transformations))
            }
            (Tier::RemoteDirect, AssetReference::Remote { stored_path, .. }) => {
                Ok(self.remote_url(stored_path, intent, transformations))
            }
            (Tier::LegacyLocal, AssetReference::LegacyLocal { file_name }) => {
                let local = self.legacy_dir.join(file_name);
                if local.is_file() {
                    Ok(format!(
                        "{}/{file_name}",
                        self.legacy_serve_prefix.trim_end_matches('/')
                    ))
                } else {
                    Err(format!("legacy file missing: {}", local.display()))
                }
            }
            _ => Err("tier not applicable to reference".to_string()),
        }
    }

    fn remote_url(
        &self,
        stored_path: &str,
        intent: UrlIntent,
        transformations: &Transformations,
    ) -> String {
        match intent {
            UrlIntent::View => build_url(&self.url_endpoint, stored_path, transformations),
            UrlIntent::Download => {
                build_download_url(&self.url_endpoint, stored_path, transformations)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStore;
    use assert_matches::assert_matches;

    const ENDPOINT: &str = "https://ik.example.com/libris";

    fn resolver(store: MockStore, legacy_dir: PathBuf) -> FileResolver {
        FileResolver::new(
            Arc::new(store),
            ENDPOINT.to_string(),
            legacy_dir,
            "/files/books".to_string(),
        )
    }

    fn remote_ref() -> AssetReference {
        AssetReference::Remote {
            stored_path: "/books/a.pdf".to_string(),
            external_id: "file123".to_string(),
        }
    }

    #[tokio::test]
    async fn view_url_uses_canonical_path_when_lookup_succeeds() {
        let r = resolver(MockStore::new(), PathBuf::from("/nonexistent"));
        let url = r
            .resolve_view_url(&remote_ref(), &Transformations::default())
            .await
            .unwrap();
        // MockStore reports /canonical/{id}.pdf as the canonical path.
        assert_eq!(url, format!("{ENDPOINT}/canonical/file123.pdf"));
    }

    #[tokio::test]
    async fn view_url_falls_back_to_direct_when_lookup_fails() {
        let r = resolver(MockStore::failing_details(), PathBuf::from("/nonexistent"));
        let url = r
            .resolve_view_url(&remote_ref(), &Transformations::default())
            .await
            .unwrap();
        // Unverified URL from the recorded path; non-empty rather than an error.
        assert_eq!(url, format!("{ENDPOINT}/books/a.pdf"));
    }

    #[tokio::test]
    async fn download_url_has_attachment_parameter() {
        let r = resolver(MockStore::new(), PathBuf::from("/nonexistent"));
        let url = r.resolve_download_url(&remote_ref()).await.unwrap();
        assert!(url.ends_with("?ik-attachment=true"));
    }

    #[tokio::test]
    async fn legacy_ref_resolves_when_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.pdf"), b"%PDF-1.4").unwrap();

        let r = resolver(MockStore::new(), dir.path().to_path_buf());
        let asset_ref = AssetReference::LegacyLocal {
            file_name: "old.pdf".to_string(),
        };
        let url = r
            .resolve_view_url(&asset_ref, &Transformations::default())
            .await
            .unwrap();
        assert_eq!(url, "/files/books/old.pdf");
    }

    #[tokio::test]
    async fn legacy_ref_view_is_unavailable_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let r = resolver(MockStore::new(), dir.path().to_path_buf());
        let asset_ref = AssetReference::LegacyLocal {
            file_name: "gone.pdf".to_string(),
        };
        assert!(r
            .resolve_view_url(&asset_ref, &Transformations::default())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn legacy_ref_download_fails_loudly_with_trail() {
        let dir = tempfile::tempdir().unwrap();
        let r = resolver(MockStore::new(), dir.path().to_path_buf());
        let asset_ref = AssetReference::LegacyLocal {
            file_name: "gone.pdf".to_string(),
        };
        let err = r.resolve_download_url(&asset_ref).await.unwrap_err();
        assert_matches!(err, StorageError::Resolution { attempts } => {
            assert_eq!(attempts.len(), 1);
            assert!(attempts[0].starts_with("legacy-local:"));
        });
    }

    #[tokio::test]
    async fn cover_view_url_carries_transformations() {
        let r = resolver(MockStore::failing_details(), PathBuf::from("/nonexistent"));
        let asset_ref = AssetReference::Remote {
            stored_path: "/covers/c.jpg".to_string(),
            external_id: "cov1".to_string(),
        };
        let url = r
            .resolve_view_url(&asset_ref, &Transformations::thumbnail(300))
            .await
            .unwrap();
        assert_eq!(url, format!("{ENDPOINT}/tr:w-300,q-auto,f-auto/covers/c.jpg"));
    }
}
