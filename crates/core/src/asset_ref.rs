//! Durable references to stored book assets.
//!
//! A book's PDF (and optional cover) lives in a remote object store. The
//! database column holds a single string encoding both the stored path and
//! the store's file id, separated by [`SEPARATOR`]. Rows written before the
//! remote-storage migration hold a bare filename instead; those decode to
//! [`AssetReference::LegacyLocal`] and are served from the local book
//! directory if the file still exists.
//!
//! Separator-string parsing is confined to this module. Everything else in
//! the workspace works with the enum.

use serde::{Deserialize, Serialize};

/// Separates the stored path from the external file id in the encoded form.
pub const SEPARATOR: char = '|';

/// A durable pointer to a stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetReference {
    /// Lives in the remote object store.
    Remote {
        /// Path within the store, e.g. `/books/abc_algorithms_20260115.pdf`.
        stored_path: String,
        /// The store's opaque file id, used for delete and metadata lookups.
        external_id: String,
    },
    /// Pre-migration row: a bare filename under the local book directory.
    LegacyLocal { file_name: String },
}

impl AssetReference {
    /// Encode a remote reference as `"<stored_path>|<external_id>"`.
    pub fn encode(stored_path: &str, external_id: &str) -> String {
        format!("{stored_path}{SEPARATOR}{external_id}")
    }

    /// Decode a stored reference string.
    ///
    /// Never fails: a string without the separator is treated as a legacy
    /// bare filename rather than an error, because historical rows predate
    /// the remote-storage migration. Callers must still check that a legacy
    /// file actually exists on disk before trusting it.
    pub fn decode(raw: &str) -> AssetReference {
        match raw.split_once(SEPARATOR) {
            Some((path, id)) => AssetReference::Remote {
                stored_path: path.to_string(),
                external_id: id.to_string(),
            },
            None => AssetReference::LegacyLocal {
                file_name: raw.to_string(),
            },
        }
    }

    /// Re-encode this reference to its database string form.
    pub fn to_encoded(&self) -> String {
        match self {
            AssetReference::Remote {
                stored_path,
                external_id,
            } => Self::encode(stored_path, external_id),
            AssetReference::LegacyLocal { file_name } => file_name.clone(),
        }
    }

    /// The external file id, if this reference points at the remote store.
    pub fn external_id(&self) -> Option<&str> {
        match self {
            AssetReference::Remote { external_id, .. } => Some(external_id),
            AssetReference::LegacyLocal { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn encode_joins_path_and_id() {
        assert_eq!(
            AssetReference::encode("/books/a.pdf", "file123"),
            "/books/a.pdf|file123"
        );
    }

    #[test]
    fn decode_remote_round_trip() {
        let encoded = AssetReference::encode("/books/a.pdf", "file123");
        assert_eq!(
            AssetReference::decode(&encoded),
            AssetReference::Remote {
                stored_path: "/books/a.pdf".to_string(),
                external_id: "file123".to_string(),
            }
        );
    }

    #[test]
    fn decode_bare_filename_is_legacy() {
        assert_eq!(
            AssetReference::decode("algorithms.pdf"),
            AssetReference::LegacyLocal {
                file_name: "algorithms.pdf".to_string(),
            }
        );
    }

    #[test]
    fn decode_never_fails_on_empty_input() {
        assert_matches!(
            AssetReference::decode(""),
            AssetReference::LegacyLocal { file_name } if file_name.is_empty()
        );
    }

    #[test]
    fn extra_separators_stay_in_external_id() {
        // split_once: only the first separator is structural.
        assert_eq!(
            AssetReference::decode("/books/a.pdf|id|extra"),
            AssetReference::Remote {
                stored_path: "/books/a.pdf".to_string(),
                external_id: "id|extra".to_string(),
            }
        );
    }

    #[test]
    fn to_encoded_round_trips_both_variants() {
        for raw in ["/books/a.pdf|file123", "legacy.pdf"] {
            assert_eq!(AssetReference::decode(raw).to_encoded(), raw);
        }
    }

    #[test]
    fn external_id_only_on_remote() {
        let remote = AssetReference::decode("/books/a.pdf|file123");
        assert_eq!(remote.external_id(), Some("file123"));

        let legacy = AssetReference::decode("legacy.pdf");
        assert_eq!(legacy.external_id(), None);
    }
}
