//! In-memory [`ObjectStore`] used by resolver and ingestion tests.

use std::path::Path;
use std::sync::Mutex;

use crate::error::StorageError;
use crate::object_store::{FileDetails, ObjectStore, UploadedObject};

/// Scripted store: records calls, optionally fails uploads or lookups.
#[derive(Default)]
pub struct MockStore {
    pub fail_uploads: bool,
    pub fail_details: bool,
    pub uploads: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    pub fn failing_details() -> Self {
        Self {
            fail_details: true,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for MockStore {
    async fn upload(
        &self,
        local_path: &Path,
        file_name: &str,
        folder: &str,
        _mime_type: &str,
    ) -> Result<UploadedObject, StorageError> {
        if self.fail_uploads {
            return Err(StorageError::Upload("scripted upload failure".into()));
        }
        // The staged file must exist at upload time.
        let size_bytes = tokio::fs::metadata(local_path).await?.len();
        self.uploads.lock().unwrap().push(file_name.to_string());
        let stored_path = format!("{folder}/{file_name}");
        Ok(UploadedObject {
            external_id: format!("mock-{file_name}"),
            served_url: format!("https://mock.store{stored_path}"),
            stored_path,
            size_bytes,
        })
    }

    async fn delete(&self, external_id: &str) -> bool {
        self.deletes.lock().unwrap().push(external_id.to_string());
        true
    }

    async fn file_details(&self, external_id: &str) -> Result<FileDetails, StorageError> {
        if self.fail_details {
            return Err(StorageError::Lookup("scripted lookup failure".into()));
        }
        Ok(FileDetails {
            stored_path: format!("/canonical/{external_id}.pdf"),
            name: format!("{external_id}.pdf"),
            size_bytes: 1024,
        })
    }
}
