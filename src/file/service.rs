//! Material service for Materials Hub.
//!
//! High-level workflows over the object store and record repository:
//! upload, listing, download, and deletion. Upload and delete span two
//! backends with no shared transaction, so each fixes an explicit order
//! and a compensating action.

use tracing::warn;

use crate::db::Database;
use crate::{HubError, Result};

use super::metadata::{Material, MaterialRepository, NewMaterial};
use super::storage::ObjectStore;
use super::validation::validate_upload;

/// Request data for a material upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Display title.
    pub title: String,
    /// Free-form description (optional).
    pub description: Option<String>,
    /// Original filename.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(
        title: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            file_name: file_name.into(),
            content_type: content_type.into(),
            content,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Result of a material download.
#[derive(Debug)]
pub struct DownloadResult {
    /// Material record.
    pub material: Material,
    /// Object content.
    pub content: Vec<u8>,
}

/// Service for material upload, listing, download, and deletion.
pub struct MaterialService<'a> {
    db: &'a Database,
    store: &'a ObjectStore,
}

impl<'a> MaterialService<'a> {
    /// Create a new MaterialService.
    pub fn new(db: &'a Database, store: &'a ObjectStore) -> Self {
        Self { db, store }
    }

    /// Upload a material.
    ///
    /// Order is fixed: validate, store the object, then insert the record.
    /// A record is never inserted without its object; if the insert fails
    /// the stored object is removed again so nothing is orphaned.
    pub async fn upload(&self, request: &UploadRequest, user_id: i64) -> Result<Material> {
        validate_upload(
            request.content.len() as u64,
            &request.content_type,
            &request.title,
        )
        .map_err(|e| HubError::Validation(e.to_string()))?;

        let path = self.store.allocate_path(&request.file_name);
        self.store.put(&path, &request.content)?;

        let mut new_material = NewMaterial::new(
            request.title.trim(),
            &request.file_name,
            &path,
            self.store.public_url(&path),
            &request.content_type,
            request.content.len() as i64,
            user_id,
        );
        if let Some(ref desc) = request.description {
            new_material = new_material.with_description(desc.trim());
        }

        let repo = MaterialRepository::new(self.db.pool());
        match repo.create(&new_material).await {
            Ok(material) => Ok(material),
            Err(e) => {
                // Compensate: remove the just-stored object
                if let Err(cleanup_err) = self.store.delete(&path) {
                    warn!("failed to clean up object {} after insert error: {}", path, cleanup_err);
                }
                Err(e)
            }
        }
    }

    /// List all materials, newest first.
    pub async fn list(&self) -> Result<Vec<Material>> {
        MaterialRepository::new(self.db.pool()).list_all().await
    }

    /// Get a material record by ID.
    pub async fn get(&self, id: i64) -> Result<Material> {
        MaterialRepository::new(self.db.pool())
            .get_by_id(id)
            .await?
            .ok_or_else(|| HubError::NotFound("material".to_string()))
    }

    /// Download a material: record plus object content.
    pub async fn download(&self, id: i64) -> Result<DownloadResult> {
        let material = self.get(id).await?;
        let content = self.store.get(&material.file_path)?;
        Ok(DownloadResult { material, content })
    }

    /// Delete a material.
    ///
    /// The object is removed before the record; if object removal errors
    /// the record is kept so the material stays visible for a retry. An
    /// object that is already gone does not block record removal, which
    /// lets a dangling record be repaired.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let material = self.get(id).await?;

        self.store.delete(&material.file_path)?;

        let deleted = MaterialRepository::new(self.db.pool())
            .delete(material.id)
            .await?;
        if !deleted {
            return Err(HubError::NotFound("material".to_string()));
        }

        Ok(())
    }
}
