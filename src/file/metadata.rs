//! Material record types and repository for Materials Hub.

use crate::db::DbPool;
use crate::{HubError, Result};

/// A stored material record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Material {
    /// Unique record ID.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Free-form description (optional).
    pub description: Option<String>,
    /// Original filename, used for downloads.
    pub file_name: String,
    /// Storage path of the object (uploads/<timestamp>.<ext>).
    pub file_path: String,
    /// Publicly resolvable URL of the object.
    pub file_url: String,
    /// Declared MIME type.
    pub file_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// User ID of the uploader.
    pub uploaded_by: i64,
    /// When the record was created.
    pub created_at: String,
}

/// Data for creating a new material record.
#[derive(Debug, Clone)]
pub struct NewMaterial {
    /// Display title.
    pub title: String,
    /// Free-form description (optional).
    pub description: Option<String>,
    /// Original filename.
    pub file_name: String,
    /// Storage path of the object.
    pub file_path: String,
    /// Publicly resolvable URL of the object.
    pub file_url: String,
    /// Declared MIME type.
    pub file_type: String,
    /// File size in bytes.
    pub file_size: i64,
    /// User ID of the uploader.
    pub uploaded_by: i64,
}

impl NewMaterial {
    /// Create a new NewMaterial.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        file_url: impl Into<String>,
        file_type: impl Into<String>,
        file_size: i64,
        uploaded_by: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            file_name: file_name.into(),
            file_path: file_path.into(),
            file_url: file_url.into(),
            file_type: file_type.into(),
            file_size,
            uploaded_by,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

const MATERIAL_COLUMNS: &str = "id, title, description, file_name, file_path, file_url, \
     file_type, file_size, uploaded_by, created_at";

/// Repository for material record operations.
pub struct MaterialRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MaterialRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new material record.
    pub async fn create(&self, material: &NewMaterial) -> Result<Material> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO files (title, description, file_name, file_path, file_url,
                                file_type, file_size, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(&material.title)
        .bind(&material.description)
        .bind(&material.file_name)
        .bind(&material.file_path)
        .bind(&material.file_url)
        .bind(&material.file_type)
        .bind(material.file_size)
        .bind(material.uploaded_by)
        .fetch_one(self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| HubError::NotFound("material".to_string()))
    }

    /// Get a material record by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Material>> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM files WHERE id = $1");
        let result = sqlx::query_as::<_, Material>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(result)
    }

    /// Get a material record by storage path.
    pub async fn get_by_path(&self, file_path: &str) -> Result<Option<Material>> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM files WHERE file_path = $1");
        let result = sqlx::query_as::<_, Material>(&sql)
            .bind(file_path)
            .fetch_optional(self.pool)
            .await?;

        Ok(result)
    }

    /// List all material records, newest first.
    pub async fn list_all(&self) -> Result<Vec<Material>> {
        let sql =
            format!("SELECT {MATERIAL_COLUMNS} FROM files ORDER BY created_at DESC, id DESC");
        let materials = sqlx::query_as::<_, Material>(&sql)
            .fetch_all(self.pool)
            .await?;

        Ok(materials)
    }

    /// Delete a material record by ID.
    ///
    /// Returns `true` if a record was deleted.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count material records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
