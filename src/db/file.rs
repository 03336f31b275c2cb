//! File metadata types and repository for CloudVault.

use sqlx::SqlitePool;

use crate::{Result, VaultError};

/// Metadata for a stored file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique file ID.
    pub id: i64,
    /// Owning user. Immutable after creation.
    pub owner_id: i64,
    /// Logical filename shown to the user.
    pub name: String,
    /// Object store key. Server-derived, never user-supplied.
    pub storage_path: String,
    /// MIME type recorded at upload.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Folder ID (None for root-level files).
    pub folder_id: Option<i64>,
    /// When the file was uploaded.
    pub created_at: String,
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Owning user.
    pub owner_id: i64,
    /// Logical filename.
    pub name: String,
    /// Object store key.
    pub storage_path: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Folder ID (None for root-level files).
    pub folder_id: Option<i64>,
}

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new file record.
    pub async fn create(&self, file: &NewFileRecord) -> Result<FileRecord> {
        let result = sqlx::query(
            "INSERT INTO files (owner_id, name, storage_path, mime_type, size, folder_id)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(file.owner_id)
        .bind(&file.name)
        .bind(&file.storage_path)
        .bind(&file.mime_type)
        .bind(file.size)
        .bind(file.folder_id)
        .execute(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    ///
    /// Fetches by id alone; the caller is responsible for comparing
    /// owner_id before acting on the result.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(
            "SELECT id, owner_id, name, storage_path, mime_type, size, folder_id, created_at
             FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(file)
    }

    /// Get a file by its storage path.
    ///
    /// Used when serving share links, where the path is the only identity
    /// the link carries.
    pub async fn get_by_storage_path(&self, storage_path: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(
            "SELECT id, owner_id, name, storage_path, mime_type, size, folder_id, created_at
             FROM files WHERE storage_path = ?",
        )
        .bind(storage_path)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(file)
    }

    /// List files for an owner in an exact folder, newest first.
    ///
    /// `folder_id` of None selects root-level files.
    pub async fn list_by_owner(
        &self,
        owner_id: i64,
        folder_id: Option<i64>,
    ) -> Result<Vec<FileRecord>> {
        let files = match folder_id {
            Some(folder_id) => {
                sqlx::query_as::<_, FileRecord>(
                    "SELECT id, owner_id, name, storage_path, mime_type, size, folder_id, created_at
                     FROM files WHERE owner_id = ? AND folder_id = ?
                     ORDER BY created_at DESC, id DESC",
                )
                .bind(owner_id)
                .bind(folder_id)
                .fetch_all(self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, FileRecord>(
                    "SELECT id, owner_id, name, storage_path, mime_type, size, folder_id, created_at
                     FROM files WHERE owner_id = ? AND folder_id IS NULL
                     ORDER BY created_at DESC, id DESC",
                )
                .bind(owner_id)
                .fetch_all(self.pool)
                .await
            }
        }
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(files)
    }

    /// Update a file's logical name and storage path together.
    ///
    /// Returns false if no row matched.
    pub async fn update_name_and_path(
        &self,
        id: i64,
        name: &str,
        storage_path: &str,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE files SET name = ?, storage_path = ? WHERE id = ?")
            .bind(name)
            .bind(storage_path)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a file record.
    ///
    /// Returns false if no row matched.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
