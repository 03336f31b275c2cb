//! Folder types and repository for CloudVault.

use sqlx::SqlitePool;

use crate::{Result, VaultError};

/// A folder in a user's tree.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Folder {
    /// Unique folder ID.
    pub id: i64,
    /// Owning user. Immutable after creation.
    pub owner_id: i64,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level folders).
    pub parent_id: Option<i64>,
    /// When the folder was created.
    pub created_at: String,
}

/// Data for creating a new folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    /// Owning user.
    pub owner_id: i64,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root-level folders).
    pub parent_id: Option<i64>,
}

impl NewFolder {
    /// Create a new root-level NewFolder.
    pub fn new(owner_id: i64, name: impl Into<String>) -> Self {
        Self {
            owner_id,
            name: name.into(),
            parent_id: None,
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Repository for folder operations.
pub struct FolderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FolderRepository<'a> {
    /// Create a new FolderRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new folder.
    pub async fn create(&self, folder: &NewFolder) -> Result<Folder> {
        let result =
            sqlx::query("INSERT INTO folders (owner_id, name, parent_id) VALUES (?, ?, ?)")
                .bind(folder.owner_id)
                .bind(&folder.name)
                .bind(folder.parent_id)
                .execute(self.pool)
                .await
                .map_err(|e| VaultError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| VaultError::NotFound("folder".to_string()))
    }

    /// Get a folder by ID.
    ///
    /// Fetches by id alone; the caller is responsible for comparing
    /// owner_id before acting on the result.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(
            "SELECT id, owner_id, name, parent_id, created_at FROM folders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(folder)
    }

    /// List folders for an owner at an exact tree level.
    ///
    /// `parent_id` of None selects root-level folders.
    pub async fn list_by_owner(
        &self,
        owner_id: i64,
        parent_id: Option<i64>,
    ) -> Result<Vec<Folder>> {
        let folders = match parent_id {
            Some(parent_id) => {
                sqlx::query_as::<_, Folder>(
                    "SELECT id, owner_id, name, parent_id, created_at
                     FROM folders WHERE owner_id = ? AND parent_id = ? ORDER BY id",
                )
                .bind(owner_id)
                .bind(parent_id)
                .fetch_all(self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Folder>(
                    "SELECT id, owner_id, name, parent_id, created_at
                     FROM folders WHERE owner_id = ? AND parent_id IS NULL ORDER BY id",
                )
                .bind(owner_id)
                .fetch_all(self.pool)
                .await
            }
        }
        .map_err(|e| VaultError::Database(e.to_string()))?;

        Ok(folders)
    }
}
