//! Folder tree management for CloudVault.

use sqlx::SqlitePool;

use crate::db::{Folder, FolderRepository, NewFolder};
use crate::{Result, VaultError};

use super::path::sanitize_name;

/// Manages folder creation and listing under the per-user tree invariant:
/// a folder's parent, when set, must belong to the same owner.
pub struct FolderTree<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FolderTree<'a> {
    /// Create a new FolderTree over the given pool.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a folder for an owner, optionally nested under a parent.
    ///
    /// The parent is fetched and ownership-checked before the insert:
    /// `NotFound` when it doesn't exist, `Forbidden` when it belongs to
    /// another user.
    pub async fn create(
        &self,
        owner_id: i64,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Folder> {
        let name = sanitize_name(name)?;
        let repo = FolderRepository::new(self.pool);

        if let Some(parent_id) = parent_id {
            let parent = repo
                .get_by_id(parent_id)
                .await?
                .ok_or_else(|| VaultError::NotFound("parent folder".to_string()))?;

            if parent.owner_id != owner_id {
                return Err(VaultError::Forbidden(
                    "parent folder owned by another user".to_string(),
                ));
            }
        }

        let mut new_folder = NewFolder::new(owner_id, name);
        if let Some(parent_id) = parent_id {
            new_folder = new_folder.with_parent(parent_id);
        }

        let folder = repo.create(&new_folder).await?;
        tracing::info!(
            folder_id = folder.id,
            owner_id,
            parent_id = ?parent_id,
            "folder created"
        );

        Ok(folder)
    }

    /// List an owner's folders at an exact tree level.
    ///
    /// `parent_id` of None lists root-level folders.
    pub async fn list(&self, owner_id: i64, parent_id: Option<i64>) -> Result<Vec<Folder>> {
        FolderRepository::new(self.pool)
            .list_by_owner(owner_id, parent_id)
            .await
    }
}
