//! File operations for CloudVault.
//!
//! FileManager mediates every transition that touches both the metadata
//! store and the object store. The two are never updated transactionally;
//! step ordering is the only consistency mechanism, always biased toward
//! "blob present, record pending" so a record never points at bytes that
//! were never written.

use sqlx::SqlitePool;

use crate::db::{FileRecord, FileRepository, NewFileRecord};
use crate::storage::{ObjectStore, SignedUrl};
use crate::{Result, VaultError};

use super::path::{folder_segment_of, physical_filename, sanitize_name, PathResolver};

/// MIME types accepted for upload. Anything else is rejected with
/// `UnsupportedMediaType` before any store is touched.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "application/pdf",
    "text/plain",
    "application/zip",
];

/// Longest share-link lifetime accepted (7 days).
pub const MAX_SHARE_TTL_SECS: u64 = 7 * 24 * 3600;

/// Orchestrates upload, list, download, rename, delete and share.
pub struct FileManager<'a> {
    pool: &'a SqlitePool,
    store: &'a ObjectStore,
}

impl<'a> FileManager<'a> {
    /// Create a new FileManager over the given stores.
    pub fn new(pool: &'a SqlitePool, store: &'a ObjectStore) -> Self {
        Self { pool, store }
    }

    /// Fetch a file by id and prove it belongs to the owner.
    ///
    /// An owner mismatch yields the same `NotFound` as a missing record so
    /// non-owners learn nothing about the file's existence. Every
    /// file-targeting operation goes through this before its side effect.
    async fn owned_file(&self, owner_id: i64, file_id: i64) -> Result<FileRecord> {
        let file = FileRepository::new(self.pool)
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))?;

        if file.owner_id != owner_id {
            tracing::debug!(file_id, owner_id, "file lookup owner mismatch");
            return Err(VaultError::NotFound("file".to_string()));
        }

        Ok(file)
    }

    /// Upload a file into the owner's tree.
    ///
    /// Order: validate, resolve path, write blob (create-only), insert
    /// record. A blob-write failure aborts with nothing recorded. A record
    /// insert failure after the blob landed leaves an orphaned blob, which
    /// is logged for out-of-band reconciliation and surfaced as the
    /// underlying error.
    pub async fn upload(
        &self,
        owner_id: i64,
        folder_id: Option<i64>,
        mime_type: &str,
        logical_name: &str,
        bytes: &[u8],
    ) -> Result<FileRecord> {
        if !ALLOWED_MIME_TYPES.contains(&mime_type) {
            return Err(VaultError::UnsupportedMediaType(mime_type.to_string()));
        }
        let logical_name = sanitize_name(logical_name)?;

        let resolver = PathResolver::new(self.pool);
        let physical = physical_filename(logical_name);
        let storage_path = resolver.resolve(owner_id, folder_id, &physical).await?;

        // Create, not upsert: a collision on the minted path is a Conflict.
        self.store.put(&storage_path, bytes, false)?;

        let record = NewFileRecord {
            owner_id,
            name: logical_name.to_string(),
            storage_path: storage_path.clone(),
            mime_type: mime_type.to_string(),
            size: bytes.len() as i64,
            folder_id,
        };

        let file = FileRepository::new(self.pool)
            .create(&record)
            .await
            .map_err(|e| {
                tracing::warn!(
                    storage_path = %storage_path,
                    error = %e,
                    "file record insert failed after blob write; blob orphaned pending reconciliation"
                );
                e
            })?;

        tracing::info!(file_id = file.id, owner_id, size = file.size, "file uploaded");
        Ok(file)
    }

    /// List an owner's files in an exact folder, newest first.
    ///
    /// `folder_id` of None lists root-level files.
    pub async fn list(&self, owner_id: i64, folder_id: Option<i64>) -> Result<Vec<FileRecord>> {
        FileRepository::new(self.pool)
            .list_by_owner(owner_id, folder_id)
            .await
    }

    /// Download a file's bytes along with its record.
    ///
    /// A record whose blob is missing (dangling record after a partial
    /// delete) surfaces a distinct missing-blob error instead of crashing.
    pub async fn download(&self, owner_id: i64, file_id: i64) -> Result<(FileRecord, Vec<u8>)> {
        let file = self.owned_file(owner_id, file_id).await?;

        let bytes = self.store.get(&file.storage_path).map_err(|e| match e {
            VaultError::NotFound(_) => {
                tracing::warn!(file_id, storage_path = %file.storage_path, "record present but blob missing");
                VaultError::NotFound("file content".to_string())
            }
            other => other,
        })?;

        Ok((file, bytes))
    }

    /// Delete a file: blob first, then the record.
    ///
    /// A blob-removal failure aborts with the record intact (state still
    /// consistent). A record-removal failure after the blob went leaves a
    /// dangling record; later downloads get the missing-blob error.
    pub async fn delete(&self, owner_id: i64, file_id: i64) -> Result<()> {
        let file = self.owned_file(owner_id, file_id).await?;

        let failures = self.store.delete(&[&file.storage_path]);
        if let Some((path, err)) = failures.into_iter().next() {
            tracing::error!(file_id, storage_path = %path, error = %err, "blob removal failed; record kept");
            return Err(err);
        }

        FileRepository::new(self.pool)
            .delete(file_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    file_id,
                    storage_path = %file.storage_path,
                    error = %e,
                    "record removal failed after blob removal; record dangling"
                );
                e
            })?;

        tracing::info!(file_id, owner_id, "file deleted");
        Ok(())
    }

    /// Rename a file: copy to a new path, repoint the record, then clean
    /// up the old blob.
    ///
    /// The object store has no atomic rename, so this mints a new unique
    /// path under the same folder segment, writes the bytes there
    /// (create-only), updates the record, and only then removes the old
    /// blob. That last step is post-commit cleanup: its failure is logged
    /// and swallowed because the rename itself already succeeded.
    pub async fn rename(
        &self,
        owner_id: i64,
        file_id: i64,
        new_name: &str,
    ) -> Result<FileRecord> {
        let file = self.owned_file(owner_id, file_id).await?;
        let new_name = sanitize_name(new_name)?;

        let bytes = self.store.get(&file.storage_path).map_err(|e| match e {
            VaultError::NotFound(_) => VaultError::NotFound("file content".to_string()),
            other => other,
        })?;

        // Same folder segment as the old path; fresh unique token.
        let segment = folder_segment_of(&file.storage_path);
        let physical = physical_filename(new_name);
        let new_path = if segment.is_empty() {
            format!("{owner_id}/{physical}")
        } else {
            format!("{owner_id}/{segment}/{physical}")
        };

        self.store.put(&new_path, &bytes, false)?;

        let repo = FileRepository::new(self.pool);
        let updated = match repo.update_name_and_path(file_id, new_name, &new_path).await {
            Ok(updated) => updated,
            Err(e) => {
                // Repoint failed: drop the freshly written copy so the
                // old path stays authoritative.
                let _ = self.store.delete(&[new_path.as_str()]);
                return Err(e);
            }
        };
        if !updated {
            let _ = self.store.delete(&[new_path.as_str()]);
            return Err(VaultError::NotFound("file".to_string()));
        }

        // Post-commit cleanup: best-effort, never fails the rename.
        for (path, err) in self.store.delete(&[file.storage_path.as_str()]) {
            tracing::warn!(file_id, storage_path = %path, error = %err, "old blob cleanup failed after rename");
        }

        tracing::info!(file_id, owner_id, new_name, "file renamed");

        repo.get_by_id(file_id)
            .await?
            .ok_or_else(|| VaultError::NotFound("file".to_string()))
    }

    /// Issue a time-limited signed URL for a file.
    ///
    /// No record of issued links is kept; there is no revocation.
    pub async fn share(
        &self,
        owner_id: i64,
        file_id: i64,
        expires_in_secs: u64,
    ) -> Result<SignedUrl> {
        let file = self.owned_file(owner_id, file_id).await?;

        if expires_in_secs == 0 || expires_in_secs > MAX_SHARE_TTL_SECS {
            return Err(VaultError::BadRequest(format!(
                "expiry must be between 1 and {MAX_SHARE_TTL_SECS} seconds"
            )));
        }

        self.store.sign(&file.storage_path, expires_in_secs)
    }
}
