//! Storage path resolution for CloudVault.
//!
//! A blob's storage path is `{owner_id}/{folder segment}/{physical name}`
//! where the folder segment is the slash-joined names of the folder's
//! ancestor chain (root-most first) and the physical name is a freshly
//! minted unique token prefixed to the user's logical name. The logical
//! name never reaches a path without that prefix, and names are sanitized
//! before they reach a path at all.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::FolderRepository;
use crate::{Result, VaultError};

/// Upper bound on ancestor-chain length when resolving a folder path.
///
/// The parent_id chain is owner-checked at creation, so a longer chain
/// means corrupted data (most likely a cycle) rather than a deep tree.
const MAX_FOLDER_DEPTH: usize = 64;

/// Validate a user-supplied logical name (file or folder).
///
/// Rejects empty names, path separators, traversal entries and control
/// characters. Returns the name unchanged when valid.
pub fn sanitize_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(VaultError::BadRequest("name must not be empty".to_string()));
    }
    if name == "." || name == ".." {
        return Err(VaultError::BadRequest(format!("invalid name: {name:?}")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(VaultError::BadRequest(
            "name must not contain path separators".to_string(),
        ));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(VaultError::BadRequest(
            "name must not contain control characters".to_string(),
        ));
    }
    Ok(name)
}

/// Mint a physical filename: a unique token prefixed to the logical name.
///
/// The token makes storage paths collision-free and keeps the logical
/// name from ever being a path on its own.
pub fn physical_filename(logical_name: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), logical_name)
}

/// Extract the folder segment from an existing storage path.
///
/// `{owner}/{a}/{b}/{physical}` yields `a/b`; `{owner}/{physical}` yields
/// the empty string. Used by rename to keep a file in its folder without
/// re-resolving the tree.
pub fn folder_segment_of(storage_path: &str) -> &str {
    let after_owner = match storage_path.find('/') {
        Some(i) => &storage_path[i + 1..],
        None => return "",
    };
    match after_owner.rfind('/') {
        Some(i) => &after_owner[..i],
        None => "",
    }
}

/// Derives physical storage paths and enforces folder ownership.
pub struct PathResolver<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PathResolver<'a> {
    /// Create a new PathResolver over the given pool.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve the storage path for a (owner, folder, physical name) triple.
    ///
    /// With no folder the path is `{owner_id}/{physical}`. With a folder,
    /// the folder must exist (`NotFound`) and belong to the owner
    /// (`Forbidden`); the full ancestor chain is walked so nested folders
    /// map to nested path segments.
    pub async fn resolve(
        &self,
        owner_id: i64,
        folder_id: Option<i64>,
        physical_name: &str,
    ) -> Result<String> {
        let segment = self.folder_segment(owner_id, folder_id).await?;
        if segment.is_empty() {
            Ok(format!("{owner_id}/{physical_name}"))
        } else {
            Ok(format!("{owner_id}/{segment}/{physical_name}"))
        }
    }

    /// Build the slash-joined folder segment for a folder, walking the
    /// ancestor chain root-most first.
    ///
    /// Every folder on the chain is ownership-checked; a chain longer
    /// than [`MAX_FOLDER_DEPTH`] is treated as corrupted data.
    pub async fn folder_segment(&self, owner_id: i64, folder_id: Option<i64>) -> Result<String> {
        let mut names: Vec<String> = Vec::new();
        let repo = FolderRepository::new(self.pool);

        let mut current = folder_id;
        while let Some(id) = current {
            if names.len() >= MAX_FOLDER_DEPTH {
                return Err(VaultError::Database(format!(
                    "folder chain exceeds depth limit at folder {id}"
                )));
            }

            let folder = repo
                .get_by_id(id)
                .await?
                .ok_or_else(|| VaultError::NotFound("folder".to_string()))?;

            if folder.owner_id != owner_id {
                return Err(VaultError::Forbidden(
                    "folder owned by another user".to_string(),
                ));
            }

            names.push(folder.name);
            current = folder.parent_id;
        }

        names.reverse();
        Ok(names.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, FolderRepository, NewFolder, NewUser, UserRepository};

    async fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let alice = users
            .create(&NewUser::new("alice@example.com", "hash"))
            .await
            .unwrap();
        let bob = users
            .create(&NewUser::new("bob@example.com", "hash"))
            .await
            .unwrap();
        (db, alice.id, bob.id)
    }

    #[test]
    fn test_sanitize_accepts_ordinary_names() {
        assert_eq!(sanitize_name("report.pdf").unwrap(), "report.pdf");
        assert_eq!(sanitize_name("My Documents").unwrap(), "My Documents");
        assert_eq!(sanitize_name("日本語.txt").unwrap(), "日本語.txt");
    }

    #[test]
    fn test_sanitize_rejects_separators() {
        assert!(sanitize_name("a/b").is_err());
        assert!(sanitize_name("a\\b").is_err());
        assert!(sanitize_name("../escape").is_err());
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots() {
        assert!(sanitize_name("").is_err());
        assert!(sanitize_name(".").is_err());
        assert!(sanitize_name("..").is_err());
    }

    #[test]
    fn test_sanitize_rejects_control_characters() {
        assert!(sanitize_name("bad\r\nname").is_err());
        assert!(sanitize_name("null\0byte").is_err());
    }

    #[test]
    fn test_physical_filename_unique() {
        let a = physical_filename("report.pdf");
        let b = physical_filename("report.pdf");
        assert_ne!(a, b);
        assert!(a.ends_with("_report.pdf"));
    }

    #[test]
    fn test_folder_segment_of() {
        assert_eq!(folder_segment_of("42/abc_x.txt"), "");
        assert_eq!(folder_segment_of("42/docs/abc_x.txt"), "docs");
        assert_eq!(folder_segment_of("42/docs/2024/abc_x.txt"), "docs/2024");
        assert_eq!(folder_segment_of("no-slash"), "");
    }

    #[tokio::test]
    async fn test_resolve_root() {
        let (db, alice, _) = setup().await;
        let resolver = PathResolver::new(db.pool());

        let path = resolver.resolve(alice, None, "tok_a.txt").await.unwrap();
        assert_eq!(path, format!("{alice}/tok_a.txt"));
    }

    #[tokio::test]
    async fn test_resolve_single_folder() {
        let (db, alice, _) = setup().await;
        let folders = FolderRepository::new(db.pool());
        let docs = folders
            .create(&NewFolder::new(alice, "docs"))
            .await
            .unwrap();

        let resolver = PathResolver::new(db.pool());
        let path = resolver
            .resolve(alice, Some(docs.id), "tok_a.txt")
            .await
            .unwrap();
        assert_eq!(path, format!("{alice}/docs/tok_a.txt"));
    }

    #[tokio::test]
    async fn test_resolve_walks_ancestor_chain() {
        let (db, alice, _) = setup().await;
        let folders = FolderRepository::new(db.pool());
        let docs = folders
            .create(&NewFolder::new(alice, "docs"))
            .await
            .unwrap();
        let year = folders
            .create(&NewFolder::new(alice, "2024").with_parent(docs.id))
            .await
            .unwrap();
        let q3 = folders
            .create(&NewFolder::new(alice, "q3").with_parent(year.id))
            .await
            .unwrap();

        let resolver = PathResolver::new(db.pool());
        let path = resolver
            .resolve(alice, Some(q3.id), "tok_r.pdf")
            .await
            .unwrap();
        assert_eq!(path, format!("{alice}/docs/2024/q3/tok_r.pdf"));
    }

    #[tokio::test]
    async fn test_resolve_missing_folder() {
        let (db, alice, _) = setup().await;
        let resolver = PathResolver::new(db.pool());

        let result = resolver.resolve(alice, Some(999), "tok.txt").await;
        assert!(matches!(result, Err(VaultError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_foreign_folder_forbidden() {
        let (db, alice, bob) = setup().await;
        let folders = FolderRepository::new(db.pool());
        let bobs = folders.create(&NewFolder::new(bob, "bobs")).await.unwrap();

        let resolver = PathResolver::new(db.pool());
        let result = resolver.resolve(alice, Some(bobs.id), "tok.txt").await;
        assert!(matches!(result, Err(VaultError::Forbidden(_))));
    }
}
