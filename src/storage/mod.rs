//! Object storage for CloudVault.
//!
//! Path-keyed blob storage backed by the local filesystem:
//! - create-only put (no silent overwrite)
//! - best-effort multi-path delete
//! - time-limited signed URLs for unauthenticated sharing
//!
//! The store is constructed by the process entry point and injected into
//! the components that need it; there is no ambient global handle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::{Result, VaultError};

/// A time-limited pre-authorized link to a blob.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    /// The full URL.
    pub url: String,
    /// Unix timestamp after which the link is no longer honored.
    pub expires_at: i64,
}

/// Filesystem-backed object store.
///
/// Blobs are stored directly under the base directory at their storage
/// path, e.g. `{base}/42/documents/a1b2_report.pdf`.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    /// Base directory for blob storage.
    base_path: PathBuf,
    /// Public base URL for signed links.
    public_base_url: String,
    /// Secret for signing share links.
    signing_secret: String,
}

impl ObjectStore {
    /// Create a new ObjectStore rooted at the given directory.
    ///
    /// The base directory is created if it doesn't exist.
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        signing_secret: impl Into<String>,
    ) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            public_base_url: public_base_url.into(),
            signing_secret: signing_secret.into(),
        })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Validate a storage key.
    ///
    /// Keys are relative slash-separated paths. Traversal segments,
    /// backslashes and control characters are rejected so a key can never
    /// escape the base directory.
    fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() || key.starts_with('/') || key.ends_with('/') {
            return Err(VaultError::BadRequest(format!("invalid storage key: {key:?}")));
        }
        if key.contains('\\') || key.chars().any(|c| c.is_control()) {
            return Err(VaultError::BadRequest(format!("invalid storage key: {key:?}")));
        }
        if key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
            return Err(VaultError::BadRequest(format!("invalid storage key: {key:?}")));
        }
        Ok(())
    }

    /// Resolve a key to its on-disk path.
    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.base_path.join(key))
    }

    /// Store a blob at the given key.
    ///
    /// With `overwrite` false this is create-only: an existing blob at the
    /// key fails with `Conflict` and is left untouched.
    pub fn put(&self, key: &str, bytes: &[u8], overwrite: bool) -> Result<()> {
        let path = self.blob_path(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if overwrite {
            fs::write(&path, bytes)?;
            return Ok(());
        }

        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut f) => {
                use std::io::Write;
                f.write_all(bytes)?;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(VaultError::Conflict(
                format!("object already exists at {key}"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a blob.
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(key)?;

        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(VaultError::NotFound(format!("blob at {key}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a blob exists.
    pub fn exists(&self, key: &str) -> bool {
        self.blob_path(key).map(|p| p.exists()).unwrap_or(false)
    }

    /// Delete blobs, best-effort per path.
    ///
    /// Missing blobs are not failures. Returns the keys that could not be
    /// removed along with the error for each.
    pub fn delete(&self, keys: &[&str]) -> Vec<(String, VaultError)> {
        let mut failures = Vec::new();

        for key in keys {
            let path = match self.blob_path(key) {
                Ok(p) => p,
                Err(e) => {
                    failures.push((key.to_string(), e));
                    continue;
                }
            };

            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => failures.push((key.to_string(), e.into())),
            }
        }

        failures
    }

    /// Issue a time-limited signed URL for a blob.
    ///
    /// The URL embeds the expiry and a digest over the signing secret, the
    /// key and the expiry. Anyone holding the URL can fetch the blob until
    /// it expires; no record of issued links is kept.
    pub fn sign(&self, key: &str, ttl_secs: u64) -> Result<SignedUrl> {
        Self::validate_key(key)?;

        let expires_at = chrono::Utc::now().timestamp() + ttl_secs as i64;
        let sig = self.signature(key, expires_at);

        let encoded: Vec<String> = key
            .split('/')
            .map(|seg| urlencoding::encode(seg).into_owned())
            .collect();

        let url = format!(
            "{}/api/shared/{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            expires_at,
            sig,
            encoded.join("/")
        );

        Ok(SignedUrl { url, expires_at })
    }

    /// Verify a signed-link signature for a key.
    pub fn verify(&self, key: &str, expires_at: i64, sig: &str) -> Result<()> {
        Self::validate_key(key)?;

        if chrono::Utc::now().timestamp() > expires_at {
            return Err(VaultError::Unauthenticated("share link expired".to_string()));
        }

        let expected = self.signature(key, expires_at);
        if !constant_time_eq(expected.as_bytes(), sig.as_bytes()) {
            return Err(VaultError::Unauthenticated(
                "invalid share link signature".to_string(),
            ));
        }

        Ok(())
    }

    /// Compute the hex digest for a key/expiry pair.
    fn signature(&self, key: &str, expires_at: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.signing_secret.as_bytes());
        hasher.update(b"|");
        hasher.update(key.as_bytes());
        hasher.update(b"|");
        hasher.update(expires_at.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Compare two byte slices without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
