//! Core storage model for CloudVault.
//!
//! - [`PathResolver`]: derives physical storage paths from the logical
//!   per-user folder tree, enforcing ownership along the way
//! - [`FolderTree`]: folder creation and listing under the per-user tree
//!   invariant
//! - [`FileManager`]: upload, list, download, rename, delete, share -
//!   every cross-store transition with its ordering and compensation
//!
//! Every operation that targets a file or folder proves ownership before
//! any side effect. That ordering is the central invariant of the crate.

mod files;
mod folders;
mod path;

pub use files::{FileManager, ALLOWED_MIME_TYPES, MAX_SHARE_TTL_SECS};
pub use folders::FolderTree;
pub use path::{folder_segment_of, physical_filename, sanitize_name, PathResolver};
