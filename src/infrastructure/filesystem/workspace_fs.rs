#[cfg(unix)]
use std::os::unix::fs as unix_fs;
use std::path::Path;

use super::ownership::Ownership;
use crate::common::error::GcloneError;
use crate::common::result::{GcloneResult, ResultExt};

/// Filesystem capability used to prepare and clean clone destinations
pub trait WorkspaceFs: Send + Sync {
    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` including missing parents
    fn create_dir_all(&self, path: &Path) -> GcloneResult<()>;

    /// Remove the tree at `path`; a missing path is not an error
    fn remove_dir_all(&self, path: &Path) -> GcloneResult<()>;

    /// Change the numeric owner of `path`
    fn set_owner(&self, path: &Path, ownership: Ownership) -> GcloneResult<()>;
}

/// [`WorkspaceFs`] backed by the local disk
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl WorkspaceFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> GcloneResult<()> {
        std::fs::create_dir_all(path)
            .with_filesystem_error("Failed to create directory", Some(path.to_path_buf()))
    }

    fn remove_dir_all(&self, path: &Path) -> GcloneResult<()> {
        match std::fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GcloneError::filesystem_error_with_source(
                "Failed to remove directory",
                Some(path.to_path_buf()),
                e,
            )),
        }
    }

    #[cfg(unix)]
    fn set_owner(&self, path: &Path, ownership: Ownership) -> GcloneResult<()> {
        unix_fs::chown(path, Some(ownership.uid), Some(ownership.gid))
            .with_filesystem_error("Failed to change owner", Some(path.to_path_buf()))
    }

    #[cfg(not(unix))]
    fn set_owner(&self, _path: &Path, _ownership: Ownership) -> GcloneResult<()> {
        Ok(())
    }
}
