use std::path::PathBuf;

use crate::common::error::GcloneError;
use crate::common::result::GcloneResult;

/// Numeric owner applied to directories created in the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}

impl Ownership {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }
}

/// The user gclone runs as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokingUser {
    pub home_dir: PathBuf,
    /// `None` on platforms without numeric ownership
    pub ownership: Option<Ownership>,
}

impl InvokingUser {
    /// Resolve the current user's home directory and ids.
    pub fn current() -> GcloneResult<Self> {
        let home_dir = dirs::home_dir()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| GcloneError::identity_error("home directory could not be determined"))?;

        Ok(Self {
            home_dir,
            ownership: current_ownership(),
        })
    }
}

#[cfg(unix)]
fn current_ownership() -> Option<Ownership> {
    // SAFETY: getuid/getgid have no preconditions and cannot fail.
    let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
    Some(Ownership::new(uid, gid))
}

#[cfg(not(unix))]
fn current_ownership() -> Option<Ownership> {
    None
}
