//! SCM (Source Control Management) operations infrastructure
//!
//! The clone tool is driven as an external process behind [`ScmOperations`].

pub mod git_scm;
pub mod scm_interface;

pub use git_scm::GitScm;
pub use scm_interface::{
    CloneOptions, CloneOutput, ScmError, ScmOperations, DESTINATION_OCCUPIED_MARKER,
};

#[cfg(test)]
pub use scm_interface::MockScmOperations;
