//! Infrastructure layer modules
//!
//! This layer provides concrete implementations for external system interactions:
//! - SCM operations (git clone driven as a child process)
//! - File system operations (destination directories, ownership)
//! - Process execution (tee'd output, interactive editor launch)

pub mod filesystem;
pub mod process;
pub mod scm;

// Re-export commonly used types
pub use filesystem::{InvokingUser, LocalFs, Ownership, WorkspaceFs};
pub use process::CommandExecutor;
pub use scm::{CloneOptions, CloneOutput, GitScm, ScmError, ScmOperations};
