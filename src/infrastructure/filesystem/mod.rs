pub mod ownership;
pub mod workspace_fs;

pub use ownership::{InvokingUser, Ownership};
pub use workspace_fs::{LocalFs, WorkspaceFs};
