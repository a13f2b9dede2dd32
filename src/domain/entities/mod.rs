pub mod clone_task;
pub mod workspace;
pub mod workspace_config;

pub use clone_task::{CloneOutcome, CloneReport, CloneTask, FailureKind};
pub use workspace::Workspace;
pub use workspace_config::WorkspaceConfig;
