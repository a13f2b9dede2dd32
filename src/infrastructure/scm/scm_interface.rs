use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::infrastructure::process::OutputEcho;

/// stderr text git prints when the destination already holds a non-empty directory
pub const DESTINATION_OCCUPIED_MARKER: &str = "already exists and is not an empty directory";

/// Interface to the external clone tool
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScmOperations: Send + Sync {
    /// Clone a repository from the given URL into `dest_path`
    ///
    /// Implementations run the clone with `dest_path` as working directory and
    /// relay the tool's output while capturing it.
    async fn clone_repository(
        &self,
        url: &str,
        dest_path: &Path,
        options: &CloneOptions,
    ) -> Result<CloneOutput, ScmError>;
}

/// Options for cloning repositories
#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// Options forwarded verbatim to the clone command
    pub extra_options: Vec<String>,
    /// Kill the clone after this many seconds
    pub timeout_seconds: Option<u64>,
    /// Where the clone output is relayed while it runs
    pub echo_output: OutputEcho,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            extra_options: Vec::new(),
            timeout_seconds: None,
            echo_output: OutputEcho::Inherit,
        }
    }
}

impl CloneOptions {
    pub fn new(extra_options: Vec<String>) -> Self {
        Self {
            extra_options,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_echo_output(mut self, echo_output: OutputEcho) -> Self {
        self.echo_output = echo_output;
        self
    }
}

/// Captured output of a successful clone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOutput {
    pub stdout: String,
    pub stderr: String,
    pub execution_time_ms: u64,
}

/// Errors that can occur during SCM operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Failed to run {executable}: {message}")]
    ExecutionFailed { executable: String, message: String },

    #[error("Cloning {url} into {} failed (exit code {exit_code}): {stderr}", destination.display())]
    CloneFailed {
        url: String,
        destination: PathBuf,
        exit_code: i32,
        stderr: String,
    },

    #[error("Cloning {url} timed out after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ScmError {
    /// Create a clone failed error
    pub fn clone_failed(
        url: impl Into<String>,
        destination: impl Into<PathBuf>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CloneFailed {
            url: url.into(),
            destination: destination.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Captured stderr of a failed clone
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::CloneFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Whether git refused because the destination already holds a checkout.
    ///
    /// Such a destination must not be cleaned up.
    pub fn is_destination_occupied(&self) -> bool {
        self.stderr()
            .map_or(false, |stderr| stderr.contains(DESTINATION_OCCUPIED_MARKER))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
