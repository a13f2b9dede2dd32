use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::git_url::GitUrlError;
use crate::infrastructure::process::CommandExecutorError;

#[derive(Error, Debug)]
pub enum GcloneError {
    #[error("Invalid repository URL: {0}")]
    UrlError(#[from] GitUrlError),

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Unable to resolve the invoking user: {message}")]
    IdentityError { message: String },

    #[error("Command execution failed: {message}")]
    CommandError {
        message: String,
        command: String,
        exit_code: Option<i32>,
        #[source]
        source: Option<CommandExecutorError>,
    },
}

impl GcloneError {
    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn identity_error(message: impl Into<String>) -> Self {
        Self::IdentityError {
            message: message.into(),
        }
    }

    pub fn command_error(
        message: impl Into<String>,
        command: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::CommandError {
            message: message.into(),
            command: command.into(),
            exit_code,
            source: None,
        }
    }

    pub fn command_error_with_source(
        message: impl Into<String>,
        command: impl Into<String>,
        source: CommandExecutorError,
    ) -> Self {
        Self::CommandError {
            message: message.into(),
            command: command.into(),
            exit_code: None,
            source: Some(source),
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileSystemError { path, .. } => path.as_ref(),
            _ => None,
        }
    }
}
