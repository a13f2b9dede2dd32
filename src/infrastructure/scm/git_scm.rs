use super::scm_interface::{CloneOptions, CloneOutput, ScmError, ScmOperations};
use crate::infrastructure::process::{
    CommandExecutor, CommandExecutorError, ExecutionConfig,
};
use async_trait::async_trait;
use std::path::Path;

/// Git implementation of SCM operations
pub struct GitScm {
    git_executable: String,
}

impl Default for GitScm {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
        }
    }
}

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Git SCM instance with custom executable path
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.git_executable
    }

    /// `clone --progress [extra...] -- <url> <destination>`
    ///
    /// `--progress` keeps the meter visible while output is piped.
    pub fn clone_args(url: &str, dest_path: &Path, extra_options: &[String]) -> Vec<String> {
        let mut args = Vec::with_capacity(extra_options.len() + 5);
        args.push("clone".to_string());
        args.push("--progress".to_string());
        args.extend(extra_options.iter().cloned());
        args.push("--".to_string());
        args.push(url.to_string());
        args.push(dest_path.to_string_lossy().into_owned());
        args
    }

    fn map_executor_error(&self, url: &str, error: CommandExecutorError) -> ScmError {
        match error {
            CommandExecutorError::Timeout { timeout_seconds } => ScmError::Timeout {
                url: url.to_string(),
                timeout_seconds,
            },
            CommandExecutorError::IoError(source) => ScmError::Io { source },
            other => ScmError::ExecutionFailed {
                executable: self.git_executable.clone(),
                message: other.to_string(),
            },
        }
    }
}

#[async_trait]
impl ScmOperations for GitScm {
    async fn clone_repository(
        &self,
        url: &str,
        dest_path: &Path,
        options: &CloneOptions,
    ) -> Result<CloneOutput, ScmError> {
        let args = Self::clone_args(url, dest_path, &options.extra_options);
        let config = ExecutionConfig::new()
            .with_working_directory(dest_path)
            .with_timeout(options.timeout_seconds)
            .with_echo_output(options.echo_output);

        tracing::debug!("Running {} {}", self.git_executable, args.join(" "));

        let result = CommandExecutor::execute_tee(&self.git_executable, &args, &config)
            .await
            .map_err(|e| self.map_executor_error(url, e))?;

        if !result.success {
            return Err(ScmError::clone_failed(
                url,
                dest_path,
                result.exit_code,
                result.stderr,
            ));
        }

        Ok(CloneOutput {
            stdout: result.stdout,
            stderr: result.stderr,
            execution_time_ms: result.execution_time_ms,
        })
    }
}
