use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Command executor errors
#[derive(Debug, Error)]
pub enum CommandExecutorError {
    #[error("Command timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Process spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process termination failed: {0}")]
    TerminationFailed(String),
}

/// Configuration for command execution
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Working directory for command execution
    pub working_directory: Option<PathBuf>,

    /// Timeout for command execution in seconds
    pub timeout_seconds: Option<u64>,

    /// Where captured output is relayed while the child runs
    pub echo_output: OutputEcho,
}

/// Where a child's output is relayed while it is being captured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputEcho {
    /// Capture only
    Off,
    /// Child stdout to our stdout, child stderr to our stderr
    #[default]
    Inherit,
    /// Both child streams to our stderr, keeping stdout for machine-readable output
    Stderr,
}

impl OutputEcho {
    /// Relay targets for the child's `(stdout, stderr)`
    fn targets(self) -> (Option<ParentStream>, Option<ParentStream>) {
        match self {
            Self::Off => (None, None),
            Self::Inherit => (Some(ParentStream::Stdout), Some(ParentStream::Stderr)),
            Self::Stderr => (Some(ParentStream::Stderr), Some(ParentStream::Stderr)),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            working_directory: None,
            timeout_seconds: None,
            echo_output: OutputEcho::Inherit,
        }
    }
}

impl ExecutionConfig {
    /// Create a new execution config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set working directory
    pub fn with_working_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set whether output is relayed to the parent streams while being captured
    pub fn with_echo_output(mut self, echo_output: OutputEcho) -> Self {
        self.echo_output = echo_output;
        self
    }
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code of the process
    pub exit_code: i32,

    /// Standard output
    pub stdout: String,

    /// Standard error output
    pub stderr: String,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,

    /// Whether the command was successful (exit code 0)
    pub success: bool,
}

impl ExecutionResult {
    /// Create a new execution result
    pub fn new(exit_code: i32, stdout: String, stderr: String, execution_time_ms: u64) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            execution_time_ms,
            success: exit_code == 0,
        }
    }
}

/// Parent process stream a child pipe is relayed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentStream {
    Stdout,
    Stderr,
}

impl ParentStream {
    /// Write under the stream lock so concurrent relays never split a line.
    fn write_all(self, bytes: &[u8]) -> std::io::Result<()> {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(bytes)?;
                out.flush()
            }
            Self::Stderr => {
                let mut err = std::io::stderr().lock();
                err.write_all(bytes)?;
                err.flush()
            }
        }
    }
}

/// Duplicates a child pipe into an in-memory buffer and, optionally, a parent stream.
///
/// Data is handed out for relaying per complete line; `\r` counts as a line end
/// so progress meters keep updating in place.
#[derive(Debug)]
struct TeeRelay {
    target: Option<ParentStream>,
    pending: Vec<u8>,
    captured: Vec<u8>,
}

impl TeeRelay {
    fn new(target: Option<ParentStream>) -> Self {
        Self {
            target,
            pending: Vec::new(),
            captured: Vec::new(),
        }
    }

    /// Capture a chunk and return the complete lines ready to be relayed.
    fn feed(&mut self, chunk: &[u8]) -> Option<Vec<u8>> {
        self.captured.extend_from_slice(chunk);

        if self.target.is_none() {
            return None;
        }
        self.pending.extend_from_slice(chunk);
        let last = self
            .pending
            .iter()
            .rposition(|b| *b == b'\n' || *b == b'\r')?;
        Some(self.pending.drain(..=last).collect())
    }

    /// Whatever is left once the pipe hits EOF.
    fn take_rest(&mut self) -> Option<Vec<u8>> {
        if self.target.is_none() || self.pending.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }

    /// Write to the parent stream on the blocking pool.
    ///
    /// A slow reader of our stdout then stalls only this relay, not a runtime worker.
    async fn forward(&mut self, bytes: Vec<u8>) {
        let Some(target) = self.target else {
            return;
        };
        let written = tokio::task::spawn_blocking(move || target.write_all(&bytes)).await;
        let error = match written {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };
        // Keep capturing even if the parent stream went away.
        tracing::debug!("Stopped relaying child output to {:?}: {}", target, error);
        self.target = None;
        self.pending.clear();
    }

    fn into_captured(self) -> String {
        String::from_utf8_lossy(&self.captured).into_owned()
    }
}

/// Read a child pipe to EOF through a [`TeeRelay`].
async fn relay<R>(reader: Option<R>, target: Option<ParentStream>) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(String::new());
    };

    let mut relay = TeeRelay::new(target);
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        if let Some(lines) = relay.feed(&buf[..n]) {
            relay.forward(lines).await;
        }
    }
    if let Some(rest) = relay.take_rest() {
        relay.forward(rest).await;
    }
    Ok(relay.into_captured())
}

/// Command executor for running external processes
pub struct CommandExecutor;

impl CommandExecutor {
    /// Run a program, streaming its stdout/stderr to the parent while capturing both.
    ///
    /// The child is killed if the configured timeout expires.
    pub async fn execute_tee(
        program: &str,
        args: &[String],
        config: &ExecutionConfig,
    ) -> Result<ExecutionResult, CommandExecutorError> {
        let start_time = Instant::now();

        let mut cmd = TokioCommand::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(working_dir) = &config.working_directory {
            cmd.current_dir(working_dir);
        }

        let mut child = cmd.spawn().map_err(|e| {
            CommandExecutorError::SpawnFailed(format!("Failed to spawn '{}': {}", program, e))
        })?;

        let (out_target, err_target) = config.echo_output.targets();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let run = async move {
            let (stdout, stderr, status) = tokio::join!(
                relay(stdout, out_target),
                relay(stderr, err_target),
                child.wait()
            );
            let status = status.map_err(|e| {
                CommandExecutorError::TerminationFailed(format!(
                    "Failed to wait for process: {}",
                    e
                ))
            })?;
            Ok::<_, CommandExecutorError>((stdout?, stderr?, status))
        };

        let (stdout, stderr, status) = match config.timeout_seconds {
            Some(timeout_seconds) => timeout(Duration::from_secs(timeout_seconds), run)
                .await
                .map_err(|_| CommandExecutorError::Timeout { timeout_seconds })??,
            None => run.await?,
        };

        Ok(ExecutionResult::new(
            status.code().unwrap_or(-1),
            stdout,
            stderr,
            start_time.elapsed().as_millis() as u64,
        ))
    }

    /// Run a program attached to the parent's terminal (stdin/stdout/stderr inherited).
    ///
    /// With [`OutputEcho::Stderr`] the program's stdout goes to our stderr instead.
    pub async fn run_interactive(
        program: &str,
        args: &[String],
        config: &ExecutionConfig,
    ) -> Result<ExecutionResult, CommandExecutorError> {
        let start_time = Instant::now();

        let mut cmd = TokioCommand::new(program);
        let stdout = match config.echo_output {
            OutputEcho::Stderr => Stdio::from(std::io::stderr()),
            OutputEcho::Off | OutputEcho::Inherit => Stdio::inherit(),
        };
        cmd.args(args)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit());

        if let Some(working_dir) = &config.working_directory {
            cmd.current_dir(working_dir);
        }

        let status = cmd.status().await.map_err(|e| {
            CommandExecutorError::SpawnFailed(format!("Failed to spawn '{}': {}", program, e))
        })?;

        Ok(ExecutionResult::new(
            status.code().unwrap_or(-1),
            String::new(),
            String::new(),
            start_time.elapsed().as_millis() as u64,
        ))
    }

    /// Split a command line such as `code --wait` into program and arguments
    pub fn parse_command(command: &str) -> Result<(String, Vec<String>), CommandExecutorError> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| CommandExecutorError::InvalidCommand("Command is empty".to_string()))?;
        Ok((program.to_string(), parts.map(str::to_string).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_parse_command() {
        let (program, args) = CommandExecutor::parse_command("code --wait -n").unwrap();
        assert_eq!(program, "code");
        assert_eq!(args, vec!["--wait", "-n"]);

        assert!(matches!(
            CommandExecutor::parse_command("   "),
            Err(CommandExecutorError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_tee_relay_captures_everything() {
        let mut relay = TeeRelay::new(None);
        assert_eq!(relay.feed(b"Cloning into 'x'...\n"), None);
        assert_eq!(relay.feed(b"Receiving objects:  50%\r"), None);
        assert_eq!(relay.feed(b"partial"), None);
        assert_eq!(relay.take_rest(), None);
        assert_eq!(
            relay.into_captured(),
            "Cloning into 'x'...\nReceiving objects:  50%\rpartial"
        );
    }

    #[test]
    fn test_tee_relay_holds_partial_lines() {
        let mut relay = TeeRelay::new(Some(ParentStream::Stderr));
        assert_eq!(
            relay.feed(b"first line\nsecond "),
            Some(b"first line\n".to_vec())
        );
        assert_eq!(relay.pending, b"second ");
        assert_eq!(relay.feed(b"half"), None);
        assert_eq!(relay.take_rest(), Some(b"second half".to_vec()));
        assert!(relay.pending.is_empty());
    }

    #[test]
    fn test_output_echo_targets() {
        assert_eq!(OutputEcho::Off.targets(), (None, None));
        assert_eq!(
            OutputEcho::Inherit.targets(),
            (Some(ParentStream::Stdout), Some(ParentStream::Stderr))
        );
        assert_eq!(
            OutputEcho::Stderr.targets(),
            (Some(ParentStream::Stderr), Some(ParentStream::Stderr))
        );
        assert_eq!(ExecutionConfig::default().echo_output, OutputEcho::Inherit);
    }

    #[tokio::test]
    async fn test_tee_relay_forward_keeps_capturing() {
        let mut relay = TeeRelay::new(Some(ParentStream::Stderr));
        if let Some(lines) = relay.feed(b"relayed line\n") {
            relay.forward(lines).await;
        }
        assert!(relay.target.is_some());
        assert_eq!(relay.into_captured(), "relayed line\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_tee_captures_both_streams() {
        let config = ExecutionConfig::new().with_echo_output(OutputEcho::Off);
        let result = CommandExecutor::execute_tee(
            "sh",
            &sh("echo out; echo err >&2; exit 3"),
            &config,
        )
        .await
        .unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(!result.success);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_tee_working_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = ExecutionConfig::new()
            .with_working_directory(temp_dir.path())
            .with_echo_output(OutputEcho::Off);
        let result = CommandExecutor::execute_tee("sh", &sh("pwd"), &config)
            .await
            .unwrap();

        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(temp_dir.path()).unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_tee_timeout() {
        let config = ExecutionConfig::new()
            .with_timeout(Some(1))
            .with_echo_output(OutputEcho::Off);
        let result = CommandExecutor::execute_tee("sh", &sh("sleep 5"), &config).await;

        assert!(matches!(
            result,
            Err(CommandExecutorError::Timeout { timeout_seconds: 1 })
        ));
    }

    #[tokio::test]
    async fn test_execute_tee_spawn_failure() {
        let config = ExecutionConfig::new().with_echo_output(OutputEcho::Off);
        let result =
            CommandExecutor::execute_tee("definitely-not-a-real-program-xyz", &[], &config).await;
        assert!(matches!(result, Err(CommandExecutorError::SpawnFailed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_interactive_exit_code() {
        let config = ExecutionConfig::new();
        let result = CommandExecutor::run_interactive("sh", &sh("exit 4"), &config)
            .await
            .unwrap();
        assert_eq!(result.exit_code, 4);
        assert!(!result.success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_interactive_with_stdout_moved_to_stderr() {
        let config = ExecutionConfig::new().with_echo_output(OutputEcho::Stderr);
        let result = CommandExecutor::run_interactive("sh", &sh("echo opened"), &config)
            .await
            .unwrap();
        assert!(result.success);
    }
}
