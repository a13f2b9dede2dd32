use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use crate::application::use_cases::{CloneRepositoriesConfig, CloneRepositoriesUseCase};
use crate::domain::entities::workspace_config::WorkspaceConfig;
use crate::infrastructure::filesystem::{InvokingUser, LocalFs};
use crate::infrastructure::process::OutputEcho;
use crate::infrastructure::scm::GitScm;
use crate::presentation::ui::ConsoleReporter;

/// Exit status for usage and startup errors
pub const EXIT_USAGE: i32 = 2;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

/// Output format for the final run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable messages only (default)
    Text,
    /// JSON report on stdout after all clones finish
    Json,
}

/// gclone - clone multiple git repositories into a predictable workspace layout
#[derive(Debug, Parser)]
#[command(name = "gclone")]
#[command(
    about = "Clone multiple git repositories then place them into <workspace>/<host>/<path>"
)]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Repository URL(s), separated by blank space. For example: git@github.com:x/y.git https://github.com/x/y.git
    #[arg(required = true, value_name = "REPOSITORIES")]
    pub repositories: Vec<String>,

    /// Remove the destination directory before cloning
    #[arg(short, long)]
    pub force: bool,

    /// Open each cloned repository with $EDITOR
    #[arg(short, long)]
    pub open: bool,

    /// Extra options passed verbatim to `git clone`, e.g. --clone-opts "--depth 1"
    #[arg(long, value_name = "OPTS", allow_hyphen_values = true)]
    pub clone_opts: Option<String>,

    /// Kill a clone that runs longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print where each repository would go without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Format of the final report
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Workspace root (defaults to ~/Workspace)
    #[arg(long, env = "WORKSPACE", value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Editor used by --open
    #[arg(long, env = "EDITOR")]
    pub editor: Option<String>,

    /// Enable debug logging with per-task timing
    #[arg(
        long,
        env = "DEBUG",
        value_name = "VALUE",
        num_args = 0..=1,
        default_missing_value = "1"
    )]
    pub debug: Option<String>,
}

impl Cli {
    /// Any non-empty DEBUG value turns debugging on
    pub fn debug_enabled(&self) -> bool {
        self.debug.as_deref().map_or(false, |v| !v.is_empty())
    }

    /// `--clone-opts` split into individual arguments
    pub fn clone_args(&self) -> Vec<String> {
        self.clone_opts
            .as_deref()
            .map(|opts| opts.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Install the tracing subscriber on stderr.
///
/// Debug mode logs every span close with its busy/idle time, which shows where
/// each clone task spent its time blocked.
pub fn init_tracing(debug: bool, verbose: bool) {
    let (filter, span_events) = if debug {
        (EnvFilter::new("gclone=debug"), FmtSpan::CLOSE)
    } else {
        let fallback = if verbose { "gclone=info" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        (filter, FmtSpan::NONE)
    };

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let use_color = !self.cli.no_color;
        if !use_color {
            colored::control::set_override(false);
        }

        let debug = self.cli.debug_enabled();
        init_tracing(debug, self.cli.verbose);

        let user = match InvokingUser::current() {
            Ok(user) => user,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                exit(EXIT_USAGE);
            }
        };

        let workspace_config = WorkspaceConfig::resolve(self.cli.workspace.clone(), &user.home_dir)
            .with_editor(self.cli.editor.clone())
            .with_debug(debug);
        tracing::debug!("Workspace root: {}", workspace_config.root.display());

        // The JSON report owns stdout; everything else moves to stderr.
        let json_output = self.cli.output == OutputFormat::Json;
        let echo = if json_output {
            OutputEcho::Stderr
        } else {
            OutputEcho::Inherit
        };

        let config = CloneRepositoriesConfig::new(workspace_config.workspace())
            .with_force(self.cli.force)
            .with_clone_args(self.cli.clone_args())
            .with_open_after_clone(self.cli.open, workspace_config.editor.clone())
            .with_timeout(self.cli.timeout)
            .with_dry_run(self.cli.dry_run)
            .with_ownership(user.ownership)
            .with_echo_output(echo);

        let reporter =
            Arc::new(ConsoleReporter::new(use_color).with_stdout_reserved(json_output));
        let use_case = CloneRepositoriesUseCase::new(
            config,
            Arc::new(GitScm::new()),
            Arc::new(LocalFs::new()),
            reporter.clone(),
        );

        let report = use_case.execute(&self.cli.repositories).await;

        match self.cli.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text if self.cli.verbose => {
                ConsoleReporter::write_line(false, &reporter.summary(&report))
            }
            OutputFormat::Text => {}
        }

        // Per-repository failures were already reported and do not change the exit status.
        Ok(())
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("gclone").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repositories_are_required() {
        let error = parse(&[]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_eq!(error.exit_code(), EXIT_USAGE);
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "-f",
            "-o",
            "--clone-opts",
            "--depth 1 --single-branch",
            "--timeout",
            "60",
            "--output",
            "json",
            "git@github.com:x/y.git",
            "https://github.com/a/b",
        ])
        .unwrap();

        assert!(cli.force);
        assert!(cli.open);
        assert_eq!(cli.clone_args(), vec!["--depth", "1", "--single-branch"]);
        assert_eq!(cli.timeout, Some(60));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(
            cli.repositories,
            vec!["git@github.com:x/y.git", "https://github.com/a/b"]
        );
    }

    #[test]
    fn test_debug_value() {
        let cli = parse(&["https://github.com/x/y", "--debug"]).unwrap();
        assert!(cli.debug_enabled());

        let cli = parse(&["--debug=", "https://github.com/x/y"]).unwrap();
        assert_eq!(cli.repositories, vec!["https://github.com/x/y"]);
        assert!(!cli.debug_enabled());
    }

    #[test]
    fn test_no_clone_opts() {
        let cli = parse(&["https://github.com/x/y"]).unwrap();
        assert!(cli.clone_args().is_empty());
    }
}
