use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

use crate::application::use_cases::{CloneEvent, CloneReporter};
use crate::domain::entities::clone_task::CloneReport;

/// Console output for clone progress
///
/// Each message is rendered in full and written with a single locked write,
/// so lines from concurrent tasks never interleave mid-line.
pub struct ConsoleReporter {
    pub use_color: bool,
    /// Send every message to stderr, leaving stdout to the JSON report
    pub stdout_reserved: bool,
}

impl ConsoleReporter {
    /// Create a new ConsoleReporter
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            stdout_reserved: false,
        }
    }

    pub fn with_stdout_reserved(mut self, stdout_reserved: bool) -> Self {
        self.stdout_reserved = stdout_reserved;
        self
    }

    fn success(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "✓".green().bold(), message)
        } else {
            message.to_string()
        }
    }

    fn error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "✗".red().bold(), message)
        } else {
            message.to_string()
        }
    }

    fn warning(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "⚠".yellow().bold(), message)
        } else {
            message.to_string()
        }
    }

    /// Format a file path with appropriate styling
    fn format_path(&self, path: &Path) -> String {
        if self.use_color {
            path.display().to_string().cyan().to_string()
        } else {
            path.display().to_string()
        }
    }

    /// Render an event; `true` means it belongs on stderr.
    pub fn render(&self, event: &CloneEvent) -> (bool, String) {
        let (to_stderr, line) = self.render_line(event);
        (to_stderr || self.stdout_reserved, line)
    }

    fn render_line(&self, event: &CloneEvent) -> (bool, String) {
        match event {
            CloneEvent::InvalidUrl { message, .. } => (
                true,
                self.error(&format!(
                    "Error parsing the input repository URL: {}",
                    message
                )),
            ),
            CloneEvent::Duplicate {
                raw_url,
                destination,
            } => (
                true,
                self.warning(&format!(
                    "Skipping {}: {} is already targeted by an earlier repository",
                    raw_url,
                    self.format_path(destination)
                )),
            ),
            CloneEvent::Planned {
                clone_url,
                destination,
            } => (
                false,
                format!(
                    "Would clone {} to {}",
                    clone_url,
                    self.format_path(destination)
                ),
            ),
            CloneEvent::Cloned { path, destination } => (
                false,
                self.success(&format!(
                    "Repository {} is cloned to {}",
                    path,
                    self.format_path(destination)
                )),
            ),
            CloneEvent::CloneFailed {
                raw_url,
                destination,
                message,
                ..
            } => (
                true,
                self.error(&format!(
                    "Error cloning {} to directory {}: {}",
                    raw_url,
                    self.format_path(destination),
                    message
                )),
            ),
            CloneEvent::EditorFailed {
                destination,
                editor,
                message,
            } => (
                true,
                self.error(&format!(
                    "Error opening {} directory with editor {}: {}",
                    self.format_path(destination),
                    editor,
                    message
                )),
            ),
        }
    }

    /// One-line summary of a finished run
    pub fn summary(&self, report: &CloneReport) -> String {
        let line = format!(
            "{} cloned, {} failed, {} skipped",
            report.succeeded_count(),
            report.failed_count(),
            report.skipped_count()
        );
        if !self.use_color {
            return line;
        }
        if report.is_success() {
            line.green().to_string()
        } else {
            line.yellow().to_string()
        }
    }

    /// Write one complete line to stdout or stderr
    pub fn write_line(to_stderr: bool, line: &str) {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        // Nothing useful can be done if the terminal is gone.
        let _ = if to_stderr {
            io::stderr().lock().write_all(buf.as_bytes())
        } else {
            io::stdout().lock().write_all(buf.as_bytes())
        };
    }
}

impl CloneReporter for ConsoleReporter {
    fn report(&self, event: CloneEvent) {
        let (to_stderr, line) = self.render(&event);
        Self::write_line(to_stderr, &line);
    }
}
