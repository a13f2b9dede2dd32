//! Test helper functions and utilities
//!
//! The clone tool is replaced by a shell script that behaves like `git clone`
//! and picks its outcome from the URL it is given:
//!
//! - URL containing `occupied`: fails with the "not an empty directory" message
//! - URL containing `missing`: fails with a generic "repository not found"
//! - URL containing `slow`: sleeps for 5 seconds before succeeding
//! - anything else: creates `.git/` and `README.md` in the destination and
//!   prints a progress line on stdout

use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_GIT_SCRIPT: &str = r##"#!/bin/sh
url=""
last=""
for arg; do url="$last"; last="$arg"; done
echo "$(pwd)|$*" >> "__LOG__"
case "$url" in
  *occupied*)
    echo "fatal: destination path '.' already exists and is not an empty directory." >&2
    exit 128 ;;
  *missing*)
    echo "remote: Repository not found." >&2
    echo "fatal: repository '$url' not found" >&2
    exit 128 ;;
  *slow*)
    sleep 5 ;;
esac
echo "Cloning into '$last'..." >&2
mkdir -p "$last/.git"
echo "Unpacking objects: 100%, done."
echo "# cloned from $url" > "$last/README.md"
exit 0
"##;

/// A fake `git` executable in its own temporary directory
pub struct FakeGit {
    dir: TempDir,
}

impl FakeGit {
    /// Install the script as `<tmp>/git`
    pub fn install() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let script = dir.path().join("git");
        let log = dir.path().join("calls.log");
        let body = FAKE_GIT_SCRIPT.replace("__LOG__", &log.to_string_lossy());
        std::fs::write(&script, body).expect("Failed to write fake git");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to make fake git executable");
        }

        Self { dir }
    }

    /// Path of the fake executable
    pub fn executable(&self) -> PathBuf {
        self.dir.path().join("git")
    }

    /// Directory to prepend to `PATH`
    pub fn bin_dir(&self) -> &Path {
        self.dir.path()
    }

    /// `PATH` value with the fake git first
    pub fn path_env(&self) -> String {
        match std::env::var("PATH") {
            Ok(path) => format!("{}:{}", self.bin_dir().display(), path),
            Err(_) => self.bin_dir().display().to_string(),
        }
    }

    /// One entry per invocation: `(working directory, arguments)`
    pub fn calls(&self) -> Vec<(String, String)> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .filter_map(|line| line.split_once('|'))
            .map(|(cwd, args)| (cwd.to_string(), args.to_string()))
            .collect()
    }
}

/// Helper functions for file system operations in tests
pub struct FileSystemHelper;

impl FileSystemHelper {
    /// Create a temporary file with specified content
    pub fn create_file(dir: &Path, filename: &str, content: &str) -> PathBuf {
        std::fs::create_dir_all(dir).expect("Failed to create directory");
        let file_path = dir.join(filename);
        std::fs::write(&file_path, content).expect("Failed to write temp file");
        file_path
    }

    /// Count entries in directory (non-recursive)
    pub fn count_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }
}
