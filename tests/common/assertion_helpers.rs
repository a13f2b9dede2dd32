//! Assertion helpers for testing
//!
//! This module provides custom assertion macros and helper functions
//! that make test assertions more readable and provide better error messages.

use gclone::domain::entities::clone_task::{CloneOutcome, CloneTask, FailureKind};

/// Assert that a file exists
#[macro_export]
macro_rules! assert_file_exists {
    ($path:expr) => {
        assert!($path.exists(), "File should exist: {}", $path.display());
    };
    ($path:expr, $msg:expr) => {
        assert!($path.exists(), "{}: {}", $msg, $path.display());
    };
}

/// Assert that a file does not exist
#[macro_export]
macro_rules! assert_file_not_exists {
    ($path:expr) => {
        assert!(
            !$path.exists(),
            "File should not exist: {}",
            $path.display()
        );
    };
    ($path:expr, $msg:expr) => {
        assert!(!$path.exists(), "{}: {}", $msg, $path.display());
    };
}

/// Assert that a task finished as a successful clone
pub fn assert_cloned(task: &CloneTask) {
    assert!(
        matches!(task.outcome, CloneOutcome::Cloned { .. }),
        "Expected {} to be cloned, got {:?}",
        task.raw_url,
        task.outcome
    );
}

/// Assert that a task failed with the given kind
pub fn assert_failed_with(task: &CloneTask, expected: FailureKind) {
    match &task.outcome {
        CloneOutcome::Failed { kind, .. } => assert_eq!(
            *kind, expected,
            "Unexpected failure kind for {}",
            task.raw_url
        ),
        other => panic!("Expected {} to fail, got {:?}", task.raw_url, other),
    }
}
