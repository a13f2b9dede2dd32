//! # gclone - Clone git repositories into a predictable layout
//!
//! `gclone` takes one or more git repository URLs in any of the common dialects
//! (scheme URLs, scp-like shorthand, `git+ssh://`, optional ports and `.git`
//! suffixes), decomposes each into host and path, and clones them concurrently
//! into `<workspace>/<host>/<path>`.
//!
//! ```bash
//! gclone git@github.com:ntk148v/gclone.git https://github.com/x/y
//! # -> ~/Workspace/github.com/ntk148v/gclone
//! # -> ~/Workspace/github.com/x/y
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: URL parsing ([`domain::value_objects::git_url::GitUrl`]), workspace layout
//!   and per-task results
//! - [`application`]: the concurrent clone orchestrator
//!   ([`application::use_cases::clone_repositories::CloneRepositoriesUseCase`])
//! - [`infrastructure`]: the external `git` process, filesystem and invoking user
//! - [`presentation`]: CLI interface and console output
//! - [`common`]: shared error handling
//!
//! ## Using the Library
//!
//! ```rust
//! use gclone::domain::entities::workspace::Workspace;
//! use gclone::domain::value_objects::git_url::GitUrl;
//!
//! # fn example() -> gclone::Result<()> {
//! let url = GitUrl::parse("git@github.com:ntk148v/gclone.git")?;
//! assert_eq!(url.resource(), "github.com");
//! assert_eq!(url.path(), "ntk148v/gclone");
//!
//! let workspace = Workspace::new("/tmp/ws");
//! assert_eq!(
//!     workspace.destination_for(&url),
//!     std::path::PathBuf::from("/tmp/ws/github.com/ntk148v/gclone")
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::GcloneError;
pub use crate::common::result::GcloneResult as Result;
