//! # coho - Cordova maintainer tooling
//!
//! `coho` runs git (and, for a couple of repositories, svn) operations across
//! the Apache Cordova family of repositories: cloning, updating, resetting,
//! pushing, status, release branches and tags, license header audits and a
//! few reports.
//!
//! Repositories are checked out as sibling directories under one base
//! directory. Commands take `-r/--repo` values naming repositories or groups
//! from a static registry, resolve them into an ordered, de-duplicated list and
//! run a step inside each checkout.
//!
//! ## Architecture
//!
//! - [`domain`]: the repository registry, the workspace layout and release versions
//! - [`application`]: repo resolution, the per-repo walker and one use case per command
//! - [`infrastructure`]: subprocess execution, git helpers, config file, GitHub client
//! - [`presentation`]: clap CLI and terminal output
//! - [`common`]: [`CohoError`] and [`CohoResult`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use coho::application::services::Session;
//! use coho::application::use_cases::repo_status::{RepoStatusConfig, RepoStatusUseCase};
//! use coho::domain::entities::{RepoRegistry, Workspace};
//! use coho::infrastructure::{CohoConfig, Executor};
//!
//! # async fn example() -> coho::Result<()> {
//! let registry = RepoRegistry::cordova();
//! let workspace = Workspace::new("/src/cordova", "/src/cordova");
//! let session = Session::new(registry, workspace, Executor::default(), CohoConfig::default());
//!
//! let config = RepoStatusConfig {
//!     repos: vec!["platform".to_string()],
//!     ..Default::default()
//! };
//! for status in RepoStatusUseCase::new(config).execute(&session).await? {
//!     println!("{}: pending changes = {}", status.repo_name, status.pending_changes);
//! }
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use crate::common::error::CohoError;
pub use crate::common::result::CohoResult as Result;
