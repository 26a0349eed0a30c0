//! Infrastructure layer: subprocesses, git, the filesystem and GitHub.

pub mod filesystem;
pub mod git;
pub mod github;
pub mod process;

pub use filesystem::{CohoConfig, ConfigStore};
pub use git::{GitRepository, RemoteNameCache};
pub use github::GitHubClient;
pub use process::{ExecOptions, Executor};
