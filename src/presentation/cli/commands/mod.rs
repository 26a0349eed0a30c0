pub mod audit;
pub mod for_each;
pub mod list_repos;
pub mod pulls;
pub mod release;
pub mod reports;
pub mod repos;
pub mod status;
pub mod tags;

pub use audit::*;
pub use for_each::*;
pub use list_repos::*;
pub use pulls::*;
pub use release::*;
pub use reports::*;
pub use repos::*;
pub use status::*;
pub use tags::*;

use clap::Args;

/// `-r/--repo`, shared by every command that works on a set of repositories.
#[derive(Debug, Clone, Default, Args)]
pub struct RepoArgs {
    /// Repository id, package name, repo name or group (repeatable; defaults to the current repo)
    #[arg(short = 'r', long = "repo", value_name = "REPO")]
    pub repos: Vec<String>,
}

/// `-b/--branch`, for commands that operate on branches.
#[derive(Debug, Clone, Default, Args)]
pub struct BranchArgs {
    /// Branch to operate on (repeatable; defaults to the current branch)
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub branches: Vec<String>,
}
