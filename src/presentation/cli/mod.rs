pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use tracing::debug;

use crate::application::services::Session;
use crate::common::CohoError;
use crate::domain::entities::{RepoRegistry, Workspace};
use crate::infrastructure::filesystem::ConfigStore;
use crate::infrastructure::process::Executor;
use crate::presentation::ui::DisplayHelper;
use commands::*;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("COHO_GIT_HASH"),
    ", built ",
    env!("COHO_BUILD_DATE"),
    " for ",
    env!("COHO_BUILD_TARGET"),
    ")"
);

/// coho - maintainer tooling for the Cordova repositories
#[derive(Debug, Parser)]
#[command(name = "coho")]
#[command(about = "Multi-repo git operations, release tagging and reports for Apache Cordova")]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Use the parent of the checkout containing the current directory as the base directory (default)
    #[arg(long, global = true, overrides_with = "no_chdir")]
    pub chdir: bool,

    /// Use the current directory as the base directory
    #[arg(long, global = true, overrides_with = "chdir")]
    pub no_chdir: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (defaults to ~/.coho.yml)
    #[arg(long, global = true, env = "COHO_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the base directory is derived from the enclosing checkout.
    pub fn chdir(&self) -> bool {
        !self.no_chdir
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clone repositories that are not checked out yet
    RepoClone(RepoCloneArgs),

    /// Fetch and fast-forward repositories
    RepoUpdate(RepoUpdateArgs),

    /// Throw away local commits and match the remote branches
    RepoReset(RepoResetArgs),

    /// Push local commits
    RepoPush(RepoPushArgs),

    /// Show uncommitted changes and unpushed commits
    RepoStatus(RepoStatusArgs),

    /// Run a shell command in each repository
    ForEach(ForEachArgs),

    /// List known repositories and groups
    ListRepos(ListReposArgs),

    /// Print the most recent release tag of each repository
    PrintTags(PrintTagsArgs),

    /// Create or update the X.Y.x release branch
    PrepareReleaseBranch(PrepareReleaseArgs),

    /// Tag the release branch
    TagRelease(TagReleaseArgs),

    /// Report source files missing an Apache license header
    AuditLicenseHeaders(AuditArgs),

    /// Show recent commits
    LastWeek(LastWeekArgs),

    /// Summarise commit authors over a range
    Shortlog(ShortlogArgs),

    /// List open pull requests on GitHub
    ListPulls(ListPullsArgs),
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> Result<()> {
        let display = DisplayHelper::auto(self.cli.no_color);
        colored::control::set_override(display.use_color);

        let session = self.build_session().await?;
        debug!(
            base_dir = %session.workspace.base_dir.display(),
            start_dir = %session.workspace.start_dir.display(),
            "session ready"
        );

        match self.cli.command {
            Commands::RepoClone(args) => RepoCloneCommand::new(display).execute(&session, args).await,
            Commands::RepoUpdate(args) => RepoUpdateCommand::new(display).execute(&session, args).await,
            Commands::RepoReset(args) => RepoResetCommand::new(display).execute(&session, args).await,
            Commands::RepoPush(args) => RepoPushCommand::new(display).execute(&session, args).await,
            Commands::RepoStatus(args) => RepoStatusCommand::new(display).execute(&session, args).await,
            Commands::ForEach(args) => ForEachCommand::new(display).execute(&session, args).await,
            Commands::ListRepos(args) => ListReposCommand::new(display).execute(&session, args),
            Commands::PrintTags(args) => PrintTagsCommand::new(display).execute(&session, args).await,
            Commands::PrepareReleaseBranch(args) => {
                PrepareReleaseCommand::new(display).execute(&session, args).await
            }
            Commands::TagRelease(args) => TagReleaseCommand::new(display).execute(&session, args).await,
            Commands::AuditLicenseHeaders(args) => AuditCommand::new(display).execute(&session, args).await,
            Commands::LastWeek(args) => ActivityCommand::new(display).last_week(&session, args).await,
            Commands::Shortlog(args) => ActivityCommand::new(display).shortlog(&session, args).await,
            Commands::ListPulls(args) => ListPullsCommand::new(display).execute(&session, args).await,
        }
    }

    async fn build_session(&self) -> Result<Session> {
        let start_dir = env::current_dir().map_err(|e| {
            CohoError::filesystem_error_with_source("Cannot determine the current directory", None, e)
        })?;
        let registry = RepoRegistry::cordova();
        let workspace = Workspace::discover(&registry, &start_dir, self.cli.chdir());
        let config = ConfigStore::new(self.cli.config.clone())
            .load()
            .await
            .map_err(CohoError::from)?;

        Ok(Session::new(registry, workspace, Executor::default(), config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_repeatable_repo_and_branch_flags() {
        let cli = Cli::try_parse_from([
            "coho", "repo-push", "-r", "android", "-r", "ios", "-b", "master", "-b", "9.0.x",
        ])
        .unwrap();
        match cli.command {
            Commands::RepoPush(args) => {
                assert_eq!(args.repo.repos, vec!["android", "ios"]);
                assert_eq!(args.branch.branches, vec!["master", "9.0.x"]);
                assert!(!args.pretend);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_chdir_defaults_on_and_last_flag_wins() {
        let cli = Cli::try_parse_from(["coho", "list-repos"]).unwrap();
        assert!(cli.chdir());

        let cli = Cli::try_parse_from(["coho", "--no-chdir", "list-repos"]).unwrap();
        assert!(!cli.chdir());

        let cli = Cli::try_parse_from(["coho", "--no-chdir", "--chdir", "list-repos"]).unwrap();
        assert!(cli.chdir());
    }

    #[test]
    fn test_release_version_is_validated() {
        let cli = Cli::try_parse_from(["coho", "tag-release", "-r", "android", "--version", "9.0.1"])
            .unwrap();
        match cli.command {
            Commands::TagRelease(args) => assert_eq!(args.version.to_string(), "9.0.1"),
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["coho", "tag-release", "--version", "9.0"]).is_err());
    }

    #[test]
    fn test_for_each_takes_trailing_command() {
        let cli = Cli::try_parse_from(["coho", "for-each", "-r", "tools", "git", "log", "-1"]).unwrap();
        match cli.command {
            Commands::ForEach(args) => {
                assert_eq!(args.repo.repos, vec!["tools"]);
                assert_eq!(args.command, vec!["git", "log", "-1"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_last_week_defaults_to_seven_days() {
        let cli = Cli::try_parse_from(["coho", "last-week", "--me"]).unwrap();
        match cli.command {
            Commands::LastWeek(args) => {
                assert!(args.me);
                assert_eq!(args.days, 7);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
