use anyhow::Result;
use clap::Args;

use super::{BranchArgs, RepoArgs};
use crate::application::services::Session;
use crate::application::use_cases::repo_clone::{RepoCloneConfig, RepoCloneUseCase};
use crate::application::use_cases::repo_push::{PushOutcome, RepoPushConfig, RepoPushUseCase};
use crate::application::use_cases::repo_reset::{RepoResetConfig, RepoResetUseCase};
use crate::application::use_cases::repo_update::{
    BranchUpdate, RepoUpdateConfig, RepoUpdateUseCase,
};
use crate::presentation::ui::DisplayHelper;

/// repo-clone command arguments
#[derive(Debug, Clone, Args)]
pub struct RepoCloneArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Create shallow clones with this many commits
    #[arg(long)]
    pub depth: Option<u32>,
}

/// repo-update command arguments
#[derive(Debug, Clone, Args)]
pub struct RepoUpdateArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub branch: BranchArgs,

    /// Skip `git fetch` and only fast-forward from what is already fetched
    #[arg(long)]
    pub no_fetch: bool,

    /// Limit fetching to this many commits
    #[arg(long)]
    pub depth: Option<u32>,
}

/// repo-reset command arguments
#[derive(Debug, Clone, Args)]
pub struct RepoResetArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub branch: BranchArgs,
}

/// repo-push command arguments
#[derive(Debug, Clone, Args)]
pub struct RepoPushArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub branch: BranchArgs,

    /// Print the push commands instead of running them
    #[arg(long)]
    pub pretend: bool,
}

/// Handler for repo-clone
pub struct RepoCloneCommand {
    display: DisplayHelper,
}

impl RepoCloneCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: RepoCloneArgs) -> Result<()> {
        let config = RepoCloneConfig {
            repos: args.repo.repos,
            depth: args.depth,
        };
        let result = RepoCloneUseCase::new(config).execute(session).await?;

        if result.cloned.is_empty() {
            self.display.info("All repos are already cloned");
        } else {
            self.display
                .success(&format!("Cloned {} repo(s)", result.cloned.len()));
        }
        Ok(())
    }
}

/// Handler for repo-update
pub struct RepoUpdateCommand {
    display: DisplayHelper,
}

impl RepoUpdateCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: RepoUpdateArgs) -> Result<()> {
        let config = RepoUpdateConfig {
            repos: args.repo.repos,
            branches: args.branch.branches,
            fetch: !args.no_fetch,
            depth: args.depth,
        };
        let reports = RepoUpdateUseCase::new(config).execute(session).await?;

        let (mut changed, mut current) = (0, 0);
        for update in reports.iter().flat_map(|r| &r.branches) {
            match update {
                BranchUpdate::Updated(_) | BranchUpdate::Created(_) => changed += 1,
                BranchUpdate::UpToDate(_) => current += 1,
                BranchUpdate::NoRemote(_) => {}
            }
        }
        self.display.success(&format!(
            "Updated {} repo(s): {} branch(es) moved, {} already up to date",
            reports.len(),
            changed,
            current
        ));
        Ok(())
    }
}

/// Handler for repo-reset
pub struct RepoResetCommand {
    display: DisplayHelper,
}

impl RepoResetCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: RepoResetArgs) -> Result<()> {
        let config = RepoResetConfig {
            repos: args.repo.repos,
            branches: args.branch.branches,
        };
        let reports = RepoResetUseCase::new(config).execute(session).await?;

        let branches: usize = reports.iter().map(|r| r.reset.len()).sum();
        self.display.success(&format!(
            "Reset {} branch(es) in {} repo(s)",
            branches,
            reports.len()
        ));
        let skipped: usize = reports.iter().map(|r| r.local_only.len()).sum();
        if skipped > 0 {
            self.display
                .warning(&format!("{} local-only branch(es) left untouched", skipped));
        }
        Ok(())
    }
}

/// Handler for repo-push
pub struct RepoPushCommand {
    display: DisplayHelper,
}

impl RepoPushCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: RepoPushArgs) -> Result<()> {
        let config = RepoPushConfig {
            repos: args.repo.repos,
            branches: args.branch.branches,
            pretend: args.pretend,
        };
        let results = RepoPushUseCase::new(config).execute(session).await?;

        let (mut pushed, mut pending) = (0, 0);
        for outcome in results.iter().flat_map(|(_, outcomes)| outcomes) {
            match outcome {
                PushOutcome::Pushed { .. } => pushed += 1,
                PushOutcome::WouldPush { .. } => pending += 1,
                PushOutcome::NothingToPush(_) => {}
            }
        }

        if args.pretend {
            self.display
                .info(&format!("{} branch(es) would be pushed", pending));
        } else {
            self.display
                .success(&format!("Pushed {} branch(es)", pushed));
        }
        Ok(())
    }
}
