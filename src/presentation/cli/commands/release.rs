use anyhow::Result;
use clap::Args;

use super::RepoArgs;
use crate::application::services::Session;
use crate::application::use_cases::release_branch::{PrepareReleaseConfig, PrepareReleaseUseCase};
use crate::domain::value_objects::ReleaseVersion;
use crate::presentation::ui::DisplayHelper;

/// prepare-release-branch command arguments
#[derive(Debug, Clone, Args)]
pub struct PrepareReleaseArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Version being released, e.g. 6.2.0
    #[arg(long)]
    pub version: ReleaseVersion,

    /// Print what would change instead of committing
    #[arg(long)]
    pub pretend: bool,
}

/// Handler for prepare-release-branch
pub struct PrepareReleaseCommand {
    display: DisplayHelper,
}

impl PrepareReleaseCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: PrepareReleaseArgs) -> Result<()> {
        let config = PrepareReleaseConfig {
            repos: args.repo.repos,
            version: args.version,
            pretend: args.pretend,
        };
        let result = PrepareReleaseUseCase::new(config).execute(session).await?;

        if args.pretend {
            self.display.info(&format!(
                "Nothing was changed. To push the result afterwards: {}",
                result.push_hint()
            ));
        }
        Ok(())
    }
}
