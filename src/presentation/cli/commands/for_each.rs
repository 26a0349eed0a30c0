use anyhow::Result;
use clap::Args;

use super::RepoArgs;
use crate::application::services::Session;
use crate::application::use_cases::for_each::{ForEachConfig, ForEachUseCase};
use crate::presentation::ui::DisplayHelper;

/// for-each command arguments
#[derive(Debug, Clone, Args)]
pub struct ForEachArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Shell command to run inside each repo
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Handler for the for-each command
pub struct ForEachCommand {
    display: DisplayHelper,
}

impl ForEachCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: ForEachArgs) -> Result<()> {
        let config = ForEachConfig {
            repos: args.repo.repos,
            command: args.command,
        };
        let ran = ForEachUseCase::new(config).execute(session).await?;
        self.display
            .success(&format!("Command finished in {} repo(s)", ran.len()));
        Ok(())
    }
}
