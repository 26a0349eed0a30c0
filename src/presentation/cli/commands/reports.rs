use anyhow::Result;
use clap::Args;

use super::RepoArgs;
use crate::application::services::Session;
use crate::application::use_cases::activity_report::{
    LastWeekConfig, LastWeekUseCase, RepoActivity, ShortlogConfig, ShortlogUseCase,
};
use crate::presentation::ui::DisplayHelper;

/// last-week command arguments
#[derive(Debug, Clone, Args)]
pub struct LastWeekArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Only show commits authored by you (`git config user.email`)
    #[arg(long)]
    pub me: bool,

    /// How many days back to look
    #[arg(long, default_value_t = 7)]
    pub days: u32,
}

/// shortlog command arguments
#[derive(Debug, Clone, Args)]
pub struct ShortlogArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Start of the range (defaults to the most recent release tag)
    #[arg(long)]
    pub from: Option<String>,

    /// End of the range (defaults to HEAD)
    #[arg(long)]
    pub to: Option<String>,
}

/// Handler for last-week and shortlog
pub struct ActivityCommand {
    display: DisplayHelper,
}

impl ActivityCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn last_week(&self, session: &Session, args: LastWeekArgs) -> Result<()> {
        let config = LastWeekConfig {
            repos: args.repo.repos,
            me: args.me,
            days: args.days,
        };
        let activity = LastWeekUseCase::new(config).execute(session).await?;
        if activity.is_empty() {
            self.display
                .info(&format!("No commits in the last {} day(s)", args.days));
        }
        self.print_activity(&activity);
        Ok(())
    }

    pub async fn shortlog(&self, session: &Session, args: ShortlogArgs) -> Result<()> {
        let config = ShortlogConfig {
            repos: args.repo.repos,
            from: args.from,
            to: args.to,
        };
        let activity = ShortlogUseCase::new(config).execute(session).await?;
        self.print_activity(&activity);
        Ok(())
    }

    fn print_activity(&self, activity: &[RepoActivity]) {
        for entry in activity {
            self.display.section_header(entry.repo_name);
            for line in &entry.lines {
                self.display.print_indented(line, 1);
            }
        }
    }
}
