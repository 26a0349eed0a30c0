use anyhow::Result;
use clap::Args;

use super::RepoArgs;
use crate::application::services::Session;
use crate::application::use_cases::pull_requests::{ListPullsConfig, ListPullsUseCase};
use crate::infrastructure::github::GitHubClient;
use crate::presentation::ui::DisplayHelper;

/// list-pulls command arguments
#[derive(Debug, Clone, Args)]
pub struct ListPullsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Only list pull requests updated within this many days
    #[arg(long, value_name = "DAYS")]
    pub max_age: Option<u32>,

    /// One line per pull request
    #[arg(long)]
    pub short: bool,

    /// GitHub API token (overrides `github_token` from the config file)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

/// Handler for list-pulls
pub struct ListPullsCommand {
    display: DisplayHelper,
}

impl ListPullsCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: ListPullsArgs) -> Result<()> {
        let token = session.config.github_token_with_env(args.github_token);
        let client = GitHubClient::new(token)?;
        let config = ListPullsConfig {
            repos: args.repo.repos,
            max_age_days: args.max_age,
        };
        let results = ListPullsUseCase::new(config, client).execute(session).await?;

        let mut total = 0;
        for repo in results.iter().filter(|r| !r.pulls.is_empty()) {
            total += repo.pulls.len();
            if args.short {
                for pull in &repo.pulls {
                    println!("{}#{} {} ({})", repo.repo_name, pull.number, pull.title, pull.user.login);
                }
                continue;
            }

            self.display.section_header(&format!(
                "{} ({} open)",
                repo.repo_name,
                repo.pulls.len()
            ));
            for pull in &repo.pulls {
                self.display.print_indented(
                    &format!(
                        "#{} {} - {} (updated {})",
                        pull.number,
                        pull.title,
                        pull.user.login,
                        pull.updated_at.format("%Y-%m-%d")
                    ),
                    1,
                );
                self.display.print_indented(&pull.html_url, 2);
            }
        }

        if total == 0 {
            self.display.info("No open pull requests");
        }
        Ok(())
    }
}
