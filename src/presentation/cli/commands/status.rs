use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{BranchArgs, RepoArgs};
use crate::application::services::Session;
use crate::application::use_cases::repo_status::{RepoStatus, RepoStatusConfig, RepoStatusUseCase};
use crate::presentation::ui::DisplayHelper;

/// repo-status command arguments
#[derive(Debug, Clone, Args)]
pub struct RepoStatusArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[command(flatten)]
    pub branch: BranchArgs,

    /// Show a diffstat of unpushed commits
    #[arg(long)]
    pub diff: bool,
}

/// Handler for the repo-status command
pub struct RepoStatusCommand {
    display: DisplayHelper,
}

impl RepoStatusCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: RepoStatusArgs) -> Result<()> {
        let config = RepoStatusConfig {
            repos: args.repo.repos,
            branches: args.branch.branches,
            diff: args.diff,
        };
        let statuses = RepoStatusUseCase::new(config).execute(session).await?;

        let mut clean = 0;
        for status in &statuses {
            if status.has_issues() || status.branches.iter().any(|b| !b.has_remote) {
                self.print_detailed_status(status);
            } else {
                clean += 1;
            }
        }

        if clean == statuses.len() {
            self.display.success("All repos are clean and pushed");
        } else if clean > 0 {
            self.display.info(&format!("{} other repo(s) are clean", clean));
        }
        Ok(())
    }

    fn print_detailed_status(&self, status: &RepoStatus) {
        self.display.section_header(status.repo_name);

        if status.pending_changes {
            let label = if self.display.use_color {
                "Uncommitted changes:".yellow().to_string()
            } else {
                "Uncommitted changes:".to_string()
            };
            println!("{}", label);
            for line in status.changes.lines() {
                self.display.print_indented(line, 1);
            }
        }

        for branch in &status.branches {
            if !branch.has_remote {
                self.display.print_indented(
                    &format!(
                        "{} has no {}/{}",
                        self.display.format_branch(&branch.branch),
                        status.remote,
                        branch.branch
                    ),
                    0,
                );
                continue;
            }
            if branch.commits_ahead.is_empty() {
                continue;
            }

            println!(
                "Local commits on {} not in {}/{}:",
                self.display.format_branch(&branch.branch),
                status.remote,
                branch.branch
            );
            for commit in &branch.commits_ahead {
                self.display.print_indented(commit, 1);
            }
            if let Some(diff) = &branch.diff {
                for line in diff.lines() {
                    self.display.print_indented(line, 2);
                }
            }
        }
    }
}
