use anyhow::Result;
use clap::Args;

use super::RepoArgs;
use crate::application::services::Session;
use crate::application::use_cases::print_tags::{PrintTagsConfig, PrintTagsUseCase, TagReport};
use crate::application::use_cases::tag_release::{TagOutcome, TagReleaseConfig, TagReleaseUseCase};
use crate::domain::value_objects::ReleaseVersion;
use crate::presentation::ui::DisplayHelper;

/// print-tags command arguments
#[derive(Debug, Clone, Args)]
pub struct PrintTagsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Check whether this tag exists instead of printing the most recent one
    #[arg(long)]
    pub tag: Option<String>,
}

/// tag-release command arguments
#[derive(Debug, Clone, Args)]
pub struct TagReleaseArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Version to tag, e.g. 6.2.0
    #[arg(long)]
    pub version: ReleaseVersion,

    /// Print the tag commands instead of running them
    #[arg(long)]
    pub pretend: bool,
}

/// Handler for print-tags
pub struct PrintTagsCommand {
    display: DisplayHelper,
}

impl PrintTagsCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: PrintTagsArgs) -> Result<()> {
        let config = PrintTagsConfig {
            repos: args.repo.repos,
            tag: args.tag,
        };
        let reports = PrintTagsUseCase::new(config).execute(session).await?;

        for report in &reports {
            match report {
                TagReport::MostRecent {
                    repo,
                    tag: Some(tag),
                    commits_since,
                } => {
                    let since = match commits_since {
                        Some(n) if *n > 0 => format!(" ({} commit(s) since)", n),
                        _ => String::new(),
                    };
                    println!("{}: {}{}", self.display.format_repo(repo), tag, since);
                }
                TagReport::MostRecent { repo, tag: None, .. } => {
                    self.display.warning(&format!("{}: no release tag found", repo));
                }
                TagReport::Exists {
                    repo,
                    tag,
                    exists: true,
                } => self.display.success(&format!("{}: {} exists", repo, tag)),
                TagReport::Exists {
                    repo,
                    tag,
                    exists: false,
                } => self.display.warning(&format!("{}: {} is missing", repo, tag)),
            }
        }
        Ok(())
    }
}

/// Handler for tag-release
pub struct TagReleaseCommand {
    display: DisplayHelper,
}

impl TagReleaseCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: TagReleaseArgs) -> Result<()> {
        let pretend = args.pretend;
        let config = TagReleaseConfig {
            repos: args.repo.repos,
            version: args.version,
            pretend,
        };
        let outcomes = TagReleaseUseCase::new(config).execute(session).await?;

        let tagged: Vec<&str> = outcomes
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                TagOutcome::Tagged(tag) | TagOutcome::WouldTag(tag) => Some(tag.as_str()),
                TagOutcome::AlreadyExists(_) => None,
            })
            .collect();

        if tagged.is_empty() {
            self.display.info("No new tags");
        } else if pretend {
            self.display
                .info(&format!("Would create {} tag(s)", tagged.len()));
        } else {
            self.display.success(&format!(
                "Created {} tag(s). Push them with: git push <remote> {}",
                tagged.len(),
                tagged.join(" ")
            ));
        }
        Ok(())
    }
}
