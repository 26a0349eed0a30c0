use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::application::services::Session;
use crate::application::use_cases::list_repos::{list_repos, RepoListing};
use crate::presentation::ui::DisplayHelper;

/// Output format options for list-repos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

/// list-repos command arguments
#[derive(Debug, Clone, Args)]
pub struct ListReposArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct Listing<'a> {
    repos: &'a [RepoListing],
    groups: &'a [&'static str],
}

/// Handler for the list-repos command
pub struct ListReposCommand {
    display: DisplayHelper,
}

impl ListReposCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub fn execute(&self, session: &Session, args: ListReposArgs) -> Result<()> {
        let (repos, groups) = list_repos(&session.registry);
        let listing = Listing {
            repos: &repos,
            groups: &groups,
        };

        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&listing)?),
            OutputFormat::Text => self.print_text(&repos, &groups),
        }
        Ok(())
    }

    fn print_text(&self, repos: &[RepoListing], groups: &[&'static str]) {
        let rows: Vec<Vec<String>> = repos
            .iter()
            .map(|repo| {
                let mut title = repo.title.to_string();
                if repo.inactive {
                    title.push_str(" (inactive)");
                }
                vec![
                    repo.id.to_string(),
                    title,
                    repo.repo_name.to_string(),
                    repo.scm.to_string(),
                    repo.groups.join(","),
                ]
            })
            .collect();

        self.display.section_header("Valid values for -r/--repo");
        self.display
            .print_table(&["ID", "Title", "Repo", "SCM", "Groups"], &rows);

        self.display.section_header("Valid repo groups");
        for group in groups {
            self.display.print_indented(group, 1);
        }
    }
}
