use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::RepoArgs;
use crate::application::services::Session;
use crate::application::use_cases::license_audit::{LicenseAuditConfig, LicenseAuditUseCase};
use crate::presentation::ui::DisplayHelper;

/// audit-license-headers command arguments
#[derive(Debug, Clone, Args)]
pub struct AuditArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Write the full report to this file
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Extra path pattern to skip (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,
}

/// License header audit command implementation
pub struct AuditCommand {
    display: DisplayHelper,
}

impl AuditCommand {
    pub fn new(display: DisplayHelper) -> Self {
        Self { display }
    }

    pub async fn execute(&self, session: &Session, args: AuditArgs) -> Result<()> {
        let config = LicenseAuditConfig {
            repos: args.repo.repos,
            dest: args.dest.clone(),
            excludes: args.excludes,
        };
        let reports = LicenseAuditUseCase::new(config).execute(session).await?;

        for report in &reports {
            if report.missing.is_empty() {
                self.display.success(&format!(
                    "{}: {} file(s) checked, all have headers",
                    report.repo_name, report.checked
                ));
                continue;
            }

            self.display.warning(&format!(
                "{}: {} of {} file(s) lack a license header",
                report.repo_name,
                report.missing.len(),
                report.checked
            ));
            if args.dest.is_none() {
                for path in &report.missing {
                    self.display.print_indented(&path.display().to_string(), 1);
                }
            }
        }

        if let Some(dest) = &args.dest {
            self.display
                .info(&format!("Report written to {}", dest.display()));
        }
        Ok(())
    }
}
