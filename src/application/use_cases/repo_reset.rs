use super::repo_update::{RepoUpdateConfig, RepoUpdateUseCase};
use crate::application::services::{RepoDir, ResolveOptions, Session};
use crate::common::{CohoResult, OptionExt};
use crate::infrastructure::process::ExecOptions;
use colored::Colorize;
use tracing::{debug, warn};

/// リセットの設定
#[derive(Debug, Clone, Default)]
pub struct RepoResetConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// リセットするブランチ（空の場合は現在のブランチ）
    pub branches: Vec<String>,
}

/// 単一リポジトリのリセット結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoResetReport {
    pub repo: &'static str,

    /// リモートの状態に合わせたブランチ
    pub reset: Vec<String>,

    /// リモートに存在しないため触らなかったブランチ
    pub local_only: Vec<String>,
}

/// リセットのユースケース
///
/// 各リポジトリを更新してから、ローカルのブランチをリモートの状態に強制的に合わせる。
pub struct RepoResetUseCase {
    config: RepoResetConfig,
}

impl RepoResetUseCase {
    pub fn new(config: RepoResetConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<RepoResetReport>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default())?;
        let update = RepoUpdateUseCase::new(RepoUpdateConfig {
            branches: self.config.branches.clone(),
            ..Default::default()
        });

        session
            .walker()
            .for_each_repo(&repos, |dir| {
                let update = &update;
                async move {
                    update
                        .update_repos(session, std::slice::from_ref(&dir.repo))
                        .await?;
                    self.reset_repo(session, &dir).await
                }
            })
            .await
    }

    async fn reset_repo(&self, session: &Session, dir: &RepoDir) -> CohoResult<RepoResetReport> {
        let repo = &dir.repo;
        let git = session.git(&dir.path);
        let remote = session.remote_name(repo, &dir.path).await?;

        println!("{} Resetting {}", "::".blue().bold(), repo.repo_name.bold());
        let report = git
            .stash_and_pop(|| async {
                let original = git
                    .current_branch_name(false)
                    .await?
                    .ok_or_internal_error("current branch unknown")?;
                let branches = if self.config.branches.is_empty() {
                    vec![original]
                } else {
                    self.config.branches.clone()
                };

                let mut report = RepoResetReport {
                    repo: repo.id,
                    ..Default::default()
                };
                for branch in branches {
                    if !git.remote_branch_exists(&remote, &branch).await? {
                        warn!(repo = repo.id, branch = %branch, "no remote branch, left untouched");
                        println!(
                            "{} {} has no {}/{}; leaving it alone",
                            "⚠".yellow().bold(),
                            repo.repo_name,
                            remote,
                            branch
                        );
                        report.local_only.push(branch);
                        continue;
                    }
                    git.checkout(&branch).await?;
                    let tracking = format!("{}/{}", remote, branch);
                    git.git(&["reset", "--hard", &tracking], ExecOptions::new())
                        .await?;
                    report.reset.push(branch);
                }
                Ok(report)
            })
            .await?;

        debug!(repo = repo.id, reset = ?report.reset, "reset done");
        Ok(report)
    }
}
