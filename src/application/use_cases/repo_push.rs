use crate::application::services::{RepoDir, ResolveOptions, Session};
use crate::common::CohoResult;
use crate::infrastructure::process::ExecOptions;
use colored::Colorize;

/// プッシュの設定
#[derive(Debug, Clone, Default)]
pub struct RepoPushConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// プッシュするブランチ（空の場合は現在のブランチ）
    pub branches: Vec<String>,

    /// 実行せずにコマンドを表示するだけか
    pub pretend: bool,
}

/// ブランチごとのプッシュ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed { branch: String, commits: usize },
    WouldPush { branch: String, commits: usize },
    NothingToPush(String),
}

/// プッシュのユースケース
pub struct RepoPushUseCase {
    config: RepoPushConfig,
}

impl RepoPushUseCase {
    pub fn new(config: RepoPushConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<(&'static str, Vec<PushOutcome>)>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default())?;
        session
            .walker()
            .for_each_repo(&repos, |dir| async move {
                let outcomes = self.push_repo(session, &dir).await?;
                Ok((dir.repo.id, outcomes))
            })
            .await
    }

    async fn push_repo(&self, session: &Session, dir: &RepoDir) -> CohoResult<Vec<PushOutcome>> {
        let repo = &dir.repo;
        let git = session.git(&dir.path);
        let remote = session.remote_name(repo, &dir.path).await?;
        let branches = if self.config.branches.is_empty() {
            git.current_branch_name(false).await?.into_iter().collect()
        } else {
            self.config.branches.clone()
        };

        let mut outcomes = Vec::with_capacity(branches.len());
        for branch in branches {
            // a branch missing on the remote is always pushed
            let commits = if git.remote_branch_exists(&remote, &branch).await? {
                let ahead = git.commits_ahead(&remote, &branch).await?.len();
                if ahead == 0 {
                    println!(
                        "{} {}: nothing to push on {}",
                        "✓".green().bold(),
                        repo.repo_name,
                        branch
                    );
                    outcomes.push(PushOutcome::NothingToPush(branch));
                    continue;
                }
                ahead
            } else {
                0
            };

            let argv = ["git", "push", remote.as_str(), branch.as_str()];
            if self.config.pretend {
                println!("{} Would run: {} (in {})", "::".blue().bold(), argv.join(" "), dir.path.display());
                outcomes.push(PushOutcome::WouldPush { branch, commits });
            } else {
                session
                    .executor
                    .exec(&dir.path, &argv, ExecOptions::new())
                    .await?;
                outcomes.push(PushOutcome::Pushed { branch, commits });
            }
        }
        Ok(outcomes)
    }
}
