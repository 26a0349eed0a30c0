use crate::application::services::{RepoDir, ResolveOptions, Session};
use crate::common::CohoResult;
use crate::domain::entities::RepoDescriptor;
use crate::domain::value_objects::ScmType;
use crate::infrastructure::git::GitRepository;
use crate::infrastructure::process::{ExecOptions, ExecTask, Verbosity};
use colored::Colorize;
use tracing::{info, warn};

/// 更新の設定
#[derive(Debug, Clone)]
pub struct RepoUpdateConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// 更新するブランチ（空の場合は現在のブランチ）
    pub branches: Vec<String>,

    /// 更新前にfetchするか
    pub fetch: bool,

    /// fetchの深さ
    pub depth: Option<u32>,
}

impl Default for RepoUpdateConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            branches: Vec::new(),
            fetch: true,
            depth: None,
        }
    }
}

/// ブランチ更新の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchUpdate {
    /// fast-forwardで更新された
    Updated(String),
    /// 既に最新
    UpToDate(String),
    /// リモートから新規に作成された
    Created(String),
    /// リモートにブランチが存在しない
    NoRemote(String),
}

/// 単一リポジトリの更新結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUpdateReport {
    pub repo: &'static str,
    pub branches: Vec<BranchUpdate>,
}

/// 更新のユースケース
pub struct RepoUpdateUseCase {
    config: RepoUpdateConfig,
}

impl RepoUpdateUseCase {
    pub fn new(config: RepoUpdateConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<RepoUpdateReport>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default().with_svn())?;
        self.update_repos(session, &repos).await
    }

    /// Fetch `repos` concurrently, then fast-forward each in turn.
    pub async fn update_repos(
        &self,
        session: &Session,
        repos: &[RepoDescriptor],
    ) -> CohoResult<Vec<RepoUpdateReport>> {
        if self.config.fetch {
            self.fetch_all(session, repos).await?;
        }

        session
            .walker()
            .for_each_repo(repos, |dir| async move { self.update_repo(session, &dir).await })
            .await
    }

    async fn fetch_all(&self, session: &Session, repos: &[RepoDescriptor]) -> CohoResult<()> {
        let mut tasks = Vec::new();
        for repo in repos.iter().filter(|r| r.scm_type() == ScmType::Git) {
            let dir = session.walker().repo_dir(repo)?;
            let remote = session.remote_name(repo, &dir).await?;
            let mut argv = vec!["git".to_string(), "fetch".to_string(), "--progress".to_string()];
            if let Some(depth) = self.config.depth {
                argv.push(format!("--depth={}", depth));
            }
            argv.push(remote);
            tasks.push(ExecTask::new(
                dir,
                argv.as_slice(),
                ExecOptions::new().with_verbosity(Verbosity::CommandOnly),
            ));
        }
        if tasks.is_empty() {
            return Ok(());
        }

        info!(count = tasks.len(), "fetching");
        let spinner = super::batch_spinner(&format!("Fetching {} repos", tasks.len()));
        let outcome = session.executor.exec_parallel(tasks).await;
        spinner.finish_and_clear();
        outcome.map(|_| ())
    }

    /// Bring one checkout up to date with its remote without fetching.
    pub async fn update_repo(&self, session: &Session, dir: &RepoDir) -> CohoResult<RepoUpdateReport> {
        let repo = &dir.repo;
        println!("{} Updating {}", "::".blue().bold(), repo.repo_name.bold());

        if repo.scm_type() == ScmType::Svn {
            session
                .executor
                .exec(&dir.path, &["svn", "up"], ExecOptions::new())
                .await?;
            return Ok(RepoUpdateReport {
                repo: repo.id,
                branches: Vec::new(),
            });
        }

        let git = session.git(&dir.path);
        let branches = if self.config.branches.is_empty() {
            match git.current_branch_name(true).await? {
                Some(branch) => vec![branch],
                None => {
                    warn!(repo = repo.id, "detached HEAD, not updating");
                    println!(
                        "{} Skipping {}: not on a named branch",
                        "⚠".yellow().bold(),
                        repo.repo_name
                    );
                    return Ok(RepoUpdateReport {
                        repo: repo.id,
                        branches: Vec::new(),
                    });
                }
            }
        } else {
            self.config.branches.clone()
        };
        let remote = session.remote_name(repo, &dir.path).await?;

        let updates = git
            .stash_and_pop(|| async {
                let mut updates = Vec::with_capacity(branches.len());
                for branch in &branches {
                    updates.push(update_branch(&git, &remote, branch).await?);
                }
                Ok(updates)
            })
            .await?;

        Ok(RepoUpdateReport {
            repo: repo.id,
            branches: updates,
        })
    }
}

/// Fast-forward `branch` to `remote/branch`, creating it when only the remote has it.
async fn update_branch(git: &GitRepository<'_>, remote: &str, branch: &str) -> CohoResult<BranchUpdate> {
    if !git.remote_branch_exists(remote, branch).await? {
        println!(
            "{} Remote branch does not exist: {}/{}",
            "⚠".yellow().bold(),
            remote,
            branch
        );
        return Ok(BranchUpdate::NoRemote(branch.to_string()));
    }

    let tracking = format!("{}/{}", remote, branch);
    if !git.local_branch_exists(branch).await? {
        git.git(&["checkout", "-q", "-b", branch, &tracking], ExecOptions::new())
            .await?;
        return Ok(BranchUpdate::Created(branch.to_string()));
    }

    git.checkout(branch).await?;
    let output = git
        .git(&["merge", "--ff-only", &tracking], ExecOptions::new())
        .await?
        .unwrap_or_default();
    if output.contains("Already up") {
        Ok(BranchUpdate::UpToDate(branch.to_string()))
    } else {
        Ok(BranchUpdate::Updated(branch.to_string()))
    }
}
