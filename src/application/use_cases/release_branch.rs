use super::DEFAULT_BRANCH;
use crate::application::services::{RepoDir, ResolveOptions, Session};
use crate::common::{CohoError, CohoResult};
use crate::domain::entities::RepoDescriptor;
use crate::domain::value_objects::ReleaseVersion;
use crate::infrastructure::filesystem::version_files;
use crate::infrastructure::git::GitRepository;
use crate::infrastructure::process::ExecOptions;
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// リリースブランチ準備の設定
#[derive(Debug, Clone)]
pub struct PrepareReleaseConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// リリースするバージョン
    pub version: ReleaseVersion,

    /// 実行せずに計画を表示するだけか
    pub pretend: bool,
}

/// リリースブランチ準備の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareReleaseResult {
    pub release_branch: String,

    /// 対象になったリポジトリのID
    pub repos: Vec<&'static str>,

    /// 作成したコミット数
    pub commits: usize,
}

impl PrepareReleaseResult {
    /// Command that publishes the prepared branches.
    pub fn push_hint(&self) -> String {
        let mut hint = String::from("coho repo-push");
        for repo in &self.repos {
            hint.push_str(" -r ");
            hint.push_str(repo);
        }
        hint.push_str(&format!(" -b {} -b {}", DEFAULT_BRANCH, self.release_branch));
        hint
    }
}

/// リリースブランチを準備するユースケース
///
/// メジャー・マイナーリリースではmasterから `X.Y.x` ブランチを切り、masterを
/// 次の開発バージョンに上げる。パッチリリースでは既存のリリースブランチの
/// バージョンだけを更新する。
pub struct PrepareReleaseUseCase {
    config: PrepareReleaseConfig,
}

impl PrepareReleaseUseCase {
    pub fn new(config: PrepareReleaseConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<PrepareReleaseResult> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default())?;
        let commits_before = session.commit_count();

        let ids = session
            .walker()
            .for_each_repo(&repos, |dir| async move {
                self.prepare_repo(session, &dir).await?;
                Ok(dir.repo.id)
            })
            .await?;

        let result = PrepareReleaseResult {
            release_branch: self.config.version.release_branch(),
            repos: ids,
            commits: session.commit_count() - commits_before,
        };
        if result.commits > 0 {
            println!(
                "{} Work to push. Review the commits, then run: {}",
                "✓".green().bold(),
                result.push_hint().bold()
            );
        } else if !self.config.pretend {
            println!("{} No commits were made", "::".blue().bold());
        }
        Ok(result)
    }

    async fn prepare_repo(&self, session: &Session, dir: &RepoDir) -> CohoResult<()> {
        let repo = &dir.repo;
        let version = &self.config.version;
        let release_branch = version.release_branch();
        println!(
            "{} Preparing {} for {}",
            "::".blue().bold(),
            repo.repo_name.bold(),
            version
        );

        if self.config.pretend {
            if version.is_patch_release() {
                println!("  would set {} to {} on {}", repo.repo_name, version, release_branch);
            } else {
                println!("  would create {} from {}", release_branch, DEFAULT_BRANCH);
                println!("  would set {} to {} on {}", repo.repo_name, version.next_dev_version(), DEFAULT_BRANCH);
                println!("  would set {} to {} on {}", repo.repo_name, version, release_branch);
            }
            return Ok(());
        }

        let git = session.git(&dir.path);
        let remote = session.remote_name(repo, &dir.path).await?;

        git.stash_and_pop(|| async {
            if !version.is_patch_release() {
                git.checkout(DEFAULT_BRANCH).await?;
                if !git.local_branch_exists(&release_branch).await? {
                    if git.remote_branch_exists(&remote, &release_branch).await? {
                        let tracking = format!("{}/{}", remote, release_branch);
                        git.git(&["branch", &release_branch, &tracking], ExecOptions::new())
                            .await?;
                    } else {
                        git.git(&["branch", &release_branch], ExecOptions::new())
                            .await?;
                    }
                }
                commit_version(&git, repo, &dir.path, &version.next_dev_version()).await?;
            } else if !git.local_branch_exists(&release_branch).await? {
                if !git.remote_branch_exists(&remote, &release_branch).await? {
                    return Err(CohoError::git_error(
                        format!(
                            "Release branch {} does not exist in {}",
                            release_branch, repo.repo_name
                        ),
                        Some(dir.path.clone()),
                    ));
                }
                let tracking = format!("{}/{}", remote, release_branch);
                git.git(&["branch", &release_branch, &tracking], ExecOptions::new())
                    .await?;
            }

            git.checkout(&release_branch).await?;
            commit_version(&git, repo, &dir.path, &version.to_string()).await
        })
        .await
    }
}

/// Write `version` into the repo and commit it when anything changed.
async fn commit_version(
    git: &GitRepository<'_>,
    repo: &RepoDescriptor,
    dir: &Path,
    version: &str,
) -> CohoResult<()> {
    let changed = version_files::write_version(repo, dir, version).await?;
    if changed.is_empty() {
        println!("  {} is already at {}", repo.repo_name, version);
        return Ok(());
    }

    let mut add = vec!["add".to_string()];
    add.extend(changed.iter().map(|p| p.display().to_string()));
    let add: Vec<&str> = add.iter().map(String::as_str).collect();
    git.git(&add, ExecOptions::new()).await?;

    let message = format!("Set VERSION to {} (via coho)", version);
    git.git(&["commit", "-m", &message], ExecOptions::new())
        .await?;
    info!(repo = repo.id, version, "version committed");
    Ok(())
}
