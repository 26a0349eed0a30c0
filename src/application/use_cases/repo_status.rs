use crate::application::services::{RepoDir, ResolveOptions, Session};
use crate::common::CohoResult;
use crate::infrastructure::process::ExecOptions;

/// ステータス確認の設定
#[derive(Debug, Clone, Default)]
pub struct RepoStatusConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// 確認するブランチ（空の場合は現在のブランチ）
    pub branches: Vec<String>,

    /// ローカルコミットの差分を含めるか
    pub diff: bool,
}

/// ブランチごとの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchStatus {
    pub branch: String,

    /// リモートにブランチが存在するか
    pub has_remote: bool,

    /// リモートにないローカルコミット
    pub commits_ahead: Vec<String>,

    /// `--diff` 指定時の差分の統計
    pub diff: Option<String>,
}

/// 単一リポジトリのステータス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    pub repo: &'static str,
    pub repo_name: &'static str,
    pub remote: String,

    /// 未コミットの変更があるか
    pub pending_changes: bool,

    /// `git status --short` の出力
    pub changes: String,

    pub branches: Vec<BranchStatus>,
}

impl RepoStatus {
    /// 問題があるかチェック
    pub fn has_issues(&self) -> bool {
        self.pending_changes || self.branches.iter().any(|b| !b.commits_ahead.is_empty())
    }
}

/// ステータス確認のユースケース
pub struct RepoStatusUseCase {
    config: RepoStatusConfig,
}

impl RepoStatusUseCase {
    pub fn new(config: RepoStatusConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<RepoStatus>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default())?;
        session
            .walker()
            .for_each_repo(&repos, |dir| async move { self.check_repo(session, &dir).await })
            .await
    }

    async fn check_repo(&self, session: &Session, dir: &RepoDir) -> CohoResult<RepoStatus> {
        let repo = &dir.repo;
        let git = session.git(&dir.path);
        let remote = session.remote_name(repo, &dir.path).await?;

        let pending_changes = git.pending_changes_exist().await?;
        let changes = if pending_changes {
            git.git(&["status", "--short"], ExecOptions::silent())
                .await?
                .unwrap_or_default()
        } else {
            String::new()
        };

        let branch_names = if self.config.branches.is_empty() {
            git.current_branch_name(true).await?.into_iter().collect()
        } else {
            self.config.branches.clone()
        };

        let mut branches = Vec::with_capacity(branch_names.len());
        for branch in branch_names {
            let has_remote = git.remote_branch_exists(&remote, &branch).await?;
            let commits_ahead = if has_remote {
                git.commits_ahead(&remote, &branch).await?
            } else {
                Vec::new()
            };
            let diff = if self.config.diff && !commits_ahead.is_empty() {
                let range = format!("{}/{}...{}", remote, branch, branch);
                git.git(&["diff", "--stat", &range], ExecOptions::silent().allowing_error())
                    .await?
            } else {
                None
            };
            branches.push(BranchStatus {
                branch,
                has_remote,
                commits_ahead,
                diff,
            });
        }

        Ok(RepoStatus {
            repo: repo.id,
            repo_name: repo.repo_name,
            remote,
            pending_changes,
            changes,
            branches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{checkouts, repos, session_in};
    use crate::infrastructure::process::testing::{respond, scripted};
    use crate::infrastructure::process::ExecOutput;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_status_reports_changes_and_local_commits() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-browser"]);
        let (executor, calls) = scripted(vec![
            respond(&["git", "status", "--porcelain"], ExecOutput::new(0, " M package.json\n", "")),
            respond(&["git", "status", "--short"], ExecOutput::new(0, " M package.json\n", "")),
            respond(&["git", "symbolic-ref", "HEAD"], ExecOutput::new(0, "refs/heads/master", "")),
            respond(&["git", "branch", "-r", "--list"], ExecOutput::new(0, "  origin/master", "")),
            respond(&["git", "log", "--oneline"], ExecOutput::new(0, "abc123 Local work\n", "")),
            respond(&["git", "diff", "--stat"], ExecOutput::new(0, " package.json | 2 +-", "")),
        ]);
        let session = session_in(temp_dir.path(), executor);

        let statuses = RepoStatusUseCase::new(RepoStatusConfig {
            repos: repos(&["browser"]),
            branches: Vec::new(),
            diff: true,
        })
        .execute(&session)
        .await
        .unwrap();

        let status = &statuses[0];
        assert!(status.pending_changes);
        assert!(status.has_issues());
        assert_eq!(status.changes, " M package.json");
        assert_eq!(status.branches[0].commits_ahead, vec!["abc123 Local work".to_string()]);
        assert_eq!(status.branches[0].diff.as_deref(), Some(" package.json | 2 +-"));
        assert!(calls.contains("git diff --stat origin/master...master"));
    }

    #[tokio::test]
    async fn test_clean_repo() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-browser"]);
        let (executor, calls) = scripted(vec![respond(
            &["git", "symbolic-ref", "HEAD"],
            ExecOutput::new(0, "refs/heads/master", ""),
        )]);
        let session = session_in(temp_dir.path(), executor);

        let statuses = RepoStatusUseCase::new(RepoStatusConfig {
            repos: repos(&["browser"]),
            ..Default::default()
        })
        .execute(&session)
        .await
        .unwrap();

        assert!(!statuses[0].has_issues());
        assert!(!statuses[0].branches[0].has_remote);
        assert!(!calls.contains("git diff"));
    }
}
