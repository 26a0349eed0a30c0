use crate::application::services::{ResolveOptions, Session};
use crate::common::CohoResult;
use crate::infrastructure::github::{GitHubClient, PullRequest};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// list-pullsの設定
#[derive(Debug, Clone, Default)]
pub struct ListPullsConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// この日数より古い（更新のない）プルリクエストを除外する
    pub max_age_days: Option<u32>,
}

/// リポジトリごとのオープンなプルリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPulls {
    pub repo: &'static str,
    pub repo_name: &'static str,
    pub pulls: Vec<PullRequest>,
}

/// Keep pull requests updated within `max_age_days` of `now`.
pub fn filter_recent(
    pulls: Vec<PullRequest>,
    now: DateTime<Utc>,
    max_age_days: Option<u32>,
) -> Vec<PullRequest> {
    match max_age_days {
        Some(days) => {
            let cutoff = now - Duration::days(i64::from(days));
            pulls.into_iter().filter(|p| p.updated_at >= cutoff).collect()
        }
        None => pulls,
    }
}

/// オープンなプルリクエストを一覧するユースケース
pub struct ListPullsUseCase {
    config: ListPullsConfig,
    client: GitHubClient,
}

impl ListPullsUseCase {
    pub fn new(config: ListPullsConfig, client: GitHubClient) -> Self {
        Self { config, client }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<RepoPulls>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default())?;
        let now = Utc::now();
        let mut result = Vec::with_capacity(repos.len());

        for repo in repos {
            info!(repo = repo.id, "listing pull requests");
            let pulls = self.client.open_pulls(repo.repo_name).await?;
            result.push(RepoPulls {
                repo: repo.id,
                repo_name: repo.repo_name,
                pulls: filter_recent(pulls, now, self.config.max_age_days),
            });
        }
        Ok(result)
    }
}
