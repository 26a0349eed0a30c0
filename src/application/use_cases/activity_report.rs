use super::print_tags::tag_prefix;
use crate::application::services::{RepoDir, ResolveOptions, Session};
use crate::common::{CohoError, CohoResult};
use crate::infrastructure::process::ExecOptions;
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use colored::Colorize;
use tracing::debug;

/// last-weekの設定
#[derive(Debug, Clone)]
pub struct LastWeekConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// 自分のコミットだけに絞るか
    pub me: bool,

    /// 遡る日数
    pub days: u32,
}

impl Default for LastWeekConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            me: false,
            days: 7,
        }
    }
}

/// shortlogの設定
#[derive(Debug, Clone, Default)]
pub struct ShortlogConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// 起点（未指定の場合は最新のタグ）
    pub from: Option<String>,

    /// 終点（未指定の場合はHEAD）
    pub to: Option<String>,
}

/// リポジトリごとのレポート行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoActivity {
    pub repo: &'static str,
    pub repo_name: &'static str,
    pub lines: Vec<String>,
}

/// First day of a window of `days` days ending at `now`.
pub fn since_date<Tz: TimeZone>(now: DateTime<Tz>, days: u32) -> NaiveDate {
    (now - Duration::days(i64::from(days))).date_naive()
}

fn non_empty_lines(output: Option<String>) -> Vec<String> {
    output
        .unwrap_or_default()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.trim_end().to_string())
        .collect()
}

/// 直近のコミットを一覧するユースケース
pub struct LastWeekUseCase {
    config: LastWeekConfig,
}

impl LastWeekUseCase {
    pub fn new(config: LastWeekConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<RepoActivity>> {
        self.execute_at(session, chrono::Local::now()).await
    }

    /// [`Self::execute`] with an explicit notion of "now".
    pub async fn execute_at<Tz: TimeZone>(
        &self,
        session: &Session,
        now: DateTime<Tz>,
    ) -> CohoResult<Vec<RepoActivity>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default())?;
        let since = since_date(now, self.config.days).format("%Y-%m-%d").to_string();
        let author = if self.config.me {
            Some(self.user_email(session).await?)
        } else {
            None
        };
        debug!(since = %since, author = ?author, "collecting activity");

        let activity = session
            .walker()
            .for_each_repo(&repos, |dir| {
                let since = since.as_str();
                let author = author.as_deref();
                async move {
                    let mut args = vec![
                        "log".to_string(),
                        "--no-merges".to_string(),
                        "--date=short".to_string(),
                        "--format=%ad %an: %s".to_string(),
                        format!("--since={}", since),
                    ];
                    if let Some(author) = author {
                        args.push(format!("--author={}", author));
                    }
                    let args: Vec<&str> = args.iter().map(String::as_str).collect();
                    let output = session
                        .git(&dir.path)
                        .git(&args, ExecOptions::silent())
                        .await?;
                    Ok(RepoActivity {
                        repo: dir.repo.id,
                        repo_name: dir.repo.repo_name,
                        lines: non_empty_lines(output),
                    })
                }
            })
            .await?;

        Ok(activity.into_iter().filter(|a| !a.lines.is_empty()).collect())
    }

    async fn user_email(&self, session: &Session) -> CohoResult<String> {
        session
            .git(&session.workspace.base_dir)
            .git(&["config", "user.email"], ExecOptions::silent().allowing_error())
            .await?
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .ok_or_else(|| CohoError::usage_error("--me needs git config user.email to be set"))
    }
}

/// タグ以降の貢献者を集計するユースケース
pub struct ShortlogUseCase {
    config: ShortlogConfig,
}

impl ShortlogUseCase {
    pub fn new(config: ShortlogConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<RepoActivity>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default().with_modules())?;
        session
            .walker()
            .for_each_repo(&repos, |dir| async move { self.shortlog(session, &dir).await })
            .await
    }

    async fn shortlog(&self, session: &Session, dir: &RepoDir) -> CohoResult<RepoActivity> {
        let repo = &dir.repo;
        let git = session.git(&dir.path);
        let mut activity = RepoActivity {
            repo: repo.id,
            repo_name: repo.repo_name,
            lines: Vec::new(),
        };

        let from = match &self.config.from {
            Some(from) => from.clone(),
            None => match git.most_recent_tag(tag_prefix(repo)).await? {
                Some(tag) => tag,
                None => {
                    println!("{} {}: no release tag found", "⚠".yellow().bold(), repo.repo_name);
                    return Ok(activity);
                }
            },
        };
        let to = self.config.to.as_deref().unwrap_or("HEAD");
        let range = format!("{}..{}", from, to);

        let mut args = vec!["shortlog", "-s", "-n", "--no-merges", range.as_str()];
        // modules only count commits touching their own directory
        if repo.is_module {
            args.extend(["--", "."]);
        }
        let output = git.git(&args, ExecOptions::silent()).await?;
        activity.lines = non_empty_lines(output);
        Ok(activity)
    }
}
