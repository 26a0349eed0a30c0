use crate::application::services::{RepoDir, ResolveOptions, Session};
use crate::common::CohoResult;
use crate::domain::entities::RepoDescriptor;
use crate::infrastructure::process::ExecOptions;

/// print-tagsの設定
#[derive(Debug, Clone, Default)]
pub struct PrintTagsConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// 存在を確認するタグ（未指定の場合は最新のタグを表示）
    pub tag: Option<String>,
}

/// リポジトリごとのタグ情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagReport {
    /// 最新のタグとそれ以降のコミット数
    MostRecent {
        repo: &'static str,
        tag: Option<String>,
        commits_since: Option<usize>,
    },
    /// 指定されたタグが存在するか
    Exists {
        repo: &'static str,
        tag: String,
        exists: bool,
    },
}

/// Prefix module tags carry, e.g. `cordova-common-2.0.0`.
pub fn tag_prefix(repo: &RepoDescriptor) -> Option<&'static str> {
    repo.is_module.then(|| repo.npm_name())
}

/// タグを表示するユースケース
pub struct PrintTagsUseCase {
    config: PrintTagsConfig,
}

impl PrintTagsUseCase {
    pub fn new(config: PrintTagsConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<TagReport>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default().with_modules())?;
        session
            .walker()
            .for_each_repo(&repos, |dir| async move { self.inspect(session, &dir).await })
            .await
    }

    async fn inspect(&self, session: &Session, dir: &RepoDir) -> CohoResult<TagReport> {
        let repo = &dir.repo;
        let git = session.git(&dir.path);

        if let Some(tag) = &self.config.tag {
            return Ok(TagReport::Exists {
                repo: repo.id,
                tag: tag.clone(),
                exists: git.tag_exists(tag).await?,
            });
        }

        let tag = git.most_recent_tag(tag_prefix(repo)).await?;
        let commits_since = match &tag {
            Some(tag) => {
                let range = format!("{}..HEAD", tag);
                git.git(&["rev-list", "--count", &range], ExecOptions::silent().allowing_error())
                    .await?
                    .and_then(|count| count.trim().parse().ok())
            }
            None => None,
        };

        Ok(TagReport::MostRecent {
            repo: repo.id,
            tag,
            commits_since,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{checkouts, repos, session_in};
    use crate::infrastructure::process::testing::{respond, scripted};
    use crate::infrastructure::process::ExecOutput;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_most_recent_tag_per_repo() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-lib/cordova-common"]);
        let (executor, calls) = scripted(vec![
            respond(
                &["git", "tag", "--list"],
                ExecOutput::new(0, "8.0.0\n9.0.0\ncordova-common-3.2.0\ncordova-common-4.0.0\n", ""),
            ),
            respond(&["git", "rev-list", "--count"], ExecOutput::new(0, "7\n", "")),
        ]);
        let session = session_in(temp_dir.path(), executor);

        let reports = PrintTagsUseCase::new(PrintTagsConfig {
            repos: repos(&["lib", "common"]),
            tag: None,
        })
        .execute(&session)
        .await
        .unwrap();

        assert_eq!(
            reports,
            vec![
                TagReport::MostRecent {
                    repo: "lib",
                    tag: Some("9.0.0".to_string()),
                    commits_since: Some(7),
                },
                TagReport::MostRecent {
                    repo: "common",
                    tag: Some("cordova-common-4.0.0".to_string()),
                    commits_since: Some(7),
                },
            ]
        );
        assert!(calls.contains("git rev-list --count cordova-common-4.0.0..HEAD"));
    }

    #[tokio::test]
    async fn test_tag_existence() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-ios"]);
        let (executor, _) = scripted(vec![respond(
            &["git", "tag", "--list", "6.0.0"],
            ExecOutput::new(0, "6.0.0", ""),
        )]);
        let session = session_in(temp_dir.path(), executor);

        let reports = PrintTagsUseCase::new(PrintTagsConfig {
            repos: repos(&["ios"]),
            tag: Some("6.0.0".to_string()),
        })
        .execute(&session)
        .await
        .unwrap();

        assert_eq!(
            reports,
            vec![TagReport::Exists {
                repo: "ios",
                tag: "6.0.0".to_string(),
                exists: true,
            }]
        );
    }
}
