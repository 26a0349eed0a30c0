use super::print_tags::tag_prefix;
use crate::application::services::{RepoDir, ResolveOptions, Session};
use crate::common::{CohoError, CohoResult};
use crate::domain::entities::RepoDescriptor;
use crate::domain::value_objects::ReleaseVersion;
use crate::infrastructure::process::ExecOptions;
use colored::Colorize;

/// リリースタグ付けの設定
#[derive(Debug, Clone)]
pub struct TagReleaseConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// タグを付けるバージョン
    pub version: ReleaseVersion,

    /// 実行せずに計画を表示するだけか
    pub pretend: bool,
}

/// タグ付けの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    Tagged(String),
    WouldTag(String),
    AlreadyExists(String),
}

/// Tag name for `version` in `repo`; modules prefix it with their package name.
pub fn release_tag(repo: &RepoDescriptor, version: &ReleaseVersion) -> String {
    match tag_prefix(repo) {
        Some(prefix) => format!("{}-{}", prefix, version),
        None => version.to_string(),
    }
}

/// リリースブランチの先頭にタグを付けるユースケース
pub struct TagReleaseUseCase {
    config: TagReleaseConfig,
}

impl TagReleaseUseCase {
    pub fn new(config: TagReleaseConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<(&'static str, TagOutcome)>> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default().with_modules())?;
        session
            .walker()
            .for_each_repo(&repos, |dir| async move {
                let outcome = self.tag_repo(session, &dir).await?;
                Ok((dir.repo.id, outcome))
            })
            .await
    }

    async fn tag_repo(&self, session: &Session, dir: &RepoDir) -> CohoResult<TagOutcome> {
        let repo = &dir.repo;
        let git = session.git(&dir.path);
        let tag = release_tag(repo, &self.config.version);
        let branch = self.config.version.release_branch();

        if git.tag_exists(&tag).await? {
            println!("{} {}: tag {} already exists", "::".blue().bold(), repo.repo_name, tag);
            return Ok(TagOutcome::AlreadyExists(tag));
        }
        if !git.local_branch_exists(&branch).await? {
            return Err(CohoError::git_error(
                format!(
                    "Release branch {} does not exist in {}. Run coho prepare-release-branch first.",
                    branch, repo.repo_name
                ),
                Some(dir.path.clone()),
            ));
        }

        if self.config.pretend {
            println!("{} Would run: git tag {} {} (in {})", "::".blue().bold(), tag, branch, dir.path.display());
            return Ok(TagOutcome::WouldTag(tag));
        }

        git.git(&["tag", &tag, &branch], ExecOptions::new()).await?;
        println!("{} {}: tagged {}", "✓".green().bold(), repo.repo_name, tag);
        Ok(TagOutcome::Tagged(tag))
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

    fn config(ids: &[&str], pretend: bool) -> TagReleaseConfig {
        TagReleaseConfig {
            repos: repos(ids),
            version: "4.1.0".parse().unwrap(),
            pretend,
        }
    }

    #[tokio::test]
    async fn test_tags_release_branch() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-lib/cordova-common"]);
        let (executor, calls) = scripted(vec![respond(
            &["git", "branch", "--list", "4.1.x"],
            ExecOutput::new(0, "  4.1.x", ""),
        )]);
        let session = session_in(temp_dir.path(), executor);

        let outcomes = TagReleaseUseCase::new(config(&["common", "lib"], false))
            .execute(&session)
            .await
            .unwrap();

        assert_eq!(
            outcomes,
            vec![
                ("common", TagOutcome::Tagged("cordova-common-4.1.0".to_string())),
                ("lib", TagOutcome::Tagged("4.1.0".to_string())),
            ]
        );
        assert!(calls.contains("git tag cordova-common-4.1.0 4.1.x"));
        assert!(calls.contains("git tag 4.1.0 4.1.x"));
    }

    #[tokio::test]
    async fn test_existing_tag_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-ios"]);
        let (executor, calls) = scripted(vec![respond(
            &["git", "tag", "--list", "4.1.0"],
            ExecOutput::new(0, "4.1.0", ""),
        )]);
        let session = session_in(temp_dir.path(), executor);

        let outcomes = TagReleaseUseCase::new(config(&["ios"], false))
            .execute(&session)
            .await
            .unwrap();
        assert_eq!(outcomes, vec![("ios", TagOutcome::AlreadyExists("4.1.0".to_string()))]);
        assert!(!calls.contains("git tag 4.1.0"));
    }

    #[tokio::test]
    async fn test_missing_release_branch() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-ios"]);
        let (executor, _) = scripted(vec![]);
        let session = session_in(temp_dir.path(), executor);

        let error = TagReleaseUseCase::new(config(&["ios"], true))
            .execute(&session)
            .await
            .unwrap_err();
        assert!(error.to_string().contains("4.1.x does not exist"));
    }
}
