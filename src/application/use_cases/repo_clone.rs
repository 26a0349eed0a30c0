use crate::application::services::{ResolveOptions, Session};
use crate::common::CohoResult;
use crate::domain::entities::RepoDescriptor;
use crate::domain::value_objects::ScmType;
use crate::infrastructure::process::{ExecOptions, ExecTask, Verbosity};
use colored::Colorize;
use tracing::info;

/// クローンの設定
#[derive(Debug, Clone, Default)]
pub struct RepoCloneConfig {
    /// 対象リポジトリ（ID、グループ名など）
    pub repos: Vec<String>,

    /// shallow cloneの深さ
    pub depth: Option<u32>,
}

/// クローンの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoCloneResult {
    /// 新たにクローンしたリポジトリのID
    pub cloned: Vec<&'static str>,

    /// 既に存在していたリポジトリのID
    pub already_present: Vec<&'static str>,
}

/// クローンのユースケース
pub struct RepoCloneUseCase {
    config: RepoCloneConfig,
}

impl RepoCloneUseCase {
    pub fn new(config: RepoCloneConfig) -> Self {
        Self { config }
    }

    pub async fn execute(&self, session: &Session) -> CohoResult<RepoCloneResult> {
        let repos = session.resolve(&self.config.repos, ResolveOptions::default().with_svn())?;
        self.clone_repos(session, &repos).await
    }

    /// Clone every repo in `repos` that is not checked out yet, concurrently.
    pub async fn clone_repos(
        &self,
        session: &Session,
        repos: &[RepoDescriptor],
    ) -> CohoResult<RepoCloneResult> {
        let base_dir = &session.workspace.base_dir;
        let mut result = RepoCloneResult::default();
        let mut tasks = Vec::new();

        // 1. 必要なツールの確認
        for scm in [ScmType::Git, ScmType::Svn] {
            if repos.iter().any(|r| r.scm_type() == scm) {
                session
                    .executor
                    .ensure_installed(scm.executable(), base_dir)
                    .await?;
            }
        }

        // 2. 未クローンのリポジトリを抽出
        for repo in repos {
            let checkout = repo.checkout_dir(base_dir);
            if checkout.exists() {
                println!("Repo already cloned: {}", repo.repo_name);
                result.already_present.push(repo.id);
                continue;
            }
            if tasks
                .iter()
                .any(|t: &ExecTask| t.argv.last().map(String::as_str) == Some(repo.repo_name))
            {
                continue;
            }

            let argv = self.clone_command(repo);
            tasks.push(ExecTask::new(
                base_dir.clone(),
                argv.as_slice(),
                ExecOptions::new().with_verbosity(Verbosity::CommandOnly),
            ));
            result.cloned.push(repo.id);
        }

        if tasks.is_empty() {
            return Ok(result);
        }

        // 3. 並列にクローン
        info!(count = tasks.len(), "cloning");
        let spinner = super::batch_spinner(&format!("Cloning {} repos", tasks.len()));
        let outcome = session.executor.exec_parallel(tasks).await;
        spinner.finish_and_clear();
        outcome?;

        println!(
            "{} Cloned {} repo(s)",
            "✓".green().bold(),
            result.cloned.len()
        );
        Ok(result)
    }

    fn clone_command(&self, repo: &RepoDescriptor) -> Vec<String> {
        let mut argv = match repo.scm_type() {
            ScmType::Git => vec!["git".to_string(), "clone".to_string()],
            ScmType::Svn => vec!["svn".to_string(), "checkout".to_string()],
        };
        if let (ScmType::Git, Some(depth)) = (repo.scm_type(), self.config.depth) {
            argv.push(format!("--depth={}", depth));
        }
        argv.push(repo.clone_url());
        argv.push(repo.repo_name.to_string());
        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{checkouts, repos, session_in};
    use crate::infrastructure::process::testing::scripted;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clone_missing_repos_only() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-ios"]);
        let (executor, calls) = scripted(vec![]);
        let session = session_in(temp_dir.path(), executor);

        let use_case = RepoCloneUseCase::new(RepoCloneConfig {
            repos: repos(&["ios", "android", "dist"]),
            depth: Some(10),
        });
        let result = use_case.execute(&session).await.unwrap();

        assert_eq!(result.already_present, vec!["ios"]);
        assert_eq!(result.cloned, vec!["android", "dist"]);

        let commands = calls.commands();
        assert!(commands.contains(&"git --version".to_string()));
        assert!(commands.contains(&"svn --version".to_string()));
        assert!(commands.contains(
            &"git clone --depth=10 https://github.com/apache/cordova-android.git cordova-android"
                .to_string()
        ));
        assert!(commands.contains(
            &"svn checkout https://dist.apache.org/repos/dist/release/cordova cordova-dist"
                .to_string()
        ));
        assert_eq!(session.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_module_clones_its_checkout_once() {
        let temp_dir = TempDir::new().unwrap();
        let (executor, calls) = scripted(vec![]);
        let session = session_in(temp_dir.path(), executor);

        let use_case = RepoCloneUseCase::new(RepoCloneConfig::default());
        let registry = crate::domain::entities::RepoRegistry::cordova();
        let lib_and_common: Vec<_> = ["lib", "common"]
            .iter()
            .map(|id| registry.repo_by_id(id, None).unwrap().clone())
            .collect();
        use_case.clone_repos(&session, &lib_and_common).await.unwrap();

        let clones: Vec<_> = calls
            .commands()
            .into_iter()
            .filter(|c| c.starts_with("git clone"))
            .collect();
        assert_eq!(
            clones,
            vec!["git clone https://github.com/apache/cordova-lib.git cordova-lib".to_string()]
        );
    }

    #[tokio::test]
    async fn test_nothing_to_clone() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-js"]);
        let (executor, calls) = scripted(vec![]);
        let session = session_in(temp_dir.path(), executor);

        let result = RepoCloneUseCase::new(RepoCloneConfig {
            repos: repos(&["js"]),
            depth: None,
        })
        .execute(&session)
        .await
        .unwrap();

        assert!(result.cloned.is_empty());
        assert!(!calls.contains("git clone"));
    }
}
