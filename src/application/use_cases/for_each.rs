use crate::application::services::{ResolveOptions, Session};
use crate::common::{CohoError, CohoResult};
use crate::infrastructure::process::{ExecOptions, Verbosity};
use colored::Colorize;

/// for-eachの設定
#[derive(Debug, Clone, Default)]
pub struct ForEachConfig {
    /// 対象リポジトリ
    pub repos: Vec<String>,

    /// 各リポジトリで実行するシェルコマンド
    pub command: Vec<String>,
}

/// 各リポジトリでシェルコマンドを実行するユースケース
pub struct ForEachUseCase {
    config: ForEachConfig,
}

impl ForEachUseCase {
    pub fn new(config: ForEachConfig) -> Self {
        Self { config }
    }

    /// Run the command in every repo, stopping at the first failure.
    /// Returns the ids of the repos it ran in.
    pub async fn execute(&self, session: &Session) -> CohoResult<Vec<&'static str>> {
        let script = self.config.command.join(" ");
        if script.trim().is_empty() {
            return Err(CohoError::usage_error("for-each needs a command to run"));
        }
        let repos = session.resolve(&self.config.repos, ResolveOptions::default().with_svn())?;

        session
            .walker()
            .for_each_repo(&repos, |dir| {
                let script = script.as_str();
                async move {
                    println!("{} {}", "::".blue().bold(), dir.repo.repo_name.bold());
                    session
                        .executor
                        .exec(
                            &dir.path,
                            &["sh", "-c", script],
                            ExecOptions::new()
                                .with_verbosity(Verbosity::Silent)
                                .inherit_stdio(),
                        )
                        .await?;
                    Ok(dir.repo.id)
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{checkouts, repos, session_in};
    use crate::infrastructure::process::testing::{respond, scripted};
    use crate::infrastructure::process::{ExecOutput, Executor};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_runs_in_every_repo() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-ios", "cordova-osx"]);
        let (executor, calls) = scripted(vec![]);
        let session = session_in(temp_dir.path(), executor);

        let visited = ForEachUseCase::new(ForEachConfig {
            repos: repos(&["ios", "osx"]),
            command: vec!["git".to_string(), "status".to_string()],
        })
        .execute(&session)
        .await
        .unwrap();

        assert_eq!(visited, vec!["ios", "osx"]);
        assert_eq!(calls.commands_in("cordova-ios"), vec!["sh -c git status".to_string()]);
        assert_eq!(calls.commands_in("cordova-osx"), vec!["sh -c git status".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_stops_the_run() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-ios", "cordova-osx"]);
        let (executor, calls) = scripted(vec![respond(&["sh", "-c"], ExecOutput::new(1, "", ""))]);
        let session = session_in(temp_dir.path(), executor);

        let error = ForEachUseCase::new(ForEachConfig {
            repos: repos(&["ios", "osx"]),
            command: vec!["false".to_string()],
        })
        .execute(&session)
        .await
        .unwrap_err();

        assert_eq!(error.exit_code(), crate::common::EXIT_FATAL);
        assert!(calls.commands_in("cordova-osx").is_empty());
    }

    #[tokio::test]
    async fn test_real_shell_runs_in_repo_dir() {
        let temp_dir = TempDir::new().unwrap();
        checkouts(temp_dir.path(), &["cordova-ios"]);
        let session = session_in(temp_dir.path(), Executor::default());

        ForEachUseCase::new(ForEachConfig {
            repos: repos(&["ios"]),
            command: vec!["touch marker".to_string()],
        })
        .execute(&session)
        .await
        .unwrap();

        assert!(temp_dir.path().join("cordova-ios/marker").exists());
    }

    #[tokio::test]
    async fn test_empty_command_is_a_usage_error() {
        let temp_dir = TempDir::new().unwrap();
        let (executor, _) = scripted(vec![]);
        let session = session_in(temp_dir.path(), executor);

        let error = ForEachUseCase::new(ForEachConfig::default())
            .execute(&session)
            .await
            .unwrap_err();
        assert_eq!(error.exit_code(), crate::common::EXIT_USAGE);
    }
}
