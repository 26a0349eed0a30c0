use crate::common::{CohoError, CohoResult, OptionExt};
use crate::domain::value_objects::select_most_recent_tag;
use crate::infrastructure::process::{ExecOptions, Executor};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const STASH_MESSAGE: &str = "coho stash";

/// Git operations against one checkout, issued through the [`Executor`].
pub struct GitRepository<'a> {
    executor: &'a Executor,
    dir: PathBuf,
}

impl<'a> GitRepository<'a> {
    pub fn new(executor: &'a Executor, dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn executor(&self) -> &'a Executor {
        self.executor
    }

    /// Run `git <args>` in this checkout.
    pub async fn git(&self, args: &[&str], options: ExecOptions) -> CohoResult<Option<String>> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("git");
        argv.extend_from_slice(args);
        self.executor.exec(&self.dir, &argv, options).await
    }

    /// `git <args>`, silently, output required.
    async fn git_output(&self, args: &[&str]) -> CohoResult<String> {
        Ok(self
            .git(args, ExecOptions::silent())
            .await?
            .unwrap_or_default())
    }

    pub async fn tag_exists(&self, tag: &str) -> CohoResult<bool> {
        let output = self.git_output(&["tag", "--list", tag]).await?;
        Ok(!output.trim().is_empty())
    }

    pub async fn pending_changes_exist(&self) -> CohoResult<bool> {
        let output = self.git_output(&["status", "--porcelain"]).await?;
        Ok(!output.trim().is_empty())
    }

    /// Name of the checked out branch.
    ///
    /// On a detached HEAD this returns `None` when `allow_detached` is set and
    /// fails otherwise.
    pub async fn current_branch_name(&self, allow_detached: bool) -> CohoResult<Option<String>> {
        let reference = self
            .git(&["symbolic-ref", "HEAD"], ExecOptions::silent().allowing_error())
            .await?;
        match reference {
            Some(reference) => Ok(Some(
                reference
                    .trim()
                    .trim_start_matches("refs/heads/")
                    .to_string(),
            )),
            None if allow_detached => Ok(None),
            None => Err(CohoError::git_error(
                format!(
                    "Aborted due to repo {} not being on a named branch",
                    self.dir.display()
                ),
                Some(self.dir.clone()),
            )),
        }
    }

    pub async fn remote_branch_exists(&self, remote: &str, branch: &str) -> CohoResult<bool> {
        let name = format!("{}/{}", remote, branch);
        let output = self.git_output(&["branch", "-r", "--list", &name]).await?;
        Ok(!output.trim().is_empty())
    }

    pub async fn local_branch_exists(&self, branch: &str) -> CohoResult<bool> {
        let output = self.git_output(&["branch", "--list", branch]).await?;
        Ok(!output.trim().is_empty())
    }

    /// Check out `branch` unless it already is the current one.
    pub async fn checkout(&self, branch: &str) -> CohoResult<()> {
        if self.current_branch_name(true).await?.as_deref() == Some(branch) {
            return Ok(());
        }
        self.git(&["checkout", "-q", branch], ExecOptions::new())
            .await?;
        Ok(())
    }

    /// Stash pending changes, run `step`, then put the original branch and
    /// the stash back. The restore also happens when `step` switched branches
    /// or failed.
    pub async fn stash_and_pop<F, Fut, T>(&self, step: F) -> CohoResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CohoResult<T>>,
    {
        let original_branch = self
            .current_branch_name(false)
            .await?
            .ok_or_internal_error("current branch unknown")?;

        let stashed = if self.pending_changes_exist().await? {
            self.git(
                &["stash", "push", "--include-untracked", "--quiet", "-m", STASH_MESSAGE],
                ExecOptions::new(),
            )
            .await?;
            true
        } else {
            false
        };
        debug!(dir = %self.dir.display(), branch = %original_branch, stashed, "stash and pop");

        let result = step().await;
        let restored = self.restore(&original_branch, stashed).await;

        match (result, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(restore_error)) => {
                warn!(dir = %self.dir.display(), error = %restore_error, "restoring after failed step");
                Err(e)
            }
        }
    }

    async fn restore(&self, branch: &str, stashed: bool) -> CohoResult<()> {
        self.checkout(branch).await?;
        if stashed {
            self.git(&["stash", "pop", "--quiet"], ExecOptions::new())
                .await?;
        }
        Ok(())
    }

    /// The greatest semantic-version tag, see [`select_most_recent_tag`].
    pub async fn most_recent_tag(&self, prefix: Option<&str>) -> CohoResult<Option<String>> {
        let output = self.git_output(&["tag", "--list"]).await?;
        Ok(select_most_recent_tag(output.split_whitespace(), prefix))
    }

    /// One-line summaries of local commits on `branch` missing from
    /// `remote/branch`.
    pub async fn commits_ahead(&self, remote: &str, branch: &str) -> CohoResult<Vec<String>> {
        let range = format!("{}/{}..{}", remote, branch, branch);
        let output = self
            .git(&["log", "--oneline", &range], ExecOptions::silent().allowing_error())
            .await?
            .unwrap_or_default();
        Ok(output
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}
