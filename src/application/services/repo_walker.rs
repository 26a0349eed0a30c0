use crate::common::{CohoError, CohoResult};
use crate::domain::entities::RepoDescriptor;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// A repository and the absolute directory its step runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDir {
    pub repo: RepoDescriptor,
    pub path: PathBuf,
}

/// Visits repositories in order, handing each step its absolute directory.
///
/// Walks may nest: a step can start another walk on the same walker, which
/// shows up in [`RepoWalker::depth`].
#[derive(Debug)]
pub struct RepoWalker {
    base_dir: PathBuf,
    depth: AtomicUsize,
}

struct DepthGuard<'a>(&'a AtomicUsize);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a AtomicUsize) -> (Self, usize) {
        let level = depth.fetch_add(1, Ordering::SeqCst) + 1;
        (Self(depth), level)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RepoWalker {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            depth: AtomicUsize::new(0),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Number of walks currently in progress.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Whether the caller runs inside another walk's step.
    pub fn is_nested(&self) -> bool {
        self.depth() > 0
    }

    /// Existing directory of `repo`, or the "first run repo-clone" error.
    pub fn repo_dir(&self, repo: &RepoDescriptor) -> CohoResult<PathBuf> {
        let path = repo.working_dir(&self.base_dir);
        if !path.is_dir() {
            return Err(CohoError::missing_repo_directory(repo.repo_name, path));
        }
        Ok(path)
    }

    /// Await `step` for each repo in turn and collect the results.
    ///
    /// Stops at the first missing directory or failing step.
    pub async fn for_each_repo<T, F, Fut>(
        &self,
        repos: &[RepoDescriptor],
        mut step: F,
    ) -> CohoResult<Vec<T>>
    where
        F: FnMut(RepoDir) -> Fut,
        Fut: Future<Output = CohoResult<T>>,
    {
        let (_guard, level) = DepthGuard::enter(&self.depth);
        let mut results = Vec::with_capacity(repos.len());

        for repo in repos {
            let path = self.repo_dir(repo)?;
            info!(repo = repo.id, dir = %path.display(), depth = level, "entering repo");
            let value = step(RepoDir {
                repo: repo.clone(),
                path,
            })
            .await?;
            results.push(value);
        }

        Ok(results)
    }
}
