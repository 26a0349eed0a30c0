use super::repo_resolver::{RepoResolver, ResolveOptions};
use super::repo_walker::RepoWalker;
use crate::common::CohoResult;
use crate::domain::entities::{RepoDescriptor, RepoRegistry, Workspace};
use crate::infrastructure::filesystem::CohoConfig;
use crate::infrastructure::git::{GitRepository, RemoteNameCache};
use crate::infrastructure::process::Executor;
use std::path::Path;

/// Everything one coho invocation shares between its steps.
pub struct Session {
    pub registry: RepoRegistry,
    pub workspace: Workspace,
    pub executor: Executor,
    pub config: CohoConfig,
    remotes: RemoteNameCache,
    walker: RepoWalker,
}

impl Session {
    pub fn new(
        registry: RepoRegistry,
        workspace: Workspace,
        executor: Executor,
        config: CohoConfig,
    ) -> Self {
        let walker = RepoWalker::new(workspace.base_dir.clone());
        Self {
            registry,
            workspace,
            executor,
            config,
            remotes: RemoteNameCache::new(),
            walker,
        }
    }

    pub fn resolver(&self) -> RepoResolver<'_> {
        RepoResolver::new(&self.registry, &self.workspace)
    }

    /// Shorthand for [`RepoResolver::resolve`].
    pub fn resolve(
        &self,
        values: &[String],
        options: ResolveOptions,
    ) -> CohoResult<Vec<RepoDescriptor>> {
        self.resolver().resolve(values, options)
    }

    pub fn walker(&self) -> &RepoWalker {
        &self.walker
    }

    pub fn git(&self, dir: &Path) -> GitRepository<'_> {
        GitRepository::new(&self.executor, dir)
    }

    /// Remote pointing at `repo`'s upstream, discovered in `dir`.
    pub async fn remote_name(&self, repo: &RepoDescriptor, dir: &Path) -> CohoResult<String> {
        self.remotes.remote_name(&self.git(dir), repo).await
    }

    /// Number of `git commit`s issued so far.
    pub fn commit_count(&self) -> usize {
        self.executor.commits().count()
    }
}
