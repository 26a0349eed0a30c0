use super::repository::GitRepository;
use crate::common::CohoResult;
use crate::domain::entities::RepoDescriptor;
use crate::infrastructure::process::ExecOptions;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Remote used when none of the configured ones points at the repository.
pub const DEFAULT_REMOTE: &str = "origin";

/// Remote names discovered during one invocation, keyed by repo id.
#[derive(Debug, Clone, Default)]
pub struct RemoteNameCache {
    names: Arc<Mutex<HashMap<&'static str, String>>>,
}

impl RemoteNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the remote that points at `repo`'s upstream.
    ///
    /// The first lookup per repo parses `git remote -v` in the checkout;
    /// later lookups are answered from the cache.
    pub async fn remote_name(
        &self,
        git: &GitRepository<'_>,
        repo: &RepoDescriptor,
    ) -> CohoResult<String> {
        let mut names = self.names.lock().await;
        if let Some(name) = names.get(repo.id) {
            return Ok(name.clone());
        }

        let listing = git
            .git(&["remote", "-v"], ExecOptions::silent())
            .await?
            .unwrap_or_default();
        let name = pick_remote(&listing, repo.repo_name)
            .unwrap_or_else(|| DEFAULT_REMOTE.to_string());
        debug!(repo = repo.id, remote = %name, "remote discovered");

        names.insert(repo.id, name.clone());
        Ok(name)
    }
}

/// Pick the remote whose URL names `repo_name` out of `git remote -v` output.
pub fn pick_remote(listing: &str, repo_name: &str) -> Option<String> {
    let suffixes = [
        format!("/{}", repo_name),
        format!("/{}.git", repo_name),
        format!(":{}", repo_name),
        format!(":{}.git", repo_name),
    ];

    listing.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let name = fields.next()?;
        let url = fields.next()?;
        let url = url.trim_end_matches('/');
        suffixes
            .iter()
            .any(|s| url.ends_with(s.as_str()))
            .then(|| name.to_string())
    })
}
