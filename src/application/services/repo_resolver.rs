use crate::common::{CohoError, CohoResult};
use crate::domain::entities::{RepoDescriptor, RepoRegistry, Workspace, AUTO_GROUP};
use crate::domain::value_objects::ScmType;
use colored::Colorize;
use std::path::Path;
use tracing::{debug, warn};

/// Value standing for the repository the command was started in.
pub const CURRENT_REPO: &str = ".";

/// リポジトリ解決のオプション
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// モジュール（他リポジトリのサブディレクトリ）を個別に含めるか
    pub include_modules: bool,

    /// SVNリポジトリを含めるか
    pub include_svn: bool,
}

impl ResolveOptions {
    pub fn with_modules(mut self) -> Self {
        self.include_modules = true;
        self
    }

    pub fn with_svn(mut self) -> Self {
        self.include_svn = true;
        self
    }
}

/// Turns `-r` values into an ordered, de-duplicated list of repositories.
pub struct RepoResolver<'a> {
    registry: &'a RepoRegistry,
    workspace: &'a Workspace,
}

impl<'a> RepoResolver<'a> {
    pub fn new(registry: &'a RepoRegistry, workspace: &'a Workspace) -> Self {
        Self {
            registry,
            workspace,
        }
    }

    /// Resolve repo ids, package names, repo names, group names, `auto` and
    /// `.` into descriptors.
    ///
    /// Each id appears once. Without `include_modules` each checkout appears
    /// once too, represented by its base descriptor. Unless `include_svn` is
    /// set svn repositories are dropped with a warning.
    pub fn resolve(
        &self,
        values: &[String],
        options: ResolveOptions,
    ) -> CohoResult<Vec<RepoDescriptor>> {
        let current = [CURRENT_REPO.to_string()];
        let values = if values.is_empty() { &current[..] } else { values };

        let mut resolved: Vec<RepoDescriptor> = Vec::new();
        for value in values {
            for repo in self.lookup(value)? {
                add_unique(&mut resolved, repo, options.include_modules);
            }
        }

        if !options.include_svn {
            let dropped = drop_svn(&mut resolved, values);
            if dropped > 0 {
                warn!(dropped, "svn repos skipped");
                println!(
                    "{} Skipping {} svn repo(s); this command supports git only",
                    "⚠".yellow().bold(),
                    dropped
                );
            }
        }

        debug!(
            repos = ?resolved.iter().map(|r| r.id).collect::<Vec<_>>(),
            "resolved repos"
        );
        Ok(resolved)
    }

    fn lookup(&self, value: &str) -> CohoResult<Vec<&'a RepoDescriptor>> {
        if value == CURRENT_REPO {
            return Ok(vec![self.current_repo()?]);
        }
        if let Some(repo) = self.registry.repo_by_id(value, None) {
            return Ok(vec![repo]);
        }
        self.registry
            .group_by_name(value, &self.workspace.base_dir)
            .ok_or_else(|| CohoError::invalid_repo(value))
    }

    /// The repository containing the start directory.
    ///
    /// Walks upward from the start directory. An ancestor ending in a
    /// module's `repo_name/path` selects that module; otherwise the first
    /// ancestor named after a repo selects it, base descriptor first.
    pub fn current_repo(&self) -> CohoResult<&'a RepoDescriptor> {
        let start_dir = &self.workspace.start_dir;
        let repos = self.registry.all_repos();

        for dir in start_dir.ancestors() {
            let module = repos.iter().find(|r| {
                r.is_module
                    && r.path
                        .map(|p| dir.ends_with(Path::new(r.repo_name).join(p)))
                        .unwrap_or(false)
            });
            if let Some(module) = module {
                return Ok(module);
            }

            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(repo) = repos
                .iter()
                .find(|r| r.repo_name == name && !r.is_module)
                .or_else(|| repos.iter().find(|r| r.repo_name == name))
            {
                return Ok(repo);
            }
        }

        Err(CohoError::filesystem_error(
            format!(
                "Not inside a known repo: {}. Pass -r or run from within a checkout.",
                start_dir.display()
            ),
            Some(start_dir.clone()),
        ))
    }
}

/// Remove svn repositories from `resolved`.
///
/// Returns how many the user should be told about: none when the only
/// requested value was `auto`.
fn drop_svn(resolved: &mut Vec<RepoDescriptor>, values: &[String]) -> usize {
    let before = resolved.len();
    resolved.retain(|r| r.scm_type() != ScmType::Svn);
    let only_auto = values.len() == 1 && values[0] == AUTO_GROUP;
    if only_auto {
        0
    } else {
        before - resolved.len()
    }
}

/// Append `repo` unless an entry already covers it.
fn add_unique(resolved: &mut Vec<RepoDescriptor>, repo: &RepoDescriptor, include_modules: bool) {
    if resolved.iter().any(|r| r.id == repo.id) {
        return;
    }
    if !include_modules {
        if let Some(existing) = resolved.iter_mut().find(|r| r.repo_name == repo.repo_name) {
            // the base checkout replaces a module of it, in place
            if existing.is_module && !repo.is_module {
                *existing = repo.clone();
            }
            return;
        }
    }
    resolved.push(repo.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ids(repos: &[RepoDescriptor]) -> Vec<&'static str> {
        repos.iter().map(|r| r.id).collect()
    }

    fn workspace(start: &str) -> Workspace {
        Workspace::new("/work", start)
    }

    #[test]
    fn test_every_id_resolves_to_itself() {
        let registry = RepoRegistry::cordova();
        let workspace = workspace("/work");
        let resolver = RepoResolver::new(&registry, &workspace);
        let options = ResolveOptions::default().with_modules().with_svn();

        for repo in registry.all_repos() {
            let resolved = resolver.resolve(&values(&[repo.id]), options).unwrap();
            assert_eq!(ids(&resolved), vec![repo.id]);
        }
    }

    #[test]
    fn test_android_resolves_to_single_descriptor() {
        let registry = RepoRegistry::cordova();
        let workspace = workspace("/work");
        let resolver = RepoResolver::new(&registry, &workspace);

        let resolved = resolver
            .resolve(&values(&["android"]), ResolveOptions::default())
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].repo_name, "cordova-android");
    }

    #[test]
    fn test_groups_keep_declared_order() {
        let registry = RepoRegistry::cordova();
        let workspace = workspace("/work");
        let resolver = RepoResolver::new(&registry, &workspace);

        let resolved = resolver
            .resolve(&values(&["active-platform"]), ResolveOptions::default())
            .unwrap();
        assert_eq!(
            ids(&resolved),
            vec!["android", "ios", "osx", "browser", "electron"]
        );
    }

    #[test]
    fn test_svn_dropped_unless_requested() {
        let registry = RepoRegistry::cordova();
        let workspace = workspace("/work");
        let resolver = RepoResolver::new(&registry, &workspace);

        let without = resolver
            .resolve(&values(&["svn"]), ResolveOptions::default())
            .unwrap();
        assert!(without.is_empty());

        let with = resolver
            .resolve(&values(&["all"]), ResolveOptions::default().with_svn())
            .unwrap();
        assert!(with.iter().any(|r| r.id == "dist"));
    }

    #[test]
    fn test_invalid_value() {
        let registry = RepoRegistry::cordova();
        let workspace = workspace("/work");
        let resolver = RepoResolver::new(&registry, &workspace);

        let error = resolver
            .resolve(&values(&["android", "nonexistent-group"]), ResolveOptions::default())
            .unwrap_err();
        assert!(matches!(error, CohoError::InvalidRepo { ref value } if value == "nonexistent-group"));
        assert!(error
            .to_string()
            .contains("Invalid repo value: nonexistent-group"));
    }

    #[test]
    fn test_module_collapses_into_base_in_either_order() {
        let registry = RepoRegistry::cordova();
        let workspace = workspace("/work");
        let resolver = RepoResolver::new(&registry, &workspace);

        let base_first = resolver
            .resolve(&values(&["lib", "common"]), ResolveOptions::default())
            .unwrap();
        assert_eq!(ids(&base_first), vec!["lib"]);

        let module_first = resolver
            .resolve(&values(&["common", "android", "lib"]), ResolveOptions::default())
            .unwrap();
        assert_eq!(ids(&module_first), vec!["lib", "android"]);

        let with_modules = resolver
            .resolve(&values(&["common", "lib"]), ResolveOptions::default().with_modules())
            .unwrap();
        assert_eq!(ids(&with_modules), vec!["common", "lib"]);
    }

    #[test]
    fn test_duplicates_removed() {
        let registry = RepoRegistry::cordova();
        let workspace = workspace("/work");
        let resolver = RepoResolver::new(&registry, &workspace);

        let resolved = resolver
            .resolve(
                &values(&["ios", "platform", "cordova-ios"]),
                ResolveOptions::default(),
            )
            .unwrap();
        assert_eq!(resolved.iter().filter(|r| r.id == "ios").count(), 1);
        assert_eq!(resolved[0].id, "ios");
    }

    #[test]
    fn test_current_repo_from_nested_dir() {
        let registry = RepoRegistry::cordova();

        let workspace = workspace("/work/cordova-android/framework/src");
        let resolver = RepoResolver::new(&registry, &workspace);
        assert_eq!(resolver.current_repo().unwrap().id, "android");
        // no value means "."
        assert_eq!(
            ids(&resolver.resolve(&[], ResolveOptions::default()).unwrap()),
            vec!["android"]
        );

        let workspace = Workspace::new("/work", "/work/cordova-lib/cordova-fetch/src");
        let resolver = RepoResolver::new(&registry, &workspace);
        assert_eq!(resolver.current_repo().unwrap().id, "fetch");

        let workspace = Workspace::new("/work", "/work/cordova-lib/spec");
        let resolver = RepoResolver::new(&registry, &workspace);
        assert_eq!(resolver.current_repo().unwrap().id, "lib");
    }

    #[test]
    fn test_current_repo_outside_checkout() {
        let registry = RepoRegistry::cordova();
        let workspace = workspace("/tmp/elsewhere");
        let resolver = RepoResolver::new(&registry, &workspace);

        let error = resolver.current_repo().unwrap_err();
        assert_eq!(error.exit_code(), crate::common::EXIT_FATAL);
    }

    #[test]
    fn test_auto_group() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("cordova-js")).unwrap();
        std::fs::create_dir(temp_dir.path().join("cordova-dist")).unwrap();

        let registry = RepoRegistry::cordova();
        let workspace = Workspace::new(temp_dir.path(), PathBuf::from("/"));
        let resolver = RepoResolver::new(&registry, &workspace);

        let resolved = resolver
            .resolve(&values(&["auto"]), ResolveOptions::default())
            .unwrap();
        assert_eq!(ids(&resolved), vec!["js"]);
    }

    #[test]
    fn test_svn_skip_is_silent_for_auto_only() {
        let registry = RepoRegistry::cordova();
        let candidates = || -> Vec<RepoDescriptor> {
            ["js", "dist", "dist/dev"]
                .iter()
                .map(|id| registry.repo_by_id(id, None).unwrap().clone())
                .collect()
        };

        let mut resolved = candidates();
        assert_eq!(drop_svn(&mut resolved, &values(&["auto"])), 0);
        assert_eq!(ids(&resolved), vec!["js"]);

        let mut resolved = candidates();
        assert_eq!(drop_svn(&mut resolved, &values(&["all"])), 2);
        assert_eq!(ids(&resolved), vec!["js"]);

        let mut resolved = candidates();
        assert_eq!(drop_svn(&mut resolved, &values(&["auto", "js"])), 2);
    }
}
