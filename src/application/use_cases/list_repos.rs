use crate::domain::entities::{RepoRegistry, AUTO_GROUP};
use crate::domain::value_objects::ScmType;
use serde::Serialize;

/// list-reposの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoListing {
    pub id: &'static str,
    pub title: &'static str,
    pub repo_name: &'static str,
    pub scm: ScmType,
    pub inactive: bool,
    /// 所属する（列挙で定義された）グループ
    pub groups: Vec<&'static str>,
}

/// Every registry entry and the names of every group, in declared order.
pub fn list_repos(registry: &RepoRegistry) -> (Vec<RepoListing>, Vec<&'static str>) {
    let repos = registry
        .all_repos()
        .iter()
        .map(|repo| RepoListing {
            id: repo.id,
            title: repo.title,
            repo_name: repo.repo_name,
            scm: repo.scm_type(),
            inactive: repo.inactive,
            groups: registry.groups_containing(repo),
        })
        .collect();
    let groups = registry
        .groups()
        .iter()
        .map(|g| g.name)
        .filter(|name| *name != AUTO_GROUP)
        .chain(std::iter::once(AUTO_GROUP))
        .collect();
    (repos, groups)
}
