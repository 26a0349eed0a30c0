pub mod repo_resolver;
pub mod repo_walker;
pub mod session;

pub use repo_resolver::{RepoResolver, ResolveOptions, CURRENT_REPO};
pub use repo_walker::{RepoDir, RepoWalker};
pub use session::Session;
