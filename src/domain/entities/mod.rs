pub mod registry;
pub mod repository;
pub mod workspace;

pub use registry::{GroupDefinition, GroupMembers, RepoRegistry, AUTO_GROUP};
pub use repository::{RepoDescriptor, GITHUB_ORG};
pub use workspace::Workspace;
