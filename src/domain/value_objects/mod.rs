pub mod release_version;
pub mod scm_type;

pub use release_version::{select_most_recent_tag, ReleaseVersion, ReleaseVersionError};
pub use scm_type::ScmType;
