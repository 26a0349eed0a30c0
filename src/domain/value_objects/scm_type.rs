use serde::Serialize;
use std::fmt;

/// Source control system a registry entry is checked out with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScmType {
    /// Git version control system
    Git,
    /// Subversion (SVN) version control system
    Svn,
}

impl Default for ScmType {
    fn default() -> Self {
        Self::Git
    }
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScmType::Git => write!(f, "git"),
            ScmType::Svn => write!(f, "svn"),
        }
    }
}

impl ScmType {
    /// Executable used to operate on checkouts of this type
    pub fn executable(&self) -> &'static str {
        match self {
            ScmType::Git => "git",
            ScmType::Svn => "svn",
        }
    }
}
