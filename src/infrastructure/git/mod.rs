pub mod remote;
pub mod repository;

pub use remote::{pick_remote, RemoteNameCache, DEFAULT_REMOTE};
pub use repository::GitRepository;
