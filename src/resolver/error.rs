use crate::cgroup;

/// Errors that may occur while resolving the own container ID.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cgroup lookup failed and no fallback matched: {0}")]
    Cgroup(#[from] cgroup::Error),
    #[error("failed to find the container ID")]
    Unresolved,
}

pub type Result<T> = std::result::Result<T, Error>;
