use std::path::PathBuf;

use crate::{container, fsutil};

/// Errors that may occur while deriving container facts from cgroup membership.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to find the container ID in `{path}`")]
    ContainerIdNotFound { path: PathBuf },
    #[error(transparent)]
    Read(#[from] fsutil::FileReadError),
    #[error("cgroup file `{path}` names an unusable container ID: {source}")]
    InvalidContainerID {
        path: PathBuf,
        #[source]
        source: container::Error,
    },
}

impl Error {
    /// Returns `true` for the "no cgroup-derived ID available" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ContainerIdNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
