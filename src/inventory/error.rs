use crate::{command, container};

/// Errors that may occur while scanning the container inventory.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to list running containers: {0}")]
    List(#[source] command::Error),
    #[error("failed to inspect container `{id}`: {source}")]
    Inspect {
        id: String,
        #[source]
        source: command::Error,
    },
    #[error(transparent)]
    Record(#[from] container::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
