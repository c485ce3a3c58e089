use std::path::PathBuf;

use crate::fsutil;

/// Errors that may occur during environment detection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to check if path `{path}` exists: {source}")]
    ExistenceCheck {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Read(#[from] fsutil::FileReadError),
}

pub type Result<T> = std::result::Result<T, Error>;
