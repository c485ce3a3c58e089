use crate::command;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to list overlay mounts: {0}")]
    Command(#[from] command::Error),
    #[error("no overlay mount found")]
    MissingOverlayMount,
    #[error("found {count} overlay mounts, expected exactly one")]
    AmbiguousOverlayMounts { count: usize },
    #[error("failed to parse overlay mount line: {0}")]
    Parse(#[from] super::parser::ParseError),
    #[error("overlay mount has no `workdir` option")]
    MissingWorkdir,
}

pub type Result<T> = std::result::Result<T, Error>;
