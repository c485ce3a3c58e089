use std::ffi::OsString;

use crate::{command, config, resolver};

/// Errors that abort the hook before or while running the wrapped command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::Error),
    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("argument {0:?} is not valid UTF-8")]
    NonUnicodeArg(OsString),
    #[error("failed to resolve the own container: {0}")]
    Resolve(#[from] resolver::Error),
    #[error(transparent)]
    Command(#[from] command::Error),
    #[error("failed to forward output of the wrapped command: {0}")]
    Output(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
