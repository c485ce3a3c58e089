/// Errors that may occur while invoking an external command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("refusing to run an empty command line")]
    EmptyArgv,
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command `{command}` exited with status {exit_code}: {stderr}")]
    NonZeroExit {
        command: String,
        exit_code: i32,
        stderr: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
