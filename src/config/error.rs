/// Errors that may occur while loading the configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("environment variable `{var}` must be a JSON array of strings: {source}")]
    InvalidCommand {
        var: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("environment variable `{var}` must not be an empty command")]
    EmptyCommand { var: &'static str },
    #[error("environment variable `{var}` is not valid UTF-8")]
    NotUnicode { var: &'static str },
    #[error("environment variable `{var}` must be a boolean, got `{value}`")]
    InvalidBool { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
