#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid container id: {0}")]
    InvalidContainerID(String),
    #[error("failed to decode inspect output of container `{id}`: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("inspect output of container `{id}` holds {count} records, expected exactly one")]
    RecordCount { id: String, count: usize },
}
pub type Result<T> = std::result::Result<T, Error>;
