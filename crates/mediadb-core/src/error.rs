use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Connection failed for channel {channel}: {detail}")]
    Connection { channel: String, detail: String },

    #[error("Search failed on index {index}: {detail}")]
    Search { index: String, detail: String },

    #[error("Storage operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
