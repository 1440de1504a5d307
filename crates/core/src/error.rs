use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("{0}")]
    Other(String),
}
