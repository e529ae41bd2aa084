//! Worker-level errors. Bucket 1 (malformed/invalid input) and bucket 2
//! (model/solver failure) are caught and turned into an error response
//! inside a single message's processing and never reach this type; this
//! enum only covers bucket 3 (transport) plus genuine setup failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("AMQP transport error: {0}")]
    Transport(#[from] amiquip::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type WorkerResult<T> = Result<T, WorkerError>;
