use thiserror::Error;

/// Failure kinds for per-file duration extraction.
///
/// Every variant is caught at the resolver boundary and converted into a
/// [`DurationResult`](crate::models::DurationResult) with a non-`Ok` status;
/// a single bad file never aborts a batch.
#[derive(Error, Debug)]
pub enum DurationError {
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    #[error("Missing required chunk: {0}")]
    MissingChunk(String),

    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DurationError>;
