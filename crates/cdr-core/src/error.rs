use thiserror::Error;

/// All errors produced by the call-record crates.
#[derive(Error, Debug)]
pub enum CdrError {
    /// A timestamp string did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("Invalid date format, use YYYY-MM-DD HH:MM:SS: {0}")]
    InvalidFormat(String),

    /// A field update or textual value fell outside its allowed range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A required argument was empty or otherwise unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An aggregation that must produce a result ran over zero records.
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// A record snapshot could not be converted to JSON.
    #[error("Failed to serialise record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the call-record crates.
pub type Result<T> = std::result::Result<T, CdrError>;
