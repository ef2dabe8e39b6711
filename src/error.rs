// Error types shared by the library modules. The binary wraps these in
// `anyhow` for reporting; everything below `main` returns `UplError`.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = UplError> = std::result::Result<T, E>;

/// Every way an invocation of `upl` can fail.
#[derive(Debug, Error)]
pub enum UplError {
    /// The credentials file could not be read or written.
    #[error("config file '{}': {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credentials file exists but is not valid JSON for a credentials record.
    #[error("config file '{}' is not valid: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot determine the home directory")]
    NoHomeDir,

    /// The file to upload is missing or unreadable.
    #[error("cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to upload file '{file}' to bucket '{bucket}': {source}")]
    Transfer {
        file: String,
        bucket: String,
        #[source]
        source: TransportError,
    },

    #[error("failed to check for updates: {0}")]
    UpdateCheck(String),

    #[error("invalid version format: {0}")]
    VersionParse(String),

    /// The external install command could not be run or exited non-zero.
    #[error("{0}")]
    Install(String),
}

/// Failure of the PUT request itself, kept separate so `UplError::Transfer`
/// can name the file and bucket while keeping the transport cause.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint '{0}'")]
    Endpoint(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}
