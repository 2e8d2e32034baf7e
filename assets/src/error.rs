use thiserror::Error;

/// Result type alias for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Errors returned by asset acquisition.
///
/// One acquisition outcome is delivered to every caller waiting on the same
/// cache entry, so the error is `Clone` and carries owned message payloads.
#[derive(Debug, Clone, Error)]
pub enum AssetError {
    /// The configured base URL cannot be parsed.
    #[error("assets: invalid base url {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// The HTTP client could not be constructed.
    #[error("assets: http client: {0}")]
    Client(String),

    /// Transport-level fetch failure.
    #[error("assets: fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("assets: fetch {url}: unexpected status {status}")]
    Status { url: String, status: u16 },

    /// The executable module could not be compiled.
    #[error("assets: compile module: {0}")]
    Compile(String),

    /// The spawned load task did not run to completion.
    #[error("assets: load task failed: {0}")]
    TaskFailed(String),
}
