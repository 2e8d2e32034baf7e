use thiserror::Error;

use hush_assets::AssetError;

/// Result type alias for denoiser operations.
pub type Result<T> = std::result::Result<T, DenoiseError>;

/// Errors returned by denoiser operations.
#[derive(Debug, Error)]
pub enum DenoiseError {
    /// The instance has not finished initialization. Instances are
    /// constructed with `Denoiser::create`, never directly.
    #[error("denoise: suppressor is not initialized; construct instances with Denoiser::create")]
    NotInitialized,

    /// The instance reports ready but holds no assets. A lifecycle invariant
    /// violation; not reachable through the public API.
    #[error("denoise: suppressor assets are not loaded")]
    AssetsMissing,

    /// Asset acquisition failed.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// The audio runtime rejected an operation.
    #[error("denoise: audio runtime: {0}")]
    Engine(String),
}
