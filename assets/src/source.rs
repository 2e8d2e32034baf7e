//! Asset locations and the fetch boundary.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AssetError, Result};

/// Default CDN base URL for suppressor assets.
pub const DEFAULT_BASE_URL: &str = "https://cdn.hush.audio/denoise/v1";

/// File name of the executable DSP module under the base URL.
pub const MODULE_ASSET: &str = "denoiser.bin";

/// File name of the model weight blob under the base URL.
pub const MODEL_ASSET: &str = "denoiser.weights";

/// Asset download configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Alternate base URL to download assets from. `None` uses
    /// [`DEFAULT_BASE_URL`].
    #[serde(default)]
    pub base_url: Option<String>,

    /// Options forwarded to the fetch layer.
    #[serde(default)]
    pub fetch: FetchOptions,
}

impl AssetConfig {
    /// Returns the override-or-default base URL with any trailing `/`
    /// trimmed.
    ///
    /// This string is the cache key: two configurations with an equal
    /// effective base URL share one cache entry.
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

/// Options forwarded to the fetch layer.
///
/// Never part of the cache key; the options of the request that starts a
/// flight apply to that flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Per-request timeout in seconds. `None` disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> Option<u64> {
    Some(30)
}

/// Concrete URLs of the two suppressor assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocations {
    /// Executable DSP module.
    pub module_url: String,
    /// Model weight blob.
    pub model_url: String,
}

/// Resolves the asset URLs for a configuration.
///
/// Pure and deterministic: equal effective base URLs resolve to equal
/// locations. A malformed override is rejected here, before any cache entry
/// is created for it.
pub fn resolve_locations(config: &AssetConfig) -> Result<AssetLocations> {
    let base = config.effective_base_url();
    Url::parse(base).map_err(|e| AssetError::InvalidBaseUrl {
        url: base.to_string(),
        message: e.to_string(),
    })?;
    Ok(AssetLocations {
        module_url: format!("{base}/{MODULE_ASSET}"),
        model_url: format!("{base}/{MODEL_ASSET}"),
    })
}

/// Interface for retrieving raw asset bytes.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetches the bytes at `url`.
    ///
    /// Not retried at this layer; errors propagate to the caller.
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Bytes>;
}

/// HTTP asset source backed by a shared [`reqwest::Client`].
pub struct HttpAssetSource {
    client: reqwest::Client,
}

impl HttpAssetSource {
    /// Creates a new HTTP asset source.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AssetError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Bytes> {
        let mut request = self.client.get(url);
        if let Some(secs) = options.timeout_secs {
            request = request.timeout(Duration::from_secs(secs));
        }

        let response = request.send().await.map_err(|e| AssetError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|e| AssetError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
