//! Asset download and caching for the hush noise suppressor.
//!
//! The suppressor needs two binary assets before it can run: an executable
//! DSP module and a neural-network weight blob. This crate resolves their
//! download locations, fetches them, compiles the module through the
//! runtime's [`ModuleCompiler`], and memoizes the result per source location
//! so each distinct location is fetched exactly once per process.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hush_assets::{AssetConfig, AssetRegistry, HttpAssetSource};
//!
//! let registry = AssetRegistry::new(Arc::new(HttpAssetSource::new()?), compiler);
//! let assets = registry.acquire(&AssetConfig::default()).await?;
//! ```

mod error;
mod module;
mod registry;
mod source;

pub use error::{AssetError, Result};
pub use module::{AcquiredAssets, DspModule, ModuleCompiler};
pub use registry::AssetRegistry;
pub use source::{
    AssetConfig, AssetLocations, AssetSource, FetchOptions, HttpAssetSource, resolve_locations,
    DEFAULT_BASE_URL, MODEL_ASSET, MODULE_ASSET,
};

#[cfg(test)]
mod tests;
