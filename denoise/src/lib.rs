//! Noise suppression for real-time audio pipelines.
//!
//! A neural noise suppressor runs inside the caller's real-time audio
//! engine. Before it can run, two binary assets must be acquired: an
//! executable DSP module and a model weight blob. This crate ties the pieces
//! together:
//!
//! - [`Denoiser`]: factory facade — creates instances and warms the asset
//!   cache ([`Denoiser::create`] / [`Denoiser::preload`]).
//! - [`NoiseSuppressor`]: one processor instance — lifecycle plus the runtime
//!   control surface (intensity, bypass, teardown).
//! - [`AudioRuntime`] / [`SuppressorNode`]: the boundary to the external
//!   real-time execution engine.
//!
//! Asset download and caching live in [`hush_assets`]; acquisition is
//! single-flight per source location, so any number of instances share one
//! download.
//!
//! # Example
//!
//! ```rust,ignore
//! use hush_denoise::{Denoiser, DenoiserConfig};
//!
//! let denoiser = Denoiser::builder().runtime(runtime).build()?;
//! denoiser.preload(&Default::default()).await?; // warm the cache early
//!
//! let mut suppressor = denoiser.create(DenoiserConfig::default()).await?;
//! suppressor.attach(&context).await?;
//! suppressor.set_suppression_intensity(80.0);
//! ```

mod config;
mod denoiser;
mod engine;
mod error;
mod suppressor;

pub use config::{DenoiserConfig, MAX_SUPPRESSION_INTENSITY};
pub use denoiser::{Denoiser, DenoiserBuilder};
pub use engine::{AudioContextHandle, AudioRuntime, ControlMessage, NodeParams, SuppressorNode};
pub use error::{DenoiseError, Result};
pub use suppressor::NoiseSuppressor;

pub use hush_assets::{
    AcquiredAssets, AssetConfig, AssetError, AssetRegistry, AssetSource, DspModule, FetchOptions,
    HttpAssetSource, ModuleCompiler, DEFAULT_BASE_URL,
};
