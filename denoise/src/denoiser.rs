//! Factory facade over asset acquisition and instance creation.

use std::sync::Arc;

use tracing::debug;

use hush_assets::{
    AcquiredAssets, AssetConfig, AssetRegistry, AssetSource, HttpAssetSource, ModuleCompiler,
};

use crate::config::DenoiserConfig;
use crate::engine::AudioRuntime;
use crate::error::{DenoiseError, Result};
use crate::suppressor::NoiseSuppressor;

/// Factory for noise suppressor instances.
///
/// Owns the process-wide asset registry: every [`create`] and [`preload`]
/// issued through one `Denoiser` — or through several sharing a registry via
/// [`DenoiserBuilder::registry`] — observes the same single-flight cache.
///
/// [`create`]: Denoiser::create
/// [`preload`]: Denoiser::preload
pub struct Denoiser {
    registry: Arc<AssetRegistry>,
    runtime: Arc<dyn AudioRuntime>,
}

impl std::fmt::Debug for Denoiser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Denoiser").finish_non_exhaustive()
    }
}

impl Denoiser {
    /// Creates a new builder.
    pub fn builder() -> DenoiserBuilder {
        DenoiserBuilder::new()
    }

    /// Creates a noise suppressor for `config`.
    ///
    /// Drives the instance through initialization: asset acquisition is
    /// started, or joined if one for the same effective base URL is already
    /// in flight or completed. On success the returned instance holds the
    /// acquired assets; on failure the error propagates and no instance
    /// exists, so there is nothing to clean up.
    pub async fn create(&self, config: DenoiserConfig) -> Result<NoiseSuppressor> {
        let assets = self.registry.acquire(&config.assets).await?;
        debug!("denoise: suppressor created");
        Ok(NoiseSuppressor::new(config, self.runtime.clone(), assets))
    }

    /// Warms the asset cache for `config` without creating an instance.
    ///
    /// Joins the exact same single-flight entry as any concurrent or later
    /// [`create`](Denoiser::create) with an equal effective base URL.
    pub async fn preload(&self, config: &AssetConfig) -> Result<AcquiredAssets> {
        Ok(self.registry.acquire(config).await?)
    }

    /// Returns the asset registry backing this facade.
    pub fn registry(&self) -> &Arc<AssetRegistry> {
        &self.registry
    }
}

/// Builder for [`Denoiser`].
pub struct DenoiserBuilder {
    source: Option<Arc<dyn AssetSource>>,
    compiler: Option<Arc<dyn ModuleCompiler>>,
    runtime: Option<Arc<dyn AudioRuntime>>,
    registry: Option<Arc<AssetRegistry>>,
}

impl DenoiserBuilder {
    fn new() -> Self {
        Self {
            source: None,
            compiler: None,
            runtime: None,
            registry: None,
        }
    }

    /// Sets the audio runtime. The runtime doubles as the module compiler
    /// unless [`compiler`](DenoiserBuilder::compiler) overrides it.
    pub fn runtime<R>(mut self, runtime: Arc<R>) -> Self
    where
        R: AudioRuntime + ModuleCompiler + 'static,
    {
        if self.compiler.is_none() {
            self.compiler = Some(runtime.clone());
        }
        self.runtime = Some(runtime);
        self
    }

    /// Overrides the asset source. Defaults to [`HttpAssetSource`].
    pub fn source(mut self, source: Arc<dyn AssetSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Overrides the module compiler.
    pub fn compiler(mut self, compiler: Arc<dyn ModuleCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Shares an existing registry instead of constructing a fresh one.
    ///
    /// `source` and `compiler` are ignored when a registry is supplied.
    pub fn registry(mut self, registry: Arc<AssetRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Builds the facade.
    ///
    /// # Errors
    ///
    /// [`DenoiseError::Engine`] if no runtime was supplied; an asset error if
    /// the default HTTP source cannot be constructed.
    pub fn build(self) -> Result<Denoiser> {
        let runtime = self
            .runtime
            .ok_or_else(|| DenoiseError::Engine("no audio runtime configured".to_string()))?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => {
                let source: Arc<dyn AssetSource> = match self.source {
                    Some(source) => source,
                    None => Arc::new(HttpAssetSource::new()?),
                };
                let compiler = self.compiler.ok_or_else(|| {
                    DenoiseError::Engine("no module compiler configured".to_string())
                })?;
                Arc::new(AssetRegistry::new(source, compiler))
            }
        };

        Ok(Denoiser { registry, runtime })
    }
}
