//! Noise suppressor instance lifecycle and control surface.

use std::sync::Arc;

use tracing::debug;

use hush_assets::AcquiredAssets;

use crate::config::{DenoiserConfig, MAX_SUPPRESSION_INTENSITY};
use crate::engine::{AudioContextHandle, AudioRuntime, ControlMessage, NodeParams, SuppressorNode};
use crate::error::{DenoiseError, Result};

/// A noise suppressor instance.
///
/// Instances come out of [`Denoiser::create`] already initialized: asset
/// acquisition either completed or the creation call itself failed, so a
/// half-initialized instance is never observable. [`attach`] then binds the
/// instance to a real-time audio context, after which the control surface is
/// live.
///
/// Instances may share acquired assets with each other (the cache hands out
/// one set per source location) but track their own lifecycle and bypass
/// state independently.
///
/// [`Denoiser::create`]: crate::Denoiser::create
/// [`attach`]: NoiseSuppressor::attach
pub struct NoiseSuppressor {
    config: DenoiserConfig,
    runtime: Arc<dyn AudioRuntime>,
    assets: Option<AcquiredAssets>,
    node: Option<Box<dyn SuppressorNode>>,
    initialized: bool,
    bypassed: bool,
}

impl NoiseSuppressor {
    pub(crate) fn new(
        config: DenoiserConfig,
        runtime: Arc<dyn AudioRuntime>,
        assets: AcquiredAssets,
    ) -> Self {
        Self {
            config,
            runtime,
            assets: Some(assets),
            node: None,
            initialized: true,
            bypassed: false,
        }
    }

    /// Returns the configuration this instance was created with.
    pub fn config(&self) -> &DenoiserConfig {
        &self.config
    }

    /// Binds the instance to a real-time audio context.
    ///
    /// Registers the suppressor processor on the context (idempotent,
    /// delegated to the runtime), then spawns a live node parameterized with
    /// the compiled module, the model weights and the configured intensity.
    /// If the instance already holds a node, the old node is disconnected and
    /// replaced.
    ///
    /// # Errors
    ///
    /// [`DenoiseError::NotInitialized`] if the instance was destroyed;
    /// [`DenoiseError::AssetsMissing`] if the initialized state holds no
    /// assets (lifecycle invariant violation).
    pub async fn attach(&mut self, context: &AudioContextHandle) -> Result<()> {
        if !self.initialized {
            return Err(DenoiseError::NotInitialized);
        }
        let assets = self.assets.as_ref().ok_or(DenoiseError::AssetsMissing)?;

        self.runtime
            .ensure_registered(context, &assets.module)
            .await?;

        let params = NodeParams {
            module: assets.module.clone(),
            model: assets.model.clone(),
            sample_rate: self.config.sample_rate,
            suppression_intensity: self
                .config
                .suppression_intensity
                .min(MAX_SUPPRESSION_INTENSITY),
        };
        let node = self.runtime.spawn_node(context, params)?;
        if let Some(old) = self.node.replace(node) {
            old.disconnect();
        }
        debug!("denoise: suppressor attached");
        Ok(())
    }

    /// True once the instance is initialized and a live node exists.
    ///
    /// Strictly narrower than "assets loaded": a freshly created instance is
    /// not ready until [`attach`](NoiseSuppressor::attach) succeeds.
    pub fn is_ready(&self) -> bool {
        self.initialized && self.node.is_some()
    }

    /// Sets the suppression intensity on the live node.
    ///
    /// Tolerant by design: without a live node, or for a non-finite `level`,
    /// this is a silent no-op. Finite levels are clamped to integers in
    /// [0, 100]. The message is fire-and-forget; delivery is assumed, not
    /// confirmed.
    pub fn set_suppression_intensity(&self, level: f64) {
        let Some(node) = self.node.as_ref() else {
            return;
        };
        if !level.is_finite() {
            return;
        }
        let level = level.clamp(0.0, MAX_SUPPRESSION_INTENSITY as f64) as u8;
        node.post(ControlMessage::SetSuppressionLevel(level));
    }

    /// Enables or disables suppression on the live node.
    ///
    /// Disabling keeps the node alive in pass-through mode. Without a live
    /// node this is a no-op.
    pub fn set_noise_suppression_enabled(&mut self, enabled: bool) {
        if self.node.is_none() {
            return;
        }
        self.bypassed = !enabled;
        if let Some(node) = self.node.as_ref() {
            node.post(ControlMessage::SetBypass(!enabled));
        }
    }

    /// Returns the last-set suppression intent.
    ///
    /// Reflects what was requested, not what the engine confirmed; control
    /// messages carry no acknowledgement.
    pub fn is_noise_suppression_enabled(&self) -> bool {
        !self.bypassed
    }

    /// Tears the instance down.
    ///
    /// Disconnects and drops the node and releases this instance's assets
    /// reference; the cache entry is unaffected and other instances keep
    /// their shared assets. A second call, or a call on an instance that was
    /// never attached, is a no-op, and control operations after destruction
    /// are safe no-ops. Re-initialization is not supported — create a new
    /// instance instead.
    pub fn destroy(&mut self) {
        if !self.initialized {
            return;
        }
        if let Some(node) = self.node.take() {
            node.disconnect();
        }
        self.assets = None;
        self.initialized = false;
        self.bypassed = false;
        debug!("denoise: suppressor destroyed");
    }
}
