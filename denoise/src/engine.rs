//! Boundary to the real-time audio execution engine.
//!
//! The engine itself lives outside this crate. It is reached through
//! [`AudioRuntime`], which registers the suppressor processor on an audio
//! context and spawns live [`SuppressorNode`]s bound to the compiled assets.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use hush_assets::DspModule;

use crate::error::Result;

/// Opaque handle to the caller's real-time audio context.
#[derive(Clone)]
pub struct AudioContextHandle {
    inner: Arc<dyn Any + Send + Sync>,
}

impl AudioContextHandle {
    /// Wraps a runtime-specific audio context.
    pub fn new<T: Send + Sync + 'static>(context: T) -> Self {
        Self {
            inner: Arc::new(context),
        }
    }

    /// Borrows the runtime-specific context, if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }
}

impl fmt::Debug for AudioContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioContextHandle").finish_non_exhaustive()
    }
}

/// Control messages accepted by a live suppressor node.
///
/// Delivery is one-way and unacknowledged; the only ordering guarantee is
/// send order on a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Sets the suppression intensity, 0 to 100.
    SetSuppressionLevel(u8),
    /// Enters or leaves pass-through mode.
    SetBypass(bool),
}

/// Parameters for spawning a suppressor node.
#[derive(Debug, Clone)]
pub struct NodeParams {
    /// Compiled executable DSP module.
    pub module: DspModule,
    /// Raw neural-network weights.
    pub model: Bytes,
    /// Sample rate of the audio stream, in Hz.
    pub sample_rate: u32,
    /// Initial suppression intensity, 0 to 100.
    pub suppression_intensity: u8,
}

/// Interface to the real-time audio execution engine.
#[async_trait]
pub trait AudioRuntime: Send + Sync {
    /// Ensures the suppressor processor is registered on `context`.
    ///
    /// Idempotent: registering an already-registered context is a no-op.
    async fn ensure_registered(
        &self,
        context: &AudioContextHandle,
        module: &DspModule,
    ) -> Result<()>;

    /// Spawns a live suppressor node on `context`.
    fn spawn_node(
        &self,
        context: &AudioContextHandle,
        params: NodeParams,
    ) -> Result<Box<dyn SuppressorNode>>;
}

/// Live binding between the compiled assets and the audio engine.
pub trait SuppressorNode: Send {
    /// Posts a one-way control message. Delivery is assumed, not confirmed.
    fn post(&self, message: ControlMessage);

    /// Detaches the node from the audio graph.
    fn disconnect(&self);
}
