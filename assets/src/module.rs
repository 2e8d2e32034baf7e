//! Compiled-module handle and the compile boundary.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Opaque handle to an executable DSP module compiled by the audio runtime.
///
/// The concrete representation belongs to the runtime that compiled it; this
/// crate only moves the handle around. Clones share the same underlying
/// module, which lives for the rest of the process once cached.
#[derive(Clone)]
pub struct DspModule {
    inner: Arc<dyn Any + Send + Sync>,
}

impl DspModule {
    /// Wraps a runtime-specific compiled module.
    pub fn new<T: Send + Sync + 'static>(module: T) -> Self {
        Self {
            inner: Arc::new(module),
        }
    }

    /// Borrows the runtime-specific module, if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Returns true if `other` is a handle to the same compiled module.
    pub fn same_module(&self, other: &DspModule) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for DspModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DspModule").finish_non_exhaustive()
    }
}

/// Interface for compiling raw module bytes into an executable module.
#[async_trait]
pub trait ModuleCompiler: Send + Sync {
    /// Compiles the module binary. May suspend.
    async fn compile(&self, binary: Bytes) -> Result<DspModule>;
}

/// The two binary assets of the suppressor, ready for execution.
///
/// Immutable after acquisition and shared read-only by the cache and every
/// processor instance that requested it; clones share the module handle and
/// the weight buffer.
#[derive(Debug, Clone)]
pub struct AcquiredAssets {
    /// Compiled executable DSP module.
    pub module: DspModule,
    /// Raw neural-network weights.
    pub model: Bytes,
}
