//! Integration tests for asset resolution and the single-flight cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use super::*;

// ============================================================================
// Mock Implementations
// ============================================================================

/// Asset source serving canned bytes, counting fetches per asset kind.
struct MockSource {
    module_fetches: AtomicUsize,
    model_fetches: AtomicUsize,
    /// Base URLs whose fetches fail with a 503.
    failing: Mutex<Vec<String>>,
}

impl MockSource {
    fn new() -> Self {
        Self {
            module_fetches: AtomicUsize::new(0),
            model_fetches: AtomicUsize::new(0),
            failing: Mutex::new(Vec::new()),
        }
    }

    fn fail_base(&self, base: &str) {
        self.failing.lock().unwrap().push(base.to_string());
    }

    fn heal_base(&self, base: &str) {
        self.failing.lock().unwrap().retain(|b| b != base);
    }

    fn total_fetches(&self) -> usize {
        self.module_fetches.load(Ordering::SeqCst) + self.model_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetSource for MockSource {
    async fn fetch(&self, url: &str, _options: &FetchOptions) -> Result<Bytes> {
        let failing = self
            .failing
            .lock()
            .unwrap()
            .iter()
            .any(|base| url.starts_with(base.as_str()));
        if failing {
            return Err(AssetError::Status {
                url: url.to_string(),
                status: 503,
            });
        }
        if url.ends_with(MODULE_ASSET) {
            self.module_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(b"module-bytes"))
        } else {
            self.model_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(b"model-bytes"))
        }
    }
}

/// Compiler wrapping the bytes unchanged, counting invocations.
struct MockCompiler {
    compiles: AtomicUsize,
}

impl MockCompiler {
    fn new() -> Self {
        Self {
            compiles: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ModuleCompiler for MockCompiler {
    async fn compile(&self, binary: Bytes) -> Result<DspModule> {
        self.compiles.fetch_add(1, Ordering::SeqCst);
        Ok(DspModule::new(binary))
    }
}

fn registry() -> (Arc<MockSource>, Arc<MockCompiler>, AssetRegistry) {
    let source = Arc::new(MockSource::new());
    let compiler = Arc::new(MockCompiler::new());
    let registry = AssetRegistry::new(source.clone(), compiler.clone());
    (source, compiler, registry)
}

fn mirror_config(base: &str) -> AssetConfig {
    AssetConfig {
        base_url: Some(base.to_string()),
        ..Default::default()
    }
}

// ============================================================================
// Location Resolution
// ============================================================================

#[test]
fn resolves_default_locations() {
    let locations = resolve_locations(&AssetConfig::default()).unwrap();
    assert_eq!(
        locations.module_url,
        format!("{DEFAULT_BASE_URL}/{MODULE_ASSET}")
    );
    assert_eq!(
        locations.model_url,
        format!("{DEFAULT_BASE_URL}/{MODEL_ASSET}")
    );
}

#[test]
fn resolves_override_and_trims_trailing_slash() {
    let config = mirror_config("https://mirror.example/assets/");
    assert_eq!(config.effective_base_url(), "https://mirror.example/assets");

    let locations = resolve_locations(&config).unwrap();
    assert_eq!(
        locations.module_url,
        "https://mirror.example/assets/denoiser.bin"
    );
    assert_eq!(
        locations.model_url,
        "https://mirror.example/assets/denoiser.weights"
    );
}

#[test]
fn resolution_is_deterministic() {
    let a = resolve_locations(&mirror_config("https://mirror.example/v1")).unwrap();
    let b = resolve_locations(&mirror_config("https://mirror.example/v1/")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn rejects_invalid_base_url() {
    let result = resolve_locations(&mirror_config("not a url"));
    assert!(matches!(result, Err(AssetError::InvalidBaseUrl { .. })));
}

// ============================================================================
// Single-Flight Caching
// ============================================================================

#[tokio::test]
async fn concurrent_acquires_share_one_flight() {
    let (source, compiler, registry) = registry();
    let config = AssetConfig::default();

    let (a, b) = tokio::join!(registry.acquire(&config), registry.acquire(&config));
    let a = a.unwrap();
    let b = b.unwrap();

    assert_eq!(source.module_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(source.model_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(compiler.compiles.load(Ordering::SeqCst), 1);

    // Both callers observe the identical asset set, not copies.
    assert!(a.module.same_module(&b.module));
    assert_eq!(a.model, b.model);
}

#[tokio::test]
async fn later_acquire_returns_cached_value() {
    let (source, compiler, registry) = registry();
    let config = AssetConfig::default();

    registry.acquire(&config).await.unwrap();
    let again = registry.acquire(&config).await.unwrap();

    assert_eq!(source.total_fetches(), 2);
    assert_eq!(compiler.compiles.load(Ordering::SeqCst), 1);
    assert_eq!(again.model, Bytes::from_static(b"model-bytes"));
}

#[tokio::test]
async fn equal_effective_base_urls_share_an_entry() {
    let (source, _compiler, registry) = registry();

    registry.acquire(&AssetConfig::default()).await.unwrap();
    // Explicit override spelled with a trailing slash still hits the entry.
    let explicit = mirror_config(&format!("{DEFAULT_BASE_URL}/"));
    registry.acquire(&explicit).await.unwrap();

    assert_eq!(source.total_fetches(), 2);
}

#[tokio::test]
async fn distinct_base_urls_are_independent() {
    let (source, compiler, registry) = registry();

    let a = registry.acquire(&AssetConfig::default()).await.unwrap();
    let b = registry
        .acquire(&mirror_config("https://mirror.example/v1"))
        .await
        .unwrap();

    assert_eq!(source.total_fetches(), 4);
    assert_eq!(compiler.compiles.load(Ordering::SeqCst), 2);
    assert!(!a.module.same_module(&b.module));
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn failure_propagates_to_every_waiter() {
    let (source, _compiler, registry) = registry();
    source.fail_base("https://cdn.hush.audio");
    let config = AssetConfig::default();

    let (a, b) = tokio::join!(registry.acquire(&config), registry.acquire(&config));

    assert!(matches!(a, Err(AssetError::Status { status: 503, .. })));
    assert!(matches!(b, Err(AssetError::Status { status: 503, .. })));
}

#[tokio::test]
async fn failure_of_one_key_leaves_others_cached() {
    let (source, _compiler, registry) = registry();
    let healthy = AssetConfig::default();
    let broken = mirror_config("https://mirror.example/v1");

    registry.acquire(&healthy).await.unwrap();
    source.fail_base("https://mirror.example");
    registry.acquire(&broken).await.unwrap_err();

    // The healthy entry is untouched by the neighboring failure.
    registry.acquire(&healthy).await.unwrap();
    assert_eq!(source.total_fetches(), 2);

    source.heal_base("https://mirror.example");
    registry.acquire(&broken).await.unwrap();
    assert_eq!(source.total_fetches(), 4);
}

#[tokio::test]
async fn failed_entry_is_evicted_for_retry() {
    let (source, compiler, registry) = registry();
    let config = AssetConfig::default();

    source.fail_base("https://cdn.hush.audio");
    registry.acquire(&config).await.unwrap_err();

    source.heal_base("https://cdn.hush.audio");
    let assets = registry.acquire(&config).await.unwrap();

    assert_eq!(source.total_fetches(), 2);
    assert_eq!(compiler.compiles.load(Ordering::SeqCst), 1);
    assert_eq!(assets.model, Bytes::from_static(b"model-bytes"));
}

#[tokio::test]
async fn compile_failure_propagates_and_allows_retry() {
    struct FailingCompiler {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ModuleCompiler for FailingCompiler {
        async fn compile(&self, binary: Bytes) -> Result<DspModule> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(AssetError::Compile("bad module header".to_string()));
            }
            Ok(DspModule::new(binary))
        }
    }

    let source = Arc::new(MockSource::new());
    let compiler = Arc::new(FailingCompiler {
        attempts: AtomicUsize::new(0),
    });
    let registry = AssetRegistry::new(source.clone(), compiler.clone());
    let config = AssetConfig::default();

    let err = registry.acquire(&config).await.unwrap_err();
    assert!(matches!(err, AssetError::Compile(_)));

    registry.acquire(&config).await.unwrap();
    assert_eq!(compiler.attempts.load(Ordering::SeqCst), 2);
}
