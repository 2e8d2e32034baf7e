//! Single-flight memoizing cache for acquired assets.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info};

use crate::error::{AssetError, Result};
use crate::module::{AcquiredAssets, ModuleCompiler};
use crate::source::{AssetConfig, AssetLocations, AssetSource, FetchOptions, resolve_locations};

type LoadFuture = Shared<BoxFuture<'static, Result<AcquiredAssets>>>;

struct CacheEntry {
    /// Distinguishes this flight from any later one under the same key.
    generation: u64,
    load: LoadFuture,
}

/// Keyed single-flight cache of acquired assets.
///
/// One entry per distinct effective base URL. The first [`acquire`] for a key
/// starts a load and stores the shared cell; concurrent and later callers
/// await the same cell, and a resolved cell keeps returning the cached value
/// without re-fetching. Entries for different keys are fully independent.
///
/// A failed cell delivers the same error to every current waiter and is then
/// evicted, so a later call for that key may retry.
///
/// Registries are plain values: an application constructs one and shares it
/// for the process lifetime; tests construct isolated ones.
///
/// [`acquire`]: AssetRegistry::acquire
pub struct AssetRegistry {
    source: Arc<dyn AssetSource>,
    compiler: Arc<dyn ModuleCompiler>,
    entries: Mutex<HashMap<String, CacheEntry>>,
    generations: AtomicU64,
}

impl AssetRegistry {
    /// Creates an empty registry over the given collaborators.
    pub fn new(source: Arc<dyn AssetSource>, compiler: Arc<dyn ModuleCompiler>) -> Self {
        Self {
            source,
            compiler,
            entries: Mutex::new(HashMap::new()),
            generations: AtomicU64::new(0),
        }
    }

    /// Acquires the assets for `config`, fetching and compiling at most once
    /// per effective base URL.
    ///
    /// The start-vs-join decision is made under the registry lock, so two
    /// racing calls for one key can never start two fetches. The lock is
    /// never held across a suspension point.
    pub async fn acquire(&self, config: &AssetConfig) -> Result<AcquiredAssets> {
        let locations = resolve_locations(config)?;
        let key = config.effective_base_url().to_string();

        let (generation, load) = {
            let mut entries = self.entries.lock().unwrap();
            match entries.get(&key) {
                Some(entry) => {
                    debug!("assets: joining entry for {}", key);
                    (entry.generation, entry.load.clone())
                }
                None => {
                    debug!("assets: starting load for {}", key);
                    let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                    let load = self.start_load(locations, config.fetch.clone());
                    entries.insert(
                        key.clone(),
                        CacheEntry {
                            generation,
                            load: load.clone(),
                        },
                    );
                    (generation, load)
                }
            }
        };

        match load.await {
            Ok(assets) => Ok(assets),
            Err(e) => {
                // Evict the failed entry so a later call can retry. The
                // generation check keeps a newer flight under the same key
                // untouched.
                let mut entries = self.entries.lock().unwrap();
                if entries
                    .get(&key)
                    .is_some_and(|entry| entry.generation == generation)
                {
                    entries.remove(&key);
                }
                Err(e)
            }
        }
    }

    /// Starts one load flight: both assets fetched concurrently, then the
    /// module compiled. Spawned onto the runtime so the flight runs to
    /// completion even if every waiter stops awaiting.
    fn start_load(&self, locations: AssetLocations, options: FetchOptions) -> LoadFuture {
        let source = self.source.clone();
        let compiler = self.compiler.clone();
        let task = tokio::spawn(async move {
            let (module_bytes, model) = tokio::try_join!(
                source.fetch(&locations.module_url, &options),
                source.fetch(&locations.model_url, &options),
            )?;
            let module_len = module_bytes.len();
            let module = compiler.compile(module_bytes).await?;
            info!(
                "assets: loaded module ({} bytes) and model ({} bytes)",
                module_len,
                model.len()
            );
            Ok(AcquiredAssets { module, model })
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(AssetError::TaskFailed(e.to_string())),
            }
        }
        .boxed()
        .shared()
    }
}
