//! warmup - Warms the hush asset cache ahead of session start.
//!
//! Downloads the suppressor assets for the given (or default) base URL so
//! that later instance creation finds them cached.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hush_assets::{
    AssetConfig, AssetRegistry, DspModule, FetchOptions, HttpAssetSource, ModuleCompiler,
};

/// Warms the hush asset cache ahead of session start.
#[derive(Parser, Debug)]
#[command(name = "warmup")]
#[command(about = "Warms the hush asset cache ahead of session start")]
struct Args {
    /// Alternate asset base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Asset configuration JSON file (overrides the other flags)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Keeps the module bytes as-is; warming needs no real-time engine.
struct PassthroughCompiler;

#[async_trait]
impl ModuleCompiler for PassthroughCompiler {
    async fn compile(&self, binary: Bytes) -> hush_assets::Result<DspModule> {
        Ok(DspModule::new(binary))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config: AssetConfig = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?
        }
        None => AssetConfig {
            base_url: args.base_url.clone(),
            fetch: FetchOptions {
                timeout_secs: (args.timeout_secs > 0).then_some(args.timeout_secs),
            },
        },
    };

    let registry = AssetRegistry::new(
        Arc::new(HttpAssetSource::new()?),
        Arc::new(PassthroughCompiler),
    );

    info!("warming asset cache for {}", config.effective_base_url());
    let started = Instant::now();
    let assets = registry.acquire(&config).await?;

    let module_len = assets
        .module
        .downcast_ref::<Bytes>()
        .map(Bytes::len)
        .unwrap_or(0);
    println!(
        "warmed {} in {:.2}s (module: {} bytes, model: {} bytes)",
        config.effective_base_url(),
        started.elapsed().as_secs_f64(),
        module_len,
        assets.model.len(),
    );

    Ok(())
}
