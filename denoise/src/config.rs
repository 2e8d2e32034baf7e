//! Denoiser configuration.

use serde::{Deserialize, Serialize};

use hush_assets::AssetConfig;

/// Maximum suppression intensity.
pub const MAX_SUPPRESSION_INTENSITY: u8 = 100;

/// Configuration bound to a noise suppressor instance.
///
/// Immutable once an instance is created from it. The effective base URL of
/// `assets` decides which cache entry serves the instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenoiserConfig {
    /// Sample rate of the audio stream fed to the suppressor, in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Initial suppression intensity, 0 (off) to 100 (maximum). Values above
    /// 100 are clamped when the instance is bound to a context.
    #[serde(default = "default_suppression_intensity")]
    pub suppression_intensity: u8,

    /// Asset download overrides.
    #[serde(default)]
    pub assets: AssetConfig,
}

impl Default for DenoiserConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            suppression_intensity: default_suppression_intensity(),
            assets: AssetConfig::default(),
        }
    }
}

fn default_sample_rate() -> u32 {
    48_000
}

fn default_suppression_intensity() -> u8 {
    MAX_SUPPRESSION_INTENSITY
}
