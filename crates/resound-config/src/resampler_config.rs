//! Resampler configuration.

use serde::{Deserialize, Serialize};

use resound_analysis::{AudioResampler, ResamplerKind};

use crate::error::ConfigError;
use crate::validation::ValidationError;

/// Resampling stage of a pipeline.
///
/// # TOML Format
///
/// ```toml
/// [resampler]
/// method = "lanczos"
/// quality = 3
/// target_rate = 48000
/// ```
///
/// Without `target_rate` the stage keeps the input rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResamplerConfig {
    /// Interpolation method.
    #[serde(default)]
    pub method: ResamplerKind,

    /// Kernel quality; at least 1.
    #[serde(default = "default_quality")]
    pub quality: usize,

    /// Output sample rate in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_rate: Option<u32>,
}

fn default_quality() -> usize {
    AudioResampler::DEFAULT_QUALITY
}

impl Default for ResamplerConfig {
    fn default() -> Self {
        Self::new(ResamplerKind::default())
    }
}

impl ResamplerConfig {
    /// Resampler of `method` at the default quality.
    pub fn new(method: ResamplerKind) -> Self {
        Self {
            method,
            quality: default_quality(),
            target_rate: None,
        }
    }

    /// Set the kernel quality.
    pub fn with_quality(mut self, quality: usize) -> Self {
        self.quality = quality;
        self
    }

    /// Set the output sample rate.
    pub fn with_target_rate(mut self, rate: u32) -> Self {
        self.target_rate = Some(rate);
        self
    }

    /// Build the resampler.
    pub fn build(&self) -> Result<AudioResampler, ConfigError> {
        if self.quality == 0 {
            return Err(ValidationError::InvalidResampler(
                "quality must be at least 1".to_string(),
            )
            .into());
        }
        Ok(AudioResampler::new(self.method, self.quality)?)
    }

    /// Output frame count for `frames` input frames at `source_rate` Hz.
    ///
    /// Rounds to the nearest frame; `frames` itself when no target is set.
    pub fn output_frames(&self, frames: usize, source_rate: u32) -> usize {
        match self.target_rate {
            Some(target) if source_rate > 0 && target != source_rate => {
                let ratio = f64::from(target) / f64::from(source_rate);
                (frames as f64 * ratio).round() as usize
            }
            _ => frames,
        }
    }
}
