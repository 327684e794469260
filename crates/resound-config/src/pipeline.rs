//! Pipeline configuration and its runtime.
//!
//! A [`PipelineConfig`] describes an input format, a chain of filter
//! cascades and an optional resampling stage. [`PipelineConfig::build`]
//! validates it and produces a [`Pipeline`] that converts interleaved bytes
//! to planar samples, filters every channel, resamples, and encodes back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use resound_analysis::AudioResampler;
use resound_core::{CascadeFilter, ChannelSplitFilter, samples};
use resound_io::{AudioFormat, from_samples, to_samples};

use crate::error::ConfigError;
use crate::filter_config::FilterConfig;
use crate::format_config::FormatConfig;
use crate::resampler_config::ResamplerConfig;
use crate::validation::{ValidationResult, validate_pipeline};

/// A named processing pipeline.
///
/// # TOML Format
///
/// ```toml
/// name = "Telephone Band"
/// description = "Band-limit and downsample to 8 kHz"
///
/// [format]
/// sample_rate = 44100
/// bits_per_sample = 16
/// channels = 2
/// encoding = "PCM_SIGNED"
///
/// [[filters]]
/// type = "highpass"
/// order = 4
/// cutoff = 300.0
///
/// [[filters]]
/// type = "lowpass"
/// order = 4
/// cutoff = 3400.0
///
/// [resampler]
/// method = "lanczos"
/// quality = 3
/// target_rate = 8000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Input byte format.
    #[serde(default)]
    pub format: FormatConfig,

    /// Filters, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterConfig>,

    /// Resampling stage, run after the filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resampler: Option<ResamplerConfig>,
}

impl PipelineConfig {
    /// Create an empty pipeline with the default format.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            format: FormatConfig::default(),
            filters: Vec::new(),
            resampler: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the input format.
    pub fn with_format(mut self, format: impl Into<FormatConfig>) -> Self {
        self.format = format.into();
        self
    }

    /// Append a filter.
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set the resampling stage.
    pub fn with_resampler(mut self, resampler: ResamplerConfig) -> Self {
        self.resampler = Some(resampler);
        self
    }

    /// Load a pipeline from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %config.name, "loaded pipeline");
        Ok(config)
    }

    /// Parse a pipeline from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the pipeline to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved pipeline");
        Ok(())
    }

    /// Serialize the pipeline to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of filters that are not bypassed.
    pub fn active_filters(&self) -> usize {
        self.filters.iter().filter(|f| !f.bypassed).count()
    }

    /// Validate every part of the pipeline.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_pipeline(self)
    }

    /// Validate and build the runtime pipeline.
    ///
    /// Bypassed filters are skipped. Each remaining filter is replicated
    /// per channel with settled coefficients.
    pub fn build(&self) -> Result<Pipeline, ConfigError> {
        self.validate()?;
        let format = self.format.to_audio_format()?;
        let channels = format.channels();
        let sample_rate = format.sample_rate() as f32;

        let mut filters = Vec::with_capacity(self.active_filters());
        for config in self.filters.iter().filter(|f| !f.bypassed) {
            let prototype = config.build(sample_rate)?;
            filters.push(ChannelSplitFilter::from_filters(vec![prototype; channels])?);
        }

        let (resampler, output_format) = match &self.resampler {
            Some(config) => {
                let rate = config.target_rate.unwrap_or(format.sample_rate());
                let output = AudioFormat::new(
                    rate,
                    format.bits_per_sample(),
                    format.channels() as u16,
                    format.encoding(),
                    format.byte_order(),
                )?;
                (Some((config.build()?, config.clone())), output)
            }
            None => (None, format),
        };

        tracing::info!(
            name = %self.name,
            filters = filters.len(),
            bypassed = self.filters.len() - filters.len(),
            input = %format,
            output = %output_format,
            "built pipeline"
        );

        Ok(Pipeline {
            name: self.name.clone(),
            format,
            output_format,
            filters,
            resampler,
        })
    }
}

/// Runtime pipeline built from a [`PipelineConfig`].
///
/// Filter history carries over between calls, so a stream can be fed in
/// chunks. Resampling treats each call as a complete buffer.
///
/// ```rust
/// use resound_config::{FilterConfig, PipelineConfig};
///
/// let mut pipeline = PipelineConfig::new("hum")
///     .with_filter(FilterConfig::new("notch").with_cutoff(60.0))
///     .build()?;
///
/// let silence = vec![0u8; 4 * 256];
/// assert_eq!(pipeline.process_bytes(&silence)?, silence);
/// # Ok::<(), resound_config::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    format: AudioFormat,
    output_format: AudioFormat,
    filters: Vec<ChannelSplitFilter<CascadeFilter>>,
    resampler: Option<(AudioResampler, ResamplerConfig)>,
}

impl Pipeline {
    /// Pipeline name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format of incoming bytes.
    pub fn format(&self) -> &AudioFormat {
        &self.format
    }

    /// Format of outgoing bytes; differs from the input only in sample rate.
    pub fn output_format(&self) -> &AudioFormat {
        &self.output_format
    }

    /// Active filter stages.
    pub fn filters(&self) -> &[ChannelSplitFilter<CascadeFilter>] {
        &self.filters
    }

    /// The resampler, if the pipeline has one.
    pub fn resampler(&self) -> Option<&AudioResampler> {
        self.resampler.as_ref().map(|(r, _)| r)
    }

    /// Clear the history of every filter.
    pub fn reset(&mut self) {
        for split in &mut self.filters {
            split.reset();
        }
    }

    /// Run planar samples through the filters and the resampler.
    ///
    /// `planar` must have one equal-length channel per format channel.
    pub fn process_planar<S: AsRef<[f32]>>(
        &mut self,
        planar: &[S],
    ) -> Result<Vec<Vec<f32>>, ConfigError> {
        let frames = samples::validate(planar)?;
        let channels = self.format.channels();
        if planar.len() != channels {
            return Err(resound_io::Error::ChannelCount {
                expected: channels,
                actual: planar.len(),
            }
            .into());
        }

        let mut buffer: Vec<Vec<f32>> = planar.iter().map(|c| c.as_ref().to_vec()).collect();
        if !self.filters.is_empty() {
            let mut scratch = vec![vec![0.0f32; frames]; channels];
            for split in &mut self.filters {
                split.process_planar(&buffer, &mut scratch)?;
                std::mem::swap(&mut buffer, &mut scratch);
            }
        }

        if let Some((resampler, config)) = &self.resampler {
            let new_len = config.output_frames(frames, self.format.sample_rate());
            if new_len == 0 {
                buffer = vec![Vec::new(); channels];
            } else if new_len != frames {
                buffer = resampler.resample(&buffer, new_len)?;
            }
        }

        tracing::trace!(
            pipeline = %self.name,
            frames_in = frames,
            frames_out = buffer.first().map_or(0, Vec::len),
            "processed block"
        );
        Ok(buffer)
    }

    /// Decode interleaved bytes, process them, and encode in the output format.
    ///
    /// A trailing partial frame is ignored.
    pub fn process_bytes(&mut self, data: &[u8]) -> Result<Vec<u8>, ConfigError> {
        let planar = to_samples(data, &self.format)?;
        let processed = self.process_planar(&planar)?;
        Ok(from_samples(&processed, &self.output_format)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resound_analysis::ResamplerKind;
    use resound_io::{ByteOrder, Encoding};

    fn sine(freq: f32, rate: f32, len: usize, amp: f32) -> Vec<f32> {
        (0..len)
            .map(|n| amp * (std::f32::consts::TAU * freq * n as f32 / rate).sin())
            .collect()
    }

    fn mono_float(rate: u32) -> AudioFormat {
        AudioFormat::new(rate, 32, 1, Encoding::PcmFloat, ByteOrder::LittleEndian).unwrap()
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::new("test")
            .with_description("desc")
            .with_filter(FilterConfig::new("lowpass"))
            .with_filter(FilterConfig::new("!peak"))
            .with_resampler(ResamplerConfig::default());
        assert_eq!(config.description.as_deref(), Some("desc"));
        assert_eq!(config.filters.len(), 2);
        assert_eq!(config.active_filters(), 1);

        let pipeline = config.build().unwrap();
        assert_eq!(pipeline.name(), "test");
        assert_eq!(pipeline.filters().len(), 1);
        assert_eq!(pipeline.filters()[0].channel_count(), 2);
        assert_eq!(pipeline.output_format(), pipeline.format());
        assert!(pipeline.resampler().is_some());
    }

    #[test]
    fn test_empty_pipeline_passes_bytes_through() {
        let mut pipeline = PipelineConfig::new("empty").build().unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(4 * 100 + 3).collect();
        let out = pipeline.process_bytes(&data).unwrap();
        assert_eq!(out, data[..400].to_vec());
    }

    #[test]
    fn test_lowpass_removes_high_tone() {
        let mut pipeline = PipelineConfig::new("lp")
            .with_format(mono_float(48000))
            .with_filter(FilterConfig::new("lowpass").with_order(4).with_cutoff(1000.0))
            .build()
            .unwrap();

        let input = [sine(10000.0, 48000.0, 4096, 0.5)];
        let output = pipeline.process_planar(&input).unwrap();
        let tail_peak = output[0][2048..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(tail_peak < 0.01, "tail peak {tail_peak}");

        pipeline.reset();
        let dc = pipeline.process_planar(&[vec![0.25f32; 4096]]).unwrap();
        assert!((dc[0][4095] - 0.25).abs() < 1e-3, "dc {}", dc[0][4095]);
    }

    #[test]
    fn test_resampling_changes_rate_and_length() {
        let mut pipeline = PipelineConfig::new("up")
            .with_format(AudioFormat::NORMAL_QUALITY)
            .with_resampler(ResamplerConfig::new(ResamplerKind::Cubic).with_target_rate(48000))
            .build()
            .unwrap();
        assert_eq!(pipeline.output_format().sample_rate(), 48000);
        assert_eq!(pipeline.output_format().channels(), 2);

        let data = vec![0u8; 441 * 4];
        let out = pipeline.process_bytes(&data).unwrap();
        assert_eq!(out.len(), 480 * 4);
    }

    #[test]
    fn test_shape_errors() {
        let mut pipeline = PipelineConfig::new("shape").build().unwrap();
        assert!(matches!(
            pipeline.process_planar(&[vec![0.0f32; 8]]),
            Err(ConfigError::Format(resound_io::Error::ChannelCount {
                expected: 2,
                actual: 1
            }))
        ));
        assert!(matches!(
            pipeline.process_planar(&[vec![0.0f32; 8], vec![0.0; 7]]),
            Err(ConfigError::Samples(_))
        ));
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config = PipelineConfig::new(" ")
            .with_filter(FilterConfig::new("lowpass").with_order(7));
        assert!(matches!(config.build(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::new("round trip")
            .with_format(AudioFormat::HIGH_QUALITY)
            .with_filter(FilterConfig::new("bandpass").with_octaves(1.0).with_cutoff(500.0))
            .with_filter(FilterConfig::new("!notch").with_cutoff(50.0))
            .with_resampler(ResamplerConfig::default().with_target_rate(44100));
        let text = config.to_toml().unwrap();
        assert!(text.contains("[[filters]]"));
        assert!(text.contains("[resampler]"));
        assert_eq!(PipelineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_minimal_toml() {
        let config = PipelineConfig::from_toml("name = \"bare\"").unwrap();
        assert_eq!(config.format, FormatConfig::default());
        assert!(config.filters.is_empty());
        assert!(config.resampler.is_none());
        assert!(config.validate().is_ok());
    }
}
