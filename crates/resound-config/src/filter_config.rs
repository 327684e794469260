//! Filter configuration types.

use serde::{Deserialize, Serialize};

use resound_core::{BandwidthMode, CascadeFilter, FilterType};

use crate::error::ConfigError;
use crate::validation::{ValidationError, validate_filter};

/// How a configured bandwidth value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandwidthUnit {
    /// Bandwidth in octaves.
    #[default]
    Octaves,
    /// Bandwidth as a quality factor.
    Q,
}

impl From<BandwidthUnit> for BandwidthMode {
    fn from(unit: BandwidthUnit) -> Self {
        match unit {
            BandwidthUnit::Octaves => BandwidthMode::Octaves,
            BandwidthUnit::Q => BandwidthMode::Q,
        }
    }
}

/// Configuration for one filter cascade in a pipeline.
///
/// A filter is bypassed by prefixing its type with `!` (e.g. `!notch`),
/// in code and in files alike, or with `bypassed = true`.
///
/// # TOML Format
///
/// ```toml
/// [[filters]]
/// type = "lowpass"
/// order = 4
/// cutoff = 8000.0
/// bandwidth = 0.707
/// bandwidth_mode = "q"
/// ```
///
/// ```rust
/// use resound_config::FilterConfig;
///
/// let config = FilterConfig::new("peak").with_cutoff(1000.0).with_gain(1.5);
/// let filter = config.build(48000.0)?;
/// assert_eq!(filter.order(), 2);
/// assert_eq!(filter.gain(), 1.5);
/// # Ok::<(), resound_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawFilterConfig")]
pub struct FilterConfig {
    /// Filter type name (`lowpass`, `highpass`, `bandpass`, `notch`, `peak`, `allpass`).
    #[serde(rename = "type")]
    pub filter_type: String,

    /// Whether the filter is bypassed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub bypassed: bool,

    /// Cascade order: even, 2 to 8.
    #[serde(default = "default_order")]
    pub order: usize,

    /// Cutoff or centre frequency in Hz.
    #[serde(default = "default_cutoff")]
    pub cutoff: f32,

    /// Bandwidth; the mode's default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f32>,

    /// Linear gain, 0 to 2.
    #[serde(default = "default_gain")]
    pub gain: f32,

    /// Unit of [`bandwidth`](Self::bandwidth).
    #[serde(default)]
    pub bandwidth_mode: BandwidthUnit,
}

/// On-disk shape of [`FilterConfig`], before the `!` prefix is applied.
#[derive(Deserialize)]
struct RawFilterConfig {
    #[serde(rename = "type")]
    filter_type: String,
    #[serde(default)]
    bypassed: bool,
    #[serde(default = "default_order")]
    order: usize,
    #[serde(default = "default_cutoff")]
    cutoff: f32,
    #[serde(default)]
    bandwidth: Option<f32>,
    #[serde(default = "default_gain")]
    gain: f32,
    #[serde(default)]
    bandwidth_mode: BandwidthUnit,
}

impl From<RawFilterConfig> for FilterConfig {
    fn from(raw: RawFilterConfig) -> Self {
        let named = Self::new(raw.filter_type);
        Self {
            bypassed: named.bypassed || raw.bypassed,
            order: raw.order,
            cutoff: raw.cutoff,
            bandwidth: raw.bandwidth,
            gain: raw.gain,
            bandwidth_mode: raw.bandwidth_mode,
            ..named
        }
    }
}

fn default_order() -> usize {
    resound_core::MIN_ORDER
}

fn default_cutoff() -> f32 {
    4000.0
}

fn default_gain() -> f32 {
    1.0
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl FilterConfig {
    /// Create a filter configuration with default parameters.
    ///
    /// If the type starts with `!`, the filter is marked as bypassed.
    pub fn new(filter_type: impl Into<String>) -> Self {
        let type_str = filter_type.into();
        let (filter_type, bypassed) = match type_str.strip_prefix('!') {
            Some(stripped) => (stripped.to_string(), true),
            None => (type_str, false),
        };

        Self {
            filter_type,
            bypassed,
            order: default_order(),
            cutoff: default_cutoff(),
            bandwidth: None,
            gain: default_gain(),
            bandwidth_mode: BandwidthUnit::default(),
        }
    }

    /// Set the cascade order.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Set the cutoff frequency in Hz.
    pub fn with_cutoff(mut self, cutoff: f32) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the bandwidth in octaves.
    pub fn with_octaves(mut self, octaves: f32) -> Self {
        self.bandwidth = Some(octaves);
        self.bandwidth_mode = BandwidthUnit::Octaves;
        self
    }

    /// Set the bandwidth as a quality factor.
    pub fn with_q(mut self, q: f32) -> Self {
        self.bandwidth = Some(q);
        self.bandwidth_mode = BandwidthUnit::Q;
        self
    }

    /// Set the linear gain.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Set whether the filter is bypassed.
    pub fn with_bypass(mut self, bypassed: bool) -> Self {
        self.bypassed = bypassed;
        self
    }

    /// Parsed filter type.
    pub fn parsed_type(&self) -> Result<FilterType, ValidationError> {
        FilterType::from_name(&self.filter_type)
            .ok_or_else(|| ValidationError::UnknownFilterType(self.filter_type.clone()))
    }

    /// Bandwidth value, falling back to the mode's default.
    pub fn effective_bandwidth(&self) -> f32 {
        self.bandwidth.unwrap_or_else(|| {
            BandwidthMode::from(self.bandwidth_mode)
                .descriptor()
                .default
        })
    }

    /// Build a cascade at `sample_rate` with coefficients already settled.
    ///
    /// The configuration is validated first; out-of-range values are errors
    /// rather than being clamped.
    pub fn build(&self, sample_rate: f32) -> Result<CascadeFilter, ConfigError> {
        validate_filter(self)?;
        let filter_type = self.parsed_type()?;

        let mut filter =
            CascadeFilter::with_mode(filter_type, self.order, self.bandwidth_mode.into())?;
        filter.update_with(self.cutoff, self.effective_bandwidth(), self.gain, sample_rate);
        filter.snap_to_target();

        let nyquist = sample_rate / 2.0;
        if self.cutoff >= nyquist {
            tracing::warn!(
                filter = %self.filter_type,
                cutoff = self.cutoff,
                sample_rate,
                "cutoff at or above Nyquist; biquad design falls back to sample_rate / 4"
            );
        }
        tracing::debug!(
            filter = %self.filter_type,
            order = self.order,
            cutoff = self.cutoff,
            q = filter.q(),
            gain = self.gain,
            "built filter"
        );
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_filter_config() {
        let config = FilterConfig::new("lowpass");
        assert_eq!(config.filter_type, "lowpass");
        assert!(!config.bypassed);
        assert_eq!(config.order, 2);
        assert_eq!(config.cutoff, 4000.0);
        assert_eq!(config.gain, 1.0);
        assert_eq!(config.bandwidth, None);
    }

    #[test]
    fn test_bypass_prefix() {
        let config = FilterConfig::new("!notch");
        assert_eq!(config.filter_type, "notch");
        assert!(config.bypassed);
    }

    #[test]
    fn test_effective_bandwidth_defaults() {
        assert_eq!(FilterConfig::new("bandpass").effective_bandwidth(), 1.92);
        let mut q_mode = FilterConfig::new("bandpass");
        q_mode.bandwidth_mode = BandwidthUnit::Q;
        assert_eq!(q_mode.effective_bandwidth(), 0.707);
        assert_eq!(
            FilterConfig::new("bandpass").with_q(2.0).effective_bandwidth(),
            2.0
        );
    }

    #[test]
    fn test_build_applies_parameters() {
        let filter = FilterConfig::new("Highpass")
            .with_order(6)
            .with_cutoff(250.0)
            .with_q(0.5)
            .build(44100.0)
            .unwrap();
        assert_eq!(filter.filter_type(), FilterType::Highpass);
        assert_eq!(filter.order(), 6);
        assert_eq!(filter.stages().len(), 3);
        assert_eq!(filter.cutoff(), 250.0);
        assert_eq!(filter.q(), 0.5);
        assert_eq!(filter.bandwidth_mode(), BandwidthMode::Q);
        // Settled coefficients, not fading in from zero
        for stage in filter.stages() {
            assert_eq!(stage.current(), stage.target());
        }
    }

    #[test]
    fn test_build_rejects_invalid() {
        assert!(matches!(
            FilterConfig::new("shelf").build(48000.0),
            Err(ConfigError::Validation(ValidationError::UnknownFilterType(_)))
        ));
        assert!(matches!(
            FilterConfig::new("lowpass").with_order(3).build(48000.0),
            Err(ConfigError::Validation(ValidationError::InvalidOrder(3)))
        ));
        assert!(matches!(
            FilterConfig::new("peak").with_gain(5.0).build(48000.0),
            Err(ConfigError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_toml_defaults() {
        let config: FilterConfig = toml::from_str("type = \"notch\"\ncutoff = 60.0\n").unwrap();
        assert_eq!(config.filter_type, "notch");
        assert_eq!(config.cutoff, 60.0);
        assert_eq!(config.order, 2);
        assert_eq!(config.bandwidth_mode, BandwidthUnit::Octaves);

        let text = toml::to_string(&FilterConfig::new("allpass").with_q(1.0)).unwrap();
        assert!(text.contains("type = \"allpass\""));
        assert!(text.contains("bandwidth_mode = \"q\""));
        assert!(!text.contains("bypassed"));
    }

    #[test]
    fn test_toml_bypass_prefix() {
        let config: FilterConfig = toml::from_str("type = \"!notch\"\ncutoff = 60.0\n").unwrap();
        assert_eq!(config.filter_type, "notch");
        assert!(config.bypassed);
        assert_eq!(config.cutoff, 60.0);
        assert_eq!(config.build(48000.0).unwrap().filter_type(), FilterType::Notch);

        let explicit: FilterConfig = toml::from_str("type = \"peak\"\nbypassed = true\n").unwrap();
        assert!(explicit.bypassed);
        assert_eq!(explicit.filter_type, "peak");

        // Written back without the prefix, bypass as its own key
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("type = \"notch\""));
        assert!(text.contains("bypassed = true"));
        let reread: FilterConfig = toml::from_str(&text).unwrap();
        assert_eq!(reread, config);
    }
}
