//! Filter, format and pipeline validation.
//!
//! Parameter ranges come from the cascade itself: a throwaway [`CascadeFilter`]
//! is built for the configured bandwidth mode and its [`ParameterInfo`]
//! descriptors are checked against the configured values. Validation keeps
//! going after the first problem so a single pass reports everything.
//!
//! # Example
//!
//! ```rust
//! use resound_config::{FilterConfig, ValidationError, validate_filter};
//!
//! validate_filter(&FilterConfig::new("lowpass").with_cutoff(1000.0)).unwrap();
//!
//! let bad = FilterConfig::new("lowpass").with_order(5).with_gain(3.0);
//! assert!(matches!(validate_filter(&bad), Err(ValidationError::Multiple(_))));
//! ```

use resound_analysis::resample::MAX_STRETCH;
use resound_core::{
    BandwidthMode, CascadeFilter, FilterType, MAX_ORDER, MIN_ORDER, ParamDescriptor,
    ParameterInfo,
};
use thiserror::Error;

use crate::filter_config::FilterConfig;
use crate::format_config::FormatConfig;
use crate::pipeline::PipelineConfig;
use crate::resampler_config::ResamplerConfig;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown filter type.
    #[error("unknown filter type: {0}")]
    UnknownFilterType(String),

    /// Cascade order is odd or out of range.
    #[error("filter order must be an even number between 2 and 8, got {0}")]
    InvalidOrder(usize),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid audio format field.
    #[error("invalid format field '{field}': {reason}")]
    InvalidFormat {
        /// Name of the field.
        field: String,
        /// Description of the problem.
        reason: String,
    },

    /// Invalid resampler settings.
    #[error("invalid resampler: {0}")]
    InvalidResampler(String),

    /// Pipeline has no name.
    #[error("pipeline name must not be empty")]
    EmptyName,

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Parameter descriptors of a cascade in `mode`, in index order.
pub fn filter_params(mode: BandwidthMode) -> Vec<ParamDescriptor> {
    CascadeFilter::with_mode(FilterType::Lowpass, MIN_ORDER, mode).map_or_else(
        |_| Vec::new(),
        |filter| {
            (0..filter.param_count())
                .filter_map(|i| filter.param_info(i))
                .collect()
        },
    )
}

/// Check a value against a descriptor's range. Non-finite values fail.
fn check_range(desc: &ParamDescriptor, value: f32) -> ValidationResult<()> {
    if value.is_finite() && (desc.min..=desc.max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: desc.name.to_lowercase(),
            value,
            min: desc.min,
            max: desc.max,
        })
    }
}

/// Validate a filter configuration.
pub fn validate_filter(config: &FilterConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if FilterType::from_name(&config.filter_type).is_none() {
        errors.push(ValidationError::UnknownFilterType(
            config.filter_type.clone(),
        ));
    }
    if config.order % 2 != 0 || !(MIN_ORDER..=MAX_ORDER).contains(&config.order) {
        errors.push(ValidationError::InvalidOrder(config.order));
    }

    let params = filter_params(config.bandwidth_mode.into());
    let values = [config.cutoff, config.effective_bandwidth(), config.gain];
    for (desc, value) in params.iter().zip(values) {
        if let Err(e) = check_range(desc, value) {
            errors.push(e);
        }
    }

    finish(errors)
}

/// Validate a format configuration, including encoding support.
pub fn validate_format(config: &FormatConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let mut invalid = |field: &str, reason: &str| {
        errors.push(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        });
    };

    if config.sample_rate == 0 {
        invalid("sample_rate", "must be positive");
    }
    if config.channels == 0 {
        invalid("channels", "must be positive");
    }
    if config.bits_per_sample == 0 {
        invalid("bits_per_sample", "must be positive");
    }

    if errors.is_empty() {
        let supported = config
            .to_audio_format_unchecked()
            .and_then(|format| resound_io::check_format(&format));
        if let Err(e) = supported {
            errors.push(ValidationError::InvalidFormat {
                field: "encoding".to_string(),
                reason: e.to_string(),
            });
        }
    }

    finish(errors)
}

/// Validate resampler settings for input at `source_rate` Hz.
pub fn validate_resampler(config: &ResamplerConfig, source_rate: u32) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if config.quality == 0 {
        errors.push(ValidationError::InvalidResampler(
            "quality must be at least 1".to_string(),
        ));
    }
    if let Some(target) = config.target_rate {
        if target == 0 {
            errors.push(ValidationError::InvalidResampler(
                "target rate must be positive".to_string(),
            ));
        } else if source_rate > 0 && u64::from(target) > u64::from(source_rate) * MAX_STRETCH as u64
        {
            errors.push(ValidationError::InvalidResampler(format!(
                "{source_rate} Hz -> {target} Hz exceeds the {MAX_STRETCH}x stretch limit"
            )));
        }
    }

    finish(errors)
}

/// Validate a whole pipeline: name, format, every filter and the resampler.
pub fn validate_pipeline(config: &PipelineConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    collect(&mut errors, validate_format(&config.format));
    for filter in &config.filters {
        collect(&mut errors, validate_filter(filter));
    }
    if let Some(resampler) = &config.resampler {
        collect(
            &mut errors,
            validate_resampler(resampler, config.format.sample_rate),
        );
    }

    finish(errors)
}

fn collect(errors: &mut Vec<ValidationError>, result: ValidationResult<()>) {
    match result {
        Ok(()) => {}
        Err(ValidationError::Multiple(inner)) => errors.extend(inner),
        Err(e) => errors.push(e),
    }
}

fn finish(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_config::BandwidthUnit;
    use resound_analysis::ResamplerKind;
    use resound_io::Encoding;

    #[test]
    fn test_filter_params_follow_mode() {
        let octaves = filter_params(BandwidthMode::Octaves);
        assert_eq!(octaves.len(), 3);
        assert_eq!(octaves[0].name, "Cutoff");
        assert_eq!((octaves[1].min, octaves[1].max), (0.1, 3.0));

        let q = filter_params(BandwidthMode::Q);
        assert_eq!((q[1].min, q[1].max), (0.1, 10.0));
    }

    #[test]
    fn test_valid_filter() {
        for name in ["lowpass", "HIGHPASS", "bandpass", "notch", "peak", "allpass"] {
            assert!(validate_filter(&FilterConfig::new(name)).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_out_of_range_values() {
        let err = validate_filter(&FilterConfig::new("lowpass").with_cutoff(30000.0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                param: "cutoff".to_string(),
                value: 30000.0,
                min: 1.0,
                max: 22000.0,
            }
        );

        // 5.0 is a fine Q but too wide in octaves
        assert!(validate_filter(&FilterConfig::new("bandpass").with_q(5.0)).is_ok());
        assert!(validate_filter(&FilterConfig::new("bandpass").with_octaves(5.0)).is_err());

        assert!(validate_filter(&FilterConfig::new("peak").with_gain(f32::NAN)).is_err());
    }

    #[test]
    fn test_errors_accumulate() {
        let mut config = FilterConfig::new("comb").with_order(10).with_gain(-1.0);
        config.bandwidth_mode = BandwidthUnit::Q;
        let Err(ValidationError::Multiple(errors)) = validate_filter(&config) else {
            panic!("expected multiple errors");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], ValidationError::UnknownFilterType("comb".to_string()));
        assert_eq!(errors[1], ValidationError::InvalidOrder(10));
    }

    #[test]
    fn test_format_validation() {
        assert!(validate_format(&FormatConfig::default()).is_ok());

        let zero = FormatConfig {
            sample_rate: 0,
            channels: 0,
            ..FormatConfig::default()
        };
        assert!(matches!(validate_format(&zero), Err(ValidationError::Multiple(e)) if e.len() == 2));

        let float16 = FormatConfig {
            encoding: Encoding::PcmFloat,
            ..FormatConfig::default()
        };
        let err = validate_format(&float16).unwrap_err();
        assert!(err.to_string().contains("PCM_FLOAT with 16 bits"), "{err}");
    }

    #[test]
    fn test_resampler_validation() {
        let ok = ResamplerConfig::new(ResamplerKind::Cubic).with_target_rate(48000);
        assert!(validate_resampler(&ok, 44100).is_ok());

        let mut bad = ok.clone();
        bad.quality = 0;
        bad.target_rate = Some(44100 * 51);
        let Err(ValidationError::Multiple(errors)) = validate_resampler(&bad, 44100) else {
            panic!("expected multiple errors");
        };
        assert_eq!(errors.len(), 2);

        let zero = ok.with_target_rate(0);
        assert!(validate_resampler(&zero, 44100).is_err());
    }

    #[test]
    fn test_multiple_display() {
        let err = ValidationError::Multiple(vec![
            ValidationError::EmptyName,
            ValidationError::InvalidOrder(1),
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: pipeline name must not be empty; \
             filter order must be an even number between 2 and 8, got 1"
        );
    }
}
