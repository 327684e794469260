//! TOML configuration for resound processing pipelines.
//!
//! This crate ties the resound crates together: a pipeline file names an
//! input format, a chain of filter cascades and an optional resampling stage,
//! and builds into a [`Pipeline`] that processes interleaved bytes.
//!
//! # Features
//!
//! - **Pipelines**: Load, save and build [`PipelineConfig`] files
//! - **Filters**: [`FilterConfig`] for every cascade type, with `!` bypass
//! - **Formats**: [`FormatConfig`] checked against the converter's supported widths
//! - **Validation**: Range checks driven by the filters' parameter descriptors
//!
//! # Example
//!
//! ```rust
//! use resound_config::{FilterConfig, PipelineConfig, ResamplerConfig};
//! use resound_analysis::ResamplerKind;
//!
//! let config = PipelineConfig::new("Voice Cleanup")
//!     .with_description("Rumble and hiss removal")
//!     .with_filter(FilterConfig::new("highpass").with_order(4).with_cutoff(80.0))
//!     .with_filter(FilterConfig::new("lowpass").with_order(4).with_cutoff(9000.0))
//!     .with_resampler(ResamplerConfig::new(ResamplerKind::Lanczos).with_target_rate(22050));
//!
//! let text = config.to_toml()?;
//! let mut pipeline = PipelineConfig::from_toml(&text)?.build()?;
//!
//! let out = pipeline.process_bytes(&vec![0u8; 4 * 882])?;
//! assert_eq!(out.len(), 4 * 441);
//! # Ok::<(), resound_config::ConfigError>(())
//! ```

mod error;
mod filter_config;
mod format_config;
mod pipeline;
mod resampler_config;

/// Filter, format and pipeline validation.
pub mod validation;

pub use error::ConfigError;
pub use filter_config::{BandwidthUnit, FilterConfig};
pub use format_config::FormatConfig;
pub use pipeline::{Pipeline, PipelineConfig};
pub use resampler_config::ResamplerConfig;
pub use validation::{
    ValidationError, ValidationResult, filter_params, validate_filter, validate_format,
    validate_pipeline, validate_resampler,
};
