//! Resound Core - filter primitives and planar sample utilities
//!
//! This crate provides the filtering building blocks of resound: smoothed
//! biquad sections, higher-order cascades built from them, per-channel
//! replication, and the range-bounded controls that parameterize them.
//!
//! # Core Abstractions
//!
//! ## Filters
//!
//! - [`BiquadStage`] - Second-order IIR section with RBJ cookbook coefficients
//!   and per-sample coefficient smoothing
//! - [`CascadeFilter`] - Even-order (2 to 8) series chain of biquad stages
//! - [`ChannelSplitFilter`] - One independent filter copy per channel
//! - [`AudioFilter`] - Mono filter trait shared by the above
//!
//! ## Controls
//!
//! - [`FloatControl`] - Named value clamped into a fixed range
//! - [`ParameterInfo`] - Index-based parameter introspection
//!
//! ## Planar Buffers
//!
//! - [`samples`] - Shape validation plus polarity, reverse, normalize, stereo
//!   separation and gain/pan utilities
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature in
//! your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! resound-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to get `debug!`/`trace!` events for filter
//! construction and coefficient updates.
//!
//! # Example
//!
//! ```rust
//! use resound_core::{AudioFilter, CascadeFilter, FilterType};
//!
//! let mut lp = CascadeFilter::new(FilterType::Lowpass, 4).unwrap();
//! lp.update_with(1200.0, 1.92, 1.0, 44100.0);
//!
//! let mut block = [0.25f32; 256];
//! lp.process_in_place(&mut block);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Click-free**: Coefficient changes are always smoothed in
//! - **Forgiving design**: Out-of-range filter parameters are coerced, not rejected

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod cascade;
pub mod channel_split;
pub mod filter;
pub mod param;
pub mod samples;

// Re-export main types at crate root
pub use biquad::{
    BUTTERWORTH_Q, BiquadStage, Coefficients, FilterType, SMOOTH_FACTOR, allpass_coefficients,
    bandpass_coefficients, highpass_coefficients, lowpass_coefficients, notch_coefficients,
    peak_coefficients,
};
pub use cascade::{BandwidthMode, CascadeFilter, MAX_ORDER, MIN_ORDER, octaves_to_q};
pub use channel_split::ChannelSplitFilter;
pub use filter::{AudioFilter, FilterError};
pub use param::{FloatControl, ParamDescriptor, ParamUnit, ParameterInfo};
pub use samples::{Dimensions, SamplesError};
