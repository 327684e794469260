//! Resound Analysis - spectral tools and resampling
//!
//! This crate provides the analysis-side building blocks of resound:
//!
//! - [`fft`] - In-place radix-2 FFT and inverse FFT
//! - [`spectrum`] - Real-signal spectrum as frequency/amplitude/phase bins
//! - [`window`] - Window functions with amplitude compensation factors
//! - [`resample`] - Length retargeting with Lanczos, cubic, linear and
//!   nearest-neighbour kernels, a phase-vocoder time stretch and decimation
//!
//! ## Spectrum of a windowed sine
//!
//! ```rust
//! use resound_analysis::{WindowType, spectrum};
//!
//! let sr = 8000.0_f32;
//! let signal: Vec<f32> = (0..1024)
//!     .map(|i| (std::f32::consts::TAU * 1000.0 * i as f32 / sr).sin())
//!     .collect();
//!
//! let windowed = WindowType::Hann.applied(&signal);
//! let bins = spectrum::spectrum(&windowed, sr);
//! let peak = spectrum::peak_frequency(&bins).unwrap();
//! assert!((peak - 1000.0).abs() < sr / 1024.0);
//! ```
//!
//! ## Resampling
//!
//! ```rust
//! use resound_analysis::{AudioResampler, ResamplerKind};
//!
//! let resampler = AudioResampler::new(ResamplerKind::Lanczos, 3)?;
//! let planar = vec![vec![0.0f32; 441], vec![0.0f32; 441]];
//! let out = resampler.resample(&planar, 480)?;
//! assert_eq!(out[1].len(), 480);
//! # Ok::<(), resound_analysis::Error>(())
//! ```

pub mod fft;
pub mod resample;
pub mod spectrum;
pub mod window;

pub use fft::{fft, ifft};
pub use resample::{
    AudioResampler, CubicResampler, LanczosResampler, LinearResampler, NearestResampler,
    PhaseVocoderResampler, ResampleMethod, ResamplerKind, decimate,
};
pub use spectrum::FftBin;
pub use window::WindowType;

/// Error types for resampling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Kernel half-width below one.
    #[error("Invalid resampling quality: {0} (must be at least 1)")]
    InvalidQuality(usize),

    /// Target length or speed cannot produce a usable output.
    #[error("Invalid target length: {0}")]
    InvalidLength(String),

    /// Input and output buffers have different channel counts.
    #[error("Channel mismatch: input has {input}, output has {output}")]
    ChannelMismatch {
        /// Input channels.
        input: usize,
        /// Output channels.
        output: usize,
    },

    /// Planar buffer is empty or ragged.
    #[error(transparent)]
    Samples(#[from] resound_core::SamplesError),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;
