//! Sample format conversion for the resound DSP framework.
//!
//! This crate provides:
//!
//! - **Format descriptions**: [`AudioFormat`] with [`Encoding`] and [`ByteOrder`],
//!   plus quality presets
//! - **Byte decoding**: [`to_samples`] turns interleaved bytes into planar `f32`
//! - **Byte encoding**: [`from_samples`] quantizes planar `f32` back to bytes
//! - **G.711 companding**: μ-law and A-law helpers in [`g711`]
//!
//! ## Quick Start
//!
//! ```rust
//! use resound_io::{AudioFormat, from_samples, to_samples};
//!
//! let format = AudioFormat::NORMAL_QUALITY; // 44.1 kHz, 16-bit, stereo
//!
//! // One frame: left = -1.0, right = 32767/32768
//! let bytes = [0x00, 0x80, 0xFF, 0x7F];
//! let planar = to_samples(&bytes, &format)?;
//! assert_eq!(planar[0][0], -1.0);
//!
//! let encoded = from_samples(&planar, &format)?;
//! assert_eq!(encoded, bytes);
//! # Ok::<(), resound_io::Error>(())
//! ```

mod convert;
mod format;
pub mod g711;

pub use convert::{check_format, from_samples, from_samples_into, to_samples, to_samples_into};
pub use format::{AudioFormat, ByteOrder, Encoding};

/// Error types for sample conversion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Format fields are out of range.
    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),

    /// The encoding cannot be used with this sample width.
    #[error("Unsupported encoding: {encoding} with {bits} bits per sample")]
    UnsupportedEncoding {
        /// Requested encoding.
        encoding: Encoding,
        /// Requested bit depth.
        bits: u16,
    },

    /// Planar buffer channel count differs from the format.
    #[error("Channel count mismatch: format has {expected}, buffer has {actual}")]
    ChannelCount {
        /// Channels in the format.
        expected: usize,
        /// Channels in the buffer.
        actual: usize,
    },

    /// A planar channel has the wrong length.
    #[error("Channel {channel} has {len} samples, expected {expected}")]
    ChannelLength {
        /// Offending channel.
        channel: usize,
        /// Its length.
        len: usize,
        /// Required length.
        expected: usize,
    },

    /// Byte buffer length does not match the samples being encoded.
    #[error("Output buffer has {len} bytes, expected {expected}")]
    OutputLength {
        /// Buffer length.
        len: usize,
        /// Required length.
        expected: usize,
    },
}

/// Convenience result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
