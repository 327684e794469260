//! Mono filter trait and filter construction errors.
//!
//! [`AudioFilter`] is the seam between filter implementations (such as
//! [`CascadeFilter`](crate::CascadeFilter)) and wrappers that replicate a
//! filter per channel (such as [`ChannelSplitFilter`](crate::ChannelSplitFilter)).
//!
//! ## Design Decisions
//!
//! - **Mono processing**: one `f32` in, one `f32` out. Multichannel audio is
//!   handled by giving every channel its own instance.
//! - **Fresh copies**: [`copy_filter`](AudioFilter::copy_filter) duplicates
//!   configuration but never history, so copies can run on independent
//!   streams without inheriting each other's state.

/// A mono, stateful audio filter.
///
/// # Example
///
/// ```rust
/// use resound_core::AudioFilter;
///
/// #[derive(Clone)]
/// struct Gain(f32);
///
/// impl AudioFilter for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///
///     fn reset(&mut self) {}
///
///     fn copy_filter(&self) -> Self {
///         self.clone()
///     }
/// }
///
/// let mut g = Gain(0.5);
/// assert_eq!(g.process(1.0), 0.5);
/// ```
pub trait AudioFilter {
    /// Process a single sample, advancing internal state by one step.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Processes `min(input.len(), output.len())` samples.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input) {
            *out = self.process(x);
        }
    }

    /// Process a block of samples in place.
    fn process_in_place(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clear internal history without touching configuration.
    fn reset(&mut self);

    /// Independent copy with the same configuration and zeroed history.
    fn copy_filter(&self) -> Self
    where
        Self: Sized;
}

/// Errors raised when building or wiring filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Cascade order is odd or outside `2..=8`.
    InvalidOrder(usize),
    /// A per-channel wrapper needs at least one channel.
    NoChannels,
    /// Channel index out of range for a per-channel wrapper.
    ChannelOutOfRange {
        /// Requested channel.
        channel: usize,
        /// Channels available.
        channels: usize,
    },
    /// Planar input/output dimensions do not match the wrapper.
    DimensionMismatch(crate::samples::Dimensions),
}

impl core::fmt::Display for FilterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidOrder(order) => {
                write!(f, "filter order must be an even number between 2 and 8, got {order}")
            }
            Self::NoChannels => write!(f, "number of channels must be at least 1"),
            Self::ChannelOutOfRange { channel, channels } => {
                write!(f, "channel {channel} out of range for {channels} channels")
            }
            Self::DimensionMismatch(d) => {
                write!(f, "input and output dimensions do not match: {d:?}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FilterError {}
