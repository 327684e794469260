//! Per-channel filter replication.
//!
//! [`ChannelSplitFilter`] owns one independent filter per channel, each made
//! with [`AudioFilter::copy_filter`] from a prototype, so channels never share
//! history.
//!
//! ```rust
//! use resound_core::{AudioFilter, CascadeFilter, ChannelSplitFilter, FilterType};
//!
//! let mut proto = CascadeFilter::new(FilterType::Lowpass, 2).unwrap();
//! proto.set_cutoff(2000.0);
//!
//! let mut split = ChannelSplitFilter::new(&proto, 2).unwrap();
//! for f in split.filters_mut() {
//!     f.update(44100.0);
//! }
//!
//! let input = [vec![0.5f32; 64], vec![-0.5f32; 64]];
//! let mut output = [vec![0.0f32; 64], vec![0.0f32; 64]];
//! split.process_planar(&input, &mut output).unwrap();
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::filter::{AudioFilter, FilterError};
use crate::samples::{Dimensions, check_dimensions};

/// One independent filter instance per channel.
#[derive(Debug, Clone)]
pub struct ChannelSplitFilter<F: AudioFilter> {
    filters: Vec<F>,
}

impl<F: AudioFilter> ChannelSplitFilter<F> {
    /// Builds `channels` fresh copies of `prototype`.
    pub fn new(prototype: &F, channels: usize) -> Result<Self, FilterError> {
        let mut split = Self {
            filters: Vec::new(),
        };
        split.recreate(prototype, channels)?;
        Ok(split)
    }

    /// Wraps existing filters, one per channel.
    pub fn from_filters(filters: Vec<F>) -> Result<Self, FilterError> {
        if filters.is_empty() {
            return Err(FilterError::NoChannels);
        }
        Ok(Self { filters })
    }

    /// Replaces every filter with fresh copies of `prototype`.
    ///
    /// On error the existing filters are kept.
    pub fn recreate(&mut self, prototype: &F, channels: usize) -> Result<(), FilterError> {
        if channels == 0 {
            return Err(FilterError::NoChannels);
        }
        self.filters.clear();
        self.filters
            .extend((0..channels).map(|_| prototype.copy_filter()));

        #[cfg(feature = "tracing")]
        tracing::debug!("channel split: {channels} filters");

        Ok(())
    }

    fn check_channel(&self, channel: usize) -> Result<(), FilterError> {
        if channel < self.filters.len() {
            Ok(())
        } else {
            Err(FilterError::ChannelOutOfRange {
                channel,
                channels: self.filters.len(),
            })
        }
    }

    /// Processes one sample through channel `channel`'s filter.
    pub fn process_sample(&mut self, sample: f32, channel: usize) -> Result<f32, FilterError> {
        self.check_channel(channel)?;
        Ok(self.filters[channel].process(sample))
    }

    /// Processes a block through channel `channel`'s filter.
    pub fn process_channel(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        channel: usize,
    ) -> Result<(), FilterError> {
        self.check_channel(channel)?;
        if input.len() != output.len() {
            return Err(FilterError::DimensionMismatch(Dimensions::LengthMismatch {
                channel,
            }));
        }
        self.filters[channel].process_block(input, output);
        Ok(())
    }

    /// Processes a planar buffer, channel `i` through filter `i`.
    ///
    /// `input` and `output` must have identical dimensions, and no more
    /// channels than there are filters.
    pub fn process_planar<I, O>(&mut self, input: &[I], output: &mut [O]) -> Result<(), FilterError>
    where
        I: AsRef<[f32]>,
        O: AsRef<[f32]> + AsMut<[f32]>,
    {
        let dims = check_dimensions(input, &*output);
        if dims != Dimensions::Exact {
            return Err(FilterError::DimensionMismatch(dims));
        }
        if input.len() > self.filters.len() {
            return Err(FilterError::ChannelOutOfRange {
                channel: input.len() - 1,
                channels: self.filters.len(),
            });
        }
        for ((filter, inp), out) in self.filters.iter_mut().zip(input).zip(output.iter_mut()) {
            filter.process_block(inp.as_ref(), out.as_mut());
        }
        Ok(())
    }

    /// Clears the history of every filter.
    pub fn reset(&mut self) {
        for f in &mut self.filters {
            f.reset();
        }
    }

    /// Number of channels (filters).
    pub fn channel_count(&self) -> usize {
        self.filters.len()
    }

    /// Filter for `channel`, if in range.
    pub fn filter(&self, channel: usize) -> Option<&F> {
        self.filters.get(channel)
    }

    /// Mutable filter for `channel`, if in range.
    pub fn filter_mut(&mut self, channel: usize) -> Option<&mut F> {
        self.filters.get_mut(channel)
    }

    /// All filters in channel order.
    pub fn filters(&self) -> &[F] {
        &self.filters
    }

    /// All filters, mutably.
    pub fn filters_mut(&mut self) -> &mut [F] {
        &mut self.filters
    }
}
