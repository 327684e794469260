//! Planar sample buffers: validation and whole-buffer utilities.
//!
//! A planar buffer holds one sequence per channel, all of the same length.
//! Functions here are generic over the channel container, so `Vec<f32>`,
//! `&mut [f32]` and arrays all work:
//!
//! ```rust
//! use resound_core::samples::{normalize, peak};
//!
//! let mut left = vec![0.25f32, -0.5];
//! let mut right = vec![0.1f32, 0.0];
//! normalize(&mut [left.as_mut_slice(), right.as_mut_slice()]);
//! assert_eq!(left, vec![0.5, -1.0]);
//! assert_eq!(peak(&[&left, &right]), 1.0);
//! ```
//!
//! All utilities operate in place and never allocate.

use core::f32::consts::FRAC_PI_4;
use libm::{cosf, sinf};

/// Squared pan/gain deviations at or below this are treated as neutral.
const NEUTRAL_EPSILON: f32 = 1e-6;

/// Peaks below this are left alone by [`normalize`].
const NORMALIZE_FLOOR: f32 = 1e-6;

/// Result of comparing the shapes of two planar buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensions {
    /// Same channel count and same length in every channel.
    Exact,
    /// Channel counts differ.
    ChannelMismatch {
        /// Channels in the first buffer.
        left: usize,
        /// Channels in the second buffer.
        right: usize,
    },
    /// Some channel has a different length in each buffer.
    LengthMismatch {
        /// First mismatching channel.
        channel: usize,
    },
}

/// Malformed planar buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplesError {
    /// The buffer has no channels.
    NoChannels,
    /// A channel's length differs from channel 0.
    RaggedChannel {
        /// Offending channel.
        channel: usize,
        /// Its length.
        len: usize,
        /// Length of channel 0.
        expected: usize,
    },
    /// The operation needs a specific channel count.
    ChannelCount {
        /// Required channels.
        expected: usize,
        /// Channels supplied.
        actual: usize,
    },
}

impl core::fmt::Display for SamplesError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoChannels => write!(f, "samples must contain at least one channel"),
            Self::RaggedChannel {
                channel,
                len,
                expected,
            } => write!(
                f,
                "channel {channel} has {len} samples, expected {expected}"
            ),
            Self::ChannelCount { expected, actual } => {
                write!(f, "expected {expected} channels, got {actual}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SamplesError {}

/// Samples per channel, taken from channel 0 (0 when there are no channels).
pub fn frame_count<S: AsRef<[f32]>>(channels: &[S]) -> usize {
    channels.first().map_or(0, |c| c.as_ref().len())
}

/// Compares the shapes of two planar buffers.
pub fn check_dimensions<A, B>(a: &[A], b: &[B]) -> Dimensions
where
    A: AsRef<[f32]>,
    B: AsRef<[f32]>,
{
    if a.len() != b.len() {
        return Dimensions::ChannelMismatch {
            left: a.len(),
            right: b.len(),
        };
    }
    a.iter()
        .zip(b)
        .position(|(x, y)| x.as_ref().len() != y.as_ref().len())
        .map_or(Dimensions::Exact, |channel| Dimensions::LengthMismatch {
            channel,
        })
}

/// Checks that the buffer has channels of identical length.
///
/// Returns the frame count. Zero-length channels are allowed.
pub fn validate<S: AsRef<[f32]>>(channels: &[S]) -> Result<usize, SamplesError> {
    let expected = frame_count(channels);
    if channels.is_empty() {
        return Err(SamplesError::NoChannels);
    }
    for (channel, c) in channels.iter().enumerate() {
        let len = c.as_ref().len();
        if len != expected {
            return Err(SamplesError::RaggedChannel {
                channel,
                len,
                expected,
            });
        }
    }
    Ok(expected)
}

/// Negates every sample.
pub fn reverse_polarity<S: AsMut<[f32]>>(channels: &mut [S]) {
    for channel in channels.iter_mut() {
        for s in channel.as_mut() {
            *s = -*s;
        }
    }
}

/// Reverses every channel in time.
pub fn reverse<S: AsMut<[f32]>>(channels: &mut [S]) {
    for channel in channels.iter_mut() {
        channel.as_mut().reverse();
    }
}

/// Reverses the channel order (left/right swap for stereo).
pub fn swap_channels<S>(channels: &mut [S]) {
    channels.reverse();
}

/// Largest absolute sample value across all channels.
pub fn peak<S: AsRef<[f32]>>(channels: &[S]) -> f32 {
    channels
        .iter()
        .flat_map(|c| c.as_ref().iter())
        .fold(0.0f32, |m, s| m.max(s.abs()))
}

/// Mean absolute sample value across all channels (0 for an empty buffer).
pub fn mean_abs<S: AsRef<[f32]>>(channels: &[S]) -> f32 {
    let (sum, count) = channels
        .iter()
        .flat_map(|c| c.as_ref().iter())
        .fold((0.0f32, 0usize), |(sum, n), s| (sum + s.abs(), n + 1));
    if count == 0 { 0.0 } else { sum / count as f32 }
}

/// Scales all channels by one factor so the peak becomes 1.0.
///
/// Buffers whose peak is below `1e-6` are left untouched. Returns the
/// peak measured before scaling.
pub fn normalize<S>(channels: &mut [S]) -> f32
where
    S: AsRef<[f32]> + AsMut<[f32]>,
{
    let max = peak(channels);
    if max < NORMALIZE_FLOOR {
        return max;
    }
    for channel in channels.iter_mut() {
        for s in channel.as_mut() {
            *s /= max;
        }
    }
    max
}

/// Widens or narrows a stereo image.
///
/// `separation` is clamped to `[-1, 1]`: -1 collapses to mono, 1 leaves the
/// image unchanged. The side signal is scaled by `(separation + 1) / 2`.
pub fn stereo_separation<S>(channels: &mut [S], separation: f32) -> Result<(), SamplesError>
where
    S: AsRef<[f32]> + AsMut<[f32]>,
{
    if channels.len() != 2 {
        return Err(SamplesError::ChannelCount {
            expected: 2,
            actual: channels.len(),
        });
    }
    validate(channels)?;

    let amount = (separation.clamp(-1.0, 1.0) + 1.0) / 2.0;
    let (l, r) = channels.split_at_mut(1);
    for (left, right) in l[0].as_mut().iter_mut().zip(r[0].as_mut().iter_mut()) {
        let mid = (*left + *right) / 2.0;
        let side = (*left - *right) / 2.0;
        *left = mid + side * amount;
        *right = mid - side * amount;
    }
    Ok(())
}

/// Applies gain to every channel and a constant-power pan to channels 0 and 1.
///
/// `pan` is in `[-1, 1]` (left to right). With a non-neutral pan, channel 0 is
/// scaled by `gain * cos(θ)` and channel 1 by `gain * sin(θ)`, where
/// `θ = (pan + 1) π / 4`. Other channels get plain `gain`.
pub fn apply_gain_pan<S: AsMut<[f32]>>(channels: &mut [S], gain: f32, pan: f32) {
    let pan_active = pan * pan > NEUTRAL_EPSILON;
    let unity_gain = (gain - 1.0) * (gain - 1.0) <= NEUTRAL_EPSILON;
    if !pan_active && unity_gain {
        return;
    }

    let (left, right) = if pan_active {
        let angle = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
        (cosf(angle), sinf(angle))
    } else {
        (1.0, 1.0)
    };

    for (ch, channel) in channels.iter_mut().enumerate() {
        let volume = match ch {
            0 => gain * left,
            1 => gain * right,
            _ => gain,
        };
        for s in channel.as_mut() {
            *s *= volume;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let ok = [vec![0.0f32; 4], vec![0.0f32; 4]];
        assert_eq!(validate(&ok), Ok(4));

        let none: [Vec<f32>; 0] = [];
        assert_eq!(validate(&none), Err(SamplesError::NoChannels));

        let ragged = [vec![0.0f32; 4], vec![0.0f32; 3]];
        assert_eq!(
            validate(&ragged),
            Err(SamplesError::RaggedChannel {
                channel: 1,
                len: 3,
                expected: 4
            })
        );
    }

    #[test]
    fn test_check_dimensions() {
        let a = [vec![0.0f32; 4], vec![0.0f32; 4]];
        let b = [vec![1.0f32; 4], vec![1.0f32; 4]];
        assert_eq!(check_dimensions(&a, &b), Dimensions::Exact);

        let c = [vec![0.0f32; 4]];
        assert_eq!(
            check_dimensions(&a, &c),
            Dimensions::ChannelMismatch { left: 2, right: 1 }
        );

        let d = [vec![0.0f32; 4], vec![0.0f32; 5]];
        assert_eq!(
            check_dimensions(&a, &d),
            Dimensions::LengthMismatch { channel: 1 }
        );
    }

    #[test]
    fn test_polarity_and_reverse() {
        let mut ch = [vec![1.0f32, -2.0, 3.0]];
        reverse_polarity(&mut ch);
        assert_eq!(ch[0], vec![-1.0f32, 2.0, -3.0]);
        reverse(&mut ch);
        assert_eq!(ch[0], vec![-3.0f32, 2.0, -1.0]);
    }

    #[test]
    fn test_swap_channels() {
        let mut ch = [vec![1.0f32], vec![2.0f32], vec![3.0f32]];
        swap_channels(&mut ch);
        assert_eq!(ch, [vec![3.0f32], vec![2.0f32], vec![1.0f32]]);
    }

    #[test]
    fn test_peak_and_mean() {
        let ch = [vec![0.5f32, -1.0], vec![0.25f32, 0.25]];
        assert_eq!(peak(&ch), 1.0);
        assert_eq!(mean_abs(&ch), 0.5);
        let empty: [Vec<f32>; 0] = [];
        assert_eq!(mean_abs(&empty), 0.0);
    }

    #[test]
    fn test_normalize_uses_global_peak() {
        let mut ch = [vec![0.5f32, -0.25], vec![0.1f32, 0.0]];
        let before = normalize(&mut ch);
        assert_eq!(before, 0.5);
        assert_eq!(ch[0], vec![1.0f32, -0.5]);
        assert!((ch[1][0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_leaves_silence() {
        let mut ch = [vec![1e-8f32, -1e-8]];
        normalize(&mut ch);
        assert_eq!(ch[0], vec![1e-8f32, -1e-8]);
    }

    #[test]
    fn test_stereo_separation() {
        let mut ch = [vec![1.0f32, 0.0], vec![0.0f32, 1.0]];
        stereo_separation(&mut ch, -1.0).unwrap();
        assert_eq!(ch, [vec![0.5f32, 0.5], vec![0.5f32, 0.5]]);

        let mut ch = [vec![1.0f32, 0.2], vec![-0.4f32, 0.6]];
        let original = ch.clone();
        stereo_separation(&mut ch, 1.0).unwrap();
        for (a, b) in ch.iter().flatten().zip(original.iter().flatten()) {
            assert!((a - b).abs() < 1e-6);
        }

        let mut mono = [vec![1.0f32]];
        assert_eq!(
            stereo_separation(&mut mono, 0.0),
            Err(SamplesError::ChannelCount {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_gain_pan_neutral_is_noop() {
        let mut ch = [vec![0.5f32], vec![0.5f32]];
        apply_gain_pan(&mut ch, 1.0, 0.0);
        assert_eq!(ch, [vec![0.5f32], vec![0.5f32]]);
    }

    #[test]
    fn test_gain_pan_hard_left() {
        let mut ch = [vec![1.0f32], vec![1.0f32], vec![1.0f32]];
        apply_gain_pan(&mut ch, 0.5, -1.0);
        assert!((ch[0][0] - 0.5).abs() < 1e-6);
        assert!(ch[1][0].abs() < 1e-6);
        assert_eq!(ch[2][0], 0.5);
    }

    #[test]
    fn test_gain_pan_constant_power() {
        let mut ch = [vec![1.0f32], vec![1.0f32]];
        apply_gain_pan(&mut ch, 1.0, 0.3);
        let power = ch[0][0] * ch[0][0] + ch[1][0] * ch[1][0];
        assert!((power - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_gain_without_pan() {
        let mut ch = [vec![1.0f32], vec![-1.0f32]];
        apply_gain_pan(&mut ch, 0.0, 0.0);
        assert_eq!(ch, [vec![0.0f32], vec![-0.0f32]]);
    }
}
