//! Length retargeting by interpolation.
//!
//! A [`ResampleMethod`] maps an input slice onto an output slice of any
//! length. Output sample `i` reads the input at fractional position
//! `i * input_len / output_len`, so the first output sample always lines up
//! with the first input sample.
//!
//! # Methods
//!
//! - [`LanczosResampler`]: windowed sinc, `L(x) = sinc(x) · sinc(x / a)` for
//!   `|x| < a`, where `a` is the `quality` argument. Taps run over
//!   `[-a + 1, a]` around the source position; taps that fall outside the
//!   input contribute nothing (implicit zero padding).
//! - [`CubicResampler`]: Catmull-Rom spline, edges clamped.
//! - [`LinearResampler`]: two-point interpolation, holds the last sample.
//! - [`NearestResampler`]: endpoint-aligned nearest neighbour.
//! - [`PhaseVocoderResampler`]: STFT time stretch. Duration changes, pitch
//!   does not, so it is not one of the rate-conversion [`ResamplerKind`]s.
//!
//! Lanczos reads `quality` as its half-width and the phase vocoder as the
//! log2 of its frame size; the others ignore it.
//!
//! Reference: C. E. Duchon, "Lanczos Filtering in One and Two Dimensions",
//! *Journal of Applied Meteorology* 18, 1979.
//!
//! # Example
//!
//! ```rust
//! use resound_analysis::resample::{LanczosResampler, ResampleMethod};
//!
//! let out = LanczosResampler.resample(&[1.0, 0.0, 0.0, 0.0], 8, 2);
//! assert_eq!(out.len(), 8);
//! assert_eq!(out[0], 1.0);
//! ```
//!
//! [`AudioResampler`] applies a method to every channel of a planar buffer.

use std::f64::consts::{PI, TAU};
use std::fmt;

use resound_core::samples;
use serde::{Deserialize, Serialize};

use crate::fft::{fft, ifft};
use crate::window::WindowType;
use crate::{Error, Result};

/// Largest supported ratio of output length to input length.
pub const MAX_STRETCH: usize = 50;

/// Interpolation kernel used to retarget a sample slice.
pub trait ResampleMethod: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Fill `output` from `input`, retargeting to `output.len()` samples.
    ///
    /// An empty `input` produces silence.
    fn resample_into(&self, input: &[f32], output: &mut [f32], quality: usize);

    /// Resample `input` to a new vector of `target_len` samples.
    fn resample(&self, input: &[f32], target_len: usize, quality: usize) -> Vec<f32> {
        let mut output = vec![0.0; target_len];
        self.resample_into(input, &mut output, quality);
        output
    }
}

/// Source position of output sample `i`.
#[inline]
fn source_position(i: usize, input_len: usize, output_len: usize) -> f64 {
    i as f64 * input_len as f64 / output_len as f64
}

/// Lanczos windowed-sinc interpolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanczosResampler;

impl LanczosResampler {
    /// Lanczos kernel of half-width `a`.
    pub fn kernel(x: f64, a: usize) -> f64 {
        let a = a as f64;
        if x == 0.0 {
            1.0
        } else if x.abs() >= a {
            0.0
        } else {
            let px = PI * x;
            a * px.sin() * (px / a).sin() / (px * px)
        }
    }
}

impl ResampleMethod for LanczosResampler {
    fn name(&self) -> &'static str {
        "lanczos"
    }

    fn resample_into(&self, input: &[f32], output: &mut [f32], quality: usize) {
        let (in_len, out_len) = (input.len(), output.len());
        let a = quality.max(1);
        let taps = a as isize;

        for (i, out) in output.iter_mut().enumerate() {
            let index = source_position(i, in_len, out_len);
            let i0 = index.floor() as isize;

            let mut sum = 0.0f64;
            for j in (1 - taps)..=taps {
                let idx = i0 + j;
                if idx < 0 || idx as usize >= in_len {
                    continue;
                }
                sum += f64::from(input[idx as usize]) * Self::kernel(index - idx as f64, a);
            }
            *out = sum as f32;
        }
    }
}

/// Catmull-Rom cubic interpolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicResampler;

impl ResampleMethod for CubicResampler {
    fn name(&self) -> &'static str {
        "cubic"
    }

    fn resample_into(&self, input: &[f32], output: &mut [f32], _quality: usize) {
        if input.is_empty() {
            output.fill(0.0);
            return;
        }
        let last = input.len() as isize - 1;
        let at = |idx: isize| input[idx.clamp(0, last) as usize];
        let out_len = output.len();

        for (i, out) in output.iter_mut().enumerate() {
            let pos = source_position(i, input.len(), out_len);
            let i1 = pos.floor() as isize;
            let t = (pos - pos.floor()) as f32;

            let (p0, p1, p2, p3) = (at(i1 - 1), at(i1), at(i1 + 1), at(i1 + 2));
            let t2 = t * t;
            let t3 = t2 * t;
            *out = 0.5
                * (2.0 * p1
                    + (p2 - p0) * t
                    + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                    + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3);
        }
    }
}

/// Linear interpolation between neighbouring samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearResampler;

impl ResampleMethod for LinearResampler {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn resample_into(&self, input: &[f32], output: &mut [f32], _quality: usize) {
        let Some(&last) = input.last() else {
            output.fill(0.0);
            return;
        };
        let out_len = output.len();

        for (i, out) in output.iter_mut().enumerate() {
            let pos = source_position(i, input.len(), out_len);
            let i0 = pos.floor() as usize;
            *out = if i0 + 1 >= input.len() {
                last
            } else {
                let t = (pos - i0 as f64) as f32;
                input[i0] * (1.0 - t) + input[i0 + 1] * t
            };
        }
    }
}

/// Nearest-neighbour selection with first and last samples aligned.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestResampler;

impl ResampleMethod for NearestResampler {
    fn name(&self) -> &'static str {
        "nearest"
    }

    fn resample_into(&self, input: &[f32], output: &mut [f32], _quality: usize) {
        if input.is_empty() {
            output.fill(0.0);
            return;
        }
        let out_len = output.len();
        match out_len {
            0 => return,
            1 => {
                output[0] = input[0];
                return;
            }
            _ => {}
        }

        let last = input.len() - 1;
        let step = last as f64 / (out_len - 1) as f64;
        for (i, out) in output.iter_mut().enumerate() {
            let idx = (i as f64 * step).round() as usize;
            *out = input[idx.min(last)];
        }
    }
}

/// Phase-vocoder time stretch.
///
/// The input is cut into Hann-windowed frames of `2^quality` samples
/// (quality clamped to `2..=16`) at an analysis hop of a quarter frame.
/// Each bin's instantaneous frequency is estimated from the phase advance
/// between frames and accumulated over the synthesis hop, which is the
/// analysis hop scaled by `output_len / input_len`. Frames are overlap-added
/// with the window again and divided by the summed window power. Input past
/// the end reads as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseVocoderResampler;

impl PhaseVocoderResampler {
    /// Frame length used for `quality`.
    pub fn frame_size(quality: usize) -> usize {
        1 << quality.clamp(2, 16)
    }
}

/// Window power below which an output sample is left unnormalized.
const MIN_WINDOW_POWER: f32 = 1e-3;

/// Wrap a phase into `[-π, π]`.
#[inline]
fn principal_phase(phase: f64) -> f64 {
    phase - TAU * (phase / TAU).round()
}

impl ResampleMethod for PhaseVocoderResampler {
    fn name(&self) -> &'static str {
        "phase_vocoder"
    }

    fn resample_into(&self, input: &[f32], output: &mut [f32], quality: usize) {
        output.fill(0.0);
        let out_len = output.len();
        if input.is_empty() || out_len == 0 {
            return;
        }

        let n = Self::frame_size(quality);
        let bins = n / 2 + 1;
        let analysis_hop = n / 4;
        let ratio = out_len as f64 / input.len() as f64;
        let synthesis_hop = ((analysis_hop as f64 * ratio).round() as usize).max(1);
        let window: Vec<f32> = WindowType::Hann
            .generate(n)
            .into_iter()
            .map(|w| w as f32)
            .collect();

        let mut re = vec![0.0f32; n];
        let mut im = vec![0.0f32; n];
        let mut prev_phase = vec![0.0f64; bins];
        let mut out_phase = vec![0.0f64; bins];
        let mut power = vec![0.0f32; out_len];

        for frame in 0..out_len.div_ceil(synthesis_hop) {
            let read = frame * analysis_hop;
            for (i, (r, w)) in re.iter_mut().zip(&window).enumerate() {
                *r = input.get(read + i).map_or(0.0, |x| x * w);
            }
            im.fill(0.0);
            fft(&mut re, &mut im);

            for k in 0..bins {
                let (x, y) = (f64::from(re[k]), f64::from(im[k]));
                let magnitude = x.hypot(y);
                let phase = y.atan2(x);

                let bin_freq = TAU * k as f64 / n as f64;
                out_phase[k] = if frame == 0 {
                    phase
                } else {
                    let deviation = principal_phase(
                        phase - prev_phase[k] - bin_freq * analysis_hop as f64,
                    );
                    let inst_freq = bin_freq + deviation / analysis_hop as f64;
                    principal_phase(out_phase[k] + inst_freq * synthesis_hop as f64)
                };
                prev_phase[k] = phase;

                let (sin, cos) = out_phase[k].sin_cos();
                re[k] = (magnitude * cos) as f32;
                im[k] = (magnitude * sin) as f32;
            }
            for k in 1..n / 2 {
                re[n - k] = re[k];
                im[n - k] = -im[k];
            }
            ifft(&mut re, &mut im);

            let write = frame * synthesis_hop;
            let span = (out_len - write).min(n);
            for i in 0..span {
                output[write + i] += re[i] * window[i];
                power[write + i] += window[i] * window[i];
            }
        }

        for (out, &p) in output.iter_mut().zip(&power) {
            if p > MIN_WINDOW_POWER {
                *out /= p;
            }
        }
    }
}

/// Keep every `factor`-th sample, starting with the first.
///
/// The result has `signal.len() / factor` samples; a trailing partial
/// group is dropped.
pub fn decimate(signal: &[f32], factor: usize) -> Result<Vec<f32>> {
    if factor == 0 {
        return Err(Error::InvalidLength(
            "decimation factor must be positive".into(),
        ));
    }
    Ok(signal
        .iter()
        .step_by(factor)
        .take(signal.len() / factor)
        .copied()
        .collect())
}

static LANCZOS: LanczosResampler = LanczosResampler;
static CUBIC: CubicResampler = CubicResampler;
static LINEAR: LinearResampler = LinearResampler;
static NEAREST: NearestResampler = NearestResampler;

/// Named choice of built-in resampling method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResamplerKind {
    /// [`LanczosResampler`]
    #[default]
    Lanczos,
    /// [`CubicResampler`]
    Cubic,
    /// [`LinearResampler`]
    Linear,
    /// [`NearestResampler`]
    Nearest,
}

impl ResamplerKind {
    /// Every built-in method.
    pub const ALL: [ResamplerKind; 4] = [Self::Lanczos, Self::Cubic, Self::Linear, Self::Nearest];

    /// The method implementation.
    pub fn method(self) -> &'static dyn ResampleMethod {
        match self {
            Self::Lanczos => &LANCZOS,
            Self::Cubic => &CUBIC,
            Self::Linear => &LINEAR,
            Self::Nearest => &NEAREST,
        }
    }

    /// Lower-case identifier, as used in configuration files.
    pub fn name(self) -> &'static str {
        self.method().name()
    }

    /// Look up a method by identifier, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ResamplerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multichannel resampler: one method and quality applied to every channel.
///
/// ```rust
/// use resound_analysis::{AudioResampler, ResamplerKind};
///
/// let resampler = AudioResampler::new(ResamplerKind::Linear, 1)?;
/// let slowed = resampler.resample_by_speed(&[vec![0.0f32, 1.0, 2.0, 3.0]], 0.5)?;
/// assert_eq!(slowed[0], vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.0]);
/// # Ok::<(), resound_analysis::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct AudioResampler {
    method: &'static dyn ResampleMethod,
    quality: usize,
}

impl AudioResampler {
    /// Default Lanczos half-width.
    pub const DEFAULT_QUALITY: usize = 2;

    /// Create a resampler using a built-in method.
    pub fn new(kind: ResamplerKind, quality: usize) -> Result<Self> {
        Self::with_method(kind.method(), quality)
    }

    /// Create a resampler from any method implementation.
    pub fn with_method(method: &'static dyn ResampleMethod, quality: usize) -> Result<Self> {
        if quality == 0 {
            return Err(Error::InvalidQuality(quality));
        }
        Ok(Self { method, quality })
    }

    /// The method in use.
    pub fn method(&self) -> &'static dyn ResampleMethod {
        self.method
    }

    /// Kernel quality passed to the method.
    pub fn quality(&self) -> usize {
        self.quality
    }

    /// Resample every channel to `new_len` frames.
    ///
    /// Channels must be non-empty and of equal length. `new_len` must be at
    /// least 1 and at most [`MAX_STRETCH`] times the input length.
    pub fn resample<S: AsRef<[f32]>>(&self, planar: &[S], new_len: usize) -> Result<Vec<Vec<f32>>> {
        let frames = samples::validate(planar)?;
        check_target(frames, new_len)?;

        let mut output = vec![vec![0.0f32; new_len]; planar.len()];
        self.run(planar, &mut output, frames, new_len);
        Ok(output)
    }

    /// Resample so playback at the same rate runs `speed` times faster.
    ///
    /// The new length is `frames / speed`, truncated.
    pub fn resample_by_speed<S: AsRef<[f32]>>(
        &self,
        planar: &[S],
        speed: f32,
    ) -> Result<Vec<Vec<f32>>> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::InvalidLength(format!(
                "speed must be positive and finite, got {speed}"
            )));
        }
        let frames = samples::validate(planar)?;
        let new_len = (frames as f64 / f64::from(speed)) as usize;
        self.resample(planar, new_len)
    }

    /// Resample into caller-provided storage; the target length is the
    /// output row length.
    pub fn resample_into<I, O>(&self, input: &[I], output: &mut [O]) -> Result<()>
    where
        I: AsRef<[f32]>,
        O: AsRef<[f32]> + AsMut<[f32]>,
    {
        if input.len() != output.len() {
            return Err(Error::ChannelMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        let frames = samples::validate(input)?;
        let new_len = samples::validate(&*output)?;
        check_target(frames, new_len)?;

        self.run(input, output, frames, new_len);
        Ok(())
    }

    fn run<I, O>(&self, input: &[I], output: &mut [O], frames: usize, new_len: usize)
    where
        I: AsRef<[f32]>,
        O: AsMut<[f32]>,
    {
        if frames == new_len {
            for (src, dst) in input.iter().zip(output.iter_mut()) {
                dst.as_mut().copy_from_slice(src.as_ref());
            }
            return;
        }

        tracing::debug!(
            method = self.method.name(),
            quality = self.quality,
            channels = input.len(),
            from = frames,
            to = new_len,
            "resample"
        );
        for (src, dst) in input.iter().zip(output.iter_mut()) {
            self.method
                .resample_into(src.as_ref(), dst.as_mut(), self.quality);
        }
    }
}

fn check_target(frames: usize, new_len: usize) -> Result<()> {
    if frames == 0 {
        return Err(Error::InvalidLength("input channels are empty".into()));
    }
    if new_len == 0 {
        return Err(Error::InvalidLength(
            "target length must be positive".into(),
        ));
    }
    if new_len > frames.saturating_mul(MAX_STRETCH) {
        return Err(Error::InvalidLength(format!(
            "{frames} frames cannot stretch to {new_len} (limit {MAX_STRETCH}x)"
        )));
    }
    Ok(())
}

impl Default for AudioResampler {
    fn default() -> Self {
        Self {
            method: &LANCZOS,
            quality: Self::DEFAULT_QUALITY,
        }
    }
}

impl fmt::Debug for AudioResampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioResampler")
            .field("method", &self.method.name())
            .field("quality", &self.quality)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI as PI_F32;

    fn sine_wave(frequency: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| (2.0 * PI_F32 * frequency * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_lanczos_impulse_upsample() {
        let out = LanczosResampler.resample(&[1.0, 0.0, 0.0, 0.0], 8, 2);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], 1.0);
        assert!(out.iter().all(|y| y.abs() <= 1.09), "{out:?}");
        // Half-sample position reads sinc(0.5) * sinc(0.25)
        assert!((out[1] - 0.573).abs() < 1e-3);
        // Whole-sample positions away from the impulse are near zero
        assert!(out[2].abs() < 1e-6 && out[4].abs() < 1e-6);
    }

    #[test]
    fn test_lanczos_kernel() {
        assert_eq!(LanczosResampler::kernel(0.0, 3), 1.0);
        assert_eq!(LanczosResampler::kernel(3.0, 3), 0.0);
        assert_eq!(LanczosResampler::kernel(-4.5, 3), 0.0);
        assert!(LanczosResampler::kernel(1.0, 3).abs() < 1e-12);
        assert!(
            (LanczosResampler::kernel(0.7, 2) - LanczosResampler::kernel(-0.7, 2)).abs() < 1e-15
        );
    }

    #[test]
    fn test_lanczos_same_length_is_identity() {
        let input = sine_wave(440.0, 8000.0, 64);
        let out = LanczosResampler.resample(&input, 64, 3);
        for (a, b) in input.iter().zip(&out) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_lanczos_upsample_tracks_sine() {
        let input = sine_wave(500.0, 8000.0, 200);
        let out = LanczosResampler.resample(&input, 400, 3);
        let expected = sine_wave(500.0, 16000.0, 400);
        // Interior only; edges see zero padding
        for i in 20..380 {
            assert!((out[i] - expected[i]).abs() < 0.02, "sample {i}");
        }
    }

    #[test]
    fn test_linear_interpolates_ramp() {
        let out = LinearResampler.resample(&[0.0, 2.0, 4.0], 6, 0);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn test_cubic_passes_through_samples() {
        let input = [0.0f32, 1.0, -1.0, 0.5, 0.25];
        let out = CubicResampler.resample(&input, 10, 0);
        for (k, &x) in input.iter().enumerate() {
            assert!((out[2 * k] - x).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cubic_reproduces_ramp() {
        let input: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let out = CubicResampler.resample(&input, 32, 0);
        // Interior points of a straight line stay on the line
        for i in 4..24 {
            assert!((out[i] - i as f32 / 4.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_nearest_aligns_endpoints() {
        let out = NearestResampler.resample(&[1.0, 2.0, 3.0], 5, 0);
        assert_eq!(out, vec![1.0, 2.0, 2.0, 3.0, 3.0]);
        assert_eq!(NearestResampler.resample(&[7.0, 8.0], 1, 0), vec![7.0]);
        assert_eq!(NearestResampler.resample(&[1.0, 2.0, 3.0, 4.0], 2, 0), vec![1.0, 4.0]);
    }

    #[test]
    fn test_empty_input_is_silent() {
        for kind in ResamplerKind::ALL {
            assert_eq!(kind.method().resample(&[], 4, 2), vec![0.0; 4], "{kind}");
        }
    }

    #[test]
    fn test_zero_target_is_empty() {
        for kind in ResamplerKind::ALL {
            assert!(kind.method().resample(&[1.0, 2.0], 0, 2).is_empty(), "{kind}");
            assert!(kind.method().resample(&[], 0, 2).is_empty(), "{kind}");
        }
    }

    #[test]
    fn test_phase_vocoder_stretch_keeps_pitch() {
        let sr = 8000.0;
        let input: Vec<f32> = sine_wave(1100.0, sr, 4096).iter().map(|x| 0.5 * x).collect();
        let out = PhaseVocoderResampler.resample(&input, 8192, 10);
        assert_eq!(out.len(), 8192);
        assert!(out.iter().all(|v| v.is_finite()));

        let middle = &out[2048..4096];
        let bins = crate::spectrum::spectrum(&WindowType::Hann.applied(middle), sr);
        let peak = crate::spectrum::peak_frequency(&bins).unwrap();
        assert!((peak - 1100.0).abs() <= sr / 2048.0, "peak at {peak}");

        let rms = (middle.iter().map(|v| v * v).sum::<f32>() / middle.len() as f32).sqrt();
        assert!((rms - 0.5 / 2.0f32.sqrt()).abs() < 0.02, "rms {rms}");

        // Interpolation halves the pitch of the same stretch
        let slowed = LinearResampler.resample(&input, 8192, 0);
        let bins = crate::spectrum::spectrum(&WindowType::Hann.applied(&slowed[2048..4096]), sr);
        assert!(crate::spectrum::peak_frequency(&bins).unwrap() < 600.0);
    }

    #[test]
    fn test_phase_vocoder_compress_keeps_pitch() {
        let sr = 8000.0;
        let input: Vec<f32> = sine_wave(1100.0, sr, 4096).iter().map(|x| 0.5 * x).collect();
        let out = PhaseVocoderResampler.resample(&input, 2048, 10);
        assert_eq!(out.len(), 2048);

        let middle = &out[512..1536];
        let bins = crate::spectrum::spectrum(&WindowType::Hann.applied(middle), sr);
        let peak = crate::spectrum::peak_frequency(&bins).unwrap();
        assert!((peak - 1100.0).abs() <= sr / 1024.0, "peak at {peak}");
    }

    #[test]
    fn test_phase_vocoder_edge_lengths() {
        let pv = PhaseVocoderResampler;
        assert_eq!(pv.resample(&[], 4, 10), vec![0.0; 4]);
        assert!(pv.resample(&[1.0, 2.0], 0, 10).is_empty());

        // Shorter than one frame: zero-padded, still finite
        let out = pv.resample(&[1.0, 2.0], 5, 2);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|v| v.is_finite()));

        assert_eq!(PhaseVocoderResampler::frame_size(0), 4);
        assert_eq!(PhaseVocoderResampler::frame_size(10), 1024);
        assert_eq!(PhaseVocoderResampler::frame_size(40), 1 << 16);
    }

    #[test]
    fn test_phase_vocoder_through_audio_resampler() {
        let r = AudioResampler::with_method(&PhaseVocoderResampler, 8).unwrap();
        let planar = vec![vec![0.25f32; 600], vec![0.0f32; 600]];
        let out = r.resample(&planar, 900).unwrap();
        assert_eq!(out[0].len(), 900);
        // Steady DC comes back at its level away from the edges
        for &v in &out[0][100..600] {
            assert!((v - 0.25).abs() < 0.01, "{v}");
        }
        assert!(out[1].iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_decimate() {
        let signal: Vec<f32> = (0..10).map(|i| i as f32).collect();
        assert_eq!(decimate(&signal, 3).unwrap(), vec![0.0, 3.0, 6.0]);
        assert_eq!(decimate(&signal, 1).unwrap(), signal);
        assert!(decimate(&signal, 11).unwrap().is_empty());
        assert!(matches!(decimate(&signal, 0), Err(Error::InvalidLength(_))));
    }

    #[test]
    fn test_kind_names() {
        for kind in ResamplerKind::ALL {
            assert_eq!(ResamplerKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ResamplerKind::from_name("LANCZOS"), Some(ResamplerKind::Lanczos));
        assert_eq!(ResamplerKind::from_name("sinc"), None);
    }

    #[test]
    fn test_audio_resampler_defaults() {
        let r = AudioResampler::default();
        assert_eq!(r.method().name(), "lanczos");
        assert_eq!(r.quality(), 2);
        assert!(matches!(
            AudioResampler::new(ResamplerKind::Cubic, 0),
            Err(Error::InvalidQuality(0))
        ));
    }

    #[test]
    fn test_same_length_copies_through() {
        let planar = vec![sine_wave(100.0, 1000.0, 32), vec![0.5; 32]];
        let out = AudioResampler::default().resample(&planar, 32).unwrap();
        assert_eq!(out, planar);
    }

    #[test]
    fn test_resample_rejects_bad_lengths() {
        let r = AudioResampler::default();
        let planar = vec![vec![0.0f32; 10]];
        assert!(matches!(r.resample(&planar, 0), Err(Error::InvalidLength(_))));
        assert!(matches!(r.resample(&planar, 501), Err(Error::InvalidLength(_))));
        assert!(r.resample(&planar, 500).is_ok());

        let empty: Vec<Vec<f32>> = vec![vec![]];
        assert!(matches!(r.resample(&empty, 4), Err(Error::InvalidLength(_))));

        let ragged = vec![vec![0.0f32; 10], vec![0.0f32; 9]];
        assert!(matches!(r.resample(&ragged, 20), Err(Error::Samples(_))));

        assert!(matches!(
            r.resample_by_speed(&planar, 0.0),
            Err(Error::InvalidLength(_))
        ));
        assert!(matches!(
            r.resample_by_speed(&planar, f32::NAN),
            Err(Error::InvalidLength(_))
        ));
    }

    #[test]
    fn test_resample_by_speed_lengths() {
        let r = AudioResampler::new(ResamplerKind::Linear, 1).unwrap();
        let planar = vec![vec![0.0f32; 100], vec![0.0f32; 100]];
        assert_eq!(r.resample_by_speed(&planar, 2.0).unwrap()[1].len(), 50);
        assert_eq!(r.resample_by_speed(&planar, 0.5).unwrap()[0].len(), 200);
        assert_eq!(r.resample_by_speed(&planar, 3.0).unwrap()[0].len(), 33);
    }

    #[test]
    fn test_resample_into_checks_channels() {
        let r = AudioResampler::default();
        let input = vec![vec![1.0f32; 8], vec![1.0f32; 8]];

        let mut one = vec![vec![0.0f32; 16]];
        assert!(matches!(
            r.resample_into(&input, &mut one),
            Err(Error::ChannelMismatch { input: 2, output: 1 })
        ));

        let mut two = vec![vec![0.0f32; 16], vec![0.0f32; 16]];
        r.resample_into(&input, &mut two).unwrap();
        assert_eq!(two, r.resample(&input, 16).unwrap());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidQuality(0).to_string(),
            "Invalid resampling quality: 0 (must be at least 1)"
        );
        assert_eq!(
            Error::ChannelMismatch { input: 2, output: 1 }.to_string(),
            "Channel mismatch: input has 2, output has 1"
        );
    }
}
