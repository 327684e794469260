//! Real-signal spectrum as frequency/amplitude/phase bins

use crate::fft::{fft, ifft};

/// One positive-frequency bin of a real signal's spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FftBin {
    /// Bin centre frequency in Hz.
    pub frequency: f32,
    /// Unnormalized magnitude, `hypot(re, im)`.
    pub amplitude: f32,
    /// Phase in radians, `atan2(im, re)`.
    pub phase: f32,
}

/// Transform a real signal into its first `n / 2` bins.
///
/// `samples.len()` must be a power of two. Bin `k` sits at
/// `k * sample_rate / n`; the Nyquist bin is not included.
pub fn spectrum(samples: &[f32], sample_rate: f32) -> Vec<FftBin> {
    let n = samples.len();
    let mut re = samples.to_vec();
    let mut im = vec![0.0; n];
    fft(&mut re, &mut im);

    re.iter()
        .zip(&im)
        .take(n / 2)
        .enumerate()
        .map(|(k, (&r, &i))| FftBin {
            frequency: k as f32 * sample_rate / n as f32,
            amplitude: r.hypot(i),
            phase: i.atan2(r),
        })
        .collect()
}

/// Rebuild a real signal of `2 * bins.len()` samples from positive bins.
///
/// The negative half is filled with complex conjugates so the result is
/// real; the Nyquist bin is taken as zero.
pub fn inverse_spectrum(bins: &[FftBin]) -> Vec<f32> {
    let n = bins.len() * 2;
    let mut re = vec![0.0f32; n];
    let mut im = vec![0.0f32; n];

    for (k, bin) in bins.iter().enumerate() {
        let (sin, cos) = bin.phase.sin_cos();
        re[k] = bin.amplitude * cos;
        im[k] = bin.amplitude * sin;
    }
    for k in 1..bins.len() {
        re[n - k] = re[k];
        im[n - k] = -im[k];
    }

    ifft(&mut re, &mut im);
    re
}

/// Amplitudes of each bin.
pub fn magnitudes(bins: &[FftBin]) -> Vec<f32> {
    bins.iter().map(|b| b.amplitude).collect()
}

/// Frequency of the loudest bin, skipping DC. `None` with fewer than two bins.
pub fn peak_frequency(bins: &[FftBin]) -> Option<f32> {
    bins.iter()
        .skip(1)
        .max_by(|a, b| a.amplitude.total_cmp(&b.amplitude))
        .map(|b| b.frequency)
}
