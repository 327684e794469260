//! Window functions for spectral analysis.
//!
//! All windows are symmetric: coefficients use `(size - 1)` as the period
//! denominator, so `w[0] == w[size - 1]`. A window of size 1 is `[1.0]` and
//! size 0 is empty.
//!
//! Parameterized windows carry their shape parameter in the variant.
//! [`WindowType::kaiser`], [`WindowType::gaussian`] and [`WindowType::tukey`]
//! build them with β = 8.6, σ = 0.4 and α = 0.5.
//!
//! ```rust
//! use resound_analysis::WindowType;
//!
//! let w = WindowType::Hann.generate(5);
//! assert_eq!(w[0], 0.0);
//! assert_eq!(w[2], 1.0);
//!
//! let mut frame = vec![1.0f32; 5];
//! WindowType::Hann.apply(&mut frame);
//! assert_eq!(frame[4], 0.0);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kaiser β used by [`WindowType::kaiser`].
pub const DEFAULT_KAISER_BETA: f64 = 8.6;
/// Gaussian σ used by [`WindowType::gaussian`].
pub const DEFAULT_GAUSSIAN_SIGMA: f64 = 0.4;
/// Tukey α used by [`WindowType::tukey`].
pub const DEFAULT_TUKEY_ALPHA: f64 = 0.5;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    /// All ones.
    Rectangular,
    /// Raised cosine, zero at both ends.
    Hann,
    /// Raised cosine on a 0.08 pedestal.
    Hamming,
    /// Three-term Blackman.
    Blackman,
    /// Four-term Blackman-Harris (-92 dB sidelobes).
    BlackmanHarris,
    /// Five-term flat-top for amplitude-accurate peaks.
    FlatTop,
    /// Triangle reaching zero at both ends.
    Triangular,
    /// Parabola reaching zero at both ends.
    Welch,
    /// Half sine period.
    Cosine,
    /// Kaiser-Bessel with shape parameter β.
    Kaiser {
        /// Sidelobe/mainlobe trade-off; larger is narrower in sidelobes.
        beta: f64,
    },
    /// Gaussian with width σ relative to the half length.
    Gaussian {
        /// Standard deviation as a fraction of `(size - 1) / 2`.
        sigma: f64,
    },
    /// Tapered cosine; α = 0 is rectangular, α = 1 is Hann.
    Tukey {
        /// Fraction of the window inside the cosine tapers.
        alpha: f64,
    },
    /// Four-term Nuttall.
    Nuttall,
}

impl WindowType {
    /// Kaiser window with β = 8.6.
    pub const fn kaiser() -> Self {
        Self::Kaiser {
            beta: DEFAULT_KAISER_BETA,
        }
    }

    /// Gaussian window with σ = 0.4.
    pub const fn gaussian() -> Self {
        Self::Gaussian {
            sigma: DEFAULT_GAUSSIAN_SIGMA,
        }
    }

    /// Tukey window with α = 0.5.
    pub const fn tukey() -> Self {
        Self::Tukey {
            alpha: DEFAULT_TUKEY_ALPHA,
        }
    }

    /// Every window with default parameters.
    pub const ALL: [WindowType; 13] = [
        Self::Rectangular,
        Self::Hann,
        Self::Hamming,
        Self::Blackman,
        Self::BlackmanHarris,
        Self::FlatTop,
        Self::Triangular,
        Self::Welch,
        Self::Cosine,
        Self::kaiser(),
        Self::gaussian(),
        Self::tukey(),
        Self::Nuttall,
    ];

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangular => "Rectangular",
            Self::Hann => "Hann",
            Self::Hamming => "Hamming",
            Self::Blackman => "Blackman",
            Self::BlackmanHarris => "Blackman-Harris",
            Self::FlatTop => "Flat-top",
            Self::Triangular => "Triangular",
            Self::Welch => "Welch",
            Self::Cosine => "Cosine",
            Self::Kaiser { .. } => "Kaiser",
            Self::Gaussian { .. } => "Gaussian",
            Self::Tukey { .. } => "Tukey",
            Self::Nuttall => "Nuttall",
        }
    }

    /// Coefficient `i` of a window of length `size`.
    ///
    /// Returns 0 for `i >= size`.
    pub fn value(&self, i: usize, size: usize) -> f64 {
        if i >= size {
            return 0.0;
        }
        if size == 1 {
            return 1.0;
        }

        let m = (size - 1) as f64;
        let x = i as f64;
        // Position in [-1, 1] across the window
        let r = 2.0 * x / m - 1.0;
        let phase = 2.0 * PI * x / m;

        match *self {
            Self::Rectangular => 1.0,
            Self::Hann => 0.5 * (1.0 - phase.cos()),
            Self::Hamming => 0.54 - 0.46 * phase.cos(),
            Self::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
            Self::BlackmanHarris => cosine_sum(phase, &[0.35875, 0.48829, 0.14128, 0.01168]),
            Self::FlatTop => cosine_sum(
                phase,
                &[0.215_578_95, 0.416_631_58, 0.277_263_158, 0.083_578_947, 0.006_947_368],
            ),
            Self::Triangular => 1.0 - r.abs(),
            Self::Welch => 1.0 - r * r,
            Self::Cosine => (PI * x / m).sin(),
            Self::Kaiser { beta } => {
                bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / bessel_i0(beta)
            }
            Self::Gaussian { sigma } => {
                let n = r / sigma;
                (-0.5 * n * n).exp()
            }
            Self::Tukey { alpha } => tukey(x, m, alpha),
            Self::Nuttall => cosine_sum(phase, &[0.355768, 0.487396, 0.144232, 0.012604]),
        }
    }

    /// Window coefficients of length `size`.
    pub fn generate(&self, size: usize) -> Vec<f64> {
        (0..size).map(|i| self.value(i, size)).collect()
    }

    /// Multiply `buffer` by the window in place.
    pub fn apply(&self, buffer: &mut [f32]) {
        let n = buffer.len();
        for (i, sample) in buffer.iter_mut().enumerate() {
            *sample *= self.value(i, n) as f32;
        }
    }

    /// Windowed copy of `buffer`.
    pub fn applied(&self, buffer: &[f32]) -> Vec<f32> {
        let mut out = buffer.to_vec();
        self.apply(&mut out);
        out
    }

    /// Coherent gain of the window at its default shape.
    ///
    /// Divide a windowed spectrum's amplitudes by this to recover the
    /// amplitude of a bin-centred sinusoid.
    pub fn compensation(&self) -> f64 {
        match self {
            Self::Rectangular => 1.0,
            Self::Hann => 0.5,
            Self::Hamming => 0.54,
            Self::Blackman => 0.42,
            Self::BlackmanHarris => 0.4,
            Self::FlatTop => 0.2156,
            Self::Triangular => 0.5,
            Self::Welch => 0.67,
            Self::Cosine => 0.6366,
            Self::Kaiser { .. } => 1.0,
            Self::Gaussian { .. } => 0.4,
            Self::Tukey { .. } => 0.5,
            Self::Nuttall => 0.3558,
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kaiser { beta } => write!(f, "Kaiser (β = {beta})"),
            Self::Gaussian { sigma } => write!(f, "Gaussian (σ = {sigma})"),
            Self::Tukey { alpha } => write!(f, "Tukey (α = {alpha})"),
            other => f.write_str(other.name()),
        }
    }
}

/// `a0 - a1 cos(φ) + a2 cos(2φ) - a3 cos(3φ) + ...`
fn cosine_sum(phase: f64, terms: &[f64]) -> f64 {
    terms
        .iter()
        .enumerate()
        .map(|(k, &a)| {
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            sign * a * (k as f64 * phase).cos()
        })
        .sum()
}

fn tukey(x: f64, m: f64, alpha: f64) -> f64 {
    if alpha <= 0.0 {
        return 1.0;
    }
    let edge = alpha * m / 2.0;
    if x < edge {
        0.5 * (1.0 + (PI * (x / edge - 1.0)).cos())
    } else if x > m - edge {
        0.5 * (1.0 + (PI * ((x - m) / edge + 1.0)).cos())
    } else {
        1.0
    }
}

/// Zeroth-order modified Bessel function of the first kind, by power series.
fn bessel_i0(x: f64) -> f64 {
    let y = x * x / 4.0;
    let mut sum = 1.0;
    let mut term = y;
    let mut k = 1.0;
    while term > 1e-12 * sum {
        sum += term;
        k += 1.0;
        term *= y / (k * k);
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_hann() {
        let w = WindowType::Hann.generate(9);
        assert!(w[0].abs() < 1e-12);
        assert!(w[8].abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
        assert!((w[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_windows_are_symmetric() {
        for window in WindowType::ALL {
            for size in [2usize, 7, 64, 65] {
                let w = window.generate(size);
                for i in 0..size / 2 {
                    assert!(
                        (w[i] - w[size - 1 - i]).abs() < 1e-9,
                        "{window} size {size} index {i}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_peak_at_centre() {
        for window in WindowType::ALL {
            let w = window.generate(65);
            assert!((w[32] - 1.0).abs() < 1e-6, "{window}: centre {}", w[32]);
        }
    }

    #[test]
    fn test_degenerate_sizes() {
        for window in WindowType::ALL {
            assert!(window.generate(0).is_empty());
            assert_eq!(window.generate(1), vec![1.0]);
        }
    }

    #[test]
    fn test_known_endpoints() {
        let first = |w: WindowType| w.value(0, 33);
        assert_eq!(first(WindowType::Rectangular), 1.0);
        assert!((first(WindowType::Hamming) - 0.08).abs() < 1e-12);
        assert!(first(WindowType::Blackman).abs() < 1e-12);
        assert!((first(WindowType::BlackmanHarris) - 6.0e-5).abs() < 1e-9);
        assert!(first(WindowType::Triangular).abs() < 1e-12);
        assert!(first(WindowType::Welch).abs() < 1e-12);
        assert!(first(WindowType::Cosine).abs() < 1e-12);
        assert!(first(WindowType::tukey()).abs() < 1e-12);
        assert!(first(WindowType::Nuttall).abs() < 1e-6);
    }

    #[test]
    fn test_tukey_limits() {
        let flat = WindowType::Tukey { alpha: 0.0 }.generate(16);
        assert!(flat.iter().all(|&v| v == 1.0));

        let hann = WindowType::Hann.generate(16);
        let full = WindowType::Tukey { alpha: 1.0 }.generate(16);
        for (a, b) in hann.iter().zip(&full) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_kaiser_edges_shrink_with_beta() {
        let edge = |beta| WindowType::Kaiser { beta }.value(0, 32);
        assert!((edge(0.0) - 1.0).abs() < 1e-12);
        assert!(edge(4.0) > edge(8.6));
        assert!(edge(8.6) < 1e-2);
    }

    #[test]
    fn test_bessel_i0() {
        assert_eq!(bessel_i0(0.0), 1.0);
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008).abs() < 1e-10);
        assert!((bessel_i0(5.0) - 27.239_871_823_604_44).abs() < 1e-8);
    }

    #[test]
    fn test_apply_matches_generate() {
        let data: Vec<f32> = (0..16).map(|i| i as f32 - 8.0).collect();
        let w = WindowType::Blackman.generate(16);
        let out = WindowType::Blackman.applied(&data);
        for i in 0..16 {
            assert!((out[i] - data[i] * w[i] as f32).abs() < 1e-6);
        }
    }

    #[test]
    fn test_compensation_tracks_mean() {
        // Coherent gain is the window mean for the cosine-sum windows
        let n = 4097;
        for window in [
            WindowType::Hann,
            WindowType::Hamming,
            WindowType::Blackman,
            WindowType::Triangular,
            WindowType::Cosine,
            WindowType::Nuttall,
        ] {
            let mean = window.generate(n).iter().sum::<f64>() / n as f64;
            assert!(
                (mean - window.compensation()).abs() < 2e-3,
                "{window}: mean {mean}, compensation {}",
                window.compensation()
            );
        }
    }

    #[test]
    fn test_serde_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            window: WindowType,
        }
        let text = toml::to_string(&Wrapper {
            window: WindowType::BlackmanHarris,
        })
        .unwrap();
        assert!(text.contains("blackman_harris"));

        let w: Wrapper = toml::from_str("[window.kaiser]\nbeta = 6.0\n").unwrap();
        assert_eq!(w.window, WindowType::Kaiser { beta: 6.0 });
    }
}
