//! Biquad (bi-quadratic) filter stage with smoothed coefficients.
//!
//! Provides a second-order IIR section that can be configured for low-pass,
//! high-pass, band-pass, notch, peaking and all-pass responses.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.
//!
//! ## Coefficient smoothing
//!
//! A [`BiquadStage`] holds two coefficient sets: the *target* produced by the
//! latest [`update`](BiquadStage::update) and the *current* set actually used
//! for filtering. Every call to [`process`](BiquadStage::process) moves each
//! current coefficient one step toward its target:
//!
//! ```text
//! current += (target - current) * SMOOTH_FACTOR
//! ```
//!
//! Current coefficients start at zero, so a freshly built stage fades in over
//! roughly `1 / SMOOTH_FACTOR` samples. Parameter changes are never applied
//! instantaneously, which keeps automation click-free.

use core::f64::consts::PI;
use libm::{cos, sin};

/// Per-sample smoothing step applied to every coefficient.
pub const SMOOTH_FACTOR: f32 = 0.005;

/// Butterworth quality factor, used when a non-positive Q is requested.
pub const BUTTERWORTH_Q: f32 = 0.707;

/// Second-order filter response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    /// Low-pass: passes content below the cutoff.
    Lowpass,
    /// High-pass: passes content above the cutoff.
    Highpass,
    /// Band-pass with constant 0 dB peak gain.
    Bandpass,
    /// Band-reject (notch) centred on the cutoff.
    Notch,
    /// Peaking EQ; boost or cut set by the linear gain.
    Peak,
    /// All-pass: flat magnitude, frequency-dependent phase.
    Allpass,
}

impl FilterType {
    /// All filter types in declaration order.
    pub const ALL: [FilterType; 6] = [
        FilterType::Lowpass,
        FilterType::Highpass,
        FilterType::Bandpass,
        FilterType::Notch,
        FilterType::Peak,
        FilterType::Allpass,
    ];

    /// Lowercase identifier (`"lowpass"`, `"peak"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            FilterType::Lowpass => "lowpass",
            FilterType::Highpass => "highpass",
            FilterType::Bandpass => "bandpass",
            FilterType::Notch => "notch",
            FilterType::Peak => "peak",
            FilterType::Allpass => "allpass",
        }
    }

    /// Parses an identifier produced by [`name`](Self::name), ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }
}

/// Normalized biquad coefficients (`a0 == 1`).
///
/// Direct Form I difference equation:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coefficients {
    /// Feedforward coefficient for x[n].
    pub b0: f32,
    /// Feedforward coefficient for x[n-1].
    pub b1: f32,
    /// Feedforward coefficient for x[n-2].
    pub b2: f32,
    /// Feedback coefficient for y[n-1].
    pub a1: f32,
    /// Feedback coefficient for y[n-2].
    pub a2: f32,
}

impl Coefficients {
    /// All-zero coefficients (silence). Initial "current" state of a stage.
    pub const ZERO: Self = Self {
        b0: 0.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Passthrough coefficients (`y[n] = x[n]`).
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Normalizes raw `(b0, b1, b2, a0, a1, a2)` coefficients by `a0`.
    pub fn from_raw((b0, b1, b2, a0, a1, a2): (f32, f32, f32, f32, f32, f32)) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Designs normalized coefficients for the given response.
    ///
    /// Invalid parameters are coerced rather than rejected, so a real-time
    /// caller never loses audio to a failed update:
    ///
    /// - `gain` not positive and finite becomes `1.0`
    /// - `cutoff` outside `(0, sample_rate / 2)` becomes `sample_rate / 4`
    /// - `q` not positive and finite becomes [`BUTTERWORTH_Q`]
    ///
    /// NaN counts as outside every range.
    pub fn design(
        filter_type: FilterType,
        cutoff: f32,
        q: f32,
        gain: f32,
        sample_rate: f32,
    ) -> Self {
        // NaN fails every comparison below and takes the fallback
        let gain = if gain > 0.0 && gain.is_finite() { gain } else { 1.0 };
        let cutoff = if cutoff > 0.0 && cutoff < sample_rate / 2.0 {
            cutoff
        } else {
            sample_rate / 4.0
        };
        let q = if q > 0.0 && q.is_finite() { q } else { BUTTERWORTH_Q };

        let raw = match filter_type {
            FilterType::Lowpass => lowpass_coefficients(cutoff, q, sample_rate),
            FilterType::Highpass => highpass_coefficients(cutoff, q, sample_rate),
            FilterType::Bandpass => bandpass_coefficients(cutoff, q, sample_rate),
            FilterType::Notch => notch_coefficients(cutoff, q, sample_rate),
            FilterType::Peak => peak_coefficients(cutoff, q, gain, sample_rate),
            FilterType::Allpass => allpass_coefficients(cutoff, q, sample_rate),
        };
        Self::from_raw(raw)
    }

    /// Largest absolute difference between matching coefficients.
    pub fn max_abs_diff(&self, other: &Self) -> f32 {
        let d = [
            self.b0 - other.b0,
            self.b1 - other.b1,
            self.b2 - other.b2,
            self.a1 - other.a1,
            self.a2 - other.a2,
        ];
        d.iter().fold(0.0f32, |m, v| m.max(v.abs()))
    }
}

/// Single second-order IIR section with exponentially smoothed coefficients.
///
/// History (x1, x2, y1, y2) is owned by the instance; one stage per stream.
#[derive(Debug, Clone)]
pub struct BiquadStage {
    current: Coefficients,
    target: Coefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl BiquadStage {
    /// Creates a stage with zero current and target coefficients.
    ///
    /// The stage outputs silence until [`update`](Self::update) is called and
    /// the smoothing has moved the current set toward the new target.
    pub fn new() -> Self {
        Self {
            current: Coefficients::ZERO,
            target: Coefficients::ZERO,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Recomputes the target coefficients. Current coefficients are untouched.
    pub fn update(
        &mut self,
        filter_type: FilterType,
        cutoff: f32,
        q: f32,
        gain: f32,
        sample_rate: f32,
    ) {
        self.target = Coefficients::design(filter_type, cutoff, q, gain, sample_rate);
    }

    /// Replaces the target coefficients directly.
    pub fn set_target(&mut self, target: Coefficients) {
        self.target = target;
    }

    /// Processes a single sample.
    ///
    /// Smooths each coefficient one step toward its target, then evaluates the
    /// Direct Form I difference equation with the smoothed set.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &mut self.current;
        let t = &self.target;
        c.b0 += (t.b0 - c.b0) * SMOOTH_FACTOR;
        c.b1 += (t.b1 - c.b1) * SMOOTH_FACTOR;
        c.b2 += (t.b2 - c.b2) * SMOOTH_FACTOR;
        c.a1 += (t.a1 - c.a1) * SMOOTH_FACTOR;
        c.a2 += (t.a2 - c.a2) * SMOOTH_FACTOR;

        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Processes `input` into `output` sample by sample.
    ///
    /// Only `min(input.len(), output.len())` samples are processed.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        for (out, &x) in output.iter_mut().zip(input) {
            *out = self.process(x);
        }
    }

    /// Clears the filter history. Coefficients are kept.
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Jumps the current coefficients to the target, skipping the fade.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Coefficients used by the next `process` call (before its smoothing step).
    pub fn current(&self) -> Coefficients {
        self.current
    }

    /// Coefficients produced by the last update.
    pub fn target(&self) -> Coefficients {
        self.target
    }
}

impl Default for BiquadStage {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared RBJ intermediates: `(cos(omega), alpha)`.
///
/// Trigonometry is evaluated in double precision and narrowed, which keeps
/// low cutoffs at high sample rates accurate.
fn omega_terms(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32) {
    let omega = 2.0 * PI * f64::from(frequency) / f64::from(sample_rate);
    let sn = sin(omega) as f32;
    let cs = cos(omega) as f32;
    (cs, sn / (2.0 * q))
}

/// Calculates low-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (typically 0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn lowpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cs, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = (1.0 - cs) / 2.0;
    let b1 = 1.0 - cs;
    let b2 = (1.0 - cs) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cs;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates high-pass filter coefficients using the RBJ cookbook formula.
///
/// Arguments and return value as for [`lowpass_coefficients`].
pub fn highpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cs, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = (1.0 + cs) / 2.0;
    let b1 = -(1.0 + cs);
    let b2 = (1.0 + cs) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cs;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates band-pass filter coefficients using the RBJ cookbook formula.
///
/// This version has constant 0dB peak gain.
pub fn bandpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cs, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = alpha;
    let b1 = 0.0;
    let b2 = -alpha;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cs;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates notch (band-reject) filter coefficients using the RBJ cookbook formula.
pub fn notch_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cs, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = 1.0;
    let b1 = -2.0 * cs;
    let b2 = 1.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cs;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates peaking EQ coefficients using the RBJ cookbook formula.
///
/// `gain` is the linear amplitude factor `A` from the cookbook (1.0 = flat).
/// Values above 1 boost around `frequency`, values below 1 cut.
pub fn peak_coefficients(
    frequency: f32,
    q: f32,
    gain: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cs, alpha) = omega_terms(frequency, q, sample_rate);
    let a = gain;

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cs;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cs;
    let a2 = 1.0 - alpha / a;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates all-pass filter coefficients using the RBJ cookbook formula.
pub fn allpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cs, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = 1.0 - alpha;
    let b1 = -2.0 * cs;
    let b2 = 1.0 + alpha;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cs;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converged(filter_type: FilterType, cutoff: f32, q: f32, gain: f32) -> BiquadStage {
        let mut stage = BiquadStage::new();
        stage.update(filter_type, cutoff, q, gain, 44100.0);
        stage.snap_to_target();
        stage
    }

    #[test]
    fn test_new_stage_is_silent() {
        let mut stage = BiquadStage::new();
        for _ in 0..10 {
            assert_eq!(stage.process(1.0), 0.0);
        }
    }

    #[test]
    fn test_update_only_moves_target() {
        let mut stage = BiquadStage::new();
        stage.update(FilterType::Lowpass, 1000.0, 0.707, 1.0, 44100.0);

        assert_eq!(stage.current(), Coefficients::ZERO);
        assert_ne!(stage.target(), Coefficients::ZERO);
    }

    #[test]
    fn test_first_process_takes_one_smoothing_step() {
        let mut stage = BiquadStage::new();
        stage.update(FilterType::Lowpass, 1000.0, 0.707, 1.0, 44100.0);
        let target = stage.target();

        let out = stage.process(1.0);
        let b0 = target.b0 * SMOOTH_FACTOR;
        assert!((stage.current().b0 - b0).abs() < 1e-9);
        assert!((out - b0).abs() < 1e-9);
    }

    #[test]
    fn test_current_converges_to_target() {
        let mut stage = BiquadStage::new();
        for _ in 0..5000 {
            stage.update(FilterType::Lowpass, 1000.0, 0.707, 1.0, 44100.0);
            stage.process(0.0);
        }
        let diff = stage.current().max_abs_diff(&stage.target());
        assert!(diff < 1e-4, "coefficients did not converge, diff={}", diff);
    }

    #[test]
    fn test_reset_clears_history_only() {
        let mut stage = converged(FilterType::Lowpass, 1000.0, 0.707, 1.0);
        for _ in 0..10 {
            stage.process(1.0);
        }
        let coeffs = stage.current();
        stage.reset();

        assert_eq!(stage.x1, 0.0);
        assert_eq!(stage.x2, 0.0);
        assert_eq!(stage.y1, 0.0);
        assert_eq!(stage.y2, 0.0);
        assert_eq!(stage.current(), coeffs);
    }

    #[test]
    fn test_lowpass_dc_pass() {
        let mut stage = converged(FilterType::Lowpass, 1000.0, 0.707, 1.0);

        let mut output = 0.0;
        for _ in 0..1000 {
            output = stage.process(1.0);
        }

        assert!((output - 1.0).abs() < 0.05, "DC should pass, got {}", output);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut stage = converged(FilterType::Highpass, 1000.0, 0.707, 1.0);

        let mut output = 1.0;
        for _ in 0..2000 {
            output = stage.process(1.0);
        }

        assert!(output.abs() < 0.01, "DC should be blocked, got {}", output);
    }

    #[test]
    fn test_peak_unity_gain_is_flat() {
        let c = Coefficients::design(FilterType::Peak, 1000.0, 1.0, 1.0, 44100.0);
        // With A = 1 the numerator and denominator are identical.
        assert!((c.b0 - 1.0).abs() < 1e-6);
        assert!((c.b1 - c.a1).abs() < 1e-6);
        assert!((c.b2 - c.a2).abs() < 1e-6);
    }

    #[test]
    fn test_allpass_dc_gain_is_unity() {
        let c = Coefficients::design(FilterType::Allpass, 2000.0, 0.707, 1.0, 48000.0);
        let dc = (c.b0 + c.b1 + c.b2) / (1.0 + c.a1 + c.a2);
        assert!((dc - 1.0).abs() < 1e-4, "allpass DC gain {}", dc);
    }

    #[test]
    fn test_guard_rails_coerce_invalid_parameters() {
        let sr = 48000.0;
        let quarter = Coefficients::design(FilterType::Lowpass, sr / 4.0, 0.707, 1.0, sr);

        assert_eq!(
            Coefficients::design(FilterType::Lowpass, 0.0, 0.707, 1.0, sr),
            quarter
        );
        assert_eq!(
            Coefficients::design(FilterType::Lowpass, sr / 2.0, 0.707, 1.0, sr),
            quarter
        );
        assert_eq!(
            Coefficients::design(FilterType::Lowpass, sr / 4.0, -3.0, 1.0, sr),
            Coefficients::design(FilterType::Lowpass, sr / 4.0, BUTTERWORTH_Q, 1.0, sr)
        );
        assert_eq!(
            Coefficients::design(FilterType::Peak, 1000.0, 1.0, 0.0, sr),
            Coefficients::design(FilterType::Peak, 1000.0, 1.0, 1.0, sr)
        );
    }

    #[test]
    fn test_guard_rails_catch_nan() {
        let sr = 48000.0;
        let quarter = Coefficients::design(FilterType::Lowpass, sr / 4.0, 0.707, 1.0, sr);
        assert_eq!(
            Coefficients::design(FilterType::Lowpass, f32::NAN, 0.707, 1.0, sr),
            quarter
        );
        assert_eq!(
            Coefficients::design(FilterType::Lowpass, sr / 4.0, f32::NAN, 1.0, sr),
            Coefficients::design(FilterType::Lowpass, sr / 4.0, BUTTERWORTH_Q, 1.0, sr)
        );
        assert_eq!(
            Coefficients::design(FilterType::Peak, 1000.0, 1.0, f32::NAN, sr),
            Coefficients::design(FilterType::Peak, 1000.0, 1.0, 1.0, sr)
        );
        assert_eq!(
            Coefficients::design(FilterType::Peak, 1000.0, 1.0, f32::INFINITY, sr),
            Coefficients::design(FilterType::Peak, 1000.0, 1.0, 1.0, sr)
        );
    }

    #[test]
    fn test_stage_survives_nan_update() {
        let mut stage = BiquadStage::new();
        stage.update(FilterType::Lowpass, f32::NAN, f32::NAN, f32::NAN, 48000.0);
        let t = stage.target();
        assert!([t.b0, t.b1, t.b2, t.a1, t.a2].iter().all(|c| c.is_finite()));

        stage.update(FilterType::Lowpass, 1000.0, 0.707, 1.0, 48000.0);
        let mut out = 0.0;
        for _ in 0..5000 {
            out = stage.process(0.5);
        }
        assert!((out - 0.5).abs() < 1e-3, "lowpass DC output {out}");
    }

    #[test]
    fn test_coefficient_functions_are_finite() {
        let sets = [
            lowpass_coefficients(1000.0, 0.707, 44100.0),
            highpass_coefficients(1000.0, 0.707, 44100.0),
            bandpass_coefficients(1000.0, 1.0, 44100.0),
            notch_coefficients(1000.0, 1.0, 44100.0),
            peak_coefficients(1000.0, 1.0, 2.0, 44100.0),
            allpass_coefficients(1000.0, 1.0, 44100.0),
        ];
        for (b0, b1, b2, a0, a1, a2) in sets {
            for v in [b0, b1, b2, a0, a1, a2] {
                assert!(v.is_finite());
            }
            assert!(a0 > 0.0);
        }
    }

    #[test]
    fn test_filter_type_names_round_trip() {
        for t in FilterType::ALL {
            assert_eq!(FilterType::from_name(t.name()), Some(t));
        }
        assert_eq!(FilterType::from_name("LowPass"), Some(FilterType::Lowpass));
        assert_eq!(FilterType::from_name("shelf"), None);
    }
}
