//! Higher-order filters built from cascaded biquad stages.
//!
//! A [`CascadeFilter`] of order `N` (even, 2 to 8) runs `N / 2` independent
//! [`BiquadStage`]s in series: each stage filters the previous stage's output.
//! All stages share the same design parameters, so a 4th-order low-pass is two
//! identical 2nd-order low-passes back to back.
//!
//! Parameters live in range-bounded [`FloatControl`]s. Setting a control does
//! nothing until [`update`](CascadeFilter::update) polls the controls and pushes
//! new target coefficients into every stage; the stages then glide toward the
//! new response sample by sample.
//!
//! # Example
//!
//! ```rust
//! use resound_core::{AudioFilter, CascadeFilter, FilterType};
//!
//! let mut lp = CascadeFilter::new(FilterType::Lowpass, 4).unwrap();
//! lp.set_cutoff(1000.0);
//! lp.update(48000.0);
//!
//! let y = lp.process(0.5);
//! assert!(y.is_finite());
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::f64::consts::LN_2;
use libm::sinh;

use crate::biquad::{BUTTERWORTH_Q, BiquadStage, FilterType};
use crate::filter::{AudioFilter, FilterError};
use crate::param::{FloatControl, ParamDescriptor, ParamUnit, ParameterInfo};

/// Lowest supported cascade order.
pub const MIN_ORDER: usize = 2;

/// Highest supported cascade order.
pub const MAX_ORDER: usize = 8;

/// Bandwidth bounds in octaves.
pub const MIN_OCTAVES: f32 = 0.1;
/// Upper bandwidth bound in octaves.
pub const MAX_OCTAVES: f32 = 3.0;

/// Converts a bandwidth in octaves to a quality factor.
///
/// `Q = 1 / (2 sinh(ln(2) / 2 * bw))`, with `bw` clamped to
/// `[0.1, 3.0]` octaves. Non-positive bandwidths map to [`BUTTERWORTH_Q`].
///
/// ```rust
/// use resound_core::octaves_to_q;
///
/// // One octave is the classic Q of about 1.414.
/// assert!((octaves_to_q(1.0) - 1.4142).abs() < 1e-3);
/// ```
pub fn octaves_to_q(bandwidth: f32) -> f32 {
    if bandwidth.is_nan() || bandwidth <= 0.0 {
        return BUTTERWORTH_Q;
    }
    let bw = f64::from(bandwidth.clamp(MIN_OCTAVES, MAX_OCTAVES));
    (1.0 / (2.0 * sinh(LN_2 / 2.0 * bw))) as f32
}

/// How the bandwidth control is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandwidthMode {
    /// Bandwidth in octaves, converted with [`octaves_to_q`].
    #[default]
    Octaves,
    /// Bandwidth used directly as the quality factor.
    Q,
}

impl BandwidthMode {
    /// Descriptor for the bandwidth control in this mode.
    pub fn descriptor(self) -> ParamDescriptor {
        match self {
            BandwidthMode::Octaves => ParamDescriptor {
                name: "Bandwidth",
                short_name: "BW",
                unit: ParamUnit::Octaves,
                min: MIN_OCTAVES,
                max: MAX_OCTAVES,
                default: 1.92,
            },
            BandwidthMode::Q => ParamDescriptor {
                name: "Q",
                short_name: "Q",
                unit: ParamUnit::Ratio,
                min: 0.1,
                max: 10.0,
                default: BUTTERWORTH_Q,
            },
        }
    }

    /// Quality factor for a bandwidth value in this mode.
    pub fn to_q(self, bandwidth: f32) -> f32 {
        match self {
            BandwidthMode::Octaves => octaves_to_q(bandwidth),
            BandwidthMode::Q => bandwidth,
        }
    }
}

const CUTOFF: ParamDescriptor = ParamDescriptor {
    name: "Cutoff",
    short_name: "Cut",
    unit: ParamUnit::Hertz,
    min: 1.0,
    max: 22000.0,
    default: 4000.0,
};

const GAIN: ParamDescriptor = ParamDescriptor {
    name: "Gain",
    short_name: "Gain",
    unit: ParamUnit::Ratio,
    min: 0.0,
    max: 2.0,
    default: 1.0,
};

/// Series chain of identically configured biquad stages.
///
/// Parameter indices for [`ParameterInfo`]:
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Cutoff | 1 to 22000 Hz | 4000 |
/// | 1 | Bandwidth (octaves) or Q | 0.1 to 3.0 / 0.1 to 10 | 1.92 / 0.707 |
/// | 2 | Gain | 0 to 2 | 1.0 |
#[derive(Debug, Clone)]
pub struct CascadeFilter {
    filter_type: FilterType,
    mode: BandwidthMode,
    cutoff: FloatControl,
    bandwidth: FloatControl,
    gain: FloatControl,
    stages: Vec<BiquadStage>,
}

impl CascadeFilter {
    /// Creates a cascade whose bandwidth control is in octaves.
    ///
    /// `order` must be even and within `2..=8`.
    pub fn new(filter_type: FilterType, order: usize) -> Result<Self, FilterError> {
        Self::with_mode(filter_type, order, BandwidthMode::Octaves)
    }

    /// Creates a cascade whose bandwidth control is a plain Q value.
    pub fn with_q(filter_type: FilterType, order: usize) -> Result<Self, FilterError> {
        Self::with_mode(filter_type, order, BandwidthMode::Q)
    }

    /// Creates a cascade with an explicit bandwidth mode.
    pub fn with_mode(
        filter_type: FilterType,
        order: usize,
        mode: BandwidthMode,
    ) -> Result<Self, FilterError> {
        if order % 2 != 0 || !(MIN_ORDER..=MAX_ORDER).contains(&order) {
            return Err(FilterError::InvalidOrder(order));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "cascade: {} order {order}, {} stages, {mode:?} bandwidth",
            filter_type.name(),
            order / 2
        );

        Ok(Self {
            filter_type,
            mode,
            cutoff: FloatControl::new(CUTOFF),
            bandwidth: FloatControl::new(mode.descriptor()),
            gain: FloatControl::new(GAIN),
            stages: (0..order / 2).map(|_| BiquadStage::new()).collect(),
        })
    }

    /// Filter response type.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Filter order (twice the stage count).
    pub fn order(&self) -> usize {
        self.stages.len() * 2
    }

    /// Bandwidth interpretation.
    pub fn bandwidth_mode(&self) -> BandwidthMode {
        self.mode
    }

    /// Cutoff or center frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff.get()
    }

    /// Sets the cutoff (clamped to 1 to 22000 Hz). Applied on the next update.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff.set(cutoff);
    }

    /// Bandwidth in the unit of the current [`BandwidthMode`].
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth.get()
    }

    /// Sets the bandwidth (clamped). Applied on the next update.
    pub fn set_bandwidth(&mut self, bandwidth: f32) {
        self.bandwidth.set(bandwidth);
    }

    /// Linear gain, used by peaking filters.
    pub fn gain(&self) -> f32 {
        self.gain.get()
    }

    /// Sets the linear gain (clamped to 0 to 2). Applied on the next update.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain.set(gain);
    }

    /// Sets all three parameters without updating the stages.
    pub fn set_parameters(&mut self, cutoff: f32, bandwidth: f32, gain: f32) {
        self.cutoff.set(cutoff);
        self.bandwidth.set(bandwidth);
        self.gain.set(gain);
    }

    /// Cutoff control.
    pub fn cutoff_control(&self) -> &FloatControl {
        &self.cutoff
    }

    /// Mutable cutoff control.
    pub fn cutoff_control_mut(&mut self) -> &mut FloatControl {
        &mut self.cutoff
    }

    /// Bandwidth control.
    pub fn bandwidth_control(&self) -> &FloatControl {
        &self.bandwidth
    }

    /// Mutable bandwidth control.
    pub fn bandwidth_control_mut(&mut self) -> &mut FloatControl {
        &mut self.bandwidth
    }

    /// Gain control.
    pub fn gain_control(&self) -> &FloatControl {
        &self.gain
    }

    /// Mutable gain control.
    pub fn gain_control_mut(&mut self) -> &mut FloatControl {
        &mut self.gain
    }

    /// Quality factor the next update will use.
    pub fn q(&self) -> f32 {
        self.mode.to_q(self.bandwidth.get())
    }

    /// Polls the controls and pushes new target coefficients into every stage.
    pub fn update(&mut self, sample_rate: f32) {
        let cutoff = self.cutoff.get();
        let q = self.q();
        let gain = self.gain.get();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            "cascade update: {} cutoff={cutoff} q={q} gain={gain} sr={sample_rate}",
            self.filter_type.name()
        );

        for stage in &mut self.stages {
            stage.update(self.filter_type, cutoff, q, gain, sample_rate);
        }
    }

    /// Sets all parameters, then updates the stages.
    pub fn update_with(&mut self, cutoff: f32, bandwidth: f32, gain: f32, sample_rate: f32) {
        self.set_parameters(cutoff, bandwidth, gain);
        self.update(sample_rate);
    }

    /// Clears every stage's history.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }

    /// Jumps every stage to its target coefficients.
    pub fn snap_to_target(&mut self) {
        for stage in &mut self.stages {
            stage.snap_to_target();
        }
    }

    /// Stages in processing order.
    pub fn stages(&self) -> &[BiquadStage] {
        &self.stages
    }
}

impl AudioFilter for CascadeFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.stages
            .iter_mut()
            .fold(input, |sample, stage| stage.process(sample))
    }

    fn reset(&mut self) {
        CascadeFilter::reset(self);
    }

    /// Same type, order, mode and parameter values; fresh stages.
    ///
    /// The copy has zeroed history and zeroed coefficients, and needs its own
    /// [`update`](CascadeFilter::update) before it produces output.
    fn copy_filter(&self) -> Self {
        let mut copy = Self {
            filter_type: self.filter_type,
            mode: self.mode,
            cutoff: FloatControl::new(CUTOFF),
            bandwidth: FloatControl::new(self.mode.descriptor()),
            gain: FloatControl::new(GAIN),
            stages: (0..self.stages.len()).map(|_| BiquadStage::new()).collect(),
        };
        copy.set_parameters(self.cutoff(), self.bandwidth(), self.gain());
        copy
    }
}

impl ParameterInfo for CascadeFilter {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(*self.cutoff.descriptor()),
            1 => Some(*self.bandwidth.descriptor()),
            2 => Some(*self.gain.descriptor()),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.cutoff.get(),
            1 => self.bandwidth.get(),
            2 => self.gain.get(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.cutoff.set(value),
            1 => self.bandwidth.set(value),
            2 => self.gain.set(value),
            _ => {}
        }
    }
}
