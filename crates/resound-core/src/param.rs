//! Range-bounded parameters exposed to control surfaces.
//!
//! Filters expose their tunable values (cutoff, bandwidth, gain) as
//! [`FloatControl`]s. Each control carries a [`ParamDescriptor`] with its
//! display name, unit and bounds; the stored value is always clamped into
//! `[min, max]`. Nothing is pushed anywhere when a value changes: the owner
//! polls its controls when it recomputes coefficients.
//!
//! [`ParameterInfo`] gives index-based access for generic UIs, presets and
//! host automation.
//!
//! # Example
//!
//! ```rust
//! use resound_core::{FloatControl, ParamDescriptor, ParamUnit};
//!
//! let mut cutoff = FloatControl::new(ParamDescriptor {
//!     name: "Cutoff",
//!     short_name: "Cut",
//!     unit: ParamUnit::Hertz,
//!     min: 1.0,
//!     max: 22000.0,
//!     default: 4000.0,
//! });
//!
//! cutoff.set(50000.0);
//! assert_eq!(cutoff.get(), 22000.0);
//! ```

/// Unit of a parameter value, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamUnit {
    /// Frequency in Hz.
    Hertz,
    /// Bandwidth in octaves.
    Octaves,
    /// Unitless ratio (Q, linear gain).
    #[default]
    Ratio,
}

impl ParamUnit {
    /// Suffix used when formatting values.
    pub fn suffix(self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Octaves => " oct",
            ParamUnit::Ratio => "",
        }
    }
}

/// Static description of a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name.
    pub name: &'static str,
    /// Abbreviated name for narrow displays.
    pub short_name: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Lower bound (inclusive).
    pub min: f32,
    /// Upper bound (inclusive).
    pub max: f32,
    /// Initial value.
    pub default: f32,
}

impl ParamDescriptor {
    /// Clamps `value` into `[min, max]`. NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        let value = if value.is_nan() { self.default } else { value };
        value.clamp(self.min, self.max)
    }

    /// Maps `value` linearly into `[0, 1]`, clamped.
    pub fn normalize(&self, value: f32) -> f32 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// A named float value that always stays within its descriptor's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatControl {
    descriptor: ParamDescriptor,
    value: f32,
}

impl FloatControl {
    /// Creates a control holding the descriptor's (clamped) default.
    pub fn new(descriptor: ParamDescriptor) -> Self {
        Self {
            value: descriptor.clamp(descriptor.default),
            descriptor,
        }
    }

    /// Sets the value, clamped into `[min, max]`. NaN restores the default.
    #[inline]
    pub fn set(&mut self, value: f32) {
        self.value = self.descriptor.clamp(value);
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.value
    }

    /// Current value mapped into `[0, 1]`.
    pub fn normalized(&self) -> f32 {
        self.descriptor.normalize(self.value)
    }

    /// Restores the default value.
    pub fn reset_to_default(&mut self) {
        self.set(self.descriptor.default);
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Lower bound.
    pub fn min(&self) -> f32 {
        self.descriptor.min
    }

    /// Upper bound.
    pub fn max(&self) -> f32 {
        self.descriptor.max
    }

    /// Static description.
    pub fn descriptor(&self) -> &ParamDescriptor {
        &self.descriptor
    }
}

impl core::fmt::Display for FloatControl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}: {:.2}{} [{:.2}, {:.2}]",
            self.descriptor.name,
            self.value,
            self.descriptor.unit.suffix(),
            self.descriptor.min,
            self.descriptor.max
        )
    }
}

/// Index-based parameter introspection.
///
/// Implementors return `None`/`0.0` for out-of-range indices and ignore
/// writes to them.
pub trait ParameterInfo {
    /// Number of parameters.
    fn param_count(&self) -> usize;

    /// Descriptor of parameter `index`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of parameter `index`.
    fn get_param(&self, index: usize) -> f32;

    /// Sets parameter `index`; the value is clamped into its range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Finds a parameter index by name or short name, ignoring case.
    fn find_param(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|d| {
                d.name.eq_ignore_ascii_case(name) || d.short_name.eq_ignore_ascii_case(name)
            })
        })
    }
}
