use crate::error::{Error, Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// Linear interpolation from v<sub>i</sub> to v<sub>f</sub> over `horizon` steps
///
/// v(t) = v<sub>i</sub> + min(t / max(1, horizon - 1), 1) * (v<sub>f</sub> - v<sub>i</sub>)
///
/// The value at `t = 0` is v<sub>i</sub> and the value at `t = horizon - 1` is v<sub>f</sub>.
/// A single-step horizon holds v<sub>i</sub> at `t = 0` instead of dividing by zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear {
    vi: f32,
    vf: f32,
    horizon: u32,
}

impl Linear {
    pub fn new(vi: f32, vf: f32, horizon: u32) -> Result<Self> {
        if horizon == 0 {
            return Err(Error::InvalidParameter(String::from(
                "linear decay horizon must be at least one step",
            )));
        }
        Ok(Self { vi, vf, horizon })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { vi, vf, horizon } = self;
        let span = horizon.saturating_sub(1).max(1) as f32;
        let frac = (t / span).clamp(0.0, 1.0);
        vi + frac * (vf - vi)
    }
}
