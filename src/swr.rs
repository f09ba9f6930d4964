use std::fmt;

use crate::adc::RawSensor;
use crate::clock::Clock;
use crate::config::{MIN_FORWARD_V, SWR_SENTINEL};
use crate::sampler::SignalSampler;

/// Standing-wave ratio: finite and `>= 1.0`, or the undefined sentinel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwrReading(f64);

impl SwrReading {
    /// No usable measurement (transmitter off or detector saturated).
    pub const UNDEFINED: SwrReading = SwrReading(SWR_SENTINEL);

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_undefined(self) -> bool {
        self.0 == SWR_SENTINEL
    }

    /// Ordering key where the sentinel is worse than any finite reading.
    fn rank(self) -> f64 {
        if self.is_undefined() {
            f64::INFINITY
        } else {
            self.0
        }
    }

    /// Strictly better than `previous`. Equal readings are not an improvement.
    pub fn improves_on(self, previous: SwrReading) -> bool {
        self.rank() < previous.rank()
    }

    pub fn meets(self, target: f64) -> bool {
        !self.is_undefined() && self.0 <= target
    }
}

impl fmt::Display for SwrReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            write!(f, "{:.1} (no signal)", self.0)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

/// SWR from forward and reflected detector voltages.
///
/// Negative inputs are clamped to zero. Returns [`SwrReading::UNDEFINED`]
/// when `v_forward <= 0.5` or `v_reflected >= v_forward`.
pub fn estimate(v_forward: f64, v_reflected: f64) -> SwrReading {
    let v_forward = v_forward.max(0.0);
    let v_reflected = v_reflected.max(0.0);

    if v_forward <= MIN_FORWARD_V || v_reflected >= v_forward {
        return SwrReading::UNDEFINED;
    }

    let gamma = v_reflected / v_forward;
    SwrReading((1.0 + gamma) / (1.0 - gamma))
}

/// Anything that can take a fresh SWR measurement.
pub trait SwrSource {
    fn measure(&mut self) -> SwrReading;
}

impl<R: RawSensor, C: Clock> SwrSource for SignalSampler<R, C> {
    /// Forward is always sampled before reflected.
    fn measure(&mut self) -> SwrReading {
        let v_forward = self.sample_forward();
        let v_reflected = self.sample_reflected();
        estimate(v_forward, v_reflected)
    }
}
