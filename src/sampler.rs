//! Noise-suppressed voltage acquisition for the RF detectors.

use std::time::Duration;

use crate::adc::{AdcChannel, RawSensor};
use crate::clock::Clock;
use crate::config::{
    ADC_FULL_SCALE, ADC_REFERENCE_V, CALIBRATION_OFFSET_V, DETECTOR_DIVIDER_RATIO,
    FORWARD_CHANNEL, REFLECTED_CHANNEL, SAMPLE_COUNT, SAMPLE_PAUSE,
};

/// Raw-code to volts conversion for one detector front end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub reference_voltage: f64,
    pub divider_ratio: f64,
    pub full_scale_code: u16,
    /// Subtracted after conversion (op-amp DC bias).
    pub offset_volts: f64,
}

impl Calibration {
    pub fn volts_per_code(&self) -> f64 {
        self.reference_voltage * self.divider_ratio / f64::from(self.full_scale_code)
    }

    pub fn to_volts(&self, mean_code: f64) -> f64 {
        mean_code * self.volts_per_code() - self.offset_volts
    }

    /// Same front end with no bias correction, used while measuring the bias.
    pub fn uncorrected(self) -> Self {
        Self {
            offset_volts: 0.0,
            ..self
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            reference_voltage: ADC_REFERENCE_V,
            divider_ratio: DETECTOR_DIVIDER_RATIO,
            full_scale_code: ADC_FULL_SCALE,
            offset_volts: CALIBRATION_OFFSET_V,
        }
    }
}

/// Averages bursts of raw conversions into calibrated voltages.
///
/// Owns the ADC, so the potentiometers are read through [`SignalSampler::read_raw`].
pub struct SignalSampler<R, C> {
    sensor: R,
    clock: C,
    calibration: Calibration,
    sample_count: usize,
    sample_pause: Duration,
    forward_channel: AdcChannel,
    reflected_channel: AdcChannel,
}

impl<R: RawSensor, C: Clock> SignalSampler<R, C> {
    pub fn new(sensor: R, clock: C) -> Self {
        Self::with_calibration(sensor, clock, Calibration::default())
    }

    pub fn with_calibration(sensor: R, clock: C, calibration: Calibration) -> Self {
        Self {
            sensor,
            clock,
            calibration,
            sample_count: SAMPLE_COUNT,
            sample_pause: SAMPLE_PAUSE,
            forward_channel: FORWARD_CHANNEL,
            reflected_channel: REFLECTED_CHANNEL,
        }
    }

    /// Change the burst length. A count of zero is raised to one.
    pub fn with_sample_count(mut self, count: usize, pause: Duration) -> Self {
        self.sample_count = count.max(1);
        self.sample_pause = pause;
        self
    }

    pub fn with_channels(mut self, forward: AdcChannel, reflected: AdcChannel) -> Self {
        self.forward_channel = forward;
        self.reflected_channel = reflected;
        self
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Mean of `sample_count` raw codes, each followed by the settling pause.
    ///
    /// Blocks for roughly `sample_count * (conversion + pause)`.
    pub fn mean_code(&mut self, channel: AdcChannel) -> f64 {
        let mut total: u64 = 0;
        for _ in 0..self.sample_count {
            total += u64::from(self.sensor.read_raw(channel));
            self.clock.sleep(self.sample_pause);
        }
        total as f64 / self.sample_count as f64
    }

    /// Averaged, calibrated voltage on `channel`, never below zero.
    pub fn sample(&mut self, channel: AdcChannel) -> f64 {
        let mean = self.mean_code(channel);
        self.calibration.to_volts(mean).max(0.0)
    }

    pub fn sample_forward(&mut self) -> f64 {
        self.sample(self.forward_channel)
    }

    pub fn sample_reflected(&mut self) -> f64 {
        self.sample(self.reflected_channel)
    }

    /// One unaveraged conversion, for the position potentiometers.
    pub fn read_raw(&mut self, channel: AdcChannel) -> u16 {
        self.sensor.read_raw(channel)
    }
}
