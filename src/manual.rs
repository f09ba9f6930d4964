use crate::adc::{AdcChannel, RawSensor};
use crate::clock::Clock;
use crate::config::{ADC_FULL_SCALE, SERVO_MAX_ANGLE};
use crate::sampler::SignalSampler;
use crate::servo::Actuator;

/// Map a potentiometer code onto servo degrees (integer, truncating).
pub fn dial_to_angle(raw: u16) -> u8 {
    let raw = u32::from(raw.min(ADC_FULL_SCALE));
    (raw * u32::from(SERVO_MAX_ANGLE) / u32::from(ADC_FULL_SCALE)) as u8
}

/// Point `servo` wherever the dial on `channel` is turned.
///
/// Returns the raw dial code and the commanded angle.
pub fn follow_dial<R: RawSensor, C: Clock>(
    servo: &mut impl Actuator,
    sampler: &mut SignalSampler<R, C>,
    channel: AdcChannel,
) -> (u16, u8) {
    let raw = sampler.read_raw(channel);
    let angle = dial_to_angle(raw);
    servo.write(angle);
    (raw, angle)
}
