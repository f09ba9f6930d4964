use tracing::warn;

use crate::config::{
    SERVO_FREQUENCY_HZ, SERVO_HOME_ANGLE, SERVO_MAX_ANGLE, SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US,
};
use crate::error::{Result, TunerError};

// Use rppal in production
#[cfg(not(test))]
use rppal::pwm::{Channel, Polarity, Pwm};

// Mock PWM for testing
#[cfg(test)]
use crate::mocks::mock_pwm::Pwm;

/// A positioner commanded in whole degrees.
pub trait Actuator {
    /// Move to `angle`, clamped to `0..=180`.
    fn write(&mut self, angle: u8);

    /// Last commanded angle.
    fn read(&self) -> u8;
}

/// Hobby servo on one of the Pi's hardware PWM channels.
pub struct Servo {
    pwm: Pwm,
    pin: u8,
    angle: u8,
}

impl Servo {
    /// Attach a servo to a hardware PWM pin and drive it to the home angle.
    ///
    /// Hardware PWM is available on:
    /// - GPIO 12 / 18 (PWM0)
    /// - GPIO 13 / 19 (PWM1)
    pub fn attach(pin: u8) -> Result<Self> {
        let home_duty = duty_cycle_for(SERVO_HOME_ANGLE);

        #[cfg(not(test))]
        let pwm = {
            let channel = match pin {
                12 | 18 => Channel::Pwm0,
                13 | 19 => Channel::Pwm1,
                _ => return Err(TunerError::InvalidPwmPin(pin)),
            };
            Pwm::with_frequency(
                channel,
                SERVO_FREQUENCY_HZ,
                home_duty,
                Polarity::Normal,
                true, // enabled
            )?
        };

        #[cfg(test)]
        let pwm = match pin {
            12 | 13 | 18 | 19 => Pwm::new(pin, home_duty)?,
            _ => return Err(TunerError::InvalidPwmPin(pin)),
        };

        Ok(Self {
            pwm,
            pin,
            angle: SERVO_HOME_ANGLE,
        })
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Disable PWM output
    pub fn disable(&mut self) -> Result<()> {
        self.pwm.disable()?;
        Ok(())
    }
}

impl Actuator for Servo {
    fn write(&mut self, angle: u8) {
        let angle = angle.min(SERVO_MAX_ANGLE);
        // Position is tracked even if the write fails: it is what was commanded.
        self.angle = angle;
        if let Err(e) = self.pwm.set_duty_cycle(duty_cycle_for(angle)) {
            warn!(pin = self.pin, angle, "servo write failed: {}", e);
        }
    }

    fn read(&self) -> u8 {
        self.angle
    }
}

impl Drop for Servo {
    fn drop(&mut self) {
        // Stop holding position when the servo goes away.
        let _ = self.disable();
    }
}

/// Pulse width for an angle: 0° → min pulse, 180° → max pulse.
pub fn pulse_width_us(angle: u8) -> f64 {
    let angle = f64::from(angle.min(SERVO_MAX_ANGLE));
    SERVO_MIN_PULSE_US
        + (angle / f64::from(SERVO_MAX_ANGLE)) * (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US)
}

/// Duty cycle for an angle at the servo frame rate.
fn duty_cycle_for(angle: u8) -> f64 {
    // Period = 1/50Hz = 20ms = 20000μs
    let period_us = 1_000_000.0 / SERVO_FREQUENCY_HZ;
    pulse_width_us(angle) / period_us
}
