use std::time::Duration;

use crate::adc::AdcChannel;

// ** MODE SWITCH CONFIGURATION ** //

/// GPIO pin for the MANUAL/AUTOMATED toggle (BCM numbering).
/// Pulled up: open = MANUAL, closed to ground = AUTOMATED.
pub const GPIO_MODE_SWITCH: u8 = 17;
/// Consecutive identical polls before a new switch level is accepted.
pub const MODE_DEBOUNCE_POLLS: u8 = 5;

//  ** SERVO CONFIGURATION ** //

/// Hardware PWM pins for the two servos.
/// - GPIO 18 (PWM0) drives the tuning capacitor (automated axis)
/// - GPIO 19 (PWM1) drives the antenna stub (manual-only axis)
pub const TUNING_SERVO_PIN: u8 = 18;
pub const ANTENNA_SERVO_PIN: u8 = 19;
/// Pulse width range for 0°..180° (microseconds)
pub const SERVO_MIN_PULSE_US: f64 = 544.0;
pub const SERVO_MAX_PULSE_US: f64 = 2400.0;
/// Standard servo PWM frequency (Hz)
pub const SERVO_FREQUENCY_HZ: f64 = 50.0;
/// Mechanical travel of the tuning servo (degrees)
pub const SERVO_MAX_ANGLE: u8 = 180;
/// Position a freshly attached servo is driven to.
pub const SERVO_HOME_ANGLE: u8 = 90;

// ** ADC CONFIGURATION ** //

/// MCP3008 on SPI0 / CE0
pub const SPI_CLOCK_HZ: u32 = 1_000_000;
pub const FORWARD_CHANNEL: AdcChannel = AdcChannel::Ch0;
pub const REFLECTED_CHANNEL: AdcChannel = AdcChannel::Ch1;
pub const TUNING_DIAL_CHANNEL: AdcChannel = AdcChannel::Ch2;
pub const ANTENNA_DIAL_CHANNEL: AdcChannel = AdcChannel::Ch3;
/// Highest code a 10-bit conversion can return.
pub const ADC_FULL_SCALE: u16 = 1023;
pub const ADC_REFERENCE_V: f64 = 3.3;
/// Detector output is halved by a resistive divider before the ADC.
pub const DETECTOR_DIVIDER_RATIO: f64 = 2.0;
/// Op-amp DC bias, measured with the `calibrate` tool (transmitter off).
pub const CALIBRATION_OFFSET_V: f64 = 0.08;
/// Raw readings averaged per sample.
pub const SAMPLE_COUNT: usize = 20;
pub const SAMPLE_PAUSE: Duration = Duration::from_millis(1);

// ** SWR CONFIGURATION ** //

/// Reported when no usable measurement exists.
pub const SWR_SENTINEL: f64 = 99.9;
/// Forward voltage at or below this means the transmitter is off.
pub const MIN_FORWARD_V: f64 = 0.5;

// ** TUNING CONFIGURATION ** //

pub const TARGET_SWR: f64 = 1.5;
/// Degrees moved per search step.
pub const STEP_DEGREES: i16 = 2;
/// Minimum spacing between search steps.
pub const TUNE_INTERVAL: Duration = Duration::from_millis(75);
/// Wait after a move before measuring.
pub const SETTLE_TIME: Duration = Duration::from_millis(30);

// ** MAIN CONFIGURATION ** //
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);
pub const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(1);
