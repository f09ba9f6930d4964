use thiserror::Error;

/// Failures while bringing up hardware or validating settings.
///
/// The tuning loop itself never produces one of these.
#[derive(Debug, Error)]
pub enum TunerError {
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("PWM error: {0}")]
    Pwm(#[from] rppal::pwm::Error),

    #[error("SPI error: {0}")]
    Spi(#[from] rppal::spi::Error),

    #[error("invalid PWM pin {0}, use 12, 13, 18, or 19")]
    InvalidPwmPin(u8),

    #[error("invalid tuning settings: {0}")]
    InvalidSettings(&'static str),
}

pub type Result<T> = std::result::Result<T, TunerError>;
