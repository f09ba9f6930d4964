use tracing::warn;

use crate::config::SPI_CLOCK_HZ;
use crate::error::Result;

// Use rppal in production
#[cfg(not(test))]
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

// Mock SPI for testing
#[cfg(test)]
use crate::mocks::mock_spi::Spi;

/// Single-ended MCP3008 input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdcChannel {
    Ch0 = 0,
    Ch1 = 1,
    Ch2 = 2,
    Ch3 = 3,
    Ch4 = 4,
    Ch5 = 5,
    Ch6 = 6,
    Ch7 = 7,
}

impl AdcChannel {
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Blocking, fixed-latency raw conversions in `[0, full scale]`.
pub trait RawSensor {
    fn read_raw(&mut self, channel: AdcChannel) -> u16;
}

/// 10-bit, 8-channel SPI ADC on SPI0 / CE0.
pub struct Mcp3008 {
    spi: Spi,
}

impl Mcp3008 {
    pub fn new() -> Result<Self> {
        #[cfg(not(test))]
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)?;

        #[cfg(test)]
        let spi = Spi::new(SPI_CLOCK_HZ)?;

        Ok(Self { spi })
    }
}

impl RawSensor for Mcp3008 {
    /// A failed transfer reads as 0, which the SWR estimator treats as
    /// "transmitter off".
    fn read_raw(&mut self, channel: AdcChannel) -> u16 {
        // Start bit, single-ended mode + channel, then clock out 10 bits.
        let tx = [0x01, (0x08 | channel.index()) << 4, 0x00];
        let mut rx = [0u8; 3];

        match self.spi.transfer(&mut rx, &tx) {
            Ok(_) => (u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]),
            Err(e) => {
                warn!(?channel, "ADC transfer failed: {}", e);
                0
            }
        }
    }
}
