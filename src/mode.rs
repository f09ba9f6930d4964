use std::fmt;
use std::thread;
use std::time::Duration;

use rppal::gpio::Level;

use crate::config::{GPIO_MODE_SWITCH, MODE_DEBOUNCE_POLLS};
use crate::error::Result;

// Use rppal in production
#[cfg(not(test))]
use rppal::gpio::{Gpio, InputPin};

#[cfg(test)]
// This is only used in testing, not compiled in release.
use crate::mocks::mock_gpio::{Gpio, InputPin};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Operating mode requested by the front-panel switch.
pub enum Mode {
    Manual,
    Automated,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Manual => f.write_str("MANUAL"),
            Mode::Automated => f.write_str("AUTOMATED"),
        }
    }
}

/// A debounced mode edge.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ModeChange {
    pub previous: Mode,
    pub next: Mode,
}

impl ModeChange {
    pub fn enters_automated(&self) -> bool {
        self.previous == Mode::Manual && self.next == Mode::Automated
    }
}

/// The MANUAL/AUTOMATED toggle on a pulled-up GPIO input.
pub struct ModeSwitch {
    pin: InputPin,
}

impl ModeSwitch {
    pub fn new() -> Result<Self> {
        Self::with_pin(GPIO_MODE_SWITCH)
    }

    pub fn with_pin(pin: u8) -> Result<Self> {
        let gpio = Gpio::new()?;
        let pin = gpio.get(pin)?.into_input_pullup();

        // Let the pull-up settle before the first read.
        thread::sleep(Duration::from_millis(10));

        Ok(Self { pin })
    }

    /// Open switch (High) is MANUAL, closed to ground (Low) is AUTOMATED.
    pub fn read_mode(&self) -> Mode {
        match self.pin.read() {
            Level::High => Mode::Manual,
            Level::Low => Mode::Automated,
        }
    }
}

/// Tracks the accepted mode and turns stable level changes into edges.
///
/// Starts in [`Mode::Manual`]; a raw reading must repeat for
/// `MODE_DEBOUNCE_POLLS` consecutive polls before it is accepted.
pub struct ModeTracker {
    current: Mode,
    pending: Mode,
    stable_polls: u8,
    debounce_polls: u8,
}

impl ModeTracker {
    pub fn new() -> Self {
        Self::with_debounce(MODE_DEBOUNCE_POLLS)
    }

    pub fn with_debounce(debounce_polls: u8) -> Self {
        Self {
            current: Mode::Manual,
            pending: Mode::Manual,
            stable_polls: 0,
            debounce_polls: debounce_polls.max(1),
        }
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    pub fn observe(&mut self, raw: Mode) -> Option<ModeChange> {
        if raw == self.current {
            self.stable_polls = 0;
            self.pending = raw;
            return None;
        }

        if raw == self.pending {
            self.stable_polls = self.stable_polls.saturating_add(1);
        } else {
            self.pending = raw;
            self.stable_polls = 1;
        }

        if self.stable_polls < self.debounce_polls {
            return None;
        }

        let change = ModeChange {
            previous: self.current,
            next: raw,
        };
        self.current = raw;
        self.stable_polls = 0;
        Some(change)
    }
}

impl Default for ModeTracker {
    fn default() -> Self {
        Self::new()
    }
}
