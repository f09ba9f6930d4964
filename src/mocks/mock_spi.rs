// This file is only compiled during tests
//
// Answers MCP3008 single-ended conversion requests from per-channel codes.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

use rppal::spi::Error;

thread_local! {
    static MOCK_CODES: RefCell<HashMap<u8, u16>> = RefCell::new(HashMap::new());
    static MOCK_FAILURE: Cell<bool> = const { Cell::new(false) };
    static MOCK_TRANSFERS: Cell<usize> = const { Cell::new(0) };
}

pub struct Spi {
    _clock_hz: u32,
}

impl Spi {
    pub fn new(clock_hz: u32) -> Result<Self, Error> {
        Ok(Spi {
            _clock_hz: clock_hz,
        })
    }

    pub fn transfer(&self, read_buffer: &mut [u8], write_buffer: &[u8]) -> Result<usize, Error> {
        MOCK_TRANSFERS.with(|count| count.set(count.get() + 1));
        if MOCK_FAILURE.with(Cell::get) {
            return Err(Error::Io(io::Error::other("mock SPI failure")));
        }

        // write_buffer[1] = (0x08 | channel) << 4
        let channel = (write_buffer[1] >> 4) & 0x07;
        let code = MOCK_CODES.with(|codes| codes.borrow().get(&channel).copied().unwrap_or(0));

        read_buffer[0] = 0xFF;
        read_buffer[1] = 0xF8 | ((code >> 8) as u8 & 0x03);
        read_buffer[2] = (code & 0xFF) as u8;
        Ok(read_buffer.len())
    }
}

// test helper to set the code a channel converts to
pub fn set_mock_channel_code(channel: u8, code: u16) {
    MOCK_CODES.with(|codes| {
        codes.borrow_mut().insert(channel, code);
    });
}

pub fn set_mock_spi_failure(fail: bool) {
    MOCK_FAILURE.with(|failure| failure.set(fail));
}

pub fn mock_transfer_count() -> usize {
    MOCK_TRANSFERS.with(Cell::get)
}

pub fn reset_mock_spi() {
    MOCK_CODES.with(|codes| codes.borrow_mut().clear());
    MOCK_FAILURE.with(|failure| failure.set(false));
    MOCK_TRANSFERS.with(|count| count.set(0));
}
