pub mod adc;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod manual;
pub mod mode;
pub mod sampler;
pub mod servo;
pub mod supervisor;
pub mod swr;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use controller::{HillClimber, Phase, SearchState, TuneSettings};
pub use error::TunerError;
pub use mode::{Mode, ModeChange};
pub use supervisor::{StatusRecord, Supervisor};
pub use swr::{SwrReading, estimate};

#[cfg(test)]
pub(crate) mod mocks;
