//! Ties the mode switch, the manual passthrough and the hill climber into one
//! polling step.

use std::fmt;

use tracing::{debug, info};

use crate::adc::RawSensor;
use crate::clock::Clock;
use crate::config::{ANTENNA_DIAL_CHANNEL, TUNING_DIAL_CHANNEL};
use crate::controller::{HillClimber, Phase, TuneSettings};
use crate::error::Result;
use crate::manual::follow_dial;
use crate::mode::{Mode, ModeChange, ModeTracker};
use crate::sampler::SignalSampler;
use crate::servo::Actuator;
use crate::swr::SwrReading;

/// One line of diagnostics per poll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusRecord {
    pub mode: Mode,
    /// Raw tuning dial code; only read in manual mode.
    pub tuning_dial: Option<u16>,
    /// Tuning servo angle.
    pub position: u8,
    pub antenna_dial: u16,
    pub antenna_position: u8,
    /// Latest search reading; `None` until a baseline exists.
    pub swr: Option<SwrReading>,
    pub direction: Option<i16>,
    pub phase: Phase,
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.mode)?;
        if let Some(code) = self.tuning_dial {
            write!(f, "tx_dial={}, ", code)?;
        }
        write!(
            f,
            "tx_angle={}, ant_dial={}, ant_angle={}",
            self.position, self.antenna_dial, self.antenna_position
        )?;
        if let Some(swr) = self.swr {
            write!(f, ", swr={}", swr)?;
        }
        if let Some(direction) = self.direction {
            write!(f, ", dir={:+}", direction)?;
        }
        write!(f, ", phase={}", self.phase)
    }
}

/// Owns both servos, the ADC and the search.
///
/// The tuning servo follows its dial in manual mode and belongs to the
/// hill climber in automated mode. The antenna servo always follows its dial.
pub struct Supervisor<A, R, C> {
    tuning_servo: A,
    antenna_servo: A,
    sampler: SignalSampler<R, C>,
    climber: HillClimber<C>,
    tracker: ModeTracker,
}

impl<A: Actuator, R: RawSensor, C: Clock + Clone> Supervisor<A, R, C> {
    pub fn new(
        tuning_servo: A,
        antenna_servo: A,
        sensor: R,
        clock: C,
        settings: TuneSettings,
    ) -> Result<Self> {
        let climber = HillClimber::new(settings, clock.clone())?;
        Ok(Self {
            tuning_servo,
            antenna_servo,
            sampler: SignalSampler::new(sensor, clock),
            climber,
            tracker: ModeTracker::new(),
        })
    }

    pub fn with_tracker(mut self, tracker: ModeTracker) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn mode(&self) -> Mode {
        self.tracker.current()
    }

    pub fn climber(&self) -> &HillClimber<C> {
        &self.climber
    }

    /// Only MANUAL -> AUTOMATED restarts the search; leaving automated
    /// freezes it as is.
    pub fn on_mode_changed(&mut self, change: ModeChange) {
        info!(previous = %change.previous, next = %change.next, "mode changed");
        if change.enters_automated() {
            self.climber.reset(&self.tuning_servo);
        }
    }

    /// One pass of the control loop given the raw switch reading.
    pub fn run_once(&mut self, raw_mode: Mode) -> StatusRecord {
        if let Some(change) = self.tracker.observe(raw_mode) {
            self.on_mode_changed(change);
        }

        let (antenna_dial, antenna_position) =
            follow_dial(&mut self.antenna_servo, &mut self.sampler, ANTENNA_DIAL_CHANNEL);

        let mode = self.mode();
        let (tuning_dial, phase) = match mode {
            Mode::Automated => (
                None,
                self.climber.tick(&mut self.tuning_servo, &mut self.sampler),
            ),
            Mode::Manual => {
                let (code, _) =
                    follow_dial(&mut self.tuning_servo, &mut self.sampler, TUNING_DIAL_CHANNEL);
                (Some(code), Phase::Idle)
            }
        };

        let search = self.climber.state().filter(|state| !state.first_run);
        let record = StatusRecord {
            mode,
            tuning_dial,
            position: self.tuning_servo.read(),
            antenna_dial,
            antenna_position,
            swr: search.map(|state| state.swr),
            direction: search.map(|state| state.direction),
            phase,
        };
        debug!("{}", record);
        record
    }
}
