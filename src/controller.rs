//! Hill-climbing search that walks the tuning servo toward minimum SWR.
//!
//! One [`HillClimber::tick`] per supervisor poll while automated. After a
//! [`HillClimber::reset`] the first tick records a baseline reading; every
//! later tick (at most once per tune interval) steps the servo, measures,
//! and flips direction whenever the step failed to lower the SWR.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::{SERVO_MAX_ANGLE, SETTLE_TIME, STEP_DEGREES, TARGET_SWR, TUNE_INTERVAL};
use crate::error::{Result, TunerError};
use crate::servo::Actuator;
use crate::swr::{SwrReading, SwrSource};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TuneSettings {
    pub target_swr: f64,
    pub step_degrees: i16,
    pub tune_interval: Duration,
    pub settle_time: Duration,
}

impl Default for TuneSettings {
    fn default() -> Self {
        Self {
            target_swr: TARGET_SWR,
            step_degrees: STEP_DEGREES,
            tune_interval: TUNE_INTERVAL,
            settle_time: SETTLE_TIME,
        }
    }
}

impl TuneSettings {
    pub fn validate(&self) -> Result<()> {
        if self.step_degrees == 0 {
            return Err(TunerError::InvalidSettings("step must be nonzero"));
        }
        if self.step_degrees.unsigned_abs() > u16::from(SERVO_MAX_ANGLE) {
            return Err(TunerError::InvalidSettings("step exceeds servo travel"));
        }
        if self.target_swr.is_nan() || self.target_swr < 1.0 {
            return Err(TunerError::InvalidSettings("target SWR must be at least 1.0"));
        }
        Ok(())
    }
}

/// Everything the search remembers between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchState {
    /// Last angle commanded to the servo.
    pub position: u8,
    pub swr: SwrReading,
    /// Signed step in degrees, never zero.
    pub direction: i16,
    pub first_run: bool,
    /// When the last baseline or step started. `None` right after a reset.
    pub last_tune: Option<Duration>,
}

impl SearchState {
    pub fn at_limit(&self) -> bool {
        self.position == 0 || self.position == SERVO_MAX_ANGLE
    }
}

/// Outcome of one controller tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not searching: no reset yet, or manual mode.
    Idle,
    /// Starting SWR recorded, servo untouched.
    Baseline,
    /// Tune interval not yet elapsed.
    RateLimited,
    GoalReached,
    /// Servo sits at a travel stop.
    LimitReached,
    /// Stepped and SWR dropped; direction kept.
    Improved,
    /// Stepped without improvement; direction flipped.
    Reversed,
}

impl Phase {
    /// Search has stopped without error and waits for conditions to change.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GoalReached | Phase::LimitReached)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Baseline => "baseline",
            Phase::RateLimited => "waiting",
            Phase::GoalReached => "goal reached",
            Phase::LimitReached => "limit reached",
            Phase::Improved => "improved",
            Phase::Reversed => "reversed",
        };
        f.write_str(name)
    }
}

pub struct HillClimber<C> {
    settings: TuneSettings,
    clock: C,
    state: Option<SearchState>,
    last_phase: Phase,
}

impl<C: Clock> HillClimber<C> {
    pub fn new(settings: TuneSettings, clock: C) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            clock,
            state: None,
            last_phase: Phase::Idle,
        })
    }

    pub fn settings(&self) -> &TuneSettings {
        &self.settings
    }

    pub fn state(&self) -> Option<&SearchState> {
        self.state.as_ref()
    }

    /// Phase returned by the most recent tick.
    pub fn last_phase(&self) -> Phase {
        self.last_phase
    }

    /// Allow the goal to be re-evaluated against a new target.
    pub fn set_target_swr(&mut self, target_swr: f64) -> Result<()> {
        let settings = TuneSettings {
            target_swr,
            ..self.settings
        };
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Start a fresh search from wherever the actuator currently sits.
    pub fn reset(&mut self, actuator: &impl Actuator) {
        let position = actuator.read().min(SERVO_MAX_ANGLE);
        self.state = Some(SearchState {
            position,
            swr: SwrReading::UNDEFINED,
            direction: self.settings.step_degrees.abs(),
            first_run: true,
            last_tune: None,
        });
        self.last_phase = Phase::Idle;
        info!(position, "search reset");
    }

    pub fn tick(&mut self, actuator: &mut impl Actuator, meter: &mut impl SwrSource) -> Phase {
        let phase = match self.state.as_mut() {
            None => Phase::Idle,
            Some(state) => step(state, &self.settings, &self.clock, actuator, meter),
        };

        if phase.is_terminal() && phase != self.last_phase {
            if let Some(state) = &self.state {
                info!(position = state.position, swr = %state.swr, "search stopped: {}", phase);
            }
        }
        if phase != Phase::RateLimited {
            self.last_phase = phase;
        }
        phase
    }
}

fn step(
    state: &mut SearchState,
    settings: &TuneSettings,
    clock: &impl Clock,
    actuator: &mut impl Actuator,
    meter: &mut impl SwrSource,
) -> Phase {
    let now = clock.now();

    if state.first_run {
        state.swr = meter.measure();
        state.first_run = false;
        state.last_tune = Some(now);
        debug!(position = state.position, swr = %state.swr, "baseline");
        return Phase::Baseline;
    }

    if let Some(last) = state.last_tune
        && now.saturating_sub(last) < settings.tune_interval
    {
        return Phase::RateLimited;
    }

    if state.swr.meets(settings.target_swr) {
        return Phase::GoalReached;
    }
    if state.at_limit() {
        return Phase::LimitReached;
    }

    let candidate = (i16::from(state.position) + state.direction)
        .clamp(0, i16::from(SERVO_MAX_ANGLE)) as u8;
    actuator.write(candidate);
    clock.sleep(settings.settle_time);
    let swr = meter.measure();

    let phase = if swr.improves_on(state.swr) {
        Phase::Improved
    } else {
        state.direction = -state.direction;
        Phase::Reversed
    };

    debug!(
        from = state.position,
        to = candidate,
        previous = %state.swr,
        swr = %swr,
        direction = state.direction,
        "step {}",
        phase
    );

    state.position = candidate;
    state.swr = swr;
    state.last_tune = Some(now);
    phase
}
