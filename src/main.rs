use tracing::info;
use tracing_subscriber::EnvFilter;

use swr_tuner::adc::Mcp3008;
use swr_tuner::config::{
    ANTENNA_SERVO_PIN, GPIO_MODE_SWITCH, POLL_INTERVAL, STATUS_LOG_INTERVAL, TUNING_SERVO_PIN,
};
use swr_tuner::mode::ModeSwitch;
use swr_tuner::servo::Servo;
use swr_tuner::{Clock, StatusRecord, Supervisor, SystemClock, TuneSettings};

// Usage:
//  MANUAL (switch open):     both dials position both servos directly
//  AUTOMATED (switch closed): the tuning servo hill-climbs toward the target SWR,
//                             the antenna servo keeps following its dial
//  Flipping MANUAL → AUTOMATED restarts the search from the current servo angle.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting SWR tuner...");

    let clock = SystemClock::new();
    let tuning_servo = Servo::attach(TUNING_SERVO_PIN)?;
    let antenna_servo = Servo::attach(ANTENNA_SERVO_PIN)?;
    let adc = Mcp3008::new()?;
    let switch = ModeSwitch::new()?;

    info!(
        tuning_pin = TUNING_SERVO_PIN,
        antenna_pin = ANTENNA_SERVO_PIN,
        switch_pin = GPIO_MODE_SWITCH,
        "hardware initialized"
    );

    let settings = TuneSettings::default();
    info!(
        target_swr = settings.target_swr,
        step = settings.step_degrees,
        interval_ms = settings.tune_interval.as_millis() as u64,
        "tuning settings"
    );

    let mut supervisor = Supervisor::new(tuning_servo, antenna_servo, adc, clock, settings)?;
    let mut last_status_update = clock.now();
    let mut last_record: Option<StatusRecord> = None;

    // Main control loop
    loop {
        let record = supervisor.run_once(switch.read_mode());

        let changed = last_record.is_none_or(|last| {
            last.mode != record.mode || (record.phase.is_terminal() && last.phase != record.phase)
        });
        if changed || clock.now() - last_status_update >= STATUS_LOG_INTERVAL {
            info!("{}", record);
            last_status_update = clock.now();
        }
        last_record = Some(record);

        clock.sleep(POLL_INTERVAL);
    }
}
