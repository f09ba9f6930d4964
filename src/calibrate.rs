use std::thread;
use std::time::Duration;

use swr_tuner::SystemClock;
use swr_tuner::adc::Mcp3008;
use swr_tuner::sampler::{Calibration, SignalSampler};

/// Running min / max / mean of one detector's averaged voltage.
struct BiasStats {
    min: f64,
    max: f64,
    total: f64,
    count: u32,
}

impl BiasStats {
    fn new() -> Self {
        Self {
            min: f64::MAX,
            max: f64::MIN,
            total: 0.0,
            count: 0,
        }
    }

    fn record(&mut self, volts: f64) {
        self.min = self.min.min(volts);
        self.max = self.max.max(volts);
        self.total += volts;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / f64::from(self.count)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║     Detector Offset Calibration Tool                 ║");
    println!("╚══════════════════════════════════════════════════════╝\n");

    println!("Instructions:");
    println!("1. Key the transmitter OFF (no RF on the bridge)");
    println!("2. Leave the detectors powered and connected to the ADC");
    println!("3. Let it run for at least 30 seconds");
    println!("4. Copy the suggested offset into CALIBRATION_OFFSET_V");
    println!("5. Press Ctrl+C when done\n");

    println!("Starting in 5 seconds...\n");
    thread::sleep(Duration::from_secs(5));

    // Measure with no bias correction applied.
    let calibration = Calibration::default().uncorrected();
    let mut sampler =
        SignalSampler::with_calibration(Mcp3008::new()?, SystemClock::new(), calibration);
    println!(
        "Scale: {:.5} V per code, offset {:.3} V\n",
        sampler.calibration().volts_per_code(),
        sampler.calibration().offset_volts
    );

    let mut forward = BiasStats::new();
    let mut reflected = BiasStats::new();

    println!("Collecting samples...");
    println!(
        "\n{:^8} | {:^20} | {:^20} | {:^18}",
        "Sample", "Forward (V)", "Reflected (V)", "Suggested Offset"
    );
    println!("{:-<8}-+-{:-<20}-+-{:-<20}-+-{:-<18}", "", "", "", "");

    loop {
        forward.record(sampler.sample_forward());
        reflected.record(sampler.sample_reflected());

        // Both detectors share one bias correction.
        let offset = (forward.mean() + reflected.mean()) / 2.0;

        if forward.count % 10 == 0 {
            println!(
                "{:^8} | {:>8.3} to {:>8.3} | {:>8.3} to {:>8.3} | {:>12.3} V",
                forward.count, forward.min, forward.max, reflected.min, reflected.max, offset
            );
        }

        thread::sleep(Duration::from_millis(100));
    }
}
