//! # MAX6675 Monitor Entry Point
//!
//! Polls a MAX6675 thermocouple converter from the host's main loop and prints
//! the moving-average temperature at a fixed reporting interval. Runs against
//! real GPIO lines (Linux, `--features hardware`) or a simulated chip
//! (`--simulate`, and on every build without hardware support).
//!
//! Usage:
//!   max6675-monitor [--chip /dev/gpiochip0] [--sck 11] [--cs 8] [--so 9]
//!                   [--window 5] [--interval 250] [--report 1000]
//!                   [--scale celsius|fahrenheit|kelvin] [--count N]
//!                   [--json] [--simulate] [-v]

// Test modules
#[cfg(test)]
mod tests;

#[cfg(all(target_os = "linux", feature = "hardware"))]
mod gpio_lines;

use std::env;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use log::{info, LevelFilter};
use serde::Serialize;
use thermocouple_lib::{
    Clock, MonitorConfig, OutputFormat, Scale, SimulatedChip, StdClock, TemperatureSource,
    Thermocouple,
};

/// How often the main loop ticks the sampler.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Route `log` records to stderr. `RUST_LOG` overrides the level chosen by
/// `--verbose`. Calling this more than once keeps the first logger.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// One printed reading.
#[derive(Debug, Serialize)]
struct Report {
    timestamp: String,
    scale: Scale,
    /// `None` while the temperature is unavailable
    value: Option<f64>,
    window: usize,
    readings_number: usize,
}

impl Report {
    fn capture<S>(sensor: &Thermocouple<S>, scale: Scale, timestamp: String) -> Self {
        let value = sensor.read(scale);
        Report {
            timestamp,
            scale,
            value: (!value.is_nan()).then_some(value),
            window: sensor.window_len(),
            readings_number: sensor.readings_number(),
        }
    }

    fn render(&self, format: OutputFormat) -> anyhow::Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string(self).context("serialize report"),
            OutputFormat::Text => Ok(match self.value {
                Some(value) => format!("{}  {:.2} {}", self.timestamp, value, self.scale.symbol()),
                None => format!(
                    "{}  unavailable ({}/{} readings)",
                    self.timestamp, self.window, self.readings_number
                ),
            }),
        }
    }
}

/// Tick the sampler until `config.count` reports have been printed (forever
/// when no count is given).
fn run<S: TemperatureSource>(
    mut sensor: Thermocouple<S>,
    config: &MonitorConfig,
) -> anyhow::Result<()> {
    let clock = StdClock::new();
    let mut next_report_ms = 0;
    let mut reports = 0u64;

    loop {
        sensor.update(&clock);

        let now_ms = clock.now_ms();
        if now_ms >= next_report_ms {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let report = Report::capture(&sensor, config.scale, timestamp);
            println!("{}", report.render(config.format)?);

            reports += 1;
            next_report_ms = now_ms + config.report_interval_ms;
            if config.count.is_some_and(|count| reports >= count) {
                return Ok(());
            }
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn run_simulated(config: &MonitorConfig) -> anyhow::Result<()> {
    info!("using simulated thermocouple");
    let chip = SimulatedChip::default().with_open_circuit_every(25);
    run(Thermocouple::with_config(chip, config.sampler), config)
}

#[cfg(all(target_os = "linux", feature = "hardware"))]
fn run_hardware(config: &MonitorConfig) -> anyhow::Result<()> {
    let pins = &config.pins;
    info!(
        "MAX6675 on {}: SCK line {}, CS line {}, SO line {}",
        config.chip, pins.sck, pins.cs, pins.so
    );
    let driver = gpio_lines::open(&config.chip, pins)?;
    run(Thermocouple::with_config(driver, config.sampler), config)
}

#[cfg(not(all(target_os = "linux", feature = "hardware")))]
fn run_hardware(config: &MonitorConfig) -> anyhow::Result<()> {
    log::warn!("GPIO support not enabled. Rebuild on Linux with --features hardware.");
    run_simulated(config)
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let config = MonitorConfig::from_args(env::args().skip(1)).context("invalid arguments")?;
    init_logging(config.verbose);

    info!(
        "averaging {} readings, at most one read every {} ms",
        config.sampler.readings_number, config.sampler.delay_time_ms
    );

    if config.simulate {
        run_simulated(&config)
    } else {
        run_hardware(&config)
    }
}
