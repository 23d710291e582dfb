//! # Simulated Thermocouple
//!
//! A deterministic stand-in for the MAX6675 used when no GPIO hardware is
//! available (development hosts, demos, tests).
//!
//! ## Model
//! - **Signal**: a slow sine of `swing` °C around `base` °C, one full period
//!   every `period_reads` reads
//! - **Quantization**: every value is encoded into a MAX6675 word and decoded
//!   again with [`decode_raw`], so it has the chip's 0.25 °C resolution and
//!   0..=1023.75 °C range
//! - **Faults**: optionally every Nth read reports an open thermocouple (bit D2
//!   set), which decodes to `NaN` exactly like the real chip

use std::f64::consts::TAU;

use crate::max6675::{decode_raw, TemperatureSource, CELSIUS_PER_LSB, OPEN_CIRCUIT_BIT};

/// Largest count the 12-bit reading can hold.
const MAX_COUNTS: f64 = 4095.0;

/// Encode a Celsius value the way the MAX6675 would report it.
///
/// Values outside the chip's range saturate at 0 °C and 1023.75 °C.
pub fn encode_celsius(celsius: f64) -> u16 {
    let counts = (celsius / CELSIUS_PER_LSB).round().clamp(0.0, MAX_COUNTS) as u16;
    counts << 3
}

/// Synthetic temperature source.
#[derive(Clone, Debug)]
pub struct SimulatedChip {
    base_celsius: f64,
    swing_celsius: f64,
    period_reads: u32,
    open_every: Option<u32>,
    reads: u64,
}

impl Default for SimulatedChip {
    /// Room temperature with a ±2 °C drift over 40 reads.
    fn default() -> Self {
        SimulatedChip::new(25.0, 2.0, 40)
    }
}

impl SimulatedChip {
    pub fn new(base_celsius: f64, swing_celsius: f64, period_reads: u32) -> Self {
        SimulatedChip {
            base_celsius,
            swing_celsius,
            period_reads: period_reads.max(1),
            open_every: None,
            reads: 0,
        }
    }

    /// Report an open thermocouple on every `n`th read (0 disables it).
    pub fn with_open_circuit_every(mut self, n: u32) -> Self {
        self.open_every = if n == 0 { None } else { Some(n) };
        self
    }

    /// Number of device reads served so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Raw word returned by read number `n` (1-based).
    fn word_at(&self, n: u64) -> u16 {
        let phase = (n % u64::from(self.period_reads)) as f64 / f64::from(self.period_reads);
        let celsius = self.base_celsius + self.swing_celsius * (phase * TAU).sin();
        let word = encode_celsius(celsius);

        match self.open_every {
            Some(every) if n % u64::from(every) == 0 => word | OPEN_CIRCUIT_BIT,
            _ => word,
        }
    }
}

impl TemperatureSource for SimulatedChip {
    fn read_raw_celsius(&mut self) -> f64 {
        self.reads += 1;
        decode_raw(self.word_at(self.reads))
    }
}
