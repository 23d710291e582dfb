//! # Moving-Average Sampler
//!
//! [`Thermocouple`] wraps a [`TemperatureSource`] (normally the
//! [`Max6675`](crate::max6675::Max6675) driver), rate-limits device reads and
//! keeps a fixed-window moving average of the accepted readings.
//!
//! ## Polling model
//! The caller drives everything by calling [`Thermocouple::tick`] (or
//! [`Thermocouple::update`]) from its main loop. A tick reads the device at
//! most once, and only when more than the configured delay time has passed
//! since the previous read. Temperature queries never touch the device; they
//! return the cached mean.
//!
//! ## Warm-up
//! The mean is all-or-nothing: every query returns `NaN` until the window has
//! been filled once, and again after each change of the window size. There is
//! no partial average over a half-filled window.
//!
//! ## Window normalization
//! Each reading is stored already divided by the window size, so the mean is
//! just the sum of the window. This is why resizing discards the window
//! instead of keeping the old entries.

use std::collections::VecDeque;

use log::{debug, info};

use crate::clock::Clock;
use crate::config::{validate, SamplerConfig, DEFAULT_DELAY_TIME_MS, DEFAULT_READINGS_NUMBER};
use crate::max6675::TemperatureSource;
use crate::units::{celsius_to_fahrenheit, celsius_to_kelvin, Scale};

/// Upper bound on the window slots reserved up front; larger windows grow
/// as readings arrive.
const MAX_PREALLOCATED_POINTS: usize = 64;

/// What a call to [`Thermocouple::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The minimum interval had not elapsed; the device was not read
    Idle,
    /// The device was read and the reading (°C) entered the window
    Sampled(f64),
    /// The device was read but reported no temperature
    NoReading,
}

/// Bounded FIFO of readings pre-divided by the window size.
#[derive(Debug)]
struct SampleWindow {
    points: VecDeque<f64>,
    capacity: usize,
}

impl SampleWindow {
    fn new(capacity: usize) -> Self {
        SampleWindow {
            points: VecDeque::with_capacity(capacity.min(MAX_PREALLOCATED_POINTS)),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest one first if the window is full.
    fn push(&mut self, celsius: f64) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(celsius / self.capacity as f64);
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn is_full(&self) -> bool {
        self.points.len() == self.capacity
    }

    fn sum(&self) -> f64 {
        self.points.iter().sum()
    }
}

/// Thermocouple reader with time-gated sampling and a moving average.
///
/// The window and the cached mean always change together inside
/// [`tick`](Self::tick). A host that shares one sampler between threads must
/// put the whole `Thermocouple` behind a single lock (e.g. `Mutex`) so no
/// reader observes a mean that does not match the window.
///
/// # Example
/// ```
/// use thermocouple_lib::max6675::TemperatureSource;
/// use thermocouple_lib::{SamplerConfig, Thermocouple, TickOutcome};
///
/// struct Fixed(f64);
/// impl TemperatureSource for Fixed {
///     fn read_raw_celsius(&mut self) -> f64 {
///         self.0
///     }
/// }
///
/// let mut sensor = Thermocouple::with_config(Fixed(21.5), SamplerConfig::new(2, 100));
/// assert_eq!(sensor.tick(0), TickOutcome::Sampled(21.5));
/// assert!(sensor.read_celsius().is_nan());
/// assert_eq!(sensor.tick(50), TickOutcome::Idle);
/// sensor.tick(101);
/// assert_eq!(sensor.read_celsius(), 21.5);
/// ```
#[derive(Debug)]
pub struct Thermocouple<S> {
    source: S,
    config: SamplerConfig,
    window: SampleWindow,
    mean_celsius: f64,
    last_update_ms: Option<u64>,
}

impl<S: TemperatureSource> Thermocouple<S> {
    /// Sampler with the default window (5 readings) and delay (250 ms).
    pub fn new(source: S) -> Self {
        Self::with_config(source, SamplerConfig::default())
    }

    pub fn with_config(source: S, config: SamplerConfig) -> Self {
        let config = config.validated();
        Thermocouple {
            source,
            config,
            window: SampleWindow::new(config.readings_number),
            mean_celsius: f64::NAN,
            last_update_ms: None,
        }
    }

    /// Advance the sampler to `now_ms`.
    ///
    /// Reads the device once if more than the delay time has passed since the
    /// last read (the very first tick always reads). A `NaN` reading leaves
    /// the window untouched.
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        if let Some(last) = self.last_update_ms {
            if now_ms.saturating_sub(last) <= self.config.delay_time_ms {
                return TickOutcome::Idle;
            }
        }
        self.last_update_ms = Some(now_ms);

        let celsius = self.source.read_raw_celsius();
        if celsius.is_nan() {
            debug!("no reading at {} ms, window unchanged", now_ms);
            return TickOutcome::NoReading;
        }

        self.window.push(celsius);
        self.recalculate_mean();
        debug!(
            "sampled {:.2} °C at {} ms ({}/{} in window)",
            celsius,
            now_ms,
            self.window.len(),
            self.config.readings_number
        );
        TickOutcome::Sampled(celsius)
    }

    /// [`tick`](Self::tick) with the time taken from a host clock.
    pub fn update<C: Clock>(&mut self, clock: &C) -> TickOutcome {
        self.tick(clock.now_ms())
    }
}

impl<S> Thermocouple<S> {
    /// Mean temperature in Celsius, or `NaN` until the window is full.
    pub fn read_celsius(&self) -> f64 {
        self.mean_celsius
    }

    /// Mean temperature in Fahrenheit, or `NaN` until the window is full.
    pub fn read_fahrenheit(&self) -> f64 {
        celsius_to_fahrenheit(self.read_celsius())
    }

    #[deprecated(note = "use read_fahrenheit")]
    pub fn read_farenheit(&self) -> f64 {
        self.read_fahrenheit()
    }

    /// Mean temperature in Kelvin, or `NaN` until the window is full.
    pub fn read_kelvin(&self) -> f64 {
        celsius_to_kelvin(self.read_celsius())
    }

    pub fn read(&self, scale: Scale) -> f64 {
        scale.convert(self.read_celsius())
    }

    /// Change the window size (0 selects the default) and start over with an
    /// empty window. The read gate keeps its timestamp.
    pub fn set_readings_number(&mut self, readings_number: usize) {
        let readings_number = validate(readings_number, DEFAULT_READINGS_NUMBER);
        self.config.readings_number = readings_number;
        self.window = SampleWindow::new(readings_number);
        self.mean_celsius = f64::NAN;
        info!("moving average window reset to {} readings", readings_number);
    }

    /// Change the minimum interval between device reads (0 selects the default).
    pub fn set_delay_time(&mut self, delay_time_ms: u64) {
        self.config.delay_time_ms = validate(delay_time_ms, DEFAULT_DELAY_TIME_MS);
        info!("read interval set to {} ms", self.config.delay_time_ms);
    }

    pub fn readings_number(&self) -> usize {
        self.config.readings_number
    }

    pub fn delay_time(&self) -> u64 {
        self.config.delay_time_ms
    }

    pub fn config(&self) -> SamplerConfig {
        self.config
    }

    /// Number of readings currently held in the window.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// True once the window is full and the mean is a real temperature.
    pub fn is_ready(&self) -> bool {
        self.window.is_full()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Entries are pre-divided, so the sum of a full window is the mean.
    fn recalculate_mean(&mut self) {
        if !self.window.is_full() {
            self.mean_celsius = f64::NAN;
            return;
        }
        self.mean_celsius = self.window.sum();
    }
}
