//! # MAX6675 Thermocouple Library
//!
//! Driver for the MAX6675 K-type thermocouple-to-digital converter, read over
//! a bit-banged serial link on three GPIO lines, with a moving-average sampler
//! on top.
//!
//! ## Design Philosophy
//!
//! ### Polling, not threads
//! Nothing runs in the background. The host calls [`Thermocouple::tick`] (or
//! [`Thermocouple::update`]) from its own loop; the sampler decides whether
//! enough time has passed to read the chip again. A chip transaction blocks
//! for about 33 ms of fixed bit delays and always runs to completion.
//!
//! ### Cheap reads
//! [`Thermocouple::read_celsius`], [`Thermocouple::read_fahrenheit`] and
//! [`Thermocouple::read_kelvin`] only return the cached mean. They never touch
//! the hardware.
//!
//! ### NaN means "unavailable"
//! A disconnected thermocouple, a failed pin operation and a window that has
//! not filled yet all surface as `NaN`. There is no other failure path on the
//! temperature side.
//!
//! ## Core Types
//! - [`Max6675`]: the protocol driver, generic over `embedded-hal` 1.0 pins
//!   and delay
//! - [`Thermocouple`]: time-gated moving-average sampler over any
//!   [`TemperatureSource`]
//! - [`SimulatedChip`]: synthetic source for hosts without hardware
//!
//! ## Example
//! ```
//! use thermocouple_lib::{SamplerConfig, SimulatedChip, Thermocouple};
//!
//! let chip = SimulatedChip::new(180.0, 0.0, 1);
//! let mut sensor = Thermocouple::with_config(chip, SamplerConfig::new(3, 250));
//!
//! for now_ms in [0, 300, 600] {
//!     sensor.tick(now_ms);
//! }
//! assert_eq!(sensor.read_celsius(), 180.0);
//! assert_eq!(sensor.read_fahrenheit(), 356.0);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod max6675;
pub mod sampler;
pub mod simulated;
pub mod units;

pub use clock::{Clock, StdClock};
pub use config::{MonitorConfig, OutputFormat, PinConfig, SamplerConfig};
pub use error::{ConfigError, ThermocoupleError};
pub use max6675::{decode_raw, Max6675, TemperatureSource};
pub use sampler::{Thermocouple, TickOutcome};
pub use simulated::SimulatedChip;
pub use units::Scale;
