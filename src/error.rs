//! # Error Types
//!
//! The temperature path itself reports failure in-band as `NaN` (see
//! [`crate::sampler`]). The types here cover the places where a typed error is
//! more useful: the raw protocol API and command-line configuration.

use embedded_hal::digital::ErrorKind;
use thiserror::Error;

/// Errors that can occur while talking to the MAX6675.
///
/// Pin errors are reduced to their [`ErrorKind`] so the error type does not
/// carry the HAL's concrete pin types around.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermocoupleError {
    /// A clock, chip-select or data line operation failed
    #[error("pin I/O failed: {0:?}")]
    Pin(ErrorKind),

    /// The chip set bit D2: no thermocouple is attached to its inputs
    #[error("thermocouple input is open (bit D2 set)")]
    OpenCircuit,
}

impl ThermocoupleError {
    pub(crate) fn pin<E: embedded_hal::digital::Error>(e: E) -> Self {
        ThermocoupleError::Pin(e.kind())
    }
}

/// Errors produced while parsing monitor options from the command line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown option: {0}")]
    UnknownFlag(String),

    #[error("option {0} expects a value")]
    MissingValue(String),

    #[error("invalid value {value:?} for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("unknown temperature scale {0:?} (expected celsius, fahrenheit or kelvin)")]
    InvalidScale(String),
}
