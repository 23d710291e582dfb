//! Temperature scales and the two conversions the driver needs.
//!
//! All conversions pass `NaN` straight through, so an unavailable reading
//! stays unavailable in every scale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Scale a reading is reported in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl Scale {
    /// Convert a Celsius value into this scale.
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            Scale::Celsius => celsius,
            Scale::Fahrenheit => celsius_to_fahrenheit(celsius),
            Scale::Kelvin => celsius_to_kelvin(celsius),
        }
    }

    /// Unit suffix used when printing a value.
    pub fn symbol(self) -> &'static str {
        match self {
            Scale::Celsius => "°C",
            Scale::Fahrenheit => "°F",
            Scale::Kelvin => "K",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scale::Celsius => "celsius",
            Scale::Fahrenheit => "fahrenheit",
            Scale::Kelvin => "kelvin",
        };
        f.write_str(name)
    }
}

impl FromStr for Scale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(Scale::Celsius),
            "f" | "fahrenheit" => Ok(Scale::Fahrenheit),
            "k" | "kelvin" => Ok(Scale::Kelvin),
            _ => Err(ConfigError::InvalidScale(s.to_string())),
        }
    }
}

/// F = C * 9 / 5 + 32
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// K = C + 273.15
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boiling_point_converts_exactly() {
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_kelvin(100.0), 373.15);
    }

    #[test]
    fn freezing_point_and_crossover() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(celsius_to_kelvin(0.0), 273.15);
    }

    #[test]
    fn nan_stays_nan_in_every_scale() {
        for scale in [Scale::Celsius, Scale::Fahrenheit, Scale::Kelvin] {
            assert!(scale.convert(f64::NAN).is_nan(), "{scale} lost NaN");
        }
    }

    #[test]
    fn convert_applies_the_scale_formula() {
        assert_eq!(Scale::Celsius.convert(100.0), 100.0);
        assert_eq!(Scale::Fahrenheit.convert(100.0), 212.0);
        assert_eq!(Scale::Kelvin.convert(100.0), 373.15);
    }

    #[test]
    fn scale_parses_short_and_long_names() {
        assert_eq!("C".parse::<Scale>(), Ok(Scale::Celsius));
        assert_eq!("fahrenheit".parse::<Scale>(), Ok(Scale::Fahrenheit));
        assert_eq!("Kelvin".parse::<Scale>(), Ok(Scale::Kelvin));
        assert_eq!(
            "rankine".parse::<Scale>(),
            Err(ConfigError::InvalidScale("rankine".to_string()))
        );
    }
}
