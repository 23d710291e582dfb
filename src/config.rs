//! # Configuration Management
//!
//! Two layers of configuration:
//! - [`SamplerConfig`]: the two sampler tunables (window size and minimum
//!   interval between device reads). Invalid values are never rejected; they
//!   are replaced by the defaults so the sampler always stays operable.
//! - [`MonitorConfig`]: everything the `max6675-monitor` binary needs, parsed
//!   from command-line flags.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::units::Scale;

/// Samples averaged when no window size is given.
pub const DEFAULT_READINGS_NUMBER: usize = 5;

/// Minimum time between device reads when none is given (ms). Polling the
/// MAX6675 faster than this makes it return the same conversion repeatedly.
pub const DEFAULT_DELAY_TIME_MS: u64 = 250;

/// Return `value` if it is positive, otherwise `default`.
pub fn validate<T>(value: T, default: T) -> T
where
    T: PartialOrd + Default,
{
    if value > T::default() {
        value
    } else {
        default
    }
}

/// Moving-average sampler settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SamplerConfig {
    /// Number of raw readings averaged (1 disables averaging)
    pub readings_number: usize,
    /// Minimum milliseconds between two device reads
    pub delay_time_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            readings_number: DEFAULT_READINGS_NUMBER,
            delay_time_ms: DEFAULT_DELAY_TIME_MS,
        }
    }
}

impl SamplerConfig {
    /// Build a config, substituting defaults for zero values.
    pub fn new(readings_number: usize, delay_time_ms: u64) -> Self {
        SamplerConfig {
            readings_number,
            delay_time_ms,
        }
        .validated()
    }

    /// Re-apply the substitute-default rule, e.g. after deserializing.
    pub fn validated(self) -> Self {
        SamplerConfig {
            readings_number: validate(self.readings_number, DEFAULT_READINGS_NUMBER),
            delay_time_ms: validate(self.delay_time_ms, DEFAULT_DELAY_TIME_MS),
        }
    }
}

/// GPIO line offsets on the host's gpiochip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PinConfig {
    /// Serial clock (output)
    pub sck: u32,
    /// Chip select, active low (output)
    pub cs: u32,
    /// Serial data out of the MAX6675 (input)
    pub so: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        // Raspberry Pi SPI0 header pins, driven as plain GPIO
        PinConfig {
            sck: 11,
            cs: 8,
            so: 9,
        }
    }
}

/// Output format of the monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Runtime options of the `max6675-monitor` binary
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// GPIO character device holding the three lines
    pub chip: String,
    pub pins: PinConfig,
    pub sampler: SamplerConfig,
    /// How often a reading is printed (ms)
    pub report_interval_ms: u64,
    pub scale: Scale,
    pub format: OutputFormat,
    /// Stop after this many reports; run forever when `None`
    pub count: Option<u64>,
    /// Use the simulated chip instead of GPIO hardware
    pub simulate: bool,
    pub verbose: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            chip: "/dev/gpiochip0".to_string(),
            pins: PinConfig::default(),
            sampler: SamplerConfig::default(),
            report_interval_ms: 1000,
            scale: Scale::Celsius,
            format: OutputFormat::Text,
            count: None,
            simulate: false,
            verbose: false,
        }
    }
}

impl MonitorConfig {
    /// Parse options from command-line arguments (program name excluded).
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = MonitorConfig::default();
        let mut readings_number = config.sampler.readings_number;
        let mut delay_time_ms = config.sampler.delay_time_ms;
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--json" => config.format = OutputFormat::Json,
                "--simulate" => config.simulate = true,
                "-v" | "--verbose" => config.verbose = true,
                "--chip" => config.chip = value_for(&flag, &mut args)?,
                "--sck" => config.pins.sck = parse_value(&flag, &mut args)?,
                "--cs" => config.pins.cs = parse_value(&flag, &mut args)?,
                "--so" => config.pins.so = parse_value(&flag, &mut args)?,
                "--window" => {
                    readings_number = parse_non_negative(&flag, &mut args)?;
                }
                "--interval" => delay_time_ms = parse_non_negative(&flag, &mut args)?,
                "--report" => {
                    config.report_interval_ms = parse_non_negative(&flag, &mut args)?;
                }
                "--count" => config.count = Some(parse_value(&flag, &mut args)?),
                "--scale" => config.scale = value_for(&flag, &mut args)?.parse()?,
                _ => return Err(ConfigError::UnknownFlag(flag)),
            }
        }

        config.sampler = SamplerConfig::new(readings_number, delay_time_ms);
        Ok(config)
    }
}

fn value_for<I>(flag: &str, args: &mut I) -> Result<String, ConfigError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

fn parse_value<T, I>(flag: &str, args: &mut I) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    I: Iterator<Item = String>,
{
    let value = value_for(flag, args)?;
    value.parse().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value,
    })
}

/// Negative numbers are accepted and clamped to zero, which the sampler
/// config then replaces with its default. Values that do not fit `T` are
/// rejected rather than truncated.
fn parse_non_negative<T, I>(flag: &str, args: &mut I) -> Result<T, ConfigError>
where
    T: TryFrom<u64>,
    I: Iterator<Item = String>,
{
    let value = value_for(flag, args)?;
    let invalid = || ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.clone(),
    };
    let number: i64 = value.parse().map_err(|_| invalid())?;
    T::try_from(number.max(0) as u64).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_config() {
        let config = SamplerConfig::default();
        assert_eq!(config.readings_number, 5);
        assert_eq!(config.delay_time_ms, 250);
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        assert_eq!(SamplerConfig::new(0, 0), SamplerConfig::default());
        assert_eq!(SamplerConfig::new(1, 0).readings_number, 1);
        assert_eq!(SamplerConfig::new(0, 10).delay_time_ms, 10);
    }

    #[test]
    fn test_validate_handles_signed_values() {
        assert_eq!(validate(-3i64, 5), 5);
        assert_eq!(validate(0i64, 5), 5);
        assert_eq!(validate(7i64, 5), 7);
        assert_eq!(validate(-0.5f64, 250.0), 250.0);
    }

    #[test]
    fn test_deserialized_config_is_revalidated() {
        let parsed: SamplerConfig =
            serde_json::from_str(r#"{"readings_number":0,"delay_time_ms":100}"#).unwrap();
        assert_eq!(parsed.validated(), SamplerConfig::new(5, 100));
    }

    #[test]
    fn test_no_args_gives_defaults() {
        let config = MonitorConfig::from_args(Vec::new()).unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn test_full_command_line() {
        let config = MonitorConfig::from_args(args(&[
            "--chip",
            "/dev/gpiochip1",
            "--sck",
            "21",
            "--cs",
            "20",
            "--so",
            "19",
            "--window",
            "10",
            "--interval",
            "500",
            "--scale",
            "f",
            "--count",
            "3",
            "--json",
            "--simulate",
            "-v",
        ]))
        .unwrap();

        assert_eq!(config.chip, "/dev/gpiochip1");
        assert_eq!(config.pins, PinConfig { sck: 21, cs: 20, so: 19 });
        assert_eq!(config.sampler, SamplerConfig::new(10, 500));
        assert_eq!(config.scale, Scale::Fahrenheit);
        assert_eq!(config.count, Some(3));
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.simulate);
        assert!(config.verbose);
    }

    #[test]
    fn test_non_positive_tunables_are_substituted() {
        let config =
            MonitorConfig::from_args(args(&["--window", "-2", "--interval", "0"])).unwrap();
        assert_eq!(config.sampler, SamplerConfig::default());
    }

    #[test]
    fn test_out_of_range_values_are_rejected_not_wrapped() {
        let mut narrow = args(&["4294967296"]).into_iter();
        assert_eq!(
            parse_non_negative::<u32, _>("--window", &mut narrow),
            Err(ConfigError::InvalidValue {
                flag: "--window".to_string(),
                value: "4294967296".to_string()
            })
        );

        let mut fits = args(&["4294967295"]).into_iter();
        assert_eq!(
            parse_non_negative::<u32, _>("--window", &mut fits),
            Ok(u32::MAX)
        );

        assert!(matches!(
            MonitorConfig::from_args(args(&["--window", "99999999999999999999"])),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bad_arguments_are_reported() {
        assert_eq!(
            MonitorConfig::from_args(args(&["--frobnicate"])),
            Err(ConfigError::UnknownFlag("--frobnicate".to_string()))
        );
        assert_eq!(
            MonitorConfig::from_args(args(&["--cs"])),
            Err(ConfigError::MissingValue("--cs".to_string()))
        );
        assert_eq!(
            MonitorConfig::from_args(args(&["--so", "nine"])),
            Err(ConfigError::InvalidValue {
                flag: "--so".to_string(),
                value: "nine".to_string()
            })
        );
    }
}
