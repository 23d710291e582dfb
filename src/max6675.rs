//! # MAX6675 Protocol Driver
//!
//! Bit-banged read-only SPI for the MAX6675 thermocouple-to-digital converter.
//! The chip shifts out one 16-bit word per conversion, most significant bit
//! first:
//!
//! ```text
//!  D15   D14 .. D3        D2        D1      D0
//!  dummy 12-bit reading   open TC   dev ID  tri-state
//! ```
//!
//! One transaction is: select (CS low), settle, 16 clock pulses sampling SO
//! while the clock is low, deselect (CS high). The delays between clock edges
//! are hard minimums for the chip and are never skipped or batched.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, warn};

use crate::error::ThermocoupleError;

/// Delay after asserting chip-select before the first clock edge (ms).
pub const CS_SETTLE_MS: u32 = 1;

/// Delay between each clock transition (ms).
pub const HALF_CLOCK_MS: u32 = 1;

/// Bit D2: set when the thermocouple input is open.
pub const OPEN_CIRCUIT_BIT: u16 = 0x4;

/// Resolution of the 12-bit reading.
pub const CELSIUS_PER_LSB: f64 = 0.25;

/// D2..D0 carry status, not temperature.
const STATUS_BITS: u32 = 3;

/// Anything that can produce one raw Celsius reading on demand.
///
/// `NaN` means "no reading"; implementations never fail any other way.
pub trait TemperatureSource {
    fn read_raw_celsius(&mut self) -> f64;
}

/// True when the word reports a disconnected thermocouple.
pub fn is_open_circuit(word: u16) -> bool {
    word & OPEN_CIRCUIT_BIT != 0
}

/// Decode a raw 16-bit word into degrees Celsius, or `NaN` if the
/// thermocouple is open.
///
/// # Example
/// ```
/// use thermocouple_lib::max6675::decode_raw;
///
/// // 100 °C is 400 counts, shifted past the three status bits
/// assert_eq!(decode_raw(400 << 3), 100.0);
/// assert!(decode_raw((400 << 3) | 0x4).is_nan());
/// ```
pub fn decode_raw(word: u16) -> f64 {
    if is_open_circuit(word) {
        return f64::NAN;
    }
    f64::from(word >> STATUS_BITS) * CELSIUS_PER_LSB
}

/// MAX6675 driver over three GPIO lines and a blocking delay.
pub struct Max6675<SCK, CS, SO, D> {
    sck: SCK,
    cs: CS,
    so: SO,
    delay: D,
}

impl<SCK, CS, SO, D> Max6675<SCK, CS, SO, D>
where
    SCK: OutputPin,
    CS: OutputPin,
    SO: InputPin,
    D: DelayNs,
{
    /// Take ownership of the lines and deselect the chip.
    pub fn new(sck: SCK, cs: CS, so: SO, delay: D) -> Result<Self, ThermocoupleError> {
        let mut driver = Self {
            sck,
            cs,
            so,
            delay,
        };
        driver.cs.set_high().map_err(ThermocoupleError::pin)?;
        Ok(driver)
    }

    /// Run one full transaction and return the undecoded 16-bit word.
    ///
    /// If a line fails after the chip was selected, chip-select is still
    /// released before the first error is returned.
    pub fn read_raw(&mut self) -> Result<u16, ThermocoupleError> {
        self.cs.set_low().map_err(ThermocoupleError::pin)?;
        self.delay.delay_ms(CS_SETTLE_MS);

        let word = self.shift_in_word();
        let deselect = self.cs.set_high().map_err(ThermocoupleError::pin);

        let word = word?;
        deselect?;
        debug!("MAX6675 raw word 0x{:04X}", word);
        Ok(word)
    }

    /// Read one conversion as Celsius, with an open thermocouple reported as
    /// [`ThermocoupleError::OpenCircuit`] instead of `NaN`.
    pub fn read_temperature(&mut self) -> Result<f64, ThermocoupleError> {
        let word = self.read_raw()?;
        if is_open_circuit(word) {
            return Err(ThermocoupleError::OpenCircuit);
        }
        Ok(decode_raw(word))
    }

    /// Give the lines and the delay back to the caller.
    pub fn release(self) -> (SCK, CS, SO, D) {
        (self.sck, self.cs, self.so, self.delay)
    }

    fn shift_in_word(&mut self) -> Result<u16, ThermocoupleError> {
        let high = self.shift_in_byte()?;
        let low = self.shift_in_byte()?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Clock in eight bits, MSB first. SO is sampled while SCK is low.
    fn shift_in_byte(&mut self) -> Result<u8, ThermocoupleError> {
        let mut value = 0u8;
        for bit in (0..8).rev() {
            self.sck.set_low().map_err(ThermocoupleError::pin)?;
            self.delay.delay_ms(HALF_CLOCK_MS);

            if self.so.is_high().map_err(ThermocoupleError::pin)? {
                value |= 1 << bit;
            }

            self.sck.set_high().map_err(ThermocoupleError::pin)?;
            self.delay.delay_ms(HALF_CLOCK_MS);
        }
        Ok(value)
    }
}

impl<SCK, CS, SO, D> TemperatureSource for Max6675<SCK, CS, SO, D>
where
    SCK: OutputPin,
    CS: OutputPin,
    SO: InputPin,
    D: DelayNs,
{
    fn read_raw_celsius(&mut self) -> f64 {
        match self.read_raw() {
            Ok(word) => {
                if is_open_circuit(word) {
                    warn!("MAX6675 reports an open thermocouple");
                }
                decode_raw(word)
            }
            Err(e) => {
                warn!("MAX6675 transaction failed: {}", e);
                f64::NAN
            }
        }
    }
}
