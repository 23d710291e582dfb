//! GPIO character-device lines for the MAX6675 (Linux, `hardware` feature).
//!
//! Clock and chip-select are requested as outputs, data as an input. Chip
//! select starts high so the chip is deselected from the first moment the
//! line is ours.

use anyhow::Context;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::{CdevPin, Delay};
use thermocouple_lib::{Max6675, PinConfig};

const CONSUMER: &str = "max6675-monitor";

pub type CdevMax6675 = Max6675<CdevPin, CdevPin, CdevPin, Delay>;

fn request_line(
    chip: &mut Chip,
    offset: u32,
    flags: LineRequestFlags,
    default: u8,
) -> anyhow::Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .with_context(|| format!("get GPIO line {offset}"))?
        .request(flags, default, CONSUMER)
        .with_context(|| format!("request GPIO line {offset}"))?;
    CdevPin::new(handle).with_context(|| format!("configure GPIO line {offset}"))
}

/// Open the three lines on `chip_path` and hand them to the driver.
pub fn open(chip_path: &str, pins: &PinConfig) -> anyhow::Result<CdevMax6675> {
    let mut chip = Chip::new(chip_path).with_context(|| format!("open {chip_path}"))?;

    let sck = request_line(&mut chip, pins.sck, LineRequestFlags::OUTPUT, 0)?;
    let cs = request_line(&mut chip, pins.cs, LineRequestFlags::OUTPUT, 1)?;
    let so = request_line(&mut chip, pins.so, LineRequestFlags::INPUT, 0)?;

    Max6675::new(sck, cs, so, Delay).context("deselect MAX6675")
}
