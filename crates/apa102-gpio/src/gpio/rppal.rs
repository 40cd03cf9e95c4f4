//! Raspberry Pi GPIO backend via the `rppal` crate.

use tracing::info;

use super::{Gpio, Level, OutputPin};
use crate::Result;

impl From<Level> for rppal::gpio::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => rppal::gpio::Level::Low,
            Level::High => rppal::gpio::Level::High,
        }
    }
}

/// GPIO controller backed by the Broadcom SoC's GPIO block.
pub struct SystemGpio {
    chip: rppal::gpio::Gpio,
}

impl SystemGpio {
    /// Opens the system GPIO controller.
    pub fn new() -> Result<Self> {
        let chip = rppal::gpio::Gpio::new()?;
        Ok(Self { chip })
    }
}

impl Gpio for SystemGpio {
    type Output = rppal::gpio::OutputPin;

    fn open_output(&self, pin: u8) -> Result<Self::Output> {
        let pin = self.chip.get(pin)?.into_output();
        info!("Acquired BCM pin {} in output mode", pin.pin());
        Ok(pin)
    }
}

impl OutputPin for rppal::gpio::OutputPin {
    fn write(&mut self, level: Level) -> Result<()> {
        rppal::gpio::OutputPin::write(self, level.into());
        Ok(())
    }
}
