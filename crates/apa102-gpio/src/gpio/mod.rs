//! GPIO seam.
//!
//! The driver only ever needs two output lines it can drive high or low; the
//! traits here are that capability and nothing more. The `rppal` feature
//! provides a Raspberry Pi backend; tests drive the protocol through a
//! recording backend instead of real pins.

use crate::Result;

#[cfg(feature = "rppal")]
pub mod rppal;

/// Logic level of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level for a single data bit.
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// A pin held in output mode.
pub trait OutputPin {
    /// Drives the line to the given level.
    fn write(&mut self, level: Level) -> Result<()>;
}

/// A GPIO controller that can hand out output pins.
pub trait Gpio {
    type Output: OutputPin;

    /// Acquires the given pin in output mode.
    fn open_output(&self, pin: u8) -> Result<Self::Output>;
}
