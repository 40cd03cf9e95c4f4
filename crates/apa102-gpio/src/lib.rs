//! APA102 LED Chain Driver
//!
//! Drives a fixed-length chain of APA102-style addressable RGB LEDs over two
//! bit-banged GPIO lines (DATA and CLOCK). The chain is a shift register: a
//! write transaction clocks out a start frame, one 4-byte block per LED, and
//! an end frame that latches the shifted data into the LED outputs.

pub mod config;
pub mod error;
pub mod gpio;
pub mod led;

pub use config::ChainConfig;
pub use error::{Error, Result};
pub use gpio::{Gpio, Level, OutputPin};
pub use led::{Led, LedChain, LedState};

/// Default BCM pin number for the DATA line.
pub const DATA_PIN: u8 = 23;

/// Default BCM pin number for the CLOCK line.
pub const CLOCK_PIN: u8 = 24;

/// Default number of LEDs in the chain.
pub const DEFAULT_CHAIN_LENGTH: usize = 8;
