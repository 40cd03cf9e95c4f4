//! Error types for the APA102 chain driver.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when mutating LED state or driving the pins.
#[derive(Error, Debug)]
pub enum Error {
    /// LED index outside 1..=chain_length.
    #[error("LED index {index} out of range (chain length {chain_length})")]
    IndexOutOfRange { index: usize, chain_length: usize },

    /// Brightness outside 0.0..=1.0 (or NaN). Carries the whole rejected
    /// slot so the caller can see exactly what it asked for.
    #[error(
        "invalid brightness {brightness} for LED {index} \
         (r={red} g={green} b={blue}): must be within 0.0-1.0"
    )]
    InvalidBrightness {
        index: usize,
        red: u8,
        green: u8,
        blue: u8,
        brightness: f32,
    },

    /// Rejected chain configuration.
    #[error("invalid chain config: {0}")]
    InvalidConfig(String),

    /// Config file parse error.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// GPIO backend failed to open or write a pin. Fatal to the in-flight
    /// transmit; the downstream shift register is left in an undefined state
    /// until the next full transmit.
    #[error("GPIO backend error: {0}")]
    Gpio(String),

    /// Raspberry Pi GPIO error.
    #[cfg(feature = "rppal")]
    #[error("GPIO error: {0}")]
    Rppal(#[from] rppal::gpio::Error),
}
