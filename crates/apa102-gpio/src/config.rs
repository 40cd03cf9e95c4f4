//! Chain configuration.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Pin mapping and chain geometry.
///
/// Defaults match the reference hardware layout: DATA on BCM 23, CLOCK on
/// BCM 24, 8 LEDs, 1 ms settle margin around each data-bit clock pulse.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// BCM pin number of the DATA line.
    #[serde(default = "default_data_pin")]
    pub data_pin: u8,

    /// BCM pin number of the CLOCK line.
    #[serde(default = "default_clock_pin")]
    pub clock_pin: u8,

    /// Number of LEDs in the chain. Fixed for the lifetime of a chain.
    #[serde(default = "default_chain_length")]
    pub chain_length: usize,

    /// Settle delay in microseconds applied before and after each data-bit
    /// clock pulse. Some GPIO backends do not guarantee the pin has
    /// physically settled before the next operation; tune per backend, but
    /// keep some margin.
    #[serde(default = "default_settle_us")]
    pub settle_us: u64,
}

fn default_data_pin() -> u8 {
    crate::DATA_PIN
}

fn default_clock_pin() -> u8 {
    crate::CLOCK_PIN
}

fn default_chain_length() -> usize {
    crate::DEFAULT_CHAIN_LENGTH
}

fn default_settle_us() -> u64 {
    1000
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            data_pin: default_data_pin(),
            clock_pin: default_clock_pin(),
            chain_length: default_chain_length(),
            settle_us: default_settle_us(),
        }
    }
}

impl ChainConfig {
    /// Parses a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: ChainConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.chain_length == 0 {
            return Err(Error::InvalidConfig(
                "chain_length must be at least 1".to_string(),
            ));
        }
        if self.data_pin == self.clock_pin {
            return Err(Error::InvalidConfig(format!(
                "data_pin and clock_pin must differ (both are {})",
                self.data_pin
            )));
        }
        Ok(())
    }
}
