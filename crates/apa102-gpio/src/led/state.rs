//! Desired-state store for the LED chain.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Desired color and brightness for one LED slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Led {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Global brightness, 0.0 (off) to 1.0 (full).
    pub brightness: f32,
}

impl Led {
    pub const fn new(red: u8, green: u8, blue: u8, brightness: f32) -> Self {
        Self {
            red,
            green,
            blue,
            brightness,
        }
    }

    /// An unlit slot.
    pub const OFF: Led = Led::new(0, 0, 0, 0.0);
}

/// In-memory desired state for every LED in the chain.
///
/// Indices are 1-based and dense: every index in `1..=chain_length` always
/// holds a slot, and the length is fixed for the store's lifetime. The store
/// never touches hardware; transmitting it is the device layer's job.
pub struct LedState {
    leds: Vec<Led>,
}

impl LedState {
    /// Creates a store with every slot off.
    pub fn new(chain_length: usize) -> Self {
        Self {
            leds: vec![Led::OFF; chain_length],
        }
    }

    /// Number of LEDs in the chain.
    pub fn chain_length(&self) -> usize {
        self.leds.len()
    }

    /// Replaces the slot at a 1-based index.
    ///
    /// The whole slot is validated before anything is written: on error the
    /// store is left untouched. Brightness must be within 0.0..=1.0 (NaN is
    /// rejected); out-of-range values are never clamped.
    pub fn set(&mut self, index: usize, led: Led) -> Result<()> {
        if index == 0 || index > self.leds.len() {
            return Err(Error::IndexOutOfRange {
                index,
                chain_length: self.leds.len(),
            });
        }
        if !(0.0..=1.0).contains(&led.brightness) {
            return Err(Error::InvalidBrightness {
                index,
                red: led.red,
                green: led.green,
                blue: led.blue,
                brightness: led.brightness,
            });
        }
        self.leds[index - 1] = led;
        Ok(())
    }

    /// Returns the slot at a 1-based index.
    pub fn get(&self, index: usize) -> Result<Led> {
        if index == 0 {
            return Err(Error::IndexOutOfRange {
                index,
                chain_length: self.leds.len(),
            });
        }
        self.leds
            .get(index - 1)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                chain_length: self.leds.len(),
            })
    }

    /// Snapshot of all slots as an ordered index-to-slot map.
    pub fn dump(&self) -> BTreeMap<usize, Led> {
        self.leds
            .iter()
            .enumerate()
            .map(|(i, &led)| (i + 1, led))
            .collect()
    }

    /// Resets every slot to off.
    pub fn clear_all(&mut self) {
        self.leds.fill(Led::OFF);
    }

    /// All slots in chain order, for transmission.
    pub(crate) fn slots(&self) -> &[Led] {
        &self.leds
    }
}
