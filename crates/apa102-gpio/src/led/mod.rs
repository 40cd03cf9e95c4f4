//! LED chain module.
//!
//! `state` holds the desired color/brightness per LED, `protocol` encodes
//! slots into the APA102 wire format, and `device` owns the pins and clocks
//! whole-chain transmits out of them.

mod device;
pub mod protocol;
mod state;

pub use device::LedChain;
pub use state::{Led, LedState};
