//! APA102 wire format.
//!
//! A write transaction is:
//! - Start frame: DATA driven low once, then 32 clock pulses. Resets the
//!   downstream shift registers.
//! - Per LED, 4 bytes MSB-first: brightness header, blue, green, red. The
//!   B, G, R order is a chip requirement.
//! - End frame: DATA driven low once, then 36 clock pulses. Latches the
//!   shifted data into the LED outputs.

use super::state::Led;

/// Clock pulses in the start frame.
pub const START_FRAME_PULSES: usize = 32;

/// Clock pulses in the end frame.
pub const END_FRAME_PULSES: usize = 36;

/// Fixed marker bits of the brightness header byte. The top 3 bits tell the
/// driver chip this is a brightness byte, not a color byte.
pub const BRIGHTNESS_HEADER: u8 = 0b1110_0000;

/// Number of brightness steps encodable in the 5-bit field.
pub const BRIGHTNESS_LEVELS: u8 = 31;

/// Encodes a 0.0..=1.0 brightness into the header byte.
///
/// `level = floor(31 * brightness)` masked to 5 bits, OR'd with the fixed
/// header marker. The result is always within 224..=255.
pub fn encode_brightness(brightness: f32) -> u8 {
    let level = (f32::from(BRIGHTNESS_LEVELS) * brightness).floor() as u8;
    BRIGHTNESS_HEADER | (level & 0b1_1111)
}

/// Encodes one LED slot into its 4-byte wire block.
pub fn encode_frame(led: &Led) -> [u8; 4] {
    [
        encode_brightness(led.brightness),
        led.blue,
        led.green,
        led.red,
    ]
}
