//! LED chain device: pin ownership and whole-chain transmission.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use super::protocol::{encode_frame, END_FRAME_PULSES, START_FRAME_PULSES};
use super::state::{Led, LedState};
use crate::config::ChainConfig;
use crate::gpio::{Gpio, Level, OutputPin};
use crate::Result;

/// Everything a transmit needs to see as one consistent unit.
struct Inner<P> {
    leds: LedState,
    data: P,
    clock: P,
}

/// Controller for one LED chain.
///
/// Holds the desired state and both pin handles behind a single mutex, so
/// every operation completes before the next begins: a transmit always sees
/// a whole-store snapshot and no two transmits ever interleave pin writes.
///
/// Mutating operations only touch the store; nothing reaches the pins until
/// [`show`](Self::show) is called ([`clear`](Self::clear) being the one
/// exception, since "all off" is expected to take effect instantly).
pub struct LedChain<G: Gpio> {
    config: ChainConfig,
    inner: Mutex<Inner<G::Output>>,
}

impl<G: Gpio> LedChain<G> {
    /// Creates a chain controller, acquiring DATA and CLOCK in output mode.
    ///
    /// The pins are held for the controller's lifetime and released when it
    /// is dropped.
    pub fn new(gpio: &G, config: ChainConfig) -> Result<Self> {
        config.validate()?;
        let data = gpio.open_output(config.data_pin)?;
        let clock = gpio.open_output(config.clock_pin)?;
        info!(
            "LED chain ready: {} LEDs, DATA on pin {}, CLOCK on pin {}",
            config.chain_length, config.data_pin, config.clock_pin
        );
        let leds = LedState::new(config.chain_length);
        Ok(Self {
            config,
            inner: Mutex::new(Inner { leds, data, clock }),
        })
    }

    /// Number of LEDs in the chain.
    pub fn chain_length(&self) -> usize {
        self.config.chain_length
    }

    /// Sets the desired color and brightness for one LED (1-based index).
    ///
    /// Does not touch the hardware; call [`show`](Self::show) to transmit.
    pub fn set_led(&self, index: usize, red: u8, green: u8, blue: u8, brightness: f32) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.leds.set(index, Led::new(red, green, blue, brightness))
    }

    /// Returns the desired state of one LED (1-based index).
    pub fn get_led(&self, index: usize) -> Result<Led> {
        let inner = self.inner.lock().unwrap();
        inner.leds.get(index)
    }

    /// Snapshot of the whole chain as an ordered index-to-slot map.
    pub fn dump(&self) -> BTreeMap<usize, Led> {
        let inner = self.inner.lock().unwrap();
        inner.leds.dump()
    }

    /// Transmits the current state to the chain. State is not modified.
    pub fn show(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        self.transmit(&mut inner)
    }

    /// Resets every slot to off and transmits once, darkening the chain.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.leds.clear_all();
        self.transmit(&mut inner)
    }

    /// Clocks the full state out of the pins: start frame, one 4-byte block
    /// per LED in chain order, end frame.
    ///
    /// A failed pin write aborts mid-frame and leaves the shift register in
    /// an undefined state; recovery is a fresh transmit from the start frame.
    fn transmit(&self, inner: &mut Inner<G::Output>) -> Result<()> {
        let Inner { leds, data, clock } = inner;
        let settle = Duration::from_micros(self.config.settle_us);

        frame(data, clock, START_FRAME_PULSES)?;
        for led in leds.slots() {
            for byte in encode_frame(led) {
                write_byte(data, clock, byte, settle)?;
            }
        }
        frame(data, clock, END_FRAME_PULSES)?;

        debug!("Transmitted {} LED frames", leds.chain_length());
        Ok(())
    }
}

#[cfg(feature = "rppal")]
impl LedChain<crate::gpio::rppal::SystemGpio> {
    /// Opens the system GPIO and creates a chain controller on it.
    pub fn open(config: ChainConfig) -> Result<Self> {
        let gpio = crate::gpio::rppal::SystemGpio::new()?;
        Self::new(&gpio, config)
    }
}

/// Drives DATA low once, then pulses CLOCK back-to-back `pulses` times.
fn frame<P: OutputPin>(data: &mut P, clock: &mut P, pulses: usize) -> Result<()> {
    data.write(Level::Low)?;
    for _ in 0..pulses {
        clock.write(Level::High)?;
        clock.write(Level::Low)?;
    }
    Ok(())
}

/// Clocks one byte out MSB-first.
///
/// Each bit: write DATA, settle, pulse CLOCK high then low, settle. The two
/// settle sleeps give the GPIO backend time to physically drive the line;
/// unlike frame pulses, data-bit pulses carry this margin.
fn write_byte<P: OutputPin>(data: &mut P, clock: &mut P, byte: u8, settle: Duration) -> Result<()> {
    for bit in (0..8).rev() {
        data.write(Level::from_bit(byte >> bit & 1 == 1))?;
        thread::sleep(settle);
        clock.write(Level::High)?;
        clock.write(Level::Low)?;
        thread::sleep(settle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::Arc;

    /// Which line a write landed on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Line {
        Data,
        Clock,
    }

    type Trace = Arc<Mutex<Vec<(Line, Level)>>>;

    /// Recording backend: every pin write is appended to a shared trace.
    #[derive(Default)]
    struct TraceGpio {
        trace: Trace,
        fail_after: Option<usize>,
    }

    struct TracePin {
        line: Line,
        trace: Trace,
        fail_after: Option<usize>,
    }

    impl Gpio for TraceGpio {
        type Output = TracePin;

        fn open_output(&self, pin: u8) -> Result<TracePin> {
            let line = match pin {
                23 => Line::Data,
                24 => Line::Clock,
                other => return Err(Error::Gpio(format!("unexpected pin {other}"))),
            };
            Ok(TracePin {
                line,
                trace: Arc::clone(&self.trace),
                fail_after: self.fail_after,
            })
        }
    }

    impl OutputPin for TracePin {
        fn write(&mut self, level: Level) -> Result<()> {
            let mut trace = self.trace.lock().unwrap();
            if let Some(limit) = self.fail_after {
                if trace.len() >= limit {
                    return Err(Error::Gpio("pin write failed".to_string()));
                }
            }
            trace.push((self.line, level));
            Ok(())
        }
    }

    fn test_config() -> ChainConfig {
        ChainConfig {
            settle_us: 0,
            ..ChainConfig::default()
        }
    }

    fn chain() -> (LedChain<TraceGpio>, Trace) {
        let gpio = TraceGpio::default();
        let trace = Arc::clone(&gpio.trace);
        let chain = LedChain::new(&gpio, test_config()).unwrap();
        (chain, trace)
    }

    /// Replays a trace, sampling DATA on every CLOCK rising edge.
    fn clocked_bits(trace: &[(Line, Level)]) -> Vec<bool> {
        let mut bits = Vec::new();
        let mut data = Level::Low;
        for &(line, level) in trace {
            match line {
                Line::Data => data = level,
                Line::Clock if level == Level::High => bits.push(data == Level::High),
                Line::Clock => {}
            }
        }
        bits
    }

    fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
        bits.chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| byte << 1 | u8::from(bit)))
            .collect()
    }

    #[test]
    fn test_full_transmit_wire_trace() {
        let (chain, trace) = chain();
        chain.set_led(1, 255, 0, 0, 0.5).unwrap();
        chain.set_led(3, 0, 100, 0, 0.2).unwrap();
        chain.set_led(4, 15, 100, 200, 0.7).unwrap();
        chain.show().unwrap();

        let trace = trace.lock().unwrap();
        let bits = clocked_bits(&trace);

        // 32 start pulses + 8 LEDs x 32 bits + 36 end pulses
        assert_eq!(bits.len(), 32 + 256 + 36);
        assert!(bits[..32].iter().all(|&bit| !bit));
        assert!(bits[32 + 256..].iter().all(|&bit| !bit));

        let bytes = bits_to_bytes(&bits[32..32 + 256]);
        let mut expected = Vec::new();
        expected.extend([0xE0 | 15, 0, 0, 255]); // LED 1: 0.5 -> level 15, B G R
        expected.extend([0xE0, 0, 0, 0]);
        expected.extend([0xE0 | 6, 0, 100, 0]); // LED 3
        expected.extend([0xE0 | 21, 200, 100, 15]); // LED 4
        for _ in 5..=8 {
            expected.extend([0xE0, 0, 0, 0]);
        }
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_data_written_before_each_clock_pulse() {
        let (chain, trace) = chain();
        chain.show().unwrap();

        let trace = trace.lock().unwrap();
        // Data section starts after the start frame: 1 DATA write + 64 CLOCK
        // writes. Every data bit must then be DATA, CLOCK high, CLOCK low.
        let data_section = &trace[65..65 + 256 * 3];
        for bit in data_section.chunks(3) {
            assert_eq!(bit[0].0, Line::Data);
            assert_eq!(bit[1], (Line::Clock, Level::High));
            assert_eq!(bit[2], (Line::Clock, Level::Low));
        }
    }

    #[test]
    fn test_show_does_not_modify_state() {
        let (chain, _trace) = chain();
        chain.set_led(2, 10, 20, 30, 1.0).unwrap();
        let before = chain.dump();
        chain.show().unwrap();
        assert_eq!(chain.dump(), before);
    }

    #[test]
    fn test_clear_darkens_and_transmits_once() {
        let (chain, trace) = chain();
        chain.set_led(1, 255, 255, 255, 1.0).unwrap();
        chain.clear().unwrap();

        assert!(chain.dump().values().all(|&led| led == Led::OFF));

        let trace = trace.lock().unwrap();
        let bits = clocked_bits(&trace);
        // Exactly one transmit, all data bits are the dark header pattern.
        assert_eq!(bits.len(), 32 + 256 + 36);
        let bytes = bits_to_bytes(&bits[32..32 + 256]);
        for block in bytes.chunks(4) {
            assert_eq!(block, [0xE0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_invalid_set_rejected_before_hardware() {
        let (chain, trace) = chain();
        assert!(chain.set_led(9, 0, 0, 0, 0.0).is_err());
        assert!(chain.set_led(1, 0, 0, 0, 1.5).is_err());
        assert!(trace.lock().unwrap().is_empty());
        assert_eq!(chain.dump().len(), 8);
        assert!(chain.dump().values().all(|&led| led == Led::OFF));
    }

    #[test]
    fn test_pin_write_failure_propagates() {
        let gpio = TraceGpio {
            fail_after: Some(10),
            ..TraceGpio::default()
        };
        let chain = LedChain::new(&gpio, test_config()).unwrap();
        let err = chain.show().unwrap_err();
        assert!(matches!(err, Error::Gpio(_)));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let gpio = TraceGpio::default();
        let config = ChainConfig {
            chain_length: 0,
            ..test_config()
        };
        assert!(matches!(
            LedChain::new(&gpio, config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_chain_length_follows_config() {
        let gpio = TraceGpio::default();
        let config = ChainConfig {
            chain_length: 4,
            ..test_config()
        };
        let chain = LedChain::new(&gpio, config).unwrap();
        assert_eq!(chain.chain_length(), 4);
        chain.show().unwrap();

        let trace = gpio.trace.lock().unwrap();
        assert_eq!(clocked_bits(&trace).len(), 32 + 4 * 32 + 36);
    }
}
