//! Tick-driven OOK transmitter for GPIO-keyed RF modules.
//!
//! This module provides the [`OokDriver`] struct, which clocks a packed
//! [`TransmissionBuffer`] out of a digital output pin wired to the data input of
//! a fixed-frequency OOK transmitter module. The pin is the carrier: `HIGH`
//! keys the carrier on, `LOW` keys it off.
//!
//! The driver keeps no timing of its own. Call [`tick()`](OokDriver::tick) at a
//! fixed interval, normally from a timer interrupt, and the driver advances one
//! symbol every `ticks_per_symbol` ticks. Use
//! [`ticks_per_symbol`](crate::timer::ticks_per_symbol) to pick the divider for
//! a given tick interval and protocol symbol rate.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use ook_remote::driver::OokDriver;
//!
//! # let tx_pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
//! let mut driver = OokDriver::new(tx_pin, 4);
//!
//! loop {
//!     driver.tick(); // Called every 1/(4 * symbol rate) seconds by a timer interrupt
//!     # break;
//! }
//! # driver.release().done();
//! ```
//!
//! ## Design Notes
//!
//! Only one buffer is in flight at a time. [`start()`](OokDriver::start)
//! returns [`nb::Error::WouldBlock`] while a buffer is still being sent, and
//! [`wait_sent()`](OokDriver::wait_sent) can be used with `nb::block!` to wait
//! for the pin to go idle.
//!
//! For sharing a driver between the main loop and an interrupt handler, see
//! [`crate::timer`].

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use crate::packer::TxBytes;
use crate::radio::TransmissionBuffer;

/// Operating state of an [`OokDriver`].
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum OokMode {
    ///   No buffer loaded. The pin is held `LOW` (carrier off).
    #[default]
    Idle,
    ///   A buffer is being clocked out, one symbol per `ticks_per_symbol` ticks.
    Tx,
}

/// A software OOK keyer driving a transmitter module's data pin.
///
/// ## Type Parameters
///
/// - `TX`: A type implementing [`embedded_hal::digital::OutputPin`] wired to the
///   transmitter's data input
///
/// ## Notes
///
/// - The module's carrier frequency is fixed by its hardware; the driver does
///   not look at [`ModulationParameters::frequency_hz`](crate::radio::ModulationParameters::frequency_hz).
/// - Pin errors cannot be reported from an interrupt, so they are counted in
///   [`pin_errors`](OokDriver::pin_errors) and transmission continues.
#[derive(Debug)]
pub struct OokDriver<TX>
where
    TX: OutputPin,
{
    /// The current mode of the driver
    pub mode: OokMode,
    tx: TX,
    ticks_per_symbol: u8,
    tick_counter: u8,
    tx_buf: TxBytes,

    /// Number of symbols in `tx_buf` to send. The packing pad after them is skipped.
    tx_symbols: usize,

    /// Index of the next symbol to send.
    pub(crate) tx_index: usize,

    /// Counter of completed transmissions.
    pub tx_good: u16,

    /// Counter of failed pin writes.
    pub pin_errors: u16,
}

impl<TX> OokDriver<TX>
where
    TX: OutputPin,
{
    /// Creates a new `OokDriver`.
    ///
    /// # Arguments
    /// - `tx`: The output pin keying the transmitter.
    /// - `ticks_per_symbol`: Number of `tick()` calls per symbol. Values below 1 are treated as 1.
    ///
    /// # Notes
    /// TX is driven `LOW` initially (carrier off).
    pub fn new(tx: TX, ticks_per_symbol: u8) -> Self {
        let mut driver = Self {
            mode: OokMode::Idle,
            tx,
            ticks_per_symbol: ticks_per_symbol.max(1),
            tick_counter: 0,
            tx_buf: TxBytes::new(),
            tx_symbols: 0,
            tx_index: 0,
            tx_good: 0,
            pin_errors: 0,
        };
        driver.write_tx(false);
        driver
    }

    /// Returns the pin, leaving the driver behind.
    pub fn release(self) -> TX {
        self.tx
    }

    fn write_tx(&mut self, level: bool) {
        let written = if level {
            self.tx.set_high()
        } else {
            self.tx.set_low()
        };
        if written.is_err() {
            self.pin_errors = self.pin_errors.saturating_add(1);
        }
    }

    /// Loads `buffer` and starts sending it on the next tick.
    ///
    /// # Returns
    /// - `Ok(())` once the buffer is loaded
    /// - `Err(nb::Error::WouldBlock)` if a previous buffer is still being sent
    pub fn start(&mut self, buffer: &TransmissionBuffer) -> nb::Result<(), Infallible> {
        if self.mode == OokMode::Tx {
            return Err(nb::Error::WouldBlock);
        }
        self.tx_buf.clear();
        #[cfg(feature = "std")]
        self.tx_buf.extend_from_slice(buffer.bytes());
        #[cfg(not(feature = "std"))]
        // Both buffers share the MAX_TX_BYTES capacity.
        let _ = self.tx_buf.extend_from_slice(buffer.bytes());
        self.tx_symbols = buffer.symbols().min(self.tx_buf.len() * 8);
        self.tx_index = 0;
        self.tick_counter = 0;
        self.mode = OokMode::Tx;
        debug!(
            "keying {} symbols, {} ticks per symbol",
            self.tx_symbols,
            self.ticks_per_symbol
        );
        Ok(())
    }

    /// Returns `Ok` once the driver is idle.
    pub fn wait_sent(&self) -> nb::Result<(), Infallible> {
        if self.mode == OokMode::Tx {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Advances the transmit state machine by one timing tick.
    ///
    /// The first symbol goes out on the first tick after [`start()`](OokDriver::start);
    /// each later symbol `ticks_per_symbol` ticks after the previous one.
    pub fn tick(&mut self) {
        if self.mode != OokMode::Tx {
            return;
        }
        if self.tick_counter == 0 {
            self.transmit_symbol();
        }
        self.tick_counter += 1;
        if self.tick_counter >= self.ticks_per_symbol {
            self.tick_counter = 0;
        }
    }

    /// Puts the next symbol on the pin, or finishes the transmission.
    fn transmit_symbol(&mut self) {
        if self.tx_index >= self.tx_symbols {
            self.write_tx(false);
            self.tx_good = self.tx_good.wrapping_add(1);
            self.mode = OokMode::Idle;
            return;
        }
        // Symbols are packed MSB first
        let byte = self.tx_buf[self.tx_index / 8];
        let level = byte & (0x80 >> (self.tx_index % 8)) != 0;
        self.write_tx(level);
        self.tx_index += 1;
    }
}
