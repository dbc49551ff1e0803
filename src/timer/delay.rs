use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use thiserror::Error;

use crate::radio::{TransmissionBuffer, Transmitter};
use crate::timer::symbol_period_ns;

/// Errors from a [`PinTransmitter`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError<E> {
    /// The buffer is meant for a different carrier than the module transmits on.
    #[error("module transmits on {module_hz} Hz, buffer needs {requested_hz} Hz")]
    FrequencyMismatch {
        /// The module's fixed carrier frequency
        module_hz: u32,
        /// The frequency the buffer was encoded for
        requested_hz: u32,
    },
    /// The buffer has a symbol rate of zero.
    #[error("symbol rate must be non-zero")]
    ZeroSymbolRate,
    /// Writing the data pin failed.
    #[error("pin write failed: {0:?}")]
    Pin(E),
}

/// Blocking [`Transmitter`] that keys a fixed-frequency OOK module from a pin.
///
/// Each symbol is written to the pin and held for one symbol period using a
/// delay provider implementing `embedded_hal::delay::DelayNs`. The pin is left
/// `LOW` (carrier off) when the buffer is done or a write fails.
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::delay::NoopDelay;
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State, Transaction};
/// use ook_remote::controller::RemoteController;
/// use ook_remote::consts::FAN_FREQUENCY_HZ;
/// use ook_remote::timer::PinTransmitter;
///
/// # let pin = Pin::new(&[Transaction::set(State::Low)]);
/// # let delay = NoopDelay::new();
/// let radio = PinTransmitter::new(pin, delay, FAN_FREQUENCY_HZ).unwrap();
/// let controller = RemoteController::new(radio, None);
/// # let (mut pin, _) = controller.into_inner().release();
/// # pin.done();
/// ```
///
/// # Notes
/// - Timing depends on `delay` alone; interrupts that fire mid-symbol stretch it.
///   Wrapping the transmitter in a
///   [`SharedTransmitter`](crate::timer::SharedTransmitter) keeps interrupts off
///   for the whole buffer.
/// - One module only covers one carrier, so a fan and a mattress pad need two
///   transmitters.
#[derive(Debug)]
pub struct PinTransmitter<TX, D> {
    tx: TX,
    delay: D,
    frequency_hz: u32,
}

impl<TX, D> PinTransmitter<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    /// Creates a transmitter for a module on `frequency_hz`, driving `tx` `LOW`.
    ///
    /// # Errors
    /// [`PinError::Pin`] if the pin cannot be driven `LOW`.
    pub fn new(tx: TX, delay: D, frequency_hz: u32) -> Result<Self, PinError<TX::Error>> {
        let mut transmitter = Self {
            tx,
            delay,
            frequency_hz,
        };
        transmitter.tx.set_low().map_err(PinError::Pin)?;
        Ok(transmitter)
    }

    /// The carrier frequency of the module.
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Returns the pin and delay provider.
    pub fn release(self) -> (TX, D) {
        (self.tx, self.delay)
    }

    fn key(&mut self, buffer: &TransmissionBuffer, period_ns: u32) -> Result<(), TX::Error> {
        let bytes = buffer.bytes();
        for index in 0..buffer.symbols() {
            // Symbols are packed MSB first
            if bytes[index / 8] & (0x80 >> (index % 8)) != 0 {
                self.tx.set_high()?;
            } else {
                self.tx.set_low()?;
            }
            self.delay.delay_ns(period_ns);
        }
        Ok(())
    }
}

impl<TX, D> Transmitter for PinTransmitter<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    type Error = PinError<TX::Error>;

    fn transmit(&mut self, buffer: &TransmissionBuffer) -> Result<(), Self::Error> {
        let params = buffer.params();
        if params.frequency_hz != self.frequency_hz {
            return Err(PinError::FrequencyMismatch {
                module_hz: self.frequency_hz,
                requested_hz: params.frequency_hz,
            });
        }
        if params.symbol_rate == 0 {
            return Err(PinError::ZeroSymbolRate);
        }

        let keyed = self.key(buffer, symbol_period_ns(params.symbol_rate));
        let _ = self.tx.set_low();
        keyed.map_err(PinError::Pin)
    }
}
