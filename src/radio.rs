//! The boundary between the protocol encoders and the radio hardware.
//!
//! The encoders produce a [`TransmissionBuffer`]: packed symbols plus the
//! [`ModulationParameters`] the radio must be configured with to send them. Any
//! type that can put such a buffer on air implements [`Transmitter`], whether it
//! is an SDR dongle behind a USB link or a bare OOK module on a GPIO pin (see
//! [`PinTransmitter`](crate::timer::PinTransmitter) and
//! [`OokDriver`](crate::driver::OokDriver)).
//!
//! A radio has a single active frequency and modulation at a time, so a
//! transmitter is an exclusively owned resource. Code that needs to share one
//! should wrap it in a [`SharedTransmitter`](crate::timer::SharedTransmitter).

use crate::encoding::SymbolStream;
use crate::error::Result;
use crate::packer::TxBytes;
use crate::timer::transmission_duration_us;

/// Carrier modulation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Modulation {
    /// Amplitude shift keying with full carrier on/off (on-off keying).
    #[default]
    AskOok,
}

/// Radio settings for one protocol.
///
/// Everything except `repeats` is fixed by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ModulationParameters {
    /// Carrier frequency in Hz
    pub frequency_hz: u32,
    /// Modulation scheme
    pub modulation: Modulation,
    /// Symbol (modulation slot) rate in symbols per second
    pub symbol_rate: u32,
    /// Sync word the radio should prepend, `None` to send the buffer as is
    pub sync_word: Option<u16>,
    /// How many times the command is repeated inside the buffer
    pub repeats: u16,
}

impl ModulationParameters {
    /// Returns a copy with a different repeat count.
    pub const fn with_repeats(mut self, repeats: u16) -> Self {
        self.repeats = repeats;
        self
    }
}

/// A packed symbol stream ready to hand to a radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionBuffer {
    bytes: TxBytes,
    symbols: usize,
    params: ModulationParameters,
}

impl TransmissionBuffer {
    /// Packs `stream` into a buffer to be sent with `params`.
    pub fn from_symbols(stream: &SymbolStream, params: ModulationParameters) -> Result<Self> {
        Ok(Self {
            bytes: stream.pack()?,
            symbols: stream.len(),
            params,
        })
    }

    /// The packed symbols, MSB-first.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of meaningful symbols. The last byte may carry up to seven padding symbols.
    pub fn symbols(&self) -> usize {
        self.symbols
    }

    /// Radio settings for this buffer.
    pub fn params(&self) -> &ModulationParameters {
        &self.params
    }

    /// Time on air in microseconds, padding included.
    pub fn duration_us(&self) -> u64 {
        transmission_duration_us(self.bytes.len() * 8, self.params.symbol_rate)
    }

    /// Consumes the buffer, returning the packed bytes.
    pub fn into_bytes(self) -> TxBytes {
        self.bytes
    }
}

/// A radio that can send a [`TransmissionBuffer`].
///
/// `transmit` must configure the carrier frequency, modulation and symbol rate
/// from [`TransmissionBuffer::params`], send the bytes, and block until they are
/// on air. A failure means nothing useful was sent; callers do not retry.
pub trait Transmitter {
    /// Error reported by the hardware.
    type Error: core::fmt::Debug;

    /// Sends `buffer`.
    fn transmit(&mut self, buffer: &TransmissionBuffer) -> core::result::Result<(), Self::Error>;
}

impl<T: Transmitter + ?Sized> Transmitter for &mut T {
    type Error = T::Error;

    fn transmit(&mut self, buffer: &TransmissionBuffer) -> core::result::Result<(), Self::Error> {
        (**self).transmit(buffer)
    }
}
