//! Ceiling fan and light remote protocol.
//!
//! A fan command is a 13-bit field sent most significant bit first:
//!
//! | Bits  | Content |
//! |-------|---------|
//! | 0-4   | fan address; a 4-bit address is prefixed with `1` |
//! | 5-12  | 8-bit command code |
//!
//! Each bit becomes three symbols (see [`crate::encoding`]). The stream opens
//! with a 36-symbol guard, and every repeat of the command is followed by
//! another guard, so one repeat is 75 symbols or 25 ms at 3000 symbols/s.
//!
//! Receivers ignore a command heard fewer than two times. Sixteen repeats
//! (about 400 ms) is reliable. For the light actions, repeating for less than
//! 600 ms toggles the light and holding for more than 700 ms dims it.

use core::fmt;
use core::str::FromStr;

use crate::bits::BitString;
use crate::consts::{
    FAN_ADDRESS_LEN, FAN_CODE_LEN, FAN_DEFAULT_REPEATS, FAN_FREQUENCY_HZ, FAN_GUARD_LEN,
    FAN_MIN_REPEATS, FAN_SYMBOL_RATE,
};
use crate::encoding::{SymbolStream, encode_bits};
use crate::error::{Error, Result};
use crate::radio::{Modulation, ModulationParameters, TransmissionBuffer};

/// Radio settings for the fan protocol, with the default repeat count.
pub const FAN_PARAMETERS: ModulationParameters = ModulationParameters {
    frequency_hz: FAN_FREQUENCY_HZ,
    modulation: Modulation::AskOok,
    symbol_rate: FAN_SYMBOL_RATE,
    sync_word: None,
    repeats: FAN_DEFAULT_REPEATS,
};

/// The twelve commands a fan remote can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FanAction {
    /// Fan off
    Off,
    /// Speed 1 (low)
    Speed1,
    /// Speed 2
    Speed2,
    /// Speed 3 (medium)
    Speed3,
    /// Speed 4 (medium high)
    Speed4,
    /// Speed 5
    Speed5,
    /// Speed 6 (high)
    Speed6,
    /// Reverse direction
    Reverse,
    /// Toggle the downlight. On dimmable fixtures the dimmer level is discarded.
    ToggleDownlight,
    /// Toggle the uplight. On dimmable fixtures the dimmer level is discarded.
    ToggleUplight,
    /// Toggle the downlight keeping the dimmer level. Dimmable fixtures only.
    DimDownlight,
    /// Toggle the uplight keeping the dimmer level. Dimmable fixtures only.
    DimUplight,
}

impl FanAction {
    /// Every action, in table order.
    pub const ALL: [FanAction; 12] = [
        FanAction::Off,
        FanAction::Speed1,
        FanAction::Speed2,
        FanAction::Speed3,
        FanAction::Speed4,
        FanAction::Speed5,
        FanAction::Speed6,
        FanAction::Reverse,
        FanAction::ToggleDownlight,
        FanAction::ToggleUplight,
        FanAction::DimDownlight,
        FanAction::DimUplight,
    ];

    /// The 8-bit command code sent after the address.
    pub const fn code(self) -> u8 {
        match self {
            FanAction::Off => 0b0000_0100,
            FanAction::Speed1 => 0b0001_0000,
            FanAction::Speed2 => 0b0001_0100,
            FanAction::Speed3 => 0b0010_0000,
            FanAction::Speed4 => 0b0011_0000,
            FanAction::Speed5 => 0b0100_0100,
            FanAction::Speed6 => 0b0100_0000,
            FanAction::Reverse => 0b0000_1000,
            FanAction::ToggleDownlight => 0b0000_0010,
            FanAction::ToggleUplight => 0b0001_0010,
            FanAction::DimDownlight => 0b1000_0010,
            FanAction::DimUplight => 0b1001_0010,
        }
    }

    /// The command code as an 8-bit field.
    pub const fn code_bits(self) -> BitString {
        BitString::from_value_truncated(self.code() as u32, FAN_CODE_LEN)
    }

    /// The request name of the action, e.g. `"speed-3"`.
    pub const fn name(self) -> &'static str {
        match self {
            FanAction::Off => "off",
            FanAction::Speed1 => "speed-1",
            FanAction::Speed2 => "speed-2",
            FanAction::Speed3 => "speed-3",
            FanAction::Speed4 => "speed-4",
            FanAction::Speed5 => "speed-5",
            FanAction::Speed6 => "speed-6",
            FanAction::Reverse => "reverse",
            FanAction::ToggleDownlight => "toggle-downlight",
            FanAction::ToggleUplight => "toggle-uplight",
            FanAction::DimDownlight => "dim-downlight",
            FanAction::DimUplight => "dim-uplight",
        }
    }
}

impl FromStr for FanAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FanAction::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or(Error::InvalidAction)
    }
}

impl fmt::Display for FanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fan address as set by the DIP switches in the remote, 4 or 5 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct FanAddress(BitString);

impl FanAddress {
    /// Wraps `bits`, which must be 4 or 5 bits long.
    pub fn new(bits: BitString) -> Result<Self> {
        match bits.len() {
            4 | 5 => Ok(Self(bits)),
            len => Err(Error::InvalidAddressLength { len }),
        }
    }

    /// The address as given.
    pub const fn bits(&self) -> BitString {
        self.0
    }

    /// The 5-bit address field. A 4-bit address gets a leading `1`.
    pub fn field(&self) -> BitString {
        if self.0.len() == FAN_ADDRESS_LEN {
            return self.0;
        }
        // 4 bits plus one prefix bit cannot overflow
        BitString::from_value_truncated(
            (1 << self.0.len()) | self.0.value(),
            FAN_ADDRESS_LEN,
        )
    }
}

impl FromStr for FanAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.parse()?)
    }
}

/// A single fan command: who it is for and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct FanCommand {
    /// The target fan
    pub address: FanAddress,
    /// The action to perform
    pub action: FanAction,
}

impl FanCommand {
    /// Creates a new command.
    pub const fn new(address: FanAddress, action: FanAction) -> Self {
        Self { address, action }
    }

    /// Parses a command from its request form, e.g. `("1010", "speed-3")`.
    ///
    /// # Errors
    /// - [`Error::InvalidBitChar`] or [`Error::InvalidAddressLength`] for a bad address
    /// - [`Error::InvalidAction`] for an action name outside the command table
    pub fn parse(address: &str, action: &str) -> Result<Self> {
        Ok(Self::new(address.parse()?, action.parse()?))
    }

    /// Builds the 13-bit command field: address field then command code.
    pub fn encode(&self) -> BitString {
        let address = self.address.field().value();
        BitString::from_value_truncated(
            (address << FAN_CODE_LEN) | self.action.code() as u32,
            FAN_ADDRESS_LEN + FAN_CODE_LEN,
        )
    }
}

/// Expands a fan field into its transmit symbol stream.
///
/// The stream is `guard + repeats * (symbols(payload) + guard)`, where the guard
/// is 36 carrier-off symbols. `payload` is sent first bit first, and may be any
/// length so raw fields can be replayed.
///
/// # Errors
/// - [`Error::InvalidRepeatCount`] if `repeats` is zero
/// - [`Error::StreamOverflow`] without `std`, when the stream does not fit
pub fn modulate(payload: &BitString, repeats: u16) -> Result<SymbolStream> {
    if repeats == 0 {
        return Err(Error::InvalidRepeatCount);
    }
    if repeats < FAN_MIN_REPEATS {
        warn!(
            "fan command sent {} time(s), receivers need at least {}",
            repeats,
            FAN_MIN_REPEATS
        );
    }

    let mut body = SymbolStream::new();
    let _ = encode_bits(payload, &mut body)?;
    body.push_breaks(FAN_GUARD_LEN)?;

    let mut stream = SymbolStream::new();
    stream.push_breaks(FAN_GUARD_LEN)?;
    for _ in 0..repeats {
        stream.extend_from_slice(body.as_slice())?;
    }
    Ok(stream)
}

/// Encodes, modulates and packs a fan field for transmission.
pub fn transmission(payload: &BitString, repeats: u16) -> Result<TransmissionBuffer> {
    let stream = modulate(payload, repeats)?;
    TransmissionBuffer::from_symbols(&stream, FAN_PARAMETERS.with_repeats(repeats))
}
