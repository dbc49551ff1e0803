//! Constants used across both remote-control protocols.
//!
//! This module defines the carrier frequencies, symbol rates, framing patterns
//! and buffer sizes of the ceiling fan and mattress pad protocols.
//!
//! ## Key Concepts
//!
//! - **Symbols**: every protocol bit is sent as three fixed-length carrier
//!   slots, `100` for a `0` and `101` for a `1`.
//! - **Guard**: the fan protocol separates repeats with a run of carrier-off
//!   symbols so the receiver can reset.
//! - **Preamble**: the mattress protocol starts every repeat with a mark
//!   followed by a break.
//! - **Buffer Sizing**: without `std`, symbol streams and packed buffers live in
//!   fixed-capacity `heapless` vectors sized here.
//!
//! The frequency, rate and framing values are protocol constants. Receivers
//! ignore anything that deviates from them.

/// Number of symbols each protocol bit expands to.
pub const SYMBOLS_PER_BIT: usize = 3;

/// Symbol group for a `0` bit: mark, break, break.
pub const SYMBOL_ZERO: [bool; SYMBOLS_PER_BIT] = [true, false, false];

/// Symbol group for a `1` bit: mark, break, mark.
pub const SYMBOL_ONE: [bool; SYMBOLS_PER_BIT] = [true, false, true];

/// Fan carrier frequency, 303.875 MHz.
pub const FAN_FREQUENCY_HZ: u32 = 303_875_000;

/// Fan symbol rate. 1000 protocol bits per second, three symbols per bit.
pub const FAN_SYMBOL_RATE: u32 = 3_000;

/// Length of the fan guard interval in symbols (12 ms).
pub const FAN_GUARD_LEN: usize = 36;

/// Number of repeats a fan receiver needs before it acts on a command.
pub const FAN_MIN_REPEATS: u16 = 2;

/// Default fan repeat count. 16 repeats is roughly 400 ms on air.
pub const FAN_DEFAULT_REPEATS: u16 = 16;

/// Width of a fan address field after padding.
pub const FAN_ADDRESS_LEN: u8 = 5;

/// Width of a fan command code.
pub const FAN_CODE_LEN: u8 = 8;

/// Width of a complete fan command field.
pub const FAN_FIELD_LEN: u8 = FAN_ADDRESS_LEN + FAN_CODE_LEN;

/// Mattress pad carrier frequency, 418 MHz.
pub const MATTRESS_FREQUENCY_HZ: u32 = 418_000_000;

/// Mattress pad symbol rate. About 533 protocol bits per second.
pub const MATTRESS_SYMBOL_RATE: u32 = 1_600;

/// Mark-then-break start pattern sent before every mattress repeat.
pub const MATTRESS_PREAMBLE: [bool; 12] = [
    true, true, true, true, true, true, false, false, false, false, false, false,
];

/// Number of repeats a mattress pad needs before it acts on a command.
pub const MATTRESS_MIN_REPEATS: u16 = 2;

/// Default mattress repeat count.
pub const MATTRESS_DEFAULT_REPEATS: u16 = 3;

/// Width of the mattress pad code.
pub const MATTRESS_CODE_LEN: u8 = 5;

/// Width of a mattress zone.
pub const MATTRESS_ZONE_LEN: u8 = 3;

/// Width of the mattress checksum.
pub const MATTRESS_CHECKSUM_LEN: u8 = 6;

/// Width of the mattress payload (everything after the checksum).
pub const MATTRESS_PAYLOAD_LEN: u8 = 19;

/// Width of a complete mattress command field.
pub const MATTRESS_FIELD_LEN: u8 = MATTRESS_CHECKSUM_LEN + MATTRESS_PAYLOAD_LEN;

/// Highest heat level a pad zone accepts.
pub const MAX_HEAT_LEVEL: u8 = 15;

/// Maximum number of symbols a stream can hold without `std`.
///
/// Large enough for 26 fan repeats or 23 mattress repeats.
pub const MAX_SYMBOLS: usize = 2048;

/// Maximum size (in bytes) of a packed transmit buffer without `std`.
pub const MAX_TX_BYTES: usize = MAX_SYMBOLS / 8;
