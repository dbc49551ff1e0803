//! Error types for command encoding and modulation.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`Error`]. Failures reported by a radio transmitter are kept separate and are
//! wrapped by [`SendError`](crate::controller::SendError) at the orchestration layer.

use thiserror::Error;

/// Result type for encoding and modulation operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while building a command or its transmission buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error {
    /// The fan action name is not in the fixed command table.
    #[error("invalid fan command")]
    InvalidAction,

    /// A textual bit string contained something other than `0` or `1`.
    #[error("bit strings may only contain '0' and '1'")]
    InvalidBitChar,

    /// A bit string is longer than [`MAX_BITS`](crate::bits::MAX_BITS).
    #[error("bit string of {len} bits exceeds the 32 bit capacity")]
    BitStringTooLong {
        /// Number of bits that were supplied
        len: usize,
    },

    /// A fan address must be 4 or 5 bits long.
    #[error("fan address must be 4 or 5 bits, got {len}")]
    InvalidAddressLength {
        /// Number of bits that were supplied
        len: u8,
    },

    /// A fixed-width command field had the wrong number of bits.
    #[error("{field} must be {expected} bits, got {actual}")]
    InvalidFieldLength {
        /// Name of the field
        field: &'static str,
        /// Required width in bits
        expected: u8,
        /// Supplied width in bits
        actual: u8,
    },

    /// The zone bits do not name one of the six pad zones and the zone policy is strict.
    #[error("zone {bits:#05b} is not a defined mattress pad zone")]
    UnknownZone {
        /// The 3-bit zone value
        bits: u8,
    },

    /// Heat levels are 4-bit values.
    #[error("heat level {level} is outside 0..=15")]
    HeatLevelOutOfRange {
        /// The rejected level
        level: u8,
    },

    /// A command must be sent at least once.
    #[error("repeat count must be at least 1")]
    InvalidRepeatCount,

    /// A mattress "on" request did not match `l0,l1,l2,l3,l4,l5[,stayOn][,preheat]`.
    #[error("invalid mattress command")]
    InvalidHeatSettings,

    /// The symbol stream ran out of room.
    #[error("symbol stream is full ({capacity} symbols)")]
    StreamOverflow {
        /// Maximum number of symbols the stream can hold
        capacity: usize,
    },

    /// The packed transmit buffer ran out of room.
    #[error("transmit buffer is full ({capacity} bytes)")]
    BufferOverflow {
        /// Maximum number of bytes the buffer can hold
        capacity: usize,
    },
}
