//! Bit-to-symbol mapping for on/off keyed remotes.
//!
//! Both protocols in this crate share one line code: every protocol bit becomes
//! three equal-length carrier slots ("symbols" or "modulations"). The first slot
//! is always a mark, the second always a break, and the third carries the bit.
//!
//! ## Symbol Table
//!
//! | Bit | Symbols |
//! |-----|---------|
//! | `0` | `100`   |
//! | `1` | `101`   |
//!
//! Because every bit opens with a mark, the receiver can recover bit timing from
//! the rising edges alone.
//!
//! ## Functions
//!
//! - [`encode_bit`]: Converts a single bit into its symbol group
//! - [`encode_bits`]: Appends the symbol groups for a run of bits to a [`SymbolStream`]
//!
//! ## Usage
//!
//! The fan and mattress modulators call these to build the body of each repeat
//! and then add their own framing (guards or preamble) around it. Bit order is
//! the caller's concern: the mattress modulator reverses its field first.

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use crate::consts::{SYMBOL_ONE, SYMBOL_ZERO, SYMBOLS_PER_BIT};
#[cfg(not(feature = "std"))]
use crate::consts::MAX_SYMBOLS;
use crate::error::Result;
#[cfg(not(feature = "std"))]
use crate::error::Error;
use crate::packer::{TxBytes, pack};

/// Encodes a single bit into its three-symbol group.
pub const fn encode_bit(bit: bool) -> [bool; SYMBOLS_PER_BIT] {
    if bit { SYMBOL_ONE } else { SYMBOL_ZERO }
}

/// Appends the symbol groups for `bits`, in iteration order, to `stream`.
///
/// # Returns
/// The number of symbols appended
pub fn encode_bits<I>(bits: I, stream: &mut SymbolStream) -> Result<usize>
where
    I: IntoIterator<Item = bool>,
{
    let start = stream.len();
    for bit in bits {
        stream.extend_from_slice(&encode_bit(bit))?;
    }
    Ok(stream.len() - start)
}

/// An ordered sequence of carrier on (`true`) / off (`false`) symbols.
///
/// With `std` the stream grows as needed. Without it the stream holds at most
/// [`MAX_SYMBOLS`](crate::consts::MAX_SYMBOLS) symbols and pushing past that
/// fails with [`Error::StreamOverflow`](crate::error::Error::StreamOverflow).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolStream {
    #[cfg(feature = "std")]
    symbols: Vec<bool>,
    #[cfg(not(feature = "std"))]
    symbols: Vec<bool, MAX_SYMBOLS>,
}

impl SymbolStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    /// Appends one symbol.
    #[cfg(feature = "std")]
    pub fn push(&mut self, symbol: bool) -> Result<()> {
        self.symbols.push(symbol);
        Ok(())
    }

    /// Appends one symbol.
    #[cfg(not(feature = "std"))]
    pub fn push(&mut self, symbol: bool) -> Result<()> {
        self.symbols.push(symbol).map_err(|_| Error::StreamOverflow {
            capacity: MAX_SYMBOLS,
        })
    }

    /// Appends `symbols` in order. On failure nothing is appended.
    #[cfg(feature = "std")]
    pub fn extend_from_slice(&mut self, symbols: &[bool]) -> Result<()> {
        self.symbols.extend_from_slice(symbols);
        Ok(())
    }

    /// Appends `symbols` in order. On failure nothing is appended.
    #[cfg(not(feature = "std"))]
    pub fn extend_from_slice(&mut self, symbols: &[bool]) -> Result<()> {
        self.symbols
            .extend_from_slice(symbols)
            .map_err(|_| Error::StreamOverflow {
                capacity: MAX_SYMBOLS,
            })
    }

    /// Appends `count` carrier-off symbols.
    pub fn push_breaks(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.push(false)?;
        }
        Ok(())
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the stream holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols as a slice.
    pub fn as_slice(&self) -> &[bool] {
        &self.symbols
    }

    /// Packs the stream into bytes, first symbol in the MSB of the first byte.
    pub fn pack(&self) -> Result<TxBytes> {
        pack(self.as_slice())
    }
}
