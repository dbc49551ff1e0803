//! Symbol-to-byte packing.
//!
//! Radios take their transmit payload as bytes. Symbols are packed left to right,
//! most significant bit first, eight per byte. A trailing partial byte is still
//! emitted with its unused low bits cleared, which on air is a short run of
//! carrier-off time after the last symbol.

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::consts::MAX_TX_BYTES;
use crate::error::{Error, Result};

/// A packed transmit buffer.
#[cfg(feature = "std")]
pub type TxBytes = Vec<u8>;

/// A packed transmit buffer.
#[cfg(not(feature = "std"))]
pub type TxBytes = Vec<u8, MAX_TX_BYTES>;

/// Number of bytes needed to hold `symbols` packed symbols.
pub const fn packed_len(symbols: usize) -> usize {
    symbols.div_ceil(8)
}

/// Packs `bits` into `output`, MSB-first.
///
/// # Arguments
/// - `&[bool]` : The input symbols
/// - `&mut [u8]` : The output buffer, at least [`packed_len`] bytes long
///
/// # Returns
/// The number of bytes written, or [`Error::BufferOverflow`] if `output` is
/// shorter than `packed_len(bits.len())`. Nothing is written in that case.
pub fn pack_into(bits: &[bool], output: &mut [u8]) -> Result<usize> {
    if output.len() < packed_len(bits.len()) {
        return Err(Error::BufferOverflow {
            capacity: output.len(),
        });
    }
    let mut i = 0;
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        let mut place = 0x80u8;
        for &bit in chunk {
            if bit {
                byte |= place;
            }
            place >>= 1;
        }
        output[i] = byte;
        i += 1;
    }
    Ok(i)
}

/// Packs `bits` into a new buffer, MSB-first with the last byte zero padded.
///
/// An empty input gives an empty buffer. Without `std` this fails with
/// [`Error::BufferOverflow`] when the result would exceed
/// [`MAX_TX_BYTES`](crate::consts::MAX_TX_BYTES); with `std` it never fails.
pub fn pack(bits: &[bool]) -> Result<TxBytes> {
    let len = packed_len(bits.len());
    let mut out = TxBytes::new();
    #[cfg(feature = "std")]
    out.resize(len, 0);
    #[cfg(not(feature = "std"))]
    out.resize(len, 0).map_err(|_| Error::BufferOverflow {
        capacity: MAX_TX_BYTES,
    })?;
    let written = pack_into(bits, &mut out)?;
    debug_assert_eq!(written, len);
    Ok(out)
}
