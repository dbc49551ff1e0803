//! Symbol timing and transmitter sharing.
//!
//! Timing calculations for keying a transmitter at a protocol's symbol rate,
//! plus two ways to drive the hardware: a blocking pin keyer built on
//! `DelayNs` (`delay-loop` feature), or an interrupt-driven [`OokDriver`]
//! shared through `critical_section::Mutex` (`timer-isr` feature).
//!
//! Contains:
//! - `symbol_period_ns`: runtime symbol period calculator
//! - `const_symbol_period_ns`: compile-time symbol period calculator
//! - `ticks_per_symbol`: divider for a periodic tick source
//! - `transmission_duration_us`: time on air of a symbol stream
//! - `PinTransmitter` (feature `delay-loop`)
//! - `SharedTransmitter` and the `driver_*` interrupt helpers (feature `timer-isr`)
//!
//! Symbol periods of the built-in protocols:
//!
//! | Protocol | Symbol rate | Symbol period | Bit period |
//! |----------|-------------|---------------|------------|
//! | Fan      | 3000 /s     | 333.3 µs      | 1 ms       |
//! | Mattress | 1600 /s     | 625 µs        | 1.875 ms   |
//!
//! [`OokDriver`]: crate::driver::OokDriver

use libm::round;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

/// 1,000,000,000 nanoseconds = 1 second
pub const NANOSECONDS_PER_SECOND: u32 = 1_000_000_000;
/// 1,000,000 microseconds = 1 second
pub const MICROSECONDS_PER_SECOND: u32 = 1_000_000;

/// Computes the length of one symbol in nanoseconds, rounded to the nearest.
///
/// # Arguments
/// - `symbol_rate`: symbols per second, non-zero
pub fn symbol_period_ns(symbol_rate: u32) -> u32 {
    round(NANOSECONDS_PER_SECOND as f64 / symbol_rate as f64) as u32
}

/// Compile-time symbol period calculator
///
/// Integer version of [`symbol_period_ns`], rounding half up.
pub const fn const_symbol_period_ns(symbol_rate: u32) -> u32 {
    (NANOSECONDS_PER_SECOND + symbol_rate / 2) / symbol_rate
}

/// Computes how many ticks of a periodic timer make up one symbol.
///
/// # Arguments
/// - `tick_us`: tick interval in microseconds (e.g., 62.5)
/// - `symbol_rate`: symbols per second
///
/// # Returns
/// - Ticks per symbol, rounded to the nearest and clamped to `1..=255`
pub fn ticks_per_symbol(tick_us: f32, symbol_rate: u32) -> u8 {
    let symbol_us = MICROSECONDS_PER_SECOND as f64 / symbol_rate as f64;
    let ticks = round(symbol_us / tick_us as f64);
    ticks.clamp(1.0, u8::MAX as f64) as u8
}

/// Time on air of `symbols` symbols at `symbol_rate`, in microseconds.
pub fn transmission_duration_us(symbols: usize, symbol_rate: u32) -> u64 {
    if symbol_rate == 0 {
        return 0;
    }
    symbols as u64 * MICROSECONDS_PER_SECOND as u64 / symbol_rate as u64
}
