//! # ook-remote
//!
//! A portable, no_std Rust encoder for sub-GHz ASK/OOK household remotes: ceiling
//! fans on 303.875 MHz and dual-zone heated mattress pads on 418 MHz.
//!
//! The crate turns a command such as "fan speed 3" or "pad zones 3,3,5,0,0,0" into
//! the exact on-air symbol stream the factory remotes emit, packed MSB-first into
//! bytes together with the radio settings needed to send it. It uses:
//! - a three-symbol pulse-width bit encoding (`0` → `100`, `1` → `101`)
//! - a ones-count checksum for the mattress protocol
//! - `embedded-hal` traits for keying a transmitter module from a GPIO pin
//! - interrupt-safe transmitter sharing with `critical-section`
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support and replaces `heapless::Vec`s with
//! `std::vec::Vec`s |
//! | `delay-loop`          | [`PinTransmitter`](timer::PinTransmitter), keying a pin with `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | [`SharedTransmitter`](timer::SharedTransmitter) and the `driver_*` interrupt helpers |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Protocols
//!
//! | Protocol | Carrier     | Symbol rate | Field    | Framing |
//! |----------|-------------|-------------|----------|---------|
//! | Fan      | 303.875 MHz | 3000 /s     | 13 bits  | 36-symbol silence before and after each repeat, 16 repeats |
//! | Mattress | 418 MHz     | 1600 /s     | 25 bits  | `111111000000` preamble per repeat, field sent reversed, 3 repeats |
//!
//! ## Usage
//!
//! ```rust
//! use core::convert::Infallible;
//! use ook_remote::controller::RemoteController;
//! use ook_remote::fan::FanCommand;
//! use ook_remote::mattress::{HeatSettings, PadCode};
//! use ook_remote::radio::{TransmissionBuffer, Transmitter};
//!
//! #[derive(Debug)]
//! struct Radio;
//!
//! impl Transmitter for Radio {
//!     type Error = Infallible;
//!
//!     fn transmit(&mut self, buffer: &TransmissionBuffer) -> Result<(), Infallible> {
//!         let _ = (buffer.params().frequency_hz, buffer.bytes());
//!         Ok(())
//!     }
//! }
//!
//! let mut remote = RemoteController::new(Radio, None);
//! let light = FanCommand::parse("1010", "toggle-downlight").unwrap();
//! assert_eq!(remote.send_fan(&light).unwrap().to_string(), "1101000000010");
//!
//! let code: PadCode = "01101".parse().unwrap();
//! let settings: HeatSettings = "3,3,5,0,0,0,stayOn".parse().unwrap();
//! remote.mattress_on(code, &settings).unwrap();
//! remote.mattress_off(code).unwrap();
//! ```
//!
//! The lower layers can be used on their own:
//!
//! ```rust
//! use ook_remote::fan::{self, FanCommand};
//!
//! let field = FanCommand::parse("1010", "speed-3").unwrap().encode();
//! let buffer = fan::transmission(&field, 16).unwrap();
//! assert_eq!(buffer.bytes().len(), 155);
//! ```
//!
//! ## Integration Notes
//!
//! - Neither protocol has acknowledgements; the repeat count is the only reliability mechanism
//! - A radio has one active carrier at a time, so share a transmitter through
//!   [`SharedTransmitter`](timer::SharedTransmitter) rather than copying it
//! - Without `std`, symbol streams and byte buffers have fixed capacities, see
//!   [`MAX_SYMBOLS`](consts::MAX_SYMBOLS) and [`MAX_TX_BYTES`](consts::MAX_TX_BYTES)
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "timer-isr")]
pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

pub mod bits;
pub(crate) mod checksum;
pub mod consts;
pub mod controller;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod fan;
pub mod mattress;
pub mod packer;
pub mod radio;
pub mod timer;

pub use error::{Error, Result};
