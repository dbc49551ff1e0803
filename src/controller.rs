//! Request orchestration: encode, modulate, pack, transmit.
//!
//! [`RemoteController`] owns a [`Transmitter`] and turns each request into one
//! or more blocking transmissions. Every operation runs to completion before it
//! returns; there is no queueing, retrying or cancellation. The protocols have
//! no acknowledgement, so the repeat count is the only reliability mechanism.
//!
//! Mattress "on" and "off" requests are several independent transmissions. If
//! one fails, the ones already sent stay applied and the rest are skipped.

use thiserror::Error;

use crate::bits::BitString;
use crate::consts::{FAN_DEFAULT_REPEATS, MATTRESS_DEFAULT_REPEATS};
use crate::error::Error;
use crate::fan::{self, FanCommand};
use crate::mattress::{self, HeatSettings, MattressCommand, PadCode, ZonePolicy};
use crate::radio::{TransmissionBuffer, Transmitter};

/// Runtime settings for a [`RemoteController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RemoteConfig {
    /// Repeats per fan command
    pub fan_repeats: u16,
    /// Repeats per mattress command
    pub mattress_repeats: u16,
    /// Zone validation for mattress commands built by the caller
    pub zone_policy: ZonePolicy,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            fan_repeats: FAN_DEFAULT_REPEATS,
            mattress_repeats: MATTRESS_DEFAULT_REPEATS,
            zone_policy: ZonePolicy::default(),
        }
    }
}

/// Failure of a request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError<E> {
    /// The command could not be encoded; nothing was sent.
    #[error(transparent)]
    Encode(#[from] Error),
    /// The transmitter reported a hardware failure.
    #[error("transmit failed: {0:?}")]
    Transmit(E),
}

/// Sends fan and mattress pad commands through an owned transmitter.
///
/// ## Example
///
/// ```rust
/// use core::convert::Infallible;
/// use ook_remote::controller::RemoteController;
/// use ook_remote::fan::FanCommand;
/// use ook_remote::radio::{TransmissionBuffer, Transmitter};
///
/// struct Dongle;
///
/// impl Transmitter for Dongle {
///     type Error = Infallible;
///
///     fn transmit(&mut self, buffer: &TransmissionBuffer) -> Result<(), Infallible> {
///         // configure frequency and rate from buffer.params(), then send buffer.bytes()
///         Ok(())
///     }
/// }
///
/// let mut remote = RemoteController::new(Dongle, None);
/// let command = FanCommand::parse("1010", "speed-3").unwrap();
/// let sent = remote.send_fan(&command).unwrap();
/// assert_eq!(sent.to_string(), "1101000100000");
/// ```
#[derive(Debug)]
pub struct RemoteController<T> {
    radio: T,
    config: RemoteConfig,
}

impl<T> RemoteController<T>
where
    T: Transmitter,
{
    /// Creates a controller around `radio`.
    ///
    /// # Arguments
    /// - `radio`: The transmitter, owned by the controller from now on.
    /// - `config`: Runtime settings, [`RemoteConfig::default()`] if `None`.
    pub fn new(radio: T, config: Option<RemoteConfig>) -> Self {
        let config = match config {
            Some(config) => config,
            None => RemoteConfig::default(),
        };
        Self { radio, config }
    }

    /// The active settings.
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Returns the transmitter.
    pub fn into_inner(self) -> T {
        self.radio
    }

    fn transmit(&mut self, buffer: &TransmissionBuffer) -> Result<(), SendError<T::Error>> {
        debug!(
            "transmitting {} symbols ({} bytes) at {} Hz",
            buffer.symbols(),
            buffer.bytes().len(),
            buffer.params().frequency_hz
        );
        self.radio.transmit(buffer).map_err(SendError::Transmit)
    }

    /// Sends a fan command with the configured repeat count.
    ///
    /// # Returns
    /// The 13-bit command field that was sent
    pub fn send_fan(&mut self, command: &FanCommand) -> Result<BitString, SendError<T::Error>> {
        let field = command.encode();
        debug!("fan command {}", command.action.name());
        self.send_fan_bits(&field, self.config.fan_repeats)?;
        Ok(field)
    }

    /// Sends an arbitrary fan field, `repeats` times.
    pub fn send_fan_bits(
        &mut self,
        bits: &BitString,
        repeats: u16,
    ) -> Result<(), SendError<T::Error>> {
        let buffer = fan::transmission(bits, repeats)?;
        self.transmit(&buffer)
    }

    /// Sends one mattress command with the configured repeat count.
    ///
    /// The zone is checked against the configured [`ZonePolicy`] first.
    ///
    /// # Returns
    /// The 25-bit command field that was sent
    pub fn send_mattress(
        &mut self,
        command: &MattressCommand,
    ) -> Result<BitString, SendError<T::Error>> {
        let _ = mattress::ZoneBits::new(command.zone.bits(), self.config.zone_policy)?;
        let field = command.encode();
        self.send_mattress_bits(&field, self.config.mattress_repeats)?;
        Ok(field)
    }

    /// Sends an arbitrary mattress field, `repeats` times. The field is sent last bit first.
    pub fn send_mattress_bits(
        &mut self,
        bits: &BitString,
        repeats: u16,
    ) -> Result<(), SendError<T::Error>> {
        let buffer = mattress::transmission(bits, repeats)?;
        self.transmit(&buffer)
    }

    /// Turns the pad off: one command per side, left first.
    pub fn mattress_off(&mut self, code: PadCode) -> Result<(), SendError<T::Error>> {
        self.send_sequence(&MattressCommand::off_sequence(code))
    }

    /// Turns the pad on with `settings`: one command per zone, left head first.
    pub fn mattress_on(
        &mut self,
        code: PadCode,
        settings: &HeatSettings,
    ) -> Result<(), SendError<T::Error>> {
        self.send_sequence(&MattressCommand::on_sequence(code, settings))
    }

    fn send_sequence(&mut self, commands: &[MattressCommand]) -> Result<(), SendError<T::Error>> {
        for (index, command) in commands.iter().enumerate() {
            if let Err(err) = self.send_mattress(command) {
                error!(
                    "mattress command {} of {} failed, {} not sent",
                    index + 1,
                    commands.len(),
                    commands.len() - index - 1
                );
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FAN_FREQUENCY_HZ, MATTRESS_FREQUENCY_HZ};
    use crate::mattress::{HeatLevel, ZoneBits};
    use crate::packer::packed_len;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct RadioFault;

    /// Records every buffer; fails the call numbered `fail_on` (0-based).
    #[derive(Debug, Default)]
    struct RecordingRadio {
        sent: Vec<TransmissionBuffer>,
        calls: usize,
        fail_on: Option<usize>,
    }

    impl Transmitter for RecordingRadio {
        type Error = RadioFault;

        fn transmit(&mut self, buffer: &TransmissionBuffer) -> Result<(), RadioFault> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on == Some(call) {
                return Err(RadioFault);
            }
            self.sent.push(buffer.clone());
            Ok(())
        }
    }

    fn code() -> PadCode {
        "01011".parse().unwrap()
    }

    /// Recovers the field from the first repeat of a mattress buffer.
    fn mattress_field(buffer: &TransmissionBuffer) -> BitString {
        let symbol = |i: usize| buffer.bytes()[i / 8] & (0x80 >> (i % 8)) != 0;
        let bits: Vec<bool> = (0..25).map(|bit| symbol(12 + bit * 3 + 2)).collect();
        BitString::from_bits(&bits).unwrap().reversed()
    }

    #[test]
    fn test_send_fan_uses_default_repeats() {
        let mut remote = RemoteController::new(RecordingRadio::default(), None);
        let command = FanCommand::parse("11011", "off").unwrap();
        let field = remote.send_fan(&command).unwrap();
        assert_eq!(field.to_string(), "1101100000100");

        let radio = remote.into_inner();
        assert_eq!(radio.sent.len(), 1);
        let buffer = &radio.sent[0];
        assert_eq!(buffer.params().frequency_hz, FAN_FREQUENCY_HZ);
        assert_eq!(buffer.params().repeats, 16);
        assert_eq!(buffer.bytes().len(), packed_len(36 + 16 * (13 * 3 + 36)));
    }

    #[test]
    fn test_send_fan_bits_with_custom_repeats() {
        let mut remote = RemoteController::new(RecordingRadio::default(), None);
        let bits: BitString = "101".parse().unwrap();
        remote.send_fan_bits(&bits, 4).unwrap();
        assert_eq!(
            remote.send_fan_bits(&bits, 0),
            Err(SendError::Encode(Error::InvalidRepeatCount))
        );
        let radio = remote.into_inner();
        assert_eq!(radio.calls, 1);
        assert_eq!(radio.sent[0].symbols(), 36 + 4 * (9 + 36));
    }

    #[test]
    fn test_configured_repeats() {
        let config = RemoteConfig {
            fan_repeats: 2,
            mattress_repeats: 5,
            ..RemoteConfig::default()
        };
        let mut remote = RemoteController::new(RecordingRadio::default(), Some(config));
        assert_eq!(remote.config().mattress_repeats, 5);
        let _ = remote
            .send_fan(&FanCommand::parse("1111", "reverse").unwrap())
            .unwrap();
        remote.mattress_off(code()).unwrap();
        let radio = remote.into_inner();
        assert_eq!(radio.sent[0].params().repeats, 2);
        assert_eq!(radio.sent[1].params().repeats, 5);
        assert_eq!(radio.sent[1].symbols(), 5 * (12 + 75));
    }

    #[test]
    fn test_mattress_off_sends_one_command_per_side() {
        let mut remote = RemoteController::new(RecordingRadio::default(), None);
        remote.mattress_off(code()).unwrap();
        let radio = remote.into_inner();
        assert_eq!(radio.sent.len(), 2);
        let expected = MattressCommand::off_sequence(code()).map(|c| c.encode());
        for (buffer, field) in radio.sent.iter().zip(expected) {
            assert_eq!(buffer.params().frequency_hz, MATTRESS_FREQUENCY_HZ);
            assert_eq!(buffer.params().repeats, 3);
            assert_eq!(mattress_field(buffer), field);
        }
    }

    #[test]
    fn test_mattress_on_sends_zones_in_order() {
        let mut remote = RemoteController::new(RecordingRadio::default(), None);
        let settings: HeatSettings = "1,2,3,4,5,6,stayOn,preheat".parse().unwrap();
        remote.mattress_on(code(), &settings).unwrap();
        let radio = remote.into_inner();
        assert_eq!(radio.sent.len(), 6);

        let zones = ["100", "101", "110", "000", "001", "010"];
        for (i, buffer) in radio.sent.iter().enumerate() {
            let expected = MattressCommand {
                code: code(),
                zone: ZoneBits::parse(zones[i], ZonePolicy::Strict).unwrap(),
                heat: HeatLevel::new(i as u8 + 1).unwrap(),
                on: true,
                stay_on: true,
                preheat: true,
            };
            assert_eq!(mattress_field(buffer), expected.encode());
        }
    }

    #[test]
    fn test_mattress_on_stops_at_first_failure() {
        let radio = RecordingRadio {
            fail_on: Some(2),
            ..RecordingRadio::default()
        };
        let mut remote = RemoteController::new(radio, None);
        let settings: HeatSettings = "5,5,5,5,5,5".parse().unwrap();
        assert_eq!(
            remote.mattress_on(code(), &settings),
            Err(SendError::Transmit(RadioFault))
        );
        let radio = remote.into_inner();
        assert_eq!(radio.calls, 3);
        // the two zones already sent stay sent
        assert_eq!(radio.sent.len(), 2);
    }

    #[test]
    fn test_zone_policy_applies_to_single_commands() {
        let config = RemoteConfig {
            zone_policy: ZonePolicy::Strict,
            ..RemoteConfig::default()
        };
        let mut strict = RemoteController::new(RecordingRadio::default(), Some(config));
        let mut permissive = RemoteController::new(RecordingRadio::default(), None);
        let command = MattressCommand {
            zone: ZoneBits::parse("111", ZonePolicy::Permissive).unwrap(),
            ..MattressCommand::off(code(), mattress::Zone::LeftHead)
        };

        assert_eq!(
            strict.send_mattress(&command),
            Err(SendError::Encode(Error::UnknownZone { bits: 0b111 }))
        );
        assert_eq!(strict.into_inner().calls, 0);
        let field = permissive.send_mattress(&command).unwrap();
        assert_eq!(field, command.encode());
        assert_eq!(permissive.into_inner().sent.len(), 1);
    }

    #[test]
    fn test_send_mattress_bits_reverses_field() {
        let mut remote = RemoteController::new(RecordingRadio::default(), None);
        let field = MattressCommand::off(code(), mattress::Zone::RightFeet).encode();
        remote.send_mattress_bits(&field, 2).unwrap();
        let radio = remote.into_inner();
        assert_eq!(mattress_field(&radio.sent[0]), field);
        assert_eq!(radio.sent[0].params().repeats, 2);
    }
}
