//! Heated mattress pad remote protocol.
//!
//! A mattress command is a 25-bit field, written here in construction order:
//!
//! | Bits  | Content |
//! |-------|---------|
//! | 0-5   | checksum: number of `1` bits in bits 6-24 |
//! | 6-8   | zone |
//! | 9-13  | pad code |
//! | 14-16 | zero |
//! | 17-20 | heat level |
//! | 21    | zero |
//! | 22    | stay on |
//! | 23    | preheat |
//! | 24    | on |
//!
//! On air the field is sent back to front, bit 24 first. Each repeat is the
//! 12-symbol mark/break preamble followed by the field's symbols; the preamble
//! also resynchronises the receiver between repeats, so there is no guard.
//!
//! A pad has two sides with three zones each. Turning a pad on sends one command
//! per zone; turning it off sends one command per side.

use core::str::FromStr;

use crate::bits::BitString;
use crate::checksum::ones_count;
use crate::consts::{
    MATTRESS_CODE_LEN, MATTRESS_DEFAULT_REPEATS, MATTRESS_FREQUENCY_HZ, MATTRESS_MIN_REPEATS,
    MATTRESS_PAYLOAD_LEN, MATTRESS_PREAMBLE, MATTRESS_SYMBOL_RATE, MATTRESS_ZONE_LEN,
    MAX_HEAT_LEVEL,
};
use crate::encoding::{SymbolStream, encode_bits};
use crate::error::{Error, Result};
use crate::radio::{Modulation, ModulationParameters, TransmissionBuffer};

/// Radio settings for the mattress protocol, with the default repeat count.
pub const MATTRESS_PARAMETERS: ModulationParameters = ModulationParameters {
    frequency_hz: MATTRESS_FREQUENCY_HZ,
    modulation: Modulation::AskOok,
    symbol_rate: MATTRESS_SYMBOL_RATE,
    sync_word: None,
    repeats: MATTRESS_DEFAULT_REPEATS,
};

/// A 5-bit pad code, set on the pad's controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct PadCode(BitString);

impl PadCode {
    /// Wraps `bits`, which must be exactly 5 bits long.
    pub fn new(bits: BitString) -> Result<Self> {
        exact_width(bits, MATTRESS_CODE_LEN, "pad code").map(Self)
    }

    /// The code bits.
    pub const fn bits(&self) -> BitString {
        self.0
    }
}

impl FromStr for PadCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.parse()?)
    }
}

fn exact_width(bits: BitString, expected: u8, field: &'static str) -> Result<BitString> {
    if bits.len() != expected {
        return Err(Error::InvalidFieldLength {
            field,
            expected,
            actual: bits.len(),
        });
    }
    Ok(bits)
}

/// The six heating zones of a two-sided pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Zone {
    /// Left side, head
    LeftHead,
    /// Left side, body
    LeftBody,
    /// Left side, feet
    LeftFeet,
    /// Right side, head
    RightHead,
    /// Right side, body
    RightBody,
    /// Right side, feet
    RightFeet,
}

impl Zone {
    /// Every zone, in the order an "on" request lists heat levels.
    pub const ALL: [Zone; 6] = [
        Zone::LeftHead,
        Zone::LeftBody,
        Zone::LeftFeet,
        Zone::RightHead,
        Zone::RightBody,
        Zone::RightFeet,
    ];

    /// Position of the zone in [`Zone::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Zone::LeftHead => 0,
            Zone::LeftBody => 1,
            Zone::LeftFeet => 2,
            Zone::RightHead => 3,
            Zone::RightBody => 4,
            Zone::RightFeet => 5,
        }
    }

    /// The 3-bit zone value.
    pub const fn code(self) -> u8 {
        match self {
            Zone::RightHead => 0b000,
            Zone::RightBody => 0b001,
            Zone::RightFeet => 0b010,
            Zone::LeftHead => 0b100,
            Zone::LeftBody => 0b101,
            Zone::LeftFeet => 0b110,
        }
    }

    /// Looks up a zone by its 3-bit value.
    pub fn from_code(code: u8) -> Option<Self> {
        Zone::ALL.into_iter().find(|zone| zone.code() == code)
    }
}

/// How zone values outside the six defined zones are treated.
///
/// Pads have only been observed to use the six [`Zone`] values. The remaining
/// two 3-bit values (`011`, `111`) are undefined; a permissive policy passes
/// them through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ZonePolicy {
    /// Reject undefined zone values with [`Error::UnknownZone`].
    Strict,
    /// Accept any 3-bit zone value.
    #[default]
    Permissive,
}

/// The 3-bit zone field of a mattress command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ZoneBits(BitString);

impl ZoneBits {
    /// Wraps `bits`, which must be exactly 3 bits long, checking it against `policy`.
    pub fn new(bits: BitString, policy: ZonePolicy) -> Result<Self> {
        let bits = exact_width(bits, MATTRESS_ZONE_LEN, "zone")?;
        if policy == ZonePolicy::Strict && Zone::from_code(bits.value() as u8).is_none() {
            return Err(Error::UnknownZone {
                bits: bits.value() as u8,
            });
        }
        Ok(Self(bits))
    }

    /// Parses `s` as a zone field under `policy`.
    pub fn parse(s: &str, policy: ZonePolicy) -> Result<Self> {
        Self::new(s.parse()?, policy)
    }

    /// The zone bits.
    pub const fn bits(&self) -> BitString {
        self.0
    }

    /// The named zone, or `None` for an undefined value.
    pub fn zone(&self) -> Option<Zone> {
        Zone::from_code(self.0.value() as u8)
    }
}

impl From<Zone> for ZoneBits {
    fn from(zone: Zone) -> Self {
        Self(BitString::from_value_truncated(
            zone.code() as u32,
            MATTRESS_ZONE_LEN,
        ))
    }
}

/// A zone heat level, 0 (off) to 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct HeatLevel(u8);

impl HeatLevel {
    /// Heat off.
    pub const OFF: HeatLevel = HeatLevel(0);

    /// Validates `level`.
    ///
    /// # Errors
    /// [`Error::HeatLevelOutOfRange`] above 15.
    pub fn new(level: u8) -> Result<Self> {
        if level > MAX_HEAT_LEVEL {
            return Err(Error::HeatLevelOutOfRange { level });
        }
        Ok(Self(level))
    }

    /// The level.
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// A single mattress pad command for one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct MattressCommand {
    /// The pad's code
    pub code: PadCode,
    /// The zone to set
    pub zone: ZoneBits,
    /// Heat level for the zone
    pub heat: HeatLevel,
    /// Whether the pad is on
    pub on: bool,
    /// Keep heating past the pad's automatic shutoff
    pub stay_on: bool,
    /// Run the preheat cycle
    pub preheat: bool,
}

impl MattressCommand {
    /// The command that turns one side of the pad off, addressed to `zone`.
    pub fn off(code: PadCode, zone: Zone) -> Self {
        Self {
            code,
            zone: zone.into(),
            heat: HeatLevel::OFF,
            on: false,
            stay_on: false,
            preheat: false,
        }
    }

    /// The two commands that turn the pad off, left side first.
    pub fn off_sequence(code: PadCode) -> [MattressCommand; 2] {
        [
            Self::off(code, Zone::LeftHead),
            Self::off(code, Zone::RightHead),
        ]
    }

    /// The six commands that apply `settings`, in [`Zone::ALL`] order.
    pub fn on_sequence(code: PadCode, settings: &HeatSettings) -> [MattressCommand; 6] {
        Zone::ALL.map(|zone| Self {
            code,
            zone: zone.into(),
            heat: settings.level(zone),
            on: true,
            stay_on: settings.stay_on,
            preheat: settings.preheat,
        })
    }

    /// The 19 payload bits, without the checksum.
    pub fn payload(&self) -> BitString {
        let mut value = self.zone.bits().value();
        value = (value << MATTRESS_CODE_LEN) | self.code.bits().value();
        value <<= 3;
        value = (value << 4) | self.heat.get() as u32;
        value <<= 1;
        value = (value << 1) | self.stay_on as u32;
        value = (value << 1) | self.preheat as u32;
        value = (value << 1) | self.on as u32;
        BitString::from_value_truncated(value, MATTRESS_PAYLOAD_LEN)
    }

    /// Builds the 25-bit command field: checksum then payload.
    pub fn encode(&self) -> BitString {
        let payload = self.payload();
        let checksum = ones_count(&payload);
        BitString::from_value_truncated(
            (checksum.value() << payload.len()) | payload.value(),
            checksum.len() + payload.len(),
        )
    }
}

/// Heat levels for all six zones plus the pad-wide flags.
///
/// The text form is the six levels in [`Zone::ALL`] order, optionally followed
/// by `,stayOn` and then `,preheat`, e.g. `"3,3,5,0,0,0,stayOn"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct HeatSettings {
    /// One level per zone, in [`Zone::ALL`] order
    pub levels: [HeatLevel; 6],
    /// Keep heating past the automatic shutoff
    pub stay_on: bool,
    /// Run the preheat cycle
    pub preheat: bool,
}

impl HeatSettings {
    /// The level for `zone`.
    pub fn level(&self, zone: Zone) -> HeatLevel {
        self.levels[zone.index()]
    }
}

impl FromStr for HeatSettings {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(',');
        let mut levels = [HeatLevel::OFF; 6];
        for level in levels.iter_mut() {
            let text = parts.next().ok_or(Error::InvalidHeatSettings)?;
            if text.is_empty() || !text.bytes().all(|c| c.is_ascii_digit()) {
                return Err(Error::InvalidHeatSettings);
            }
            let value: u8 = text.parse().map_err(|_| Error::InvalidHeatSettings)?;
            *level = HeatLevel::new(value)?;
        }

        let mut next = parts.next();
        let stay_on = next == Some("stayOn");
        if stay_on {
            next = parts.next();
        }
        let preheat = next == Some("preheat");
        if preheat {
            next = parts.next();
        }
        if next.is_some() {
            return Err(Error::InvalidHeatSettings);
        }

        Ok(Self {
            levels,
            stay_on,
            preheat,
        })
    }
}

/// Expands a mattress field into its transmit symbol stream.
///
/// The field is sent last bit first. The stream is
/// `repeats * (preamble + symbols(reversed field))` with the 12-symbol
/// `111111000000` preamble. `field` may be any length so raw fields can be
/// replayed.
///
/// # Errors
/// - [`Error::InvalidRepeatCount`] if `repeats` is zero
/// - [`Error::StreamOverflow`] without `std`, when the stream does not fit
pub fn modulate(field: &BitString, repeats: u16) -> Result<SymbolStream> {
    if repeats == 0 {
        return Err(Error::InvalidRepeatCount);
    }
    if repeats < MATTRESS_MIN_REPEATS {
        warn!(
            "mattress command sent {} time(s), pads need at least {}",
            repeats,
            MATTRESS_MIN_REPEATS
        );
    }

    let mut unit = SymbolStream::new();
    unit.extend_from_slice(&MATTRESS_PREAMBLE)?;
    let _ = encode_bits(&field.reversed(), &mut unit)?;

    let mut stream = SymbolStream::new();
    for _ in 0..repeats {
        stream.extend_from_slice(unit.as_slice())?;
    }
    Ok(stream)
}

/// Modulates and packs a mattress field for transmission.
pub fn transmission(field: &BitString, repeats: u16) -> Result<TransmissionBuffer> {
    let stream = modulate(field, repeats)?;
    TransmissionBuffer::from_symbols(&stream, MATTRESS_PARAMETERS.with_repeats(repeats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MATTRESS_FIELD_LEN, SYMBOLS_PER_BIT};
    use crate::encoding::encode_bit;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    fn code() -> PadCode {
        "10110".parse().unwrap()
    }

    fn command(zone: &str, heat: u8) -> MattressCommand {
        MattressCommand {
            code: "00000".parse().unwrap(),
            zone: ZoneBits::parse(zone, ZonePolicy::Strict).unwrap(),
            heat: HeatLevel::new(heat).unwrap(),
            on: false,
            stay_on: false,
            preheat: false,
        }
    }

    #[test]
    fn test_encode_left_head_all_zero() {
        let field = command("100", 0).encode();
        assert_eq!(field.len(), MATTRESS_FIELD_LEN);
        assert_eq!(field, bits("0000011000000000000000000"));
        // checksum counts the single zone bit
        assert_eq!(field.value() >> 19, 1);
    }

    #[test]
    fn test_encode_field_layout() {
        let command = MattressCommand {
            code: code(),
            zone: Zone::LeftBody.into(),
            heat: HeatLevel::new(9).unwrap(),
            on: true,
            stay_on: true,
            preheat: false,
        };
        let payload = "101" // zone
            .to_string()
            + "10110" // code
            + "000"
            + "1001" // heat 9
            + "0"
            + "1" // stay on
            + "0" // preheat
            + "1"; // on
        assert_eq!(command.payload(), bits(&payload));
        // 2 + 3 + 2 + 1 + 1 ones
        let expected = "001001".to_string() + &payload;
        assert_eq!(command.encode(), bits(&expected));
    }

    #[test]
    fn test_checksum_is_popcount_of_payload() {
        for heat in 0..=15 {
            for zone in Zone::ALL {
                let mut command = command("000", heat);
                command.zone = zone.into();
                command.on = heat % 2 == 0;
                command.preheat = heat > 7;
                let field = command.encode();
                assert_eq!(field.value() >> 19, command.payload().count_ones());
            }
        }
    }

    #[test]
    fn test_zone_codes() {
        let expected = [
            (Zone::RightHead, "000"),
            (Zone::RightBody, "001"),
            (Zone::RightFeet, "010"),
            (Zone::LeftHead, "100"),
            (Zone::LeftBody, "101"),
            (Zone::LeftFeet, "110"),
        ];
        for (zone, code) in expected {
            assert_eq!(ZoneBits::from(zone).bits(), bits(code));
            let parsed = ZoneBits::parse(code, ZonePolicy::Strict).unwrap();
            assert_eq!(parsed.zone(), Some(zone));
        }
    }

    #[test]
    fn test_zone_policy() {
        assert_eq!(
            ZoneBits::parse("111", ZonePolicy::Strict),
            Err(Error::UnknownZone { bits: 0b111 })
        );
        let zone = ZoneBits::parse("011", ZonePolicy::Permissive).unwrap();
        assert_eq!(zone.zone(), None);
        assert_eq!(ZonePolicy::default(), ZonePolicy::Permissive);
    }

    #[test]
    fn test_field_widths() {
        assert_eq!(
            "1011".parse::<PadCode>(),
            Err(Error::InvalidFieldLength {
                field: "pad code",
                expected: 5,
                actual: 4
            })
        );
        assert!(ZoneBits::parse("10", ZonePolicy::Permissive).is_err());
    }

    #[test]
    fn test_heat_level_range() {
        assert_eq!(HeatLevel::new(15).unwrap().get(), 15);
        assert_eq!(
            HeatLevel::new(16),
            Err(Error::HeatLevelOutOfRange { level: 16 })
        );
    }

    #[test]
    fn test_heat_settings_parse() {
        let settings: HeatSettings = "1,2,3,4,5,6".parse().unwrap();
        assert_eq!(settings.level(Zone::LeftHead).get(), 1);
        assert_eq!(settings.level(Zone::RightFeet).get(), 6);
        assert!(!settings.stay_on);
        assert!(!settings.preheat);

        let settings: HeatSettings = "0,0,0,10,10,10,stayOn,preheat".parse().unwrap();
        assert!(settings.stay_on);
        assert!(settings.preheat);

        let settings: HeatSettings = "0,0,0,0,0,0,preheat".parse().unwrap();
        assert!(!settings.stay_on);
        assert!(settings.preheat);
    }

    #[test]
    fn test_heat_settings_rejects_bad_input() {
        for bad in [
            "1,2,3,4,5",
            "1,2,3,4,5,6,7",
            "1,2,3,4,5,x",
            "1,2,3,4,5,6,preheat,stayOn",
            "1,2,3,4,5,6,",
            "-1,2,3,4,5,6",
            "1,2,3,4,5,300",
        ] {
            assert_eq!(
                bad.parse::<HeatSettings>(),
                Err(Error::InvalidHeatSettings),
                "{}",
                bad
            );
        }
        assert_eq!(
            "1,2,3,4,5,16".parse::<HeatSettings>(),
            Err(Error::HeatLevelOutOfRange { level: 16 })
        );
    }

    #[test]
    fn test_on_sequence_order() {
        let settings: HeatSettings = "1,2,3,4,5,6,stayOn".parse().unwrap();
        let commands = MattressCommand::on_sequence(code(), &settings);
        let zones: Vec<_> = commands.iter().map(|c| c.zone.bits()).collect();
        assert_eq!(
            zones,
            ["100", "101", "110", "000", "001", "010"].map(bits)
        );
        for (i, command) in commands.iter().enumerate() {
            assert_eq!(command.heat.get() as usize, i + 1);
            assert!(command.on);
            assert!(command.stay_on);
            assert!(!command.preheat);
            assert_eq!(command.code, code());
        }
    }

    #[test]
    fn test_off_sequence() {
        let [left, right] = MattressCommand::off_sequence(code());
        assert_eq!(left.zone.zone(), Some(Zone::LeftHead));
        assert_eq!(right.zone.zone(), Some(Zone::RightHead));
        for command in [left, right] {
            assert!(!command.on);
            assert_eq!(command.heat, HeatLevel::OFF);
        }
    }

    #[test]
    fn test_modulate_reverses_field() {
        let field = bits("0000011000000000000000000");
        let stream = modulate(&field, 1).unwrap();
        let symbols = stream.as_slice();
        assert_eq!(symbols.len(), 12 + 25 * 3);
        assert_eq!(&symbols[..12], MATTRESS_PREAMBLE);
        for (i, bit) in field.reversed().iter().enumerate() {
            let start = 12 + i * SYMBOLS_PER_BIT;
            assert_eq!(&symbols[start..start + SYMBOLS_PER_BIT], encode_bit(bit));
        }
        // Bits 5 and 6 are set, so the 19th and 20th groups on air are ones.
        assert_eq!(
            &symbols[12 + 18 * 3..12 + 20 * 3],
            [true, false, true, true, false, true]
        );
        assert!(
            symbols[12..12 + 18 * 3]
                .chunks(3)
                .all(|g| g == [true, false, false])
        );
    }

    #[test]
    fn test_palindrome_modulates_the_same_either_way() {
        let palindrome = bits("1100100001010101000010011");
        assert_eq!(palindrome.reversed(), palindrome);
        let modulated = modulate(&palindrome, 2).unwrap();
        let mut naive = SymbolStream::new();
        for _ in 0..2 {
            naive.extend_from_slice(&MATTRESS_PREAMBLE).unwrap();
            let _ = encode_bits(&palindrome, &mut naive).unwrap();
        }
        assert_eq!(modulated.pack().unwrap(), naive.pack().unwrap());
    }

    #[test]
    fn test_non_palindrome_differs_from_naive_order() {
        let field = command("100", 5).encode();
        assert_ne!(field.reversed(), field);
        let modulated = modulate(&field, 3).unwrap();
        let mut naive = SymbolStream::new();
        for _ in 0..3 {
            naive.extend_from_slice(&MATTRESS_PREAMBLE).unwrap();
            let _ = encode_bits(&field, &mut naive).unwrap();
        }
        assert_eq!(modulated.len(), naive.len());
        assert_ne!(modulated.pack().unwrap(), naive.pack().unwrap());
    }

    #[test]
    fn test_repeats_have_no_guard() {
        let stream = modulate(&bits("1"), 3).unwrap();
        assert_eq!(stream.len(), 3 * 15);
        for r in 0..3 {
            assert_eq!(&stream.as_slice()[r * 15..r * 15 + 12], MATTRESS_PREAMBLE);
        }
        assert_eq!(modulate(&bits("1"), 0), Err(Error::InvalidRepeatCount));
    }

    #[test]
    fn test_transmission_parameters() {
        let buffer = transmission(&command("000", 0).encode(), 3).unwrap();
        assert_eq!(buffer.symbols(), 3 * (12 + 75));
        assert_eq!(buffer.bytes().len(), (3 * 87usize).div_ceil(8));
        assert_eq!(buffer.params().frequency_hz, 418_000_000);
        assert_eq!(buffer.params().symbol_rate, 1_600);
        assert_eq!(buffer.params().repeats, 3);
        // preamble 111111000000 then the on bit (0) as 100
        assert_eq!(buffer.bytes()[0], 0xfc);
        assert_eq!(buffer.bytes()[1], 0x09);
    }
}
