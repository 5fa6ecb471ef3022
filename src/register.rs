//! This module defines how sensors and settings map onto the inverter's registers.
//!
//! A [`Descriptor`] names one value: where it lives, how it is decoded and encoded
//! ([`Rule`]) and which tags the catalog filter looks at.

use fugit::SecsDurationU32;
use strum_macros::{Display, EnumIter};

use crate::{
    capability::Feature,
    error::Error,
    tou::{EcoModeGroup, MonthSet, TimeOfDay, WorkWeek},
    types::{Timestamp, Value, decode_ascii},
};

/// Lookup table of an enum register.
pub type EnumTable = &'static [(u16, &'static str)];
/// Lookup table of a bitmap register, bit index to label.
pub type BitTable = &'static [(u8, &'static str)];

/// Semantic category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum SensorKind {
    Pv,
    Ac,
    Ups,
    Bat,
    Grid,
    Bms,
}

/// Second or third line of a three phase value, trimmed on single phase inverters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    L2,
    L3,
}

/// How raw register bytes turn into a [`Value`] and back.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    U16 { divisor: u32 },
    I16 { divisor: u32 },
    U32 { divisor: u32 },
    I32 { divisor: u32 },
    U64 { divisor: u32 },
    /// IEEE-754 single precision.
    F32 { divisor: u32 },
    /// High byte of a register.
    ByteH,
    /// Low byte of a register.
    ByteL,
    Enum16(EnumTable),
    EnumH(EnumTable),
    EnumL(EnumTable),
    Bitmap32(BitTable),
    /// A 32 bit bitmap split over two registers which are not adjacent. The
    /// descriptor offset is the high word.
    Bitmap22 { low: u16, table: BitTable },
    Timestamp,
    /// ASCII text of the given byte length.
    Ascii(u8),
    TimeOfDay,
    WorkWeek,
    MonthMask,
    /// A register holding one of two raw values.
    Switch { on: u16, off: u16 },
    /// 32 bit counter of hours.
    Hours32,
    Seconds16,
    Seconds32,
    /// Legacy eco mode group, see [`EcoModeGroup`].
    EcoMode,
    /// Derived from other registers of the block, not backed by a register of its own.
    Calculated(fn(&RegisterBlock) -> Option<Value>),
}

/// Why a value could not be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    ReadOnly,
    Invalid(&'static str),
}

impl Rule {
    /// Byte width of the value on the wire.
    pub const fn width(&self) -> u16 {
        match self {
            Rule::ByteH | Rule::ByteL | Rule::EnumH(_) | Rule::EnumL(_) => 1,
            Rule::U16 { .. }
            | Rule::I16 { .. }
            | Rule::Enum16(_)
            | Rule::Bitmap22 { .. }
            | Rule::TimeOfDay
            | Rule::WorkWeek
            | Rule::MonthMask
            | Rule::Switch { .. }
            | Rule::Seconds16 => 2,
            Rule::U32 { .. }
            | Rule::I32 { .. }
            | Rule::F32 { .. }
            | Rule::Bitmap32(_)
            | Rule::Hours32
            | Rule::Seconds32 => 4,
            Rule::Timestamp => 6,
            Rule::U64 { .. } | Rule::EcoMode => 8,
            Rule::Ascii(len) => *len as u16,
            Rule::Calculated(_) => 0,
        }
    }

    /// Values which can only be produced from a whole block read.
    pub const fn is_derived(&self) -> bool {
        matches!(self, Rule::Calculated(_) | Rule::Bitmap22 { .. })
    }

    /// Narrower than a register, so writes need the other half first.
    pub const fn is_sub_register(&self) -> bool {
        self.width() == 1
    }

    pub fn decode(&self, block: &RegisterBlock, offset: u16) -> Option<Value> {
        let value = match self {
            Rule::U16 { divisor } => scaled(block.u16_at(offset)? as i64, *divisor),
            Rule::I16 { divisor } => scaled(block.i16_at(offset)? as i64, *divisor),
            Rule::U32 { divisor } => scaled(block.u32_at(offset)? as i64, *divisor),
            Rule::I32 { divisor } => scaled(block.i32_at(offset)? as i64, *divisor),
            Rule::U64 { divisor } => {
                let bytes = block.bytes(offset, 8)?;
                let raw = u64::from_be_bytes(bytes.try_into().ok()?);
                // Unwritten counters read back as all ones.
                if raw == u64::MAX {
                    return None;
                }
                scaled(i64::try_from(raw).ok()?, *divisor)
            }
            Rule::F32 { divisor } => {
                let raw = f32::from_bits(block.u32_at(offset)?);
                if !raw.is_finite() {
                    return None;
                }
                Value::Decimal(round_to(raw as f64 / *divisor as f64, 3))
            }
            Rule::ByteH => Value::Integer(block.bytes(offset, 2)?[0] as i64),
            Rule::ByteL => Value::Integer(block.bytes(offset, 2)?[1] as i64),
            Rule::Enum16(table) => lookup(*table, block.u16_at(offset)?)?,
            Rule::EnumH(table) => lookup(*table, block.bytes(offset, 2)?[0] as u16)?,
            Rule::EnumL(table) => lookup(*table, block.bytes(offset, 2)?[1] as u16)?,
            Rule::Bitmap32(table) => flags(*table, block.u32_at(offset)?),
            Rule::Bitmap22 { low, table } => {
                let high = block.u16_at(offset)? as u32;
                let low = block.u16_at(*low)? as u32;
                flags(*table, high << 16 | low)
            }
            Rule::Timestamp => Value::Timestamp(Timestamp::from_bytes(block.bytes(offset, 6)?)?),
            Rule::Ascii(len) => Value::Text(decode_ascii(block.bytes(offset, *len as usize)?)),
            Rule::TimeOfDay => Value::TimeOfDay(TimeOfDay::from_raw(block.u16_at(offset)?)),
            Rule::WorkWeek => Value::WorkWeek(WorkWeek::from_raw(block.u16_at(offset)?)),
            Rule::MonthMask => Value::Months(MonthSet::from_raw(block.u16_at(offset)?)),
            Rule::Switch { on, .. } => Value::Bool(block.u16_at(offset)? == *on),
            Rule::Hours32 => {
                Value::Duration(SecsDurationU32::hours(block.u32_at(offset)?.min(u32::MAX / 3600)))
            }
            Rule::Seconds16 => Value::Duration(SecsDurationU32::secs(block.u16_at(offset)? as u32)),
            Rule::Seconds32 => Value::Duration(SecsDurationU32::secs(block.u32_at(offset)?)),
            Rule::EcoMode => Value::EcoMode(EcoModeGroup::from_bytes(block.bytes(offset, 8)?)?),
            Rule::Calculated(calculate) => calculate(block)?,
        };
        Some(value)
    }

    /// Encode `value` into register words. `current` is the present register
    /// content, required by the byte rules.
    pub fn encode(&self, value: &Value, current: Option<u16>) -> Result<Vec<u16>, EncodeError> {
        let words = match self {
            Rule::U16 { divisor } => {
                vec![raw_in_range(value, *divisor, 0, u16::MAX as i64)? as u16]
            }
            Rule::I16 { divisor } => {
                vec![raw_in_range(value, *divisor, i16::MIN as i64, i16::MAX as i64)? as i16 as u16]
            }
            Rule::U32 { divisor } => {
                split_u32(raw_in_range(value, *divisor, 0, u32::MAX as i64)? as u32)
            }
            Rule::I32 { divisor } => split_u32(
                raw_in_range(value, *divisor, i32::MIN as i64, i32::MAX as i64)? as i32 as u32,
            ),
            Rule::ByteH | Rule::ByteL => {
                let byte = raw_in_range(value, 1, 0, u8::MAX as i64)? as u16;
                let current = current.ok_or(EncodeError::Invalid("current register value unknown"))?;
                if matches!(self, Rule::ByteH) {
                    vec![byte << 8 | (current & 0x00FF)]
                } else {
                    vec![(current & 0xFF00) | byte]
                }
            }
            Rule::Timestamp => match value {
                Value::Timestamp(timestamp) => timestamp
                    .to_words()
                    .ok_or(EncodeError::Invalid("year must be 2000-2255"))?
                    .to_vec(),
                _ => return Err(EncodeError::Invalid("expected a timestamp")),
            },
            Rule::TimeOfDay => match value {
                Value::TimeOfDay(time) => vec![
                    TimeOfDay::new(time.hour, time.minute)
                        .ok_or(EncodeError::Invalid("hour or minute out of range"))?
                        .raw(),
                ],
                Value::Text(text) => vec![
                    crate::tou::encode_time(text)
                        .map_err(|_| EncodeError::Invalid("expected HH:MM"))?,
                ],
                _ => return Err(EncodeError::Invalid("expected a time of day")),
            },
            Rule::WorkWeek => match value {
                Value::WorkWeek(work_week) => vec![work_week.raw()],
                Value::Integer(_) => vec![raw_in_range(value, 1, 0, u16::MAX as i64)? as u16],
                _ => return Err(EncodeError::Invalid("expected a work week")),
            },
            Rule::MonthMask => match value {
                Value::Months(months) => vec![months.raw()],
                Value::Integer(_) => vec![raw_in_range(value, 1, 0, 0x0FFF)? as u16],
                _ => return Err(EncodeError::Invalid("expected a month selection")),
            },
            Rule::Switch { on, off } => match value {
                Value::Bool(true) => vec![*on],
                Value::Bool(false) => vec![*off],
                _ => return Err(EncodeError::Invalid("expected on or off")),
            },
            Rule::Seconds16 => match value {
                Value::Duration(duration) => vec![
                    u16::try_from(duration.to_secs())
                        .map_err(|_| EncodeError::Invalid("duration too long"))?,
                ],
                _ => vec![raw_in_range(value, 1, 0, u16::MAX as i64)? as u16],
            },
            Rule::Seconds32 => match value {
                Value::Duration(duration) => split_u32(duration.to_secs()),
                _ => split_u32(raw_in_range(value, 1, 0, u32::MAX as i64)? as u32),
            },
            Rule::EcoMode => match value {
                Value::EcoMode(group) if group.is_valid() => group.to_words().to_vec(),
                Value::EcoMode(_) => return Err(EncodeError::Invalid("eco mode group out of range")),
                _ => return Err(EncodeError::Invalid("expected an eco mode group")),
            },
            Rule::U64 { .. }
            | Rule::F32 { .. }
            | Rule::Enum16(_)
            | Rule::EnumH(_)
            | Rule::EnumL(_)
            | Rule::Bitmap32(_)
            | Rule::Bitmap22 { .. }
            | Rule::Ascii(_)
            | Rule::Hours32
            | Rule::Calculated(_) => return Err(EncodeError::ReadOnly),
        };
        Ok(words)
    }
}

fn scaled(raw: i64, divisor: u32) -> Value {
    if divisor <= 1 {
        Value::Integer(raw)
    } else {
        let decimals = (divisor as f64).log10().ceil() as i32;
        Value::Decimal(round_to(raw as f64 / divisor as f64, decimals))
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn lookup(table: EnumTable, raw: u16) -> Option<Value> {
    table
        .iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, label)| Value::Label(*label))
}

fn flags(table: BitTable, raw: u32) -> Value {
    Value::Flags(
        table
            .iter()
            .filter(|(bit, _)| raw & (1 << bit) != 0)
            .map(|(_, label)| *label)
            .collect(),
    )
}

fn split_u32(value: u32) -> Vec<u16> {
    vec![(value >> 16) as u16, value as u16]
}

/// Scale a numeric value into its raw register integer, checking it fits.
fn raw_in_range(value: &Value, divisor: u32, min: i64, max: i64) -> Result<i64, EncodeError> {
    let number = value
        .as_f64()
        .ok_or(EncodeError::Invalid("expected a number"))?;
    if !number.is_finite() {
        return Err(EncodeError::Invalid("expected a finite number"));
    }
    let raw = (number * divisor.max(1) as f64).round();
    if raw < min as f64 || raw > max as f64 {
        return Err(EncodeError::Invalid("value does not fit the register"));
    }
    Ok(raw as i64)
}

/// A run of registers as read from the device, addressed by absolute register address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBlock {
    start: u16,
    data: Vec<u8>,
}

impl RegisterBlock {
    pub fn new(start: u16, data: Vec<u8>) -> Self {
        Self { start, data }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn register_count(&self) -> u16 {
        (self.data.len() / 2) as u16
    }

    /// `len` bytes starting at register `address`.
    pub fn bytes(&self, address: u16, len: usize) -> Option<&[u8]> {
        let at = address.checked_sub(self.start)? as usize * 2;
        self.data.get(at..at + len)
    }

    pub fn u16_at(&self, address: u16) -> Option<u16> {
        let bytes = self.bytes(address, 2)?;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn i16_at(&self, address: u16) -> Option<i16> {
        self.u16_at(address).map(|raw| raw as i16)
    }

    pub fn u32_at(&self, address: u16) -> Option<u32> {
        let bytes = self.bytes(address, 4)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn i32_at(&self, address: u16) -> Option<i32> {
        self.u32_at(address).map(|raw| raw as i32)
    }
}

/// One named value of the register catalog.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor {
    pub id: &'static str,
    /// Register address.
    pub offset: u16,
    pub rule: Rule,
    pub label: &'static str,
    pub unit: &'static str,
    pub kind: Option<SensorKind>,
    pub phase: Option<Phase>,
    /// PV string this value belongs to, these are kept on single phase inverters.
    pub pv_channel: Option<u8>,
    /// Optional block or firmware group the value depends on.
    pub feature: Option<Feature>,
    /// Documented range of accepted values, in display units.
    pub range: Option<(i64, i64)>,
}

pub type SensorDescriptor = Descriptor;
pub type SettingDescriptor = Descriptor;

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.offset == other.offset && self.feature == other.feature
    }
}

impl Descriptor {
    pub const fn new(
        id: &'static str,
        offset: u16,
        rule: Rule,
        label: &'static str,
        unit: &'static str,
    ) -> Self {
        Self {
            id,
            offset,
            rule,
            label,
            unit,
            kind: None,
            phase: None,
            pv_channel: None,
            feature: None,
            range: None,
        }
    }

    pub const fn kind(mut self, kind: SensorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub const fn l2(mut self) -> Self {
        self.phase = Some(Phase::L2);
        self
    }

    pub const fn l3(mut self) -> Self {
        self.phase = Some(Phase::L3);
        self
    }

    pub const fn pv(mut self, channel: u8) -> Self {
        self.pv_channel = Some(channel);
        self
    }

    pub const fn feature(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }

    pub const fn range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Registers to read for this value on its own.
    pub const fn register_count(&self) -> u16 {
        self.rule.width().div_ceil(2)
    }

    pub fn decode(&self, block: &RegisterBlock) -> Option<Value> {
        self.rule.decode(block, self.offset)
    }

    /// Validate and encode a value for writing.
    pub fn encode<I: embedded_io::Error>(
        &self,
        value: &Value,
        current: Option<u16>,
    ) -> Result<Vec<u16>, Error<I>> {
        if let Some((min, max)) = self.range {
            match value.as_f64() {
                Some(number) if !(min as f64..=max as f64).contains(&number) => {
                    return Err(Error::invalid_value(self.id, "outside the documented range"));
                }
                _ => {}
            }
        }
        self.rule.encode(value, current).map_err(|err| match err {
            EncodeError::ReadOnly => Error::ReadOnly(self.id.into()),
            EncodeError::Invalid(reason) => Error::invalid_value(self.id, reason),
        })
    }
}

/// Tag every descriptor of a catalog group with its gating feature.
pub(crate) const fn tagged<const N: usize>(
    feature: Feature,
    mut descriptors: [Descriptor; N],
) -> [Descriptor; N] {
    let mut i = 0;
    while i < N {
        descriptors[i].feature = Some(feature);
        i += 1;
    }
    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mock_serial::MockSerialError, tou::WorkWeekMode};

    const MODES: EnumTable = &[(0, "Off"), (1, "On")];
    const BITS: BitTable = &[(0, "first"), (17, "high")];

    fn block(start: u16, words: &[u16]) -> RegisterBlock {
        RegisterBlock::new(start, words.iter().flat_map(|w| w.to_be_bytes()).collect())
    }

    fn encode(descriptor: &Descriptor, value: Value) -> Result<Vec<u16>, Error<MockSerialError>> {
        descriptor.encode(&value, None)
    }

    #[test]
    fn scaled_decoding() {
        let data = block(100, &[2305, 0xFFF6, 0x0001, 0x86A0, 0xFFFF, 0xFF38]);
        assert_eq!(
            Rule::U16 { divisor: 10 }.decode(&data, 100),
            Some(Value::Decimal(230.5))
        );
        assert_eq!(
            Rule::I16 { divisor: 10 }.decode(&data, 101),
            Some(Value::Decimal(-1.0))
        );
        assert_eq!(
            Rule::U32 { divisor: 1 }.decode(&data, 102),
            Some(Value::Integer(100_000))
        );
        assert_eq!(
            Rule::I32 { divisor: 1 }.decode(&data, 104),
            Some(Value::Integer(-200))
        );
        assert_eq!(Rule::U16 { divisor: 1 }.decode(&data, 106), None);
    }

    #[test]
    fn byte_and_enum_decoding() {
        let data = block(35119, &[0x0201, 0x0001]);
        assert_eq!(Rule::ByteH.decode(&data, 35119), Some(Value::Integer(2)));
        assert_eq!(Rule::ByteL.decode(&data, 35119), Some(Value::Integer(1)));
        assert_eq!(Rule::EnumL(MODES).decode(&data, 35119), Some(Value::Label("On")));
        assert_eq!(Rule::EnumH(MODES).decode(&data, 35119), None);
        assert_eq!(Rule::Enum16(MODES).decode(&data, 35120), Some(Value::Label("On")));
    }

    #[test]
    fn bitmap_decoding() {
        let data = block(37012, &[0x0002, 0x0000, 0x0001]);
        assert_eq!(
            Rule::Bitmap32(BITS).decode(&data, 37012),
            Some(Value::Flags(vec!["high"]))
        );
        assert_eq!(
            Rule::Bitmap22 { low: 37014, table: BITS }.decode(&data, 37012),
            Some(Value::Flags(vec!["first", "high"]))
        );
    }

    #[test]
    fn tou_and_duration_decoding() {
        let data = block(47547, &[0x0E1E, 0xFC41, 0x0803, 0x0000, 0x0E10]);
        assert_eq!(
            Rule::TimeOfDay.decode(&data, 47547),
            Some(Value::TimeOfDay(TimeOfDay::new(14, 30).unwrap()))
        );
        assert_eq!(
            Rule::WorkWeek.decode(&data, 47548),
            Some(Value::WorkWeek(WorkWeek::from_raw(0xFC41)))
        );
        assert_eq!(
            Rule::MonthMask.decode(&data, 47549),
            Some(Value::Months(MonthSet::from_raw(2051)))
        );
        assert_eq!(
            Rule::Seconds32.decode(&data, 47550),
            Some(Value::Duration(SecsDurationU32::secs(3600)))
        );
        assert_eq!(
            Rule::Switch { on: 64512, off: 768 }.decode(&block(47591, &[64512]), 47591),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn timestamp_and_text_decoding() {
        let data = block(35100, &[0x1806, 0x0F0D, 0x2D07, 0x4757, 0x3130, 0x0000]);
        let Some(Value::Timestamp(timestamp)) = Rule::Timestamp.decode(&data, 35100) else {
            panic!("timestamp expected");
        };
        assert_eq!(timestamp.to_string(), "2024-06-15 13:45:07");
        assert_eq!(
            Rule::Ascii(6).decode(&data, 35103),
            Some(Value::Text("GW10".into()))
        );
    }

    #[test]
    fn register_counts() {
        let byte = Descriptor::new("a", 1, Rule::ByteH, "", "");
        let word = Descriptor::new("b", 1, Rule::U16 { divisor: 1 }, "", "");
        let long = Descriptor::new("c", 1, Rule::I32 { divisor: 1 }, "", "");
        let time = Descriptor::new("d", 1, Rule::Timestamp, "", "");
        assert_eq!(byte.register_count(), 1);
        assert_eq!(word.register_count(), 1);
        assert_eq!(long.register_count(), 2);
        assert_eq!(time.register_count(), 3);
    }

    #[test]
    fn percentage_round_trip() {
        let soc = Descriptor::new("soc", 47544, Rule::U16 { divisor: 1 }, "SoC", "%").range(0, 100);
        for percent in 0..=100 {
            let words = encode(&soc, Value::Integer(percent)).unwrap();
            let decoded = soc.decode(&block(47544, &words));
            assert_eq!(decoded, Some(Value::Integer(percent)));
        }
    }

    #[test]
    fn scaled_round_trip() {
        let voltage = Descriptor::new("v", 45352, Rule::U16 { divisor: 10 }, "V", "V");
        let words = encode(&voltage, Value::Decimal(56.8)).unwrap();
        assert_eq!(words, vec![568]);
        assert_eq!(voltage.decode(&block(45352, &words)), Some(Value::Decimal(56.8)));

        let limit = Descriptor::new("limit", 47621, Rule::I32 { divisor: 1 }, "", "W");
        let words = encode(&limit, Value::Integer(-5000)).unwrap();
        assert_eq!(limit.decode(&block(47621, &words)), Some(Value::Integer(-5000)));
    }

    #[test]
    fn range_is_validated() {
        let soc = Descriptor::new("soc", 47544, Rule::U16 { divisor: 1 }, "SoC", "%").range(0, 100);
        assert!(matches!(
            encode(&soc, Value::Integer(101)),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            encode(&soc, Value::Integer(-1)),
            Err(Error::InvalidValue { .. })
        ));
        let plain = Descriptor::new("p", 1, Rule::U16 { divisor: 1 }, "", "");
        assert!(matches!(
            encode(&plain, Value::Integer(70_000)),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            encode(&plain, Value::Text("x".into())),
            Err(Error::InvalidValue { .. })
        ));
        for number in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                encode(&soc, Value::Decimal(number)),
                Err(Error::InvalidValue { .. })
            ));
            assert!(matches!(
                encode(&plain, Value::Decimal(number)),
                Err(Error::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn eco_mode_groups() {
        let charge = block(47515, &[0x0000, 0x173B, 0xFFCE, 0xFF7F]);
        assert_eq!(
            Rule::EcoMode.decode(&charge, 47515),
            Some(Value::EcoMode(EcoModeGroup::charge(50)))
        );
        let garbled = block(47515, &[0x0000, 0x173B, 0, 0x427F]);
        assert_eq!(Rule::EcoMode.decode(&garbled, 47515), None);
        assert_eq!(Rule::EcoMode.decode(&charge, 47516), None);

        assert_eq!(
            Rule::EcoMode.encode(&Value::EcoMode(EcoModeGroup::off()), None),
            Ok(vec![0x0000, 0x173B, 0x0000, 0x007F])
        );
        let mut late = EcoModeGroup::discharge(30);
        late.start.minute = 75;
        assert!(matches!(
            Rule::EcoMode.encode(&Value::EcoMode(late), None),
            Err(EncodeError::Invalid(_))
        ));
        assert!(matches!(
            Rule::EcoMode.encode(&Value::Integer(1), None),
            Err(EncodeError::Invalid(_))
        ));
    }

    #[test]
    fn counter_decoding() {
        let rule = Rule::U64 { divisor: 10 };
        assert_eq!(
            rule.decode(&block(35107, &[0, 0, 0x0001, 0x86A5]), 35107),
            Some(Value::Decimal(10000.5))
        );
        assert_eq!(rule.decode(&block(35107, &[0xFFFF; 4]), 35107), None);
        // Beyond what a signed value holds.
        assert_eq!(rule.decode(&block(35107, &[0x8000, 0, 0, 1]), 35107), None);
    }

    #[test]
    fn read_only_rules() {
        let label = Descriptor::new("mode", 35184, Rule::Enum16(MODES), "", "");
        assert!(matches!(
            encode(&label, Value::Integer(1)),
            Err(Error::ReadOnly(id)) if id == "mode"
        ));
    }

    #[test]
    fn byte_writes_keep_other_half() {
        assert_eq!(
            Rule::ByteH.encode(&Value::Integer(0x55), Some(0x1234)),
            Ok(vec![0x5534])
        );
        assert_eq!(
            Rule::ByteL.encode(&Value::Integer(0x55), Some(0x1234)),
            Ok(vec![0x1255])
        );
        assert!(Rule::ByteH.encode(&Value::Integer(0x55), None).is_err());
    }

    #[test]
    fn tou_encoding() {
        assert_eq!(
            Rule::TimeOfDay.encode(&Value::Text("14:30".into()), None),
            Ok(vec![3614])
        );
        let week = WorkWeek::new(WorkWeekMode::EcoEnable, &[]);
        assert_eq!(Rule::WorkWeek.encode(&Value::WorkWeek(week), None), Ok(vec![0xFF00]));
        assert_eq!(
            Rule::Switch { on: 64512, off: 768 }.encode(&Value::Bool(false), None),
            Ok(vec![768])
        );
        assert_eq!(
            Rule::Seconds32.encode(&Value::Duration(SecsDurationU32::secs(70_000)), None),
            Ok(vec![1, 4464])
        );
    }

    #[test]
    fn tagging() {
        let tagged = tagged(
            Feature::Battery,
            [Descriptor::new("a", 1, Rule::U16 { divisor: 1 }, "", "")],
        );
        assert_eq!(tagged[0].feature, Some(Feature::Battery));
    }
}
