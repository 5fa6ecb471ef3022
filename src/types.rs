//! This module contains the decoded value and identity types of the ET inverters.

use core::fmt;

use fugit::SecsDurationU32;

use crate::tou::{EcoModeGroup, MonthSet, TimeOfDay, WorkWeek};

/// A decoded sensor or setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    /// A scaled reading, e.g. a voltage in volts.
    Decimal(f64),
    Text(String),
    /// Label looked up from an enum table.
    Label(&'static str),
    /// Labels of every bit set in a bitmap register.
    Flags(Vec<&'static str>),
    Bool(bool),
    Timestamp(Timestamp),
    TimeOfDay(TimeOfDay),
    WorkWeek(WorkWeek),
    Months(MonthSet),
    Duration(SecsDurationU32),
    EcoMode(EcoModeGroup),
}

impl Value {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Decimal(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
            Value::Label(value) => f.write_str(value),
            Value::Flags(values) => f.write_str(&values.join(", ")),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Timestamp(value) => write!(f, "{value}"),
            Value::TimeOfDay(value) => write!(f, "{value}"),
            Value::WorkWeek(value) => write!(f, "{value}"),
            Value::Months(value) => write!(f, "{value}"),
            Value::Duration(value) => write!(f, "{}s", value.ticks()),
            Value::EcoMode(value) => write!(f, "{value}"),
        }
    }
}

/// Inverter clock reading. The year is stored as an offset from 2000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let [year, month, day, hour, minute, second] = <[u8; 6]>::try_from(data.get(..6)?).ok()?;
        Some(Self {
            year: 2000 + year as u16,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    pub fn to_words(&self) -> Option<[u16; 3]> {
        let year = u8::try_from(self.year.checked_sub(2000)?).ok()?;
        Some([
            u16::from_be_bytes([year, self.month]),
            u16::from_be_bytes([self.day, self.hour]),
            u16::from_be_bytes([self.minute, self.second]),
        ])
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// What the inverter reports about itself in the version info block (35000, 33 registers).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceIdentity {
    pub modbus_version: u16,
    /// Rated power in W.
    pub rated_power: u16,
    /// 0: single phase, 1: three phase four wire, 2: three phase three wire.
    pub ac_output_type: u16,
    pub serial_number: String,
    pub model_name: String,
    pub dsp1_version: u16,
    pub dsp2_version: u16,
    pub dsp_svn_version: u16,
    pub arm_version: u16,
    pub arm_svn_version: u16,
    pub firmware: String,
    pub arm_firmware: String,
}

impl DeviceIdentity {
    /// Register count of the version info block.
    pub const REGISTER_COUNT: u16 = 33;

    /// Parse the raw version info block. Returns `None` when the block is too short.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < Self::REGISTER_COUNT as usize * 2 {
            return None;
        }
        let word = |at: usize| u16::from_be_bytes([data[at], data[at + 1]]);
        Some(Self {
            modbus_version: word(0),
            rated_power: word(2),
            ac_output_type: word(4),
            serial_number: decode_ascii(&data[6..22]),
            model_name: decode_ascii(&data[22..32]),
            dsp1_version: word(32),
            dsp2_version: word(34),
            dsp_svn_version: word(36),
            arm_version: word(38),
            arm_svn_version: word(40),
            firmware: decode_ascii(&data[42..54]),
            arm_firmware: decode_ascii(&data[54..66]),
        })
    }

    /// `GW` + last four serial number characters + `_`, empty when the serial is too short.
    pub fn sensor_name_prefix(&self) -> String {
        display_prefix(&self.serial_number)
    }
}

pub(crate) fn display_prefix(serial_number: &str) -> String {
    let chars: Vec<char> = serial_number.chars().collect();
    if chars.len() < 4 {
        return String::new();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("GW{tail}_")
}

/// ASCII text as the inverter stores it, with NUL and space padding removed.
pub(crate) fn decode_ascii(data: &[u8]) -> String {
    data.iter()
        .filter(|byte| byte.is_ascii() && !byte.is_ascii_control())
        .map(|byte| *byte as char)
        .collect::<String>()
        .trim()
        .to_string()
}
