//! Property and value-format codes of the procedural interface, and the
//! values a time variable hands back.
//!
//! Codes follow the IEEE 1364 `vpi_user.h` numbering so a dispatcher
//! holding raw integers can map them straight across.

use crate::{
    codec::{encode, StructuredTime},
    error::{TimeError, TimeResult},
    types::SimTime,
};
use serde::{Deserialize, Serialize};

/// Width of the binary string rendering. The clock is 64 bits wide on
/// every host.
pub const BIN_STR_WIDTH: usize = 64;

/// Integer properties a client may ask an object for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Type,
    Name,
    FullName,
    Size,
    Signed,
}

impl Property {
    pub fn code(self) -> i32 {
        match self {
            Property::Type     => 1,
            Property::Name     => 2,
            Property::FullName => 3,
            Property::Size     => 4,
            Property::Signed   => 65,
        }
    }

    pub fn from_code(code: i32) -> TimeResult<Self> {
        match code {
            1  => Ok(Property::Type),
            2  => Ok(Property::Name),
            3  => Ok(Property::FullName),
            4  => Ok(Property::Size),
            65 => Ok(Property::Signed),
            _  => Err(TimeError::UnsupportedProperty { code }),
        }
    }
}

/// Encodings a client may request a value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    BinStr,
    OctStr,
    DecStr,
    HexStr,
    Scalar,
    Int,
    Real,
    String,
    Vector,
    Strength,
    Time,
    /// The object's natural type; a time for time vars.
    ObjType,
    Suppress,
}

impl ValueFormat {
    pub fn code(self) -> i32 {
        match self {
            ValueFormat::BinStr   => 1,
            ValueFormat::OctStr   => 2,
            ValueFormat::DecStr   => 3,
            ValueFormat::HexStr   => 4,
            ValueFormat::Scalar   => 5,
            ValueFormat::Int      => 6,
            ValueFormat::Real     => 7,
            ValueFormat::String   => 8,
            ValueFormat::Vector   => 9,
            ValueFormat::Strength => 10,
            ValueFormat::Time     => 11,
            ValueFormat::ObjType  => 12,
            ValueFormat::Suppress => 13,
        }
    }

    pub fn from_code(code: i32) -> TimeResult<Self> {
        let format = match code {
            1  => ValueFormat::BinStr,
            2  => ValueFormat::OctStr,
            3  => ValueFormat::DecStr,
            4  => ValueFormat::HexStr,
            5  => ValueFormat::Scalar,
            6  => ValueFormat::Int,
            7  => ValueFormat::Real,
            8  => ValueFormat::String,
            9  => ValueFormat::Vector,
            10 => ValueFormat::Strength,
            11 => ValueFormat::Time,
            12 => ValueFormat::ObjType,
            13 => ValueFormat::Suppress,
            _  => return Err(TimeError::UnsupportedFormat { code }),
        };
        Ok(format)
    }
}

/// A value read from a time variable. Each variant names the format it
/// was rendered in; strings are owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Structured value of simulation-time kind.
    SimTime(StructuredTime),
    BinStr(String),
    OctStr(String),
    DecStr(String),
    HexStr(String),
}

impl Value {
    /// Render `t` in `format`. Formats a time cannot be expressed in
    /// are rejected with the offending code.
    pub fn render(t: SimTime, format: ValueFormat) -> TimeResult<Self> {
        let value = match format {
            ValueFormat::Time | ValueFormat::ObjType => Value::SimTime(encode(t)),
            ValueFormat::BinStr => Value::BinStr(format!("{t:0width$b}", width = BIN_STR_WIDTH)),
            ValueFormat::OctStr => Value::OctStr(format!("{t:o}")),
            ValueFormat::DecStr => Value::DecStr(t.to_string()),
            ValueFormat::HexStr => Value::HexStr(format!("{t:x}")),
            other => return Err(TimeError::UnsupportedFormat { code: other.code() }),
        };
        Ok(value)
    }

    /// The format this value is actually in. `ObjType` requests come
    /// back as `Time`.
    pub fn format(&self) -> ValueFormat {
        match self {
            Value::SimTime(_) => ValueFormat::Time,
            Value::BinStr(_)  => ValueFormat::BinStr,
            Value::OctStr(_)  => ValueFormat::OctStr,
            Value::DecStr(_)  => ValueFormat::DecStr,
            Value::HexStr(_)  => ValueFormat::HexStr,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::SimTime(_) => None,
            Value::BinStr(s) | Value::OctStr(s) | Value::DecStr(s) | Value::HexStr(s) => Some(s),
        }
    }

    pub fn as_time(&self) -> Option<StructuredTime> {
        match self {
            Value::SimTime(s) => Some(*s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_is_fixed_width_msb_first() {
        let v = Value::render(5, ValueFormat::BinStr).unwrap();
        let s = v.as_str().unwrap();
        assert_eq!(s.len(), BIN_STR_WIDTH);
        assert!(s.ends_with("101"));
        assert!(s[..BIN_STR_WIDTH - 3].chars().all(|c| c == '0'));
    }

    #[test]
    fn hex_is_lowercase() {
        let v = Value::render(0xABCD, ValueFormat::HexStr).unwrap();
        assert_eq!(v.as_str(), Some("abcd"));
    }

    #[test]
    fn obj_type_resolves_to_time() {
        let v = Value::render(7, ValueFormat::ObjType).unwrap();
        assert_eq!(v.format(), ValueFormat::Time);
        assert_eq!(v.as_time(), Some(StructuredTime { high: 0, low: 7 }));
    }

    #[test]
    fn non_time_formats_are_rejected_with_their_code() {
        for format in [ValueFormat::Int, ValueFormat::Real, ValueFormat::Suppress] {
            match Value::render(1, format) {
                Err(TimeError::UnsupportedFormat { code }) => assert_eq!(code, format.code()),
                other => panic!("expected UnsupportedFormat, got {other:?}"),
            }
        }
    }

    #[test]
    fn codes_map_both_ways() {
        for code in 1..=13 {
            assert_eq!(ValueFormat::from_code(code).unwrap().code(), code);
        }
        assert!(matches!(
            ValueFormat::from_code(99),
            Err(TimeError::UnsupportedFormat { code: 99 })
        ));
        assert_eq!(Property::from_code(65).unwrap(), Property::Signed);
        assert!(matches!(
            Property::from_code(0),
            Err(TimeError::UnsupportedProperty { code: 0 })
        ));
    }
}
