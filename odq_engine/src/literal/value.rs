//! Typed literal values and canonical formatting

use crate::edm::EdmSimpleType;
use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value carrying its EDM type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedValue {
    Null,
    Binary(Vec<u8>),
    Boolean(bool),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    /// Kept as normalized digit text so no precision is lost
    Decimal(String),
    String(String),
    Guid(String),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Time(NaiveTime),
}

impl TypedValue {
    /// EDM type of this value, None for null
    pub fn simple_type(&self) -> Option<EdmSimpleType> {
        match self {
            Self::Null => None,
            Self::Binary(_) => Some(EdmSimpleType::Binary),
            Self::Boolean(_) => Some(EdmSimpleType::Boolean),
            Self::Byte(_) => Some(EdmSimpleType::Byte),
            Self::SByte(_) => Some(EdmSimpleType::SByte),
            Self::Int16(_) => Some(EdmSimpleType::Int16),
            Self::Int32(_) => Some(EdmSimpleType::Int32),
            Self::Int64(_) => Some(EdmSimpleType::Int64),
            Self::Single(_) => Some(EdmSimpleType::Single),
            Self::Double(_) => Some(EdmSimpleType::Double),
            Self::Decimal(_) => Some(EdmSimpleType::Decimal),
            Self::String(_) => Some(EdmSimpleType::String),
            Self::Guid(_) => Some(EdmSimpleType::Guid),
            Self::DateTime(_) => Some(EdmSimpleType::DateTime),
            Self::DateTimeOffset(_) => Some(EdmSimpleType::DateTimeOffset),
            Self::Time(_) => Some(EdmSimpleType::Time),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_literal(self))
    }
}

/// Render a value back to protocol literal syntax
///
/// The output is canonical: parsing it with the value's own type yields the
/// same value again, which is what round-trip key-predicate handling relies on.
pub fn format_literal(value: &TypedValue) -> String {
    match value {
        TypedValue::Null => "null".to_string(),
        TypedValue::Binary(bytes) => {
            let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
            format!("binary'{}'", hex)
        }
        TypedValue::Boolean(b) => b.to_string(),
        TypedValue::Byte(v) => v.to_string(),
        TypedValue::SByte(v) => v.to_string(),
        TypedValue::Int16(v) => v.to_string(),
        TypedValue::Int32(v) => v.to_string(),
        TypedValue::Int64(v) => format!("{}L", v),
        TypedValue::Single(v) => format!("{}f", v),
        TypedValue::Double(v) => {
            if v.fract() == 0.0 && v.is_finite() {
                format!("{:.1}", v)
            } else {
                v.to_string()
            }
        }
        TypedValue::Decimal(digits) => format!("{}M", digits),
        TypedValue::String(s) => format!("'{}'", s.replace('\'', "''")),
        TypedValue::Guid(g) => format!("guid'{}'", g),
        TypedValue::DateTime(dt) => {
            if dt.nanosecond() == 0 {
                format!("datetime'{}'", dt.format("%Y-%m-%dT%H:%M:%S"))
            } else {
                format!("datetime'{}'", dt.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
        }
        TypedValue::DateTimeOffset(dt) => {
            format!("datetimeoffset'{}'", dt.format("%Y-%m-%dT%H:%M:%S%:z"))
        }
        TypedValue::Time(t) => {
            let (h, m, s) = (t.hour(), t.minute(), t.second());
            format!("time'PT{}H{}M{}S'", h, m, s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_string_escaping() {
        let value = TypedValue::String("O'Neil".to_string());
        assert_eq!(format_literal(&value), "'O''Neil'");
    }

    #[test]
    fn test_numeric_suffixes() {
        assert_eq!(format_literal(&TypedValue::Int32(42)), "42");
        assert_eq!(format_literal(&TypedValue::Int64(42)), "42L");
        assert_eq!(
            format_literal(&TypedValue::Decimal("4.5".to_string())),
            "4.5M"
        );
        assert_eq!(format_literal(&TypedValue::Single(1.5)), "1.5f");
        assert_eq!(format_literal(&TypedValue::Double(2.0)), "2.0");
    }

    #[test]
    fn test_datetime_formatting() {
        let dt = NaiveDate::from_ymd_opt(2026, 8, 29)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(
            format_literal(&TypedValue::DateTime(dt)),
            "datetime'2026-08-29T12:30:00'"
        );
    }

    #[test]
    fn test_binary_formatting() {
        let value = TypedValue::Binary(vec![0x01, 0xAB]);
        assert_eq!(format_literal(&value), "binary'01AB'");
    }

    #[test]
    fn test_simple_type_mapping() {
        assert_eq!(
            TypedValue::Boolean(true).simple_type(),
            Some(EdmSimpleType::Boolean)
        );
        assert_eq!(TypedValue::Null.simple_type(), None);
        assert!(TypedValue::Null.is_null());
    }
}
