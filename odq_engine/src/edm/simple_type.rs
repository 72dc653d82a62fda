//! EDM simple type system
//!
//! The closed set of primitive property types a metadata model may use,
//! together with the promotion rules binary operators rely on. Promotion is
//! directional: a narrower numeric type widens to a broader one, never the
//! reverse.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive EDM types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdmSimpleType {
    Binary,
    Boolean,
    Byte,
    DateTime,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    String,
    Time,
}

impl EdmSimpleType {
    /// Fully qualified type name as used in metadata documents
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binary => "Edm.Binary",
            Self::Boolean => "Edm.Boolean",
            Self::Byte => "Edm.Byte",
            Self::DateTime => "Edm.DateTime",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::Decimal => "Edm.Decimal",
            Self::Double => "Edm.Double",
            Self::Guid => "Edm.Guid",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::SByte => "Edm.SByte",
            Self::Single => "Edm.Single",
            Self::String => "Edm.String",
            Self::Time => "Edm.Time",
        }
    }

    /// Resolve a fully qualified type name, case-sensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Edm.Binary" => Some(Self::Binary),
            "Edm.Boolean" => Some(Self::Boolean),
            "Edm.Byte" => Some(Self::Byte),
            "Edm.DateTime" => Some(Self::DateTime),
            "Edm.DateTimeOffset" => Some(Self::DateTimeOffset),
            "Edm.Decimal" => Some(Self::Decimal),
            "Edm.Double" => Some(Self::Double),
            "Edm.Guid" => Some(Self::Guid),
            "Edm.Int16" => Some(Self::Int16),
            "Edm.Int32" => Some(Self::Int32),
            "Edm.Int64" => Some(Self::Int64),
            "Edm.SByte" => Some(Self::SByte),
            "Edm.Single" => Some(Self::Single),
            "Edm.String" => Some(Self::String),
            "Edm.Time" => Some(Self::Time),
            _ => None,
        }
    }

    /// Whole-number types
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::SByte | Self::Byte | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    /// Types usable with arithmetic operators
    pub fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, Self::Single | Self::Double | Self::Decimal)
    }

    /// Types with a defined ordering for lt/le/gt/ge
    pub fn is_orderable(&self) -> bool {
        self.is_numeric()
            || matches!(
                self,
                Self::String | Self::DateTime | Self::DateTimeOffset | Self::Time
            )
    }

    /// Rank within the numeric widening ladder, None for non-numeric types
    fn numeric_rank(&self) -> Option<u8> {
        match self {
            Self::SByte => Some(0),
            Self::Byte => Some(1),
            Self::Int16 => Some(2),
            Self::Int32 => Some(3),
            Self::Int64 => Some(4),
            Self::Single => Some(5),
            Self::Double => Some(6),
            Self::Decimal => Some(7),
            _ => None,
        }
    }

    /// Whether a value of this type can stand where `target` is required
    pub fn is_compatible_with(&self, target: EdmSimpleType) -> bool {
        if *self == target {
            return true;
        }
        match (self.numeric_rank(), target.numeric_rank()) {
            (Some(from), Some(to)) => from <= to,
            _ => false,
        }
    }

    /// Common type of two operands, widening numerics as needed
    pub fn common_type(a: EdmSimpleType, b: EdmSimpleType) -> Option<EdmSimpleType> {
        if a == b {
            return Some(a);
        }
        match (a.numeric_rank(), b.numeric_rank()) {
            (Some(ra), Some(rb)) => Some(if ra >= rb { a } else { b }),
            _ => None,
        }
    }
}

impl fmt::Display for EdmSimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for ty in [
            EdmSimpleType::Binary,
            EdmSimpleType::Boolean,
            EdmSimpleType::Byte,
            EdmSimpleType::DateTime,
            EdmSimpleType::DateTimeOffset,
            EdmSimpleType::Decimal,
            EdmSimpleType::Double,
            EdmSimpleType::Guid,
            EdmSimpleType::Int16,
            EdmSimpleType::Int32,
            EdmSimpleType::Int64,
            EdmSimpleType::SByte,
            EdmSimpleType::Single,
            EdmSimpleType::String,
            EdmSimpleType::Time,
        ] {
            assert_eq!(EdmSimpleType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(EdmSimpleType::from_name("Edm.Unknown"), None);
    }

    #[test]
    fn test_numeric_families() {
        assert!(EdmSimpleType::Int32.is_integral());
        assert!(!EdmSimpleType::Double.is_integral());
        assert!(EdmSimpleType::Decimal.is_numeric());
        assert!(!EdmSimpleType::Guid.is_numeric());
        assert!(EdmSimpleType::String.is_orderable());
        assert!(!EdmSimpleType::Binary.is_orderable());
    }

    #[test]
    fn test_promotion_is_directional() {
        assert!(EdmSimpleType::Int16.is_compatible_with(EdmSimpleType::Int64));
        assert!(!EdmSimpleType::Int64.is_compatible_with(EdmSimpleType::Int16));
        assert!(EdmSimpleType::Int32.is_compatible_with(EdmSimpleType::Double));
        assert!(!EdmSimpleType::String.is_compatible_with(EdmSimpleType::Int32));
    }

    #[test]
    fn test_common_type() {
        assert_eq!(
            EdmSimpleType::common_type(EdmSimpleType::Int32, EdmSimpleType::Int64),
            Some(EdmSimpleType::Int64)
        );
        assert_eq!(
            EdmSimpleType::common_type(EdmSimpleType::Double, EdmSimpleType::Int16),
            Some(EdmSimpleType::Double)
        );
        assert_eq!(
            EdmSimpleType::common_type(EdmSimpleType::String, EdmSimpleType::String),
            Some(EdmSimpleType::String)
        );
        assert_eq!(
            EdmSimpleType::common_type(EdmSimpleType::String, EdmSimpleType::Boolean),
            None
        );
    }
}
