//! Built-in method signature table
//!
//! Fixed arity and ordered parameter types per method. `substring` is the
//! only overloaded entry, taking an optional third length argument.

use crate::edm::EdmSimpleType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in expression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    SubstringOf,
    StartsWith,
    EndsWith,
    Length,
    IndexOf,
    Replace,
    Substring,
    ToLower,
    ToUpper,
    Trim,
    Concat,
    Day,
    Hour,
    Minute,
    Month,
    Second,
    Year,
    Round,
    Floor,
    Ceiling,
}

/// Required shape of one method parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Exact(EdmSimpleType),
    /// Any member of the numeric family
    Numeric,
}

impl ParamKind {
    pub fn accepts(&self, ty: EdmSimpleType) -> bool {
        match self {
            Self::Exact(expected) => ty.is_compatible_with(*expected),
            Self::Numeric => ty.is_numeric(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Exact(ty) => ty.name().to_string(),
            Self::Numeric => "a numeric type".to_string(),
        }
    }
}

/// Result type of a method given its checked argument types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodReturn {
    Fixed(EdmSimpleType),
    /// Result keeps the type of the first argument
    SameAsFirstArgument,
}

impl MethodKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "substringof" => Some(Self::SubstringOf),
            "startswith" => Some(Self::StartsWith),
            "endswith" => Some(Self::EndsWith),
            "length" => Some(Self::Length),
            "indexof" => Some(Self::IndexOf),
            "replace" => Some(Self::Replace),
            "substring" => Some(Self::Substring),
            "tolower" => Some(Self::ToLower),
            "toupper" => Some(Self::ToUpper),
            "trim" => Some(Self::Trim),
            "concat" => Some(Self::Concat),
            "day" => Some(Self::Day),
            "hour" => Some(Self::Hour),
            "minute" => Some(Self::Minute),
            "month" => Some(Self::Month),
            "second" => Some(Self::Second),
            "year" => Some(Self::Year),
            "round" => Some(Self::Round),
            "floor" => Some(Self::Floor),
            "ceiling" => Some(Self::Ceiling),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SubstringOf => "substringof",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Length => "length",
            Self::IndexOf => "indexof",
            Self::Replace => "replace",
            Self::Substring => "substring",
            Self::ToLower => "tolower",
            Self::ToUpper => "toupper",
            Self::Trim => "trim",
            Self::Concat => "concat",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Month => "month",
            Self::Second => "second",
            Self::Year => "year",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
        }
    }

    /// Acceptable signatures, in declaration order
    pub fn signatures(&self) -> Vec<(Vec<ParamKind>, MethodReturn)> {
        use EdmSimpleType::*;
        use MethodReturn::*;
        use ParamKind::*;

        match self {
            Self::SubstringOf | Self::StartsWith | Self::EndsWith => vec![(
                vec![Exact(String), Exact(String)],
                Fixed(Boolean),
            )],
            Self::Length => vec![(vec![Exact(String)], Fixed(Int32))],
            Self::IndexOf => vec![(vec![Exact(String), Exact(String)], Fixed(Int32))],
            Self::Replace => vec![(
                vec![Exact(String), Exact(String), Exact(String)],
                Fixed(String),
            )],
            Self::Substring => vec![
                (vec![Exact(String), Exact(Int32)], Fixed(String)),
                (vec![Exact(String), Exact(Int32), Exact(Int32)], Fixed(String)),
            ],
            Self::ToLower | Self::ToUpper | Self::Trim => {
                vec![(vec![Exact(String)], Fixed(String))]
            }
            Self::Concat => vec![(vec![Exact(String), Exact(String)], Fixed(String))],
            Self::Day | Self::Hour | Self::Minute | Self::Month | Self::Second | Self::Year => {
                vec![(vec![Exact(DateTime)], Fixed(Int32))]
            }
            Self::Round | Self::Floor | Self::Ceiling => {
                vec![(vec![Numeric], SameAsFirstArgument)]
            }
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
