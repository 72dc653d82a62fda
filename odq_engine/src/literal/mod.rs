//! Literal type system
//!
//! Parses, validates, and formats scalar literal tokens against declared
//! simple types and facets. Formatting is exposed for serializers; parse and
//! format round-trip for canonical input.

pub mod parse;
pub mod value;

pub use parse::{infer_literal, parse_literal};
pub use value::{format_literal, TypedValue};
