//! Shared primitive types for the URI tokenizer and parsers
//!
//! Dependency-free location-tracking types used by the lexer, the expression
//! parser, and the error taxonomy.

pub mod span;

pub use span::Span;
