//! Lexical analysis for filter and order-by expressions

pub mod analyzer;
pub mod error;

pub use analyzer::tokenize;
pub use error::{LexError, LexResult};
