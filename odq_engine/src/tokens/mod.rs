//! Token types shared between the expression lexer and parser

pub mod stream;
pub mod token;

pub use stream::TokenStream;
pub use token::{ExprToken, ExprTokenKind};
