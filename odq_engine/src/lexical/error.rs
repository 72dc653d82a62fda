//! Tokenizer errors with error code mapping

use crate::logging::{codes, Code};
use crate::utils::Span;

pub type LexResult<T> = Result<T, LexError>;

/// Errors produced while tokenizing an expression string
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexError {
    #[error("Invalid character '{character}' at {span}")]
    InvalidCharacter { character: char, span: Span },

    #[error("Unterminated string literal at {span}")]
    UnterminatedString { span: Span },

    #[error("Malformed number '{raw}' at {span}")]
    InvalidNumber { raw: String, span: Span },

    #[error("Expression exceeds token limit ({count} tokens)")]
    TooManyTokens { count: usize },

    #[error("Query option value too long ({length} bytes)")]
    OptionTooLong { length: usize },

    #[error("String literal too long ({length} bytes) at {span}")]
    StringTooLong { length: usize, span: Span },

    #[error("Identifier too long ({length} bytes) at {span}")]
    IdentifierTooLong { length: usize, span: Span },
}

impl LexError {
    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidCharacter { .. } | Self::IdentifierTooLong { .. } => {
                codes::lexical::INVALID_CHARACTER
            }
            Self::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            Self::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            Self::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            Self::OptionTooLong { .. } | Self::StringTooLong { .. } => {
                codes::lexical::OPTION_TOO_LONG
            }
        }
    }

    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::InvalidCharacter { span, .. }
            | Self::UnterminatedString { span }
            | Self::InvalidNumber { span, .. }
            | Self::StringTooLong { span, .. }
            | Self::IdentifierTooLong { span, .. } => Some(*span),
            Self::TooManyTokens { .. } | Self::OptionTooLong { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = LexError::UnterminatedString {
            span: Span::new(0, 4),
        };
        assert_eq!(err.error_code().as_str(), "E021");

        let err = LexError::TooManyTokens { count: 20_000 };
        assert_eq!(err.error_code().as_str(), "E023");
        assert_eq!(err.span(), None);
    }
}
