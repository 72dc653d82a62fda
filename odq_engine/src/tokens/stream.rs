//! Token stream consumed by the expression parser

use super::token::{ExprToken, ExprTokenKind};
use crate::utils::Span;

/// Cursor over a tokenized expression, always terminated by Eof
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<ExprToken>,
    position: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<ExprToken>) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        if !tokens.last().map(|t| t.kind.is_eof()).unwrap_or(false) {
            tokens.push(ExprToken::eof(end));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Current token without consuming it
    pub fn current(&self) -> &ExprToken {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    pub fn is_at_end(&self) -> bool {
        self.current().kind.is_eof()
    }

    /// Consume and return the current token
    pub fn advance(&mut self) -> ExprToken {
        let token = self.current().clone();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    /// Consume the current token if it equals `kind`
    pub fn consume_if(&mut self, kind: &ExprTokenKind) -> bool {
        if &self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: ExprTokenKind, start: usize) -> ExprToken {
        ExprToken::new(kind, Span::new(start, start + 1))
    }

    #[test]
    fn test_eof_is_appended() {
        let mut stream = TokenStream::new(vec![token(ExprTokenKind::OpenParen, 0)]);
        assert!(!stream.is_at_end());
        stream.advance();
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let mut stream = TokenStream::new(vec![
            token(ExprTokenKind::Identifier("Age".to_string()), 0),
            token(ExprTokenKind::Gt, 4),
        ]);

        assert!(!stream.is_at_end());
        stream.advance();
        stream.advance();
        assert!(stream.is_at_end());

        // Advancing past Eof keeps returning Eof
        let token = stream.advance();
        assert!(token.kind.is_eof());
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_consume_if() {
        let mut stream = TokenStream::new(vec![token(ExprTokenKind::Comma, 0)]);
        assert!(!stream.consume_if(&ExprTokenKind::Dot));
        assert!(stream.consume_if(&ExprTokenKind::Comma));
        assert!(stream.is_at_end());
    }
}
