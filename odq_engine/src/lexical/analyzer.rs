//! Expression tokenizer
//!
//! Turns a raw $filter or $orderby string into a bounded token stream.
//! Typed literal prefixes (guid'...', datetime'...', binary'...') are folded
//! into single literal tokens here so the parser never sees a bare prefix.

use super::error::{LexError, LexResult};
use crate::config::constants::compile_time::lexical::*;
use crate::tokens::{ExprToken, ExprTokenKind, TokenStream};
use crate::utils::Span;

/// Identifier prefixes that bind to a following quoted body
const LITERAL_PREFIXES: &[&str] = &["guid", "datetime", "datetimeoffset", "time", "binary", "X", "x"];

/// Tokenize an expression string into a stream, enforcing input bounds
pub fn tokenize(input: &str) -> LexResult<TokenStream> {
    if input.len() > MAX_OPTION_LENGTH {
        return Err(LexError::OptionTooLong {
            length: input.len(),
        });
    }

    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
        if tokens.len() > MAX_TOKEN_COUNT {
            return Err(LexError::TooManyTokens {
                count: tokens.len(),
            });
        }
    }

    Ok(TokenStream::new(tokens))
}

struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn next_token(&mut self) -> LexResult<Option<ExprToken>> {
        self.skip_whitespace();

        let start = self.position;
        let byte = match self.peek() {
            Some(b) => b,
            None => return Ok(None),
        };

        let token = match byte {
            b'(' => self.single(ExprTokenKind::OpenParen),
            b')' => self.single(ExprTokenKind::CloseParen),
            b',' => self.single(ExprTokenKind::Comma),
            b'-' => self.single(ExprTokenKind::Minus),
            // Both separators address into complex properties
            b'.' | b'/' => self.single(ExprTokenKind::Dot),
            b'\'' => self.scan_string(start)?,
            b'0'..=b'9' => self.scan_number(start)?,
            b if b.is_ascii_alphabetic() || b == b'_' => self.scan_word(start)?,
            _ => {
                let ch = self.input[start..].chars().next().unwrap_or('?');
                return Err(LexError::InvalidCharacter {
                    character: ch,
                    span: Span::new(start, start + ch.len_utf8()),
                });
            }
        };

        Ok(Some(token))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.position += 1;
        }
    }

    fn single(&mut self, kind: ExprTokenKind) -> ExprToken {
        let start = self.position;
        self.position += 1;
        ExprToken::new(kind, Span::new(start, self.position))
    }

    /// Scan a quoted body starting at the opening quote, handling '' escapes
    fn scan_quoted_body(&mut self, token_start: usize) -> LexResult<()> {
        debug_assert_eq!(self.peek(), Some(b'\''));
        self.position += 1;

        loop {
            match self.peek() {
                None => {
                    return Err(LexError::UnterminatedString {
                        span: Span::new(token_start, self.position),
                    });
                }
                Some(b'\'') => {
                    self.position += 1;
                    // A doubled quote continues the body
                    if self.peek() == Some(b'\'') {
                        self.position += 1;
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    // Advance one full character
                    let rest = &self.input[self.position..];
                    let ch = rest.chars().next().unwrap_or('\'');
                    self.position += ch.len_utf8();
                }
            }

            if self.position - token_start > MAX_STRING_SIZE {
                return Err(LexError::StringTooLong {
                    length: self.position - token_start,
                    span: Span::new(token_start, self.position),
                });
            }
        }

        Ok(())
    }

    fn scan_string(&mut self, start: usize) -> LexResult<ExprToken> {
        self.scan_quoted_body(start)?;
        let span = Span::new(start, self.position);
        Ok(ExprToken::new(
            ExprTokenKind::Literal(self.input[start..self.position].to_string()),
            span,
        ))
    }

    fn scan_number(&mut self, start: usize) -> LexResult<ExprToken> {
        let mut seen_dot = false;
        let mut seen_exponent = false;

        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.position += 1,
                b'.' if !seen_dot && !seen_exponent => {
                    // Only part of the number when a digit follows
                    if self
                        .bytes
                        .get(self.position + 1)
                        .map(|b| b.is_ascii_digit())
                        .unwrap_or(false)
                    {
                        seen_dot = true;
                        self.position += 1;
                    } else {
                        break;
                    }
                }
                b'e' | b'E' if !seen_exponent => {
                    seen_exponent = true;
                    self.position += 1;
                    if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                        self.position += 1;
                    }
                }
                _ => break,
            }
        }

        // Optional single type suffix
        if matches!(
            self.peek(),
            Some(b'L') | Some(b'l') | Some(b'M') | Some(b'm') | Some(b'D') | Some(b'd')
                | Some(b'F') | Some(b'f')
        ) {
            self.position += 1;
        }

        // Anything alphanumeric still attached makes the number malformed
        if self
            .peek()
            .map(|b| b.is_ascii_alphanumeric() || b == b'_')
            .unwrap_or(false)
        {
            while self
                .peek()
                .map(|b| b.is_ascii_alphanumeric() || b == b'_')
                .unwrap_or(false)
            {
                self.position += 1;
            }
            return Err(LexError::InvalidNumber {
                raw: self.input[start..self.position].to_string(),
                span: Span::new(start, self.position),
            });
        }

        let span = Span::new(start, self.position);
        Ok(ExprToken::new(
            ExprTokenKind::Literal(self.input[start..self.position].to_string()),
            span,
        ))
    }

    fn scan_word(&mut self, start: usize) -> LexResult<ExprToken> {
        while self
            .peek()
            .map(|b| b.is_ascii_alphanumeric() || b == b'_')
            .unwrap_or(false)
        {
            self.position += 1;
        }

        let word = &self.input[start..self.position];
        if word.len() > MAX_IDENTIFIER_LENGTH {
            return Err(LexError::IdentifierTooLong {
                length: word.len(),
                span: Span::new(start, self.position),
            });
        }

        // A literal prefix directly followed by a quote is one literal token
        if LITERAL_PREFIXES.contains(&word) && self.peek() == Some(b'\'') {
            self.scan_quoted_body(start)?;
            let span = Span::new(start, self.position);
            return Ok(ExprToken::new(
                ExprTokenKind::Literal(self.input[start..self.position].to_string()),
                span,
            ));
        }

        let span = Span::new(start, self.position);
        let kind = match word {
            "true" | "false" | "null" => ExprTokenKind::Literal(word.to_string()),
            _ => ExprTokenKind::keyword(word)
                .unwrap_or_else(|| ExprTokenKind::Identifier(word.to_string())),
        };
        Ok(ExprToken::new(kind, span))
    }
}
