//! Source location tracking for raw query-option text
//!
//! Resource paths and query options are single-line strings, so a span is a
//! half-open byte range into the raw text of one option. Accurate ranges are
//! what make rejected requests explainable to the client.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[start, end)` into a raw option string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Span {
    /// Byte offset of the first character (0-based)
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Create a single-character span at an offset
    pub fn single(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset + 1,
        }
    }

    /// Create a zero-width span at an offset (end-of-input errors)
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Combine this span with another to create a span that covers both
    pub fn to(self, other: Self) -> Self {
        self.merge(other)
    }

    /// Get the byte length of this span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if this span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains a byte offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Get the source text for this span from the raw option string
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start.min(input.len())..self.end.min(input.len())]
    }

    /// Create an unknown/dummy span (for errors raised outside raw text)
    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Format an error message with a caret underline against the raw text
    pub fn format_error(&self, input: &str, message: &str) -> String {
        let mut result = String::new();
        result.push_str(&format!("Error: {}\n", message));
        result.push_str(&format!("  --> offset {}\n", self.start));
        result.push_str(&format!("   | {}\n", input));

        let mut underline = String::from("   | ");
        for _ in 0..self.start.min(input.len()) {
            underline.push(' ');
        }
        for _ in 0..self.len().max(1) {
            underline.push('^');
        }
        result.push_str(&underline);
        result.push('\n');
        result
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "offset {}", self.start)
        } else {
            write!(f, "offsets {}-{}", self.start, self.end)
        }
    }
}
