//! Expression token definitions

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokens produced from a filter or order-by expression string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExprTokenKind {
    /// Property or method name
    Identifier(String),
    /// Raw literal text, quoting and type prefixes intact
    Literal(String),

    OpenParen,
    CloseParen,
    Comma,
    Dot,
    /// Unary minus sign
    Minus,

    // Logical keywords
    And,
    Or,
    Not,

    // Comparison keywords
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Arithmetic keywords
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Order-by direction keywords
    Asc,
    Desc,

    Eof,
}

impl ExprTokenKind {
    /// Resolve a bare word to its keyword token, if it is one
    pub fn keyword(word: &str) -> Option<Self> {
        match word {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "not" => Some(Self::Not),
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "mul" => Some(Self::Mul),
            "div" => Some(Self::Div),
            "mod" => Some(Self::Mod),
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Identifier(name) => format!("identifier '{}'", name),
            Self::Literal(raw) => format!("literal {}", raw),
            Self::OpenParen => "'('".to_string(),
            Self::CloseParen => "')'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Dot => "'.'".to_string(),
            Self::Minus => "'-'".to_string(),
            Self::And => "'and'".to_string(),
            Self::Or => "'or'".to_string(),
            Self::Not => "'not'".to_string(),
            Self::Eq => "'eq'".to_string(),
            Self::Ne => "'ne'".to_string(),
            Self::Lt => "'lt'".to_string(),
            Self::Le => "'le'".to_string(),
            Self::Gt => "'gt'".to_string(),
            Self::Ge => "'ge'".to_string(),
            Self::Add => "'add'".to_string(),
            Self::Sub => "'sub'".to_string(),
            Self::Mul => "'mul'".to_string(),
            Self::Div => "'div'".to_string(),
            Self::Mod => "'mod'".to_string(),
            Self::Asc => "'asc'".to_string(),
            Self::Desc => "'desc'".to_string(),
            Self::Eof => "end of expression".to_string(),
        }
    }
}

impl fmt::Display for ExprTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A token with its source span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExprToken {
    pub kind: ExprTokenKind,
    pub span: Span,
}

impl ExprToken {
    pub fn new(kind: ExprTokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(at: usize) -> Self {
        Self::new(ExprTokenKind::Eof, Span::at(at))
    }
}
