//! Expression AST with resolved operand types
//!
//! Nodes are produced fully typed: type checking happens bottom-up during
//! parsing, so a tree that exists at all has already passed the operator
//! compatibility rules. Only a null literal carries no type.

use super::methods::MethodKind;
use crate::edm::EdmSimpleType;
use crate::literal::TypedValue;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operator keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOperator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod)
    }

    pub fn is_relational(&self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Minus,
}

impl UnaryOperator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Minus => "-",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A type-checked expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommonExpression {
    Literal {
        value: TypedValue,
        /// None only for the null literal
        edm_type: Option<EdmSimpleType>,
        span: Span,
    },
    Property {
        /// Segments through complex properties, ending at a simple one
        path: Vec<String>,
        edm_type: EdmSimpleType,
        span: Span,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<CommonExpression>,
        edm_type: EdmSimpleType,
        span: Span,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<CommonExpression>,
        right: Box<CommonExpression>,
        edm_type: EdmSimpleType,
        span: Span,
    },
    MethodCall {
        method: MethodKind,
        arguments: Vec<CommonExpression>,
        edm_type: EdmSimpleType,
        span: Span,
    },
}

impl CommonExpression {
    /// Resolved result type, None only for a null literal
    pub fn result_type(&self) -> Option<EdmSimpleType> {
        match self {
            Self::Literal { edm_type, .. } => *edm_type,
            Self::Property { edm_type, .. }
            | Self::Unary { edm_type, .. }
            | Self::Binary { edm_type, .. }
            | Self::MethodCall { edm_type, .. } => Some(*edm_type),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Literal { span, .. }
            | Self::Property { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::MethodCall { span, .. } => *span,
        }
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(
            self,
            Self::Literal {
                value: TypedValue::Null,
                ..
            }
        )
    }

    /// Display name of the result type for error messages
    pub fn type_name(&self) -> &'static str {
        match self.result_type() {
            Some(ty) => ty.name(),
            None => "null",
        }
    }
}

/// Sort direction of one order-by item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One comma-separated item of an $orderby option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expression: CommonExpression,
    pub order: SortOrder,
}
