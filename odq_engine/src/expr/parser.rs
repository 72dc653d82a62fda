//! Recursive-descent expression parser with bottom-up type checking
//!
//! Precedence, loosest first: or, and, not, equality, relational, additive,
//! multiplicative, unary minus, primary. Binary operators are
//! left-associative; not and unary minus are right-associative prefixes.

use super::ast::{BinaryOperator, CommonExpression, OrderByItem, SortOrder, UnaryOperator};
use super::methods::MethodKind;
use super::typecheck::{binary_result_type, method_result_type, unary_result_type};
use crate::config::constants::compile_time::expression::{
    MAX_EXPRESSION_DEPTH, MAX_ORDERBY_ITEMS,
};
use crate::edm::{EntityType, MetadataModel, PropertyType};
use crate::error::{UriResult, UriSyntaxError};
use crate::literal::infer_literal;
use crate::log_error;
use crate::logging::codes;
use crate::tokens::{ExprTokenKind, TokenStream};
use crate::utils::Span;

/// Which query option the expression came from, for error kind selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprContext {
    Filter,
    OrderBy,
}

pub struct ExpressionParser<'a> {
    stream: TokenStream,
    model: &'a MetadataModel,
    scope: &'a EntityType,
    context: ExprContext,
    depth: usize,
}

impl<'a> ExpressionParser<'a> {
    pub fn new(
        stream: TokenStream,
        model: &'a MetadataModel,
        scope: &'a EntityType,
        context: ExprContext,
    ) -> Self {
        Self {
            stream,
            model,
            scope,
            context,
            depth: 0,
        }
    }

    /// Parse one complete expression; the caller checks for trailing tokens
    pub fn parse_expression(&mut self) -> UriResult<CommonExpression> {
        self.parse_or()
    }

    /// Parse a full $orderby list of comma-separated items
    pub fn parse_orderby_list(&mut self) -> UriResult<Vec<OrderByItem>> {
        let mut items = Vec::new();

        loop {
            let expression = self.parse_expression()?;
            if expression.result_type().is_none() {
                return Err(self.syntax_error("cannot order by null", expression.span()));
            }

            let order = if self.stream.consume_if(&ExprTokenKind::Asc) {
                SortOrder::Ascending
            } else if self.stream.consume_if(&ExprTokenKind::Desc) {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };

            items.push(OrderByItem { expression, order });
            if items.len() > MAX_ORDERBY_ITEMS {
                return Err(self.syntax_error("too many order-by items", self.stream.current_span()));
            }

            if !self.stream.consume_if(&ExprTokenKind::Comma) {
                break;
            }
        }

        self.expect_end()?;
        Ok(items)
    }

    /// Fail unless the whole input was consumed
    pub fn expect_end(&mut self) -> UriResult<()> {
        if self.stream.is_at_end() {
            Ok(())
        } else {
            let token = self.stream.current().clone();
            Err(self.syntax_error(
                &format!("unexpected {}", token.kind.describe()),
                token.span,
            ))
        }
    }

    fn syntax_error(&self, message: &str, span: Span) -> UriSyntaxError {
        match self.context {
            ExprContext::Filter => UriSyntaxError::invalid_filter(message, span),
            ExprContext::OrderBy => UriSyntaxError::invalid_orderby(message, span),
        }
    }

    fn enter(&mut self, span: Span) -> UriResult<()> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            log_error!(
                codes::expression::MAX_EXPRESSION_DEPTH,
                "Expression nesting limit exceeded",
                span = span,
                "depth" => self.depth
            );
            return Err(self.syntax_error("expression nested too deeply", span));
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    fn parse_or(&mut self) -> UriResult<CommonExpression> {
        self.enter(self.stream.current_span())?;
        let result = self.parse_or_body();
        self.exit();
        result
    }

    fn parse_or_body(&mut self) -> UriResult<CommonExpression> {
        let mut left = self.parse_and()?;
        while self.stream.consume_if(&ExprTokenKind::Or) {
            let right = self.parse_and()?;
            left = self.binary(BinaryOperator::Or, left, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> UriResult<CommonExpression> {
        let mut left = self.parse_not()?;
        while self.stream.consume_if(&ExprTokenKind::And) {
            let right = self.parse_not()?;
            left = self.binary(BinaryOperator::And, left, right)?;
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> UriResult<CommonExpression> {
        if self.stream.current().kind == ExprTokenKind::Not {
            let not_span = self.stream.advance().span;
            self.enter(not_span)?;
            let operand = self.parse_not()?;
            self.exit();

            let span = not_span.merge(operand.span());
            let edm_type = unary_result_type(UnaryOperator::Not, &operand, span)?;
            return Ok(CommonExpression::Unary {
                operator: UnaryOperator::Not,
                operand: Box::new(operand),
                edm_type,
                span,
            });
        }
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> UriResult<CommonExpression> {
        let mut left = self.parse_relational()?;
        loop {
            let operator = match self.stream.current().kind {
                ExprTokenKind::Eq => BinaryOperator::Eq,
                ExprTokenKind::Ne => BinaryOperator::Ne,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_relational()?;
            left = self.binary(operator, left, right)?;
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> UriResult<CommonExpression> {
        let mut left = self.parse_additive()?;
        loop {
            let operator = match self.stream.current().kind {
                ExprTokenKind::Lt => BinaryOperator::Lt,
                ExprTokenKind::Le => BinaryOperator::Le,
                ExprTokenKind::Gt => BinaryOperator::Gt,
                ExprTokenKind::Ge => BinaryOperator::Ge,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_additive()?;
            left = self.binary(operator, left, right)?;
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> UriResult<CommonExpression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let operator = match self.stream.current().kind {
                ExprTokenKind::Add => BinaryOperator::Add,
                ExprTokenKind::Sub => BinaryOperator::Sub,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(operator, left, right)?;
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> UriResult<CommonExpression> {
        let mut left = self.parse_unary()?;
        loop {
            let operator = match self.stream.current().kind {
                ExprTokenKind::Mul => BinaryOperator::Mul,
                ExprTokenKind::Div => BinaryOperator::Div,
                ExprTokenKind::Mod => BinaryOperator::Mod,
                _ => break,
            };
            self.stream.advance();
            let right = self.parse_unary()?;
            left = self.binary(operator, left, right)?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> UriResult<CommonExpression> {
        if self.stream.current().kind == ExprTokenKind::Minus {
            let minus_span = self.stream.advance().span;
            self.enter(minus_span)?;
            let operand = self.parse_unary()?;
            self.exit();

            let span = minus_span.merge(operand.span());
            let edm_type = unary_result_type(UnaryOperator::Minus, &operand, span)?;
            return Ok(CommonExpression::Unary {
                operator: UnaryOperator::Minus,
                operand: Box::new(operand),
                edm_type,
                span,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> UriResult<CommonExpression> {
        let token = self.stream.current().clone();
        match token.kind {
            ExprTokenKind::OpenParen => {
                self.stream.advance();
                let inner = self.parse_or()?;
                if !self.stream.consume_if(&ExprTokenKind::CloseParen) {
                    return Err(self.syntax_error(
                        &format!("expected ')', found {}", self.stream.current().kind.describe()),
                        self.stream.current_span(),
                    ));
                }
                Ok(inner)
            }
            ExprTokenKind::Literal(raw) => {
                self.stream.advance();
                let value = infer_literal(&raw, token.span)?;
                let edm_type = value.simple_type();
                Ok(CommonExpression::Literal {
                    value,
                    edm_type,
                    span: token.span,
                })
            }
            ExprTokenKind::Identifier(name) => {
                self.stream.advance();
                if self.stream.current().kind == ExprTokenKind::OpenParen {
                    self.parse_method_call(&name, token.span)
                } else {
                    self.parse_property_path(name, token.span)
                }
            }
            _ => Err(self.syntax_error(
                &format!("unexpected {}", token.kind.describe()),
                token.span,
            )),
        }
    }

    fn parse_method_call(&mut self, name: &str, name_span: Span) -> UriResult<CommonExpression> {
        let method = MethodKind::from_name(name).ok_or_else(|| {
            UriSyntaxError::invalid_method_arguments(name, "unknown method", name_span)
        })?;
        self.stream.advance();

        let mut arguments = Vec::new();
        if self.stream.current().kind != ExprTokenKind::CloseParen {
            loop {
                arguments.push(self.parse_or()?);
                if !self.stream.consume_if(&ExprTokenKind::Comma) {
                    break;
                }
            }
        }

        let close = self.stream.current().clone();
        if !self.stream.consume_if(&ExprTokenKind::CloseParen) {
            return Err(self.syntax_error(
                &format!("expected ')', found {}", close.kind.describe()),
                close.span,
            ));
        }

        let span = name_span.merge(close.span);
        let edm_type = method_result_type(method, &arguments, span)?;
        Ok(CommonExpression::MethodCall {
            method,
            arguments,
            edm_type,
            span,
        })
    }

    fn parse_property_path(&mut self, first: String, first_span: Span) -> UriResult<CommonExpression> {
        let mut path = vec![first];
        let mut span = first_span;

        while self.stream.consume_if(&ExprTokenKind::Dot) {
            let token = self.stream.current().clone();
            match token.kind {
                ExprTokenKind::Identifier(name) => {
                    self.stream.advance();
                    path.push(name);
                    span = span.merge(token.span);
                }
                _ => {
                    return Err(self.syntax_error(
                        &format!("expected property name, found {}", token.kind.describe()),
                        token.span,
                    ));
                }
            }
        }

        let edm_type = self.resolve_property_path(&path, span)?;
        Ok(CommonExpression::Property {
            path,
            edm_type,
            span,
        })
    }

    /// Walk a path through complex properties down to a simple-typed leaf
    fn resolve_property_path(
        &self,
        path: &[String],
        span: Span,
    ) -> UriResult<crate::edm::EdmSimpleType> {
        let mut owner_name = self.scope.name.clone();
        let mut properties = &self.scope.properties;

        for (index, segment) in path.iter().enumerate() {
            let property = properties
                .iter()
                .find(|p| &p.name == segment)
                .ok_or_else(|| UriSyntaxError::property_not_found(segment, &owner_name, span))?;
            let is_last = index == path.len() - 1;

            match &property.property_type {
                PropertyType::Simple(ty) => {
                    if !is_last {
                        return Err(self.syntax_error(
                            &format!("property '{}' has no sub-properties", segment),
                            span,
                        ));
                    }
                    return Ok(*ty);
                }
                PropertyType::Complex(complex_name) => {
                    if is_last {
                        return Err(self.syntax_error(
                            &format!("property path must end at a simple property, '{}' is complex", segment),
                            span,
                        ));
                    }
                    let complex = self.model.complex_type(complex_name).ok_or_else(|| {
                        UriSyntaxError::internal(&format!(
                            "complex type '{}' missing from model",
                            complex_name
                        ))
                    })?;
                    owner_name = complex.name.clone();
                    properties = &complex.properties;
                }
            }
        }

        Err(self.syntax_error("empty property path", span))
    }

    fn binary(
        &self,
        operator: BinaryOperator,
        left: CommonExpression,
        right: CommonExpression,
    ) -> UriResult<CommonExpression> {
        let span = left.span().merge(right.span());
        let edm_type = binary_result_type(operator, &left, &right, span)?;
        Ok(CommonExpression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            edm_type,
            span,
        })
    }
}
