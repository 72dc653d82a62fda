//! Filter and order-by expression engine
//!
//! Entry points tokenize the raw option text, run the recursive-descent
//! parser against the entity type in scope, and hand back a fully typed AST.
//! A $filter must resolve to a boolean root; $orderby items may resolve to
//! any simple type.

pub mod ast;
pub mod methods;
pub mod parser;
pub mod typecheck;

pub use ast::{BinaryOperator, CommonExpression, OrderByItem, SortOrder, UnaryOperator};
pub use methods::MethodKind;
pub use parser::{ExprContext, ExpressionParser};

use crate::edm::{EdmSimpleType, EntityType, MetadataModel};
use crate::error::{UriResult, UriSyntaxError};
use crate::lexical::{tokenize, LexError};
use crate::utils::Span;
use crate::{log_debug, log_error};

/// Parse and type-check a $filter expression
pub fn parse_filter(
    raw: &str,
    scope: &EntityType,
    model: &MetadataModel,
) -> UriResult<CommonExpression> {
    let stream = tokenize(raw).map_err(|e| lex_to_uri_error(e, ExprContext::Filter))?;
    let mut parser = ExpressionParser::new(stream, model, scope, ExprContext::Filter);

    let expression = parser.parse_expression()?;
    parser.expect_end()?;

    if expression.result_type() != Some(EdmSimpleType::Boolean) {
        return Err(UriSyntaxError::invalid_filter(
            &format!(
                "filter must resolve to Edm.Boolean, got {}",
                expression.type_name()
            ),
            expression.span(),
        ));
    }

    log_debug!("Parsed filter expression", "length" => raw.len());
    Ok(expression)
}

/// Parse and type-check a $orderby option
pub fn parse_orderby(
    raw: &str,
    scope: &EntityType,
    model: &MetadataModel,
) -> UriResult<Vec<OrderByItem>> {
    let stream = tokenize(raw).map_err(|e| lex_to_uri_error(e, ExprContext::OrderBy))?;
    let mut parser = ExpressionParser::new(stream, model, scope, ExprContext::OrderBy);

    let items = parser.parse_orderby_list()?;
    log_debug!("Parsed orderby option", "items" => items.len());
    Ok(items)
}

fn lex_to_uri_error(error: LexError, context: ExprContext) -> UriSyntaxError {
    let message = error.to_string();
    if let Some(span) = error.span() {
        log_error!(error.error_code(), &message, span = span);
    } else {
        log_error!(error.error_code(), &message);
    }

    let span = error.span().unwrap_or_else(Span::dummy);
    match context {
        ExprContext::Filter => UriSyntaxError::invalid_filter(&message, span),
        ExprContext::OrderBy => UriSyntaxError::invalid_orderby(&message, span),
    }
}
