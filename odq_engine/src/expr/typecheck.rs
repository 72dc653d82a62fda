//! Operator and method type compatibility rules
//!
//! Applied bottom-up while the parser builds nodes. Arithmetic requires the
//! numeric family and promotes to the widest operand type; relational
//! operators require a shared orderable family; eq/ne additionally accept a
//! null literal against any operand.

use super::ast::{BinaryOperator, CommonExpression, UnaryOperator};
use super::methods::{MethodKind, MethodReturn};
use crate::edm::EdmSimpleType;
use crate::error::{UriResult, UriSyntaxError};
use crate::utils::Span;

/// Result type of a binary operator applied to two checked operands
pub fn binary_result_type(
    operator: BinaryOperator,
    left: &CommonExpression,
    right: &CommonExpression,
    span: Span,
) -> UriResult<EdmSimpleType> {
    let mismatch = || {
        UriSyntaxError::invalid_operand(
            operator.name(),
            &format!("{} and {}", left.type_name(), right.type_name()),
            span,
        )
    };

    if operator.is_equality() && (left.is_null_literal() || right.is_null_literal()) {
        return Ok(EdmSimpleType::Boolean);
    }

    let left_type = left.result_type().ok_or_else(mismatch)?;
    let right_type = right.result_type().ok_or_else(mismatch)?;

    if operator.is_arithmetic() {
        if left_type.is_numeric() && right_type.is_numeric() {
            return EdmSimpleType::common_type(left_type, right_type).ok_or_else(mismatch);
        }
        return Err(mismatch());
    }

    if operator.is_logical() {
        if left_type == EdmSimpleType::Boolean && right_type == EdmSimpleType::Boolean {
            return Ok(EdmSimpleType::Boolean);
        }
        return Err(mismatch());
    }

    let same_family = (left_type.is_numeric() && right_type.is_numeric())
        || left_type == right_type;

    if operator.is_relational() {
        if same_family && left_type.is_orderable() && right_type.is_orderable() {
            return Ok(EdmSimpleType::Boolean);
        }
        return Err(mismatch());
    }

    // eq / ne: any mutually comparable pair
    if same_family {
        Ok(EdmSimpleType::Boolean)
    } else {
        Err(mismatch())
    }
}

/// Result type of a prefix operator
pub fn unary_result_type(
    operator: UnaryOperator,
    operand: &CommonExpression,
    span: Span,
) -> UriResult<EdmSimpleType> {
    let mismatch =
        || UriSyntaxError::invalid_operand(operator.name(), operand.type_name(), span);

    let operand_type = operand.result_type().ok_or_else(mismatch)?;
    match operator {
        UnaryOperator::Not => {
            if operand_type == EdmSimpleType::Boolean {
                Ok(EdmSimpleType::Boolean)
            } else {
                Err(mismatch())
            }
        }
        UnaryOperator::Minus => {
            if operand_type.is_numeric() {
                Ok(operand_type)
            } else {
                Err(mismatch())
            }
        }
    }
}

/// Check arguments against the method's signature table and return its type
pub fn method_result_type(
    method: MethodKind,
    arguments: &[CommonExpression],
    span: Span,
) -> UriResult<EdmSimpleType> {
    let signatures = method.signatures();

    let arity_matches: Vec<_> = signatures
        .iter()
        .filter(|(params, _)| params.len() == arguments.len())
        .collect();

    if arity_matches.is_empty() {
        let expected: Vec<String> = signatures
            .iter()
            .map(|(params, _)| params.len().to_string())
            .collect();
        return Err(UriSyntaxError::invalid_method_arguments(
            method.name(),
            &format!(
                "expects {} argument(s), got {}",
                expected.join(" or "),
                arguments.len()
            ),
            span,
        ));
    }

    for (params, return_type) in &arity_matches {
        let all_accepted = params.iter().zip(arguments.iter()).all(|(param, arg)| {
            arg.result_type()
                .map(|ty| param.accepts(ty))
                .unwrap_or(false)
        });
        if all_accepted {
            return match return_type {
                MethodReturn::Fixed(ty) => Ok(*ty),
                MethodReturn::SameAsFirstArgument => arguments[0].result_type().ok_or_else(|| {
                    UriSyntaxError::invalid_method_arguments(
                        method.name(),
                        "argument must not be null",
                        span,
                    )
                }),
            };
        }
    }

    // Report the first argument that fails the first arity-matching signature
    let (params, _) = arity_matches[0];
    for (index, (param, arg)) in params.iter().zip(arguments.iter()).enumerate() {
        let accepted = arg
            .result_type()
            .map(|ty| param.accepts(ty))
            .unwrap_or(false);
        if !accepted {
            return Err(UriSyntaxError::invalid_method_arguments(
                method.name(),
                &format!(
                    "argument {} must be {}, got {}",
                    index + 1,
                    param.describe(),
                    arg.type_name()
                ),
                span,
            ));
        }
    }

    Err(UriSyntaxError::invalid_method_arguments(
        method.name(),
        "arguments do not match any signature",
        span,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::TypedValue;
    use assert_matches::assert_matches;

    fn literal(value: TypedValue) -> CommonExpression {
        let edm_type = value.simple_type();
        CommonExpression::Literal {
            value,
            edm_type,
            span: Span::new(0, 1),
        }
    }

    fn span() -> Span {
        Span::new(0, 10)
    }

    #[test]
    fn test_arithmetic_promotion() {
        let left = literal(TypedValue::Int16(2));
        let right = literal(TypedValue::Int64(3));
        assert_eq!(
            binary_result_type(BinaryOperator::Add, &left, &right, span()).unwrap(),
            EdmSimpleType::Int64
        );
    }

    #[test]
    fn test_arithmetic_rejects_strings() {
        let left = literal(TypedValue::String("x".to_string()));
        let right = literal(TypedValue::Int32(1));
        assert_matches!(
            binary_result_type(BinaryOperator::Add, &left, &right, span()),
            Err(UriSyntaxError::InvalidFilterOperand { .. })
        );
    }

    #[test]
    fn test_relational_requires_shared_family() {
        let string = literal(TypedValue::String("x".to_string()));
        let number = literal(TypedValue::Int32(1));
        assert_eq!(
            binary_result_type(BinaryOperator::Lt, &number, &number, span()).unwrap(),
            EdmSimpleType::Boolean
        );
        assert_eq!(
            binary_result_type(BinaryOperator::Lt, &string, &string, span()).unwrap(),
            EdmSimpleType::Boolean
        );
        assert_matches!(
            binary_result_type(BinaryOperator::Lt, &string, &number, span()),
            Err(UriSyntaxError::InvalidFilterOperand { .. })
        );
    }

    #[test]
    fn test_boolean_comparison_only_for_equality() {
        let flag = literal(TypedValue::Boolean(true));
        assert_eq!(
            binary_result_type(BinaryOperator::Eq, &flag, &flag, span()).unwrap(),
            EdmSimpleType::Boolean
        );
        assert_matches!(
            binary_result_type(BinaryOperator::Lt, &flag, &flag, span()),
            Err(UriSyntaxError::InvalidFilterOperand { .. })
        );
    }

    #[test]
    fn test_null_comparisons() {
        let null = literal(TypedValue::Null);
        let number = literal(TypedValue::Int32(1));
        assert_eq!(
            binary_result_type(BinaryOperator::Eq, &number, &null, span()).unwrap(),
            EdmSimpleType::Boolean
        );
        assert_matches!(
            binary_result_type(BinaryOperator::Lt, &number, &null, span()),
            Err(UriSyntaxError::InvalidFilterOperand { .. })
        );
    }

    #[test]
    fn test_unary_operators() {
        let flag = literal(TypedValue::Boolean(true));
        let number = literal(TypedValue::Double(1.5));

        assert_eq!(
            unary_result_type(UnaryOperator::Not, &flag, span()).unwrap(),
            EdmSimpleType::Boolean
        );
        assert_eq!(
            unary_result_type(UnaryOperator::Minus, &number, span()).unwrap(),
            EdmSimpleType::Double
        );
        assert_matches!(
            unary_result_type(UnaryOperator::Minus, &flag, span()),
            Err(UriSyntaxError::InvalidFilterOperand { .. })
        );
    }

    #[test]
    fn test_method_arity_checking() {
        let text = literal(TypedValue::String("a".to_string()));
        assert_matches!(
            method_result_type(MethodKind::Length, &[text.clone(), text.clone()], span()),
            Err(UriSyntaxError::InvalidMethodArguments { .. })
        );
        assert_eq!(
            method_result_type(MethodKind::Length, &[text], span()).unwrap(),
            EdmSimpleType::Int32
        );
    }

    #[test]
    fn test_substring_overloads() {
        let text = literal(TypedValue::String("a".to_string()));
        let index = literal(TypedValue::Int32(1));

        assert_eq!(
            method_result_type(
                MethodKind::Substring,
                &[text.clone(), index.clone()],
                span()
            )
            .unwrap(),
            EdmSimpleType::String
        );
        assert_eq!(
            method_result_type(MethodKind::Substring, &[text, index.clone(), index], span())
                .unwrap(),
            EdmSimpleType::String
        );
    }

    #[test]
    fn test_method_argument_type_mismatch() {
        let number = literal(TypedValue::Int32(1));
        let err = method_result_type(MethodKind::ToUpper, &[number], span());
        assert_matches!(err, Err(UriSyntaxError::InvalidMethodArguments { .. }));
    }

    #[test]
    fn test_round_keeps_operand_type() {
        let decimal = literal(TypedValue::Decimal("1.5".to_string()));
        assert_eq!(
            method_result_type(MethodKind::Round, &[decimal], span()).unwrap(),
            EdmSimpleType::Decimal
        );
    }
}
