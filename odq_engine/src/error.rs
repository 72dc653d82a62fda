//! Error types for URI resolution with global logging integration
//!
//! Every failure mode a request can produce maps to a stable error code and
//! an HTTP status. Resolution stops at the first error; callers receive one
//! `UriSyntaxError` with span-accurate position information where available.

use crate::logging::{codes, Code};
use crate::utils::Span;

pub type UriResult<T> = Result<T, UriSyntaxError>;

/// Errors produced while resolving a request URI against a metadata model
#[derive(Debug, Clone, thiserror::Error)]
pub enum UriSyntaxError {
    #[error("Resource not found: '{name}' at {span}")]
    ResourceNotFound { name: String, span: Span },

    #[error("Invalid resource path: {message} at {span}")]
    InvalidResourcePath { message: String, span: Span },

    #[error("Invalid key predicate: {message} at {span}")]
    InvalidKeyPredicate { message: String, span: Span },

    #[error("Property not found: '{name}' on type '{owner}' at {span}")]
    PropertyNotFound {
        name: String,
        owner: String,
        span: Span,
    },

    #[error("Invalid $filter expression: {message} at {span}")]
    InvalidFilterExpression { message: String, span: Span },

    #[error("Invalid $orderby expression: {message} at {span}")]
    InvalidOrderByExpression { message: String, span: Span },

    #[error("Operator '{operator}' cannot be applied to {operand_types} at {span}")]
    InvalidFilterOperand {
        operator: String,
        operand_types: String,
        span: Span,
    },

    #[error("Invalid arguments for method '{method}': {message} at {span}")]
    InvalidMethodArguments {
        method: String,
        message: String,
        span: Span,
    },

    #[error("Literal '{raw}' is not valid for type {expected_type} at {span}")]
    LiteralTypeMismatch {
        raw: String,
        expected_type: String,
        span: Span,
    },

    #[error("Literal '{raw}' is out of range for type {expected_type} at {span}")]
    LiteralOutOfRange {
        raw: String,
        expected_type: String,
        span: Span,
    },

    #[error("Invalid $top value: '{value}'")]
    InvalidTop { value: String },

    #[error("Invalid $skip value: '{value}'")]
    InvalidSkip { value: String },

    #[error("Invalid $inlinecount value: '{value}'")]
    InvalidInlineCount { value: String },

    #[error("Query option '{option}' is not allowed here: {message}")]
    IncompatibleQueryOption { option: String, message: String },

    #[error("Incomplete URI info: {message}")]
    IncompleteUriInfo { message: String },

    #[error("Internal resolution error: {message}")]
    Internal { message: String },
}

impl UriSyntaxError {
    pub fn resource_not_found(name: &str, span: Span) -> Self {
        Self::ResourceNotFound {
            name: name.to_string(),
            span,
        }
    }

    pub fn invalid_resource_path(message: &str, span: Span) -> Self {
        Self::InvalidResourcePath {
            message: message.to_string(),
            span,
        }
    }

    pub fn invalid_key_predicate(message: &str, span: Span) -> Self {
        Self::InvalidKeyPredicate {
            message: message.to_string(),
            span,
        }
    }

    pub fn property_not_found(name: &str, owner: &str, span: Span) -> Self {
        Self::PropertyNotFound {
            name: name.to_string(),
            owner: owner.to_string(),
            span,
        }
    }

    pub fn invalid_filter(message: &str, span: Span) -> Self {
        Self::InvalidFilterExpression {
            message: message.to_string(),
            span,
        }
    }

    pub fn invalid_orderby(message: &str, span: Span) -> Self {
        Self::InvalidOrderByExpression {
            message: message.to_string(),
            span,
        }
    }

    pub fn invalid_operand(operator: &str, operand_types: &str, span: Span) -> Self {
        Self::InvalidFilterOperand {
            operator: operator.to_string(),
            operand_types: operand_types.to_string(),
            span,
        }
    }

    pub fn invalid_method_arguments(method: &str, message: &str, span: Span) -> Self {
        Self::InvalidMethodArguments {
            method: method.to_string(),
            message: message.to_string(),
            span,
        }
    }

    pub fn literal_type_mismatch(raw: &str, expected_type: &str, span: Span) -> Self {
        Self::LiteralTypeMismatch {
            raw: raw.to_string(),
            expected_type: expected_type.to_string(),
            span,
        }
    }

    pub fn literal_out_of_range(raw: &str, expected_type: &str, span: Span) -> Self {
        Self::LiteralOutOfRange {
            raw: raw.to_string(),
            expected_type: expected_type.to_string(),
            span,
        }
    }

    pub fn invalid_top(value: &str) -> Self {
        Self::InvalidTop {
            value: value.to_string(),
        }
    }

    pub fn invalid_skip(value: &str) -> Self {
        Self::InvalidSkip {
            value: value.to_string(),
        }
    }

    pub fn invalid_inline_count(value: &str) -> Self {
        Self::InvalidInlineCount {
            value: value.to_string(),
        }
    }

    pub fn incompatible_option(option: &str, message: &str) -> Self {
        Self::IncompatibleQueryOption {
            option: option.to_string(),
            message: message.to_string(),
        }
    }

    pub fn incomplete_uri_info(message: &str) -> Self {
        Self::IncompleteUriInfo {
            message: message.to_string(),
        }
    }

    pub fn internal(message: &str) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::ResourceNotFound { .. } => codes::path::RESOURCE_NOT_FOUND,
            Self::InvalidResourcePath { .. } => codes::path::INVALID_RESOURCE_PATH,
            Self::InvalidKeyPredicate { .. } => codes::path::INVALID_KEY_PREDICATE,
            Self::PropertyNotFound { .. } => codes::expression::PROPERTY_NOT_FOUND,
            Self::InvalidFilterExpression { .. } => codes::expression::INVALID_FILTER_EXPRESSION,
            Self::InvalidOrderByExpression { .. } => codes::expression::INVALID_ORDERBY_EXPRESSION,
            Self::InvalidFilterOperand { .. } => codes::expression::INVALID_FILTER_OPERAND,
            Self::InvalidMethodArguments { .. } => codes::expression::INVALID_METHOD_ARGUMENTS,
            Self::LiteralTypeMismatch { .. } => codes::literal::LITERAL_TYPE_MISMATCH,
            Self::LiteralOutOfRange { .. } => codes::literal::LITERAL_OUT_OF_RANGE,
            Self::InvalidTop { .. } => codes::options::INVALID_TOP,
            Self::InvalidSkip { .. } => codes::options::INVALID_SKIP,
            Self::InvalidInlineCount { .. } => codes::options::INVALID_INLINE_COUNT,
            Self::IncompatibleQueryOption { .. } => codes::options::INCOMPATIBLE_QUERY_OPTION,
            Self::IncompleteUriInfo { .. } => codes::builder::INCOMPLETE_URI_INFO,
            Self::Internal { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// HTTP status code a protocol layer should respond with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ResourceNotFound { .. } | Self::PropertyNotFound { .. } => 404,
            Self::IncompleteUriInfo { .. } | Self::Internal { .. } => 500,
            _ => 400,
        }
    }

    /// Get span if available
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::ResourceNotFound { span, .. }
            | Self::InvalidResourcePath { span, .. }
            | Self::InvalidKeyPredicate { span, .. }
            | Self::PropertyNotFound { span, .. }
            | Self::InvalidFilterExpression { span, .. }
            | Self::InvalidOrderByExpression { span, .. }
            | Self::InvalidFilterOperand { span, .. }
            | Self::InvalidMethodArguments { span, .. }
            | Self::LiteralTypeMismatch { span, .. }
            | Self::LiteralOutOfRange { span, .. } => Some(*span),
            Self::InvalidTop { .. }
            | Self::InvalidSkip { .. }
            | Self::InvalidInlineCount { .. }
            | Self::IncompatibleQueryOption { .. }
            | Self::IncompleteUriInfo { .. }
            | Self::Internal { .. } => None,
        }
    }

    /// Check if this error indicates a caller mistake rather than an engine bug
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Get error severity
    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    /// Get recommended action
    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }

    /// Message including the recommended action from the code registry
    pub fn enhanced_message(&self) -> String {
        format!("{} ({})", self, self.recommended_action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let span = Span::new(0, 5);

        let not_found = UriSyntaxError::resource_not_found("Employes", span);
        assert_eq!(not_found.error_code().as_str(), "E100");

        let filter = UriSyntaxError::invalid_filter("trailing operator", span);
        assert_eq!(filter.error_code().as_str(), "E120");

        let mismatch = UriSyntaxError::literal_type_mismatch("'x'", "Edm.Int32", span);
        assert_eq!(mismatch.error_code().as_str(), "E140");

        let top = UriSyntaxError::invalid_top("-1");
        assert_eq!(top.error_code().as_str(), "E160");
    }

    #[test]
    fn test_status_codes() {
        let span = Span::new(0, 5);

        assert_eq!(
            UriSyntaxError::resource_not_found("Nope", span).status_code(),
            404
        );
        assert_eq!(
            UriSyntaxError::property_not_found("Nope", "Employee", span).status_code(),
            404
        );
        assert_eq!(UriSyntaxError::invalid_top("abc").status_code(), 400);
        assert_eq!(
            UriSyntaxError::incomplete_uri_info("no target").status_code(),
            500
        );
        assert_eq!(UriSyntaxError::internal("bug").status_code(), 500);
    }

    #[test]
    fn test_span_extraction() {
        let span = Span::new(3, 9);
        let error = UriSyntaxError::invalid_key_predicate("missing quote", span);
        assert_eq!(error.span(), Some(span));

        let no_span = UriSyntaxError::invalid_skip("x");
        assert_eq!(no_span.span(), None);
    }

    #[test]
    fn test_client_vs_server_errors() {
        assert!(UriSyntaxError::invalid_top("-1").is_client_error());
        assert!(!UriSyntaxError::internal("bug").is_client_error());
    }

    #[test]
    fn test_display_messages() {
        let span = Span::new(0, 8);
        let error = UriSyntaxError::invalid_operand("add", "Edm.String and Edm.Int32", span);
        let message = error.to_string();
        assert!(message.contains("add"));
        assert!(message.contains("Edm.String and Edm.Int32"));
    }
}
