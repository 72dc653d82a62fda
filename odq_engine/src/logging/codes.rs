//! Consolidated error codes and classification system
//!
//! Single source of truth for all error and success codes emitted by the
//! engine, together with their behavioral metadata. Every rejection of a
//! client request carries one of these codes so operators can correlate
//! structured logs with the HTTP outcome sent downstream.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    /// HTTP status class the code maps to when it reaches the transport
    pub http_status: u16,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Expression tokenizer error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const TOO_MANY_TOKENS: Code = Code::new("E023");
    pub const OPTION_TOO_LONG: Code = Code::new("E024");
}

/// Resource-path resolution error codes
pub mod path {
    use super::Code;

    pub const RESOURCE_NOT_FOUND: Code = Code::new("E100");
    pub const INVALID_RESOURCE_PATH: Code = Code::new("E101");
    pub const INVALID_KEY_PREDICATE: Code = Code::new("E102");
    pub const TOO_MANY_SEGMENTS: Code = Code::new("E103");
}

/// Expression parsing and type-checking error codes
pub mod expression {
    use super::Code;

    pub const INVALID_FILTER_EXPRESSION: Code = Code::new("E120");
    pub const INVALID_ORDERBY_EXPRESSION: Code = Code::new("E121");
    pub const INVALID_FILTER_OPERAND: Code = Code::new("E122");
    pub const INVALID_METHOD_ARGUMENTS: Code = Code::new("E123");
    pub const PROPERTY_NOT_FOUND: Code = Code::new("E124");
    pub const MAX_EXPRESSION_DEPTH: Code = Code::new("E125");
}

/// Literal type system error codes
pub mod literal {
    use super::Code;

    pub const LITERAL_TYPE_MISMATCH: Code = Code::new("E140");
    pub const LITERAL_OUT_OF_RANGE: Code = Code::new("E141");
}

/// Query-option validation error codes
pub mod options {
    use super::Code;

    pub const INVALID_TOP: Code = Code::new("E160");
    pub const INVALID_SKIP: Code = Code::new("E161");
    pub const INVALID_INLINE_COUNT: Code = Code::new("E162");
    pub const INCOMPATIBLE_QUERY_OPTION: Code = Code::new("E163");
    pub const INVALID_SYSTEM_OPTION: Code = Code::new("E164");
}

/// Result-builder error codes
pub mod builder {
    use super::Code;

    pub const INCOMPLETE_URI_INFO: Code = Code::new("E180");
}

/// Success codes for milestone logging
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PATH_RESOLUTION_COMPLETE: Code = Code::new("I100");
    pub const EXPRESSION_PARSE_COMPLETE: Code = Code::new("I120");
    pub const OPTION_VALIDATION_COMPLETE: Code = Code::new("I160");
    pub const URI_RESOLUTION_COMPLETE: Code = Code::new("I180");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static METADATA_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    METADATA_REGISTRY.get_or_init(build_registry)
}

macro_rules! meta {
    ($map:ident, $code:expr, $category:expr, $severity:expr, $recoverable:expr,
     $status:expr, $description:expr, $action:expr) => {
        $map.insert(
            $code.as_str(),
            ErrorMetadata {
                code: $code.as_str(),
                category: $category,
                severity: $severity,
                recoverable: $recoverable,
                http_status: $status,
                description: $description,
                recommended_action: $action,
            },
        );
    };
}

#[rustfmt::skip]
fn build_registry() -> HashMap<&'static str, ErrorMetadata> {
    use Severity::*;
    let mut m = HashMap::new();

    // System
    meta!(m, system::INTERNAL_ERROR, "System", Critical, false, 500,
        "Internal engine failure",
        "Report the request and engine version to the service operator");
    meta!(m, system::INITIALIZATION_FAILURE, "System", Critical, false, 500,
        "Engine initialization failed",
        "Check logging and preference configuration before serving requests");

    // Lexical
    meta!(m, lexical::INVALID_CHARACTER, "Lexical", Medium, true, 400,
        "Character not allowed in an expression",
        "Remove or percent-encode the offending character");
    meta!(m, lexical::UNTERMINATED_STRING, "Lexical", Medium, true, 400,
        "String literal missing its closing quote",
        "Close the literal with a single quote; use '' to escape quotes");
    meta!(m, lexical::INVALID_NUMBER, "Lexical", Medium, true, 400,
        "Numeric literal is malformed",
        "Check digits and the optional L/M/D/F type suffix");
    meta!(m, lexical::TOO_MANY_TOKENS, "Lexical", High, true, 400,
        "Expression exceeds the token budget",
        "Simplify the expression or split the request");
    meta!(m, lexical::OPTION_TOO_LONG, "Lexical", High, true, 400,
        "Raw option text exceeds the length limit",
        "Shorten the query option value");

    // Path
    meta!(m, path::RESOURCE_NOT_FOUND, "Path", Medium, true, 404,
        "Path segment does not name a known resource",
        "Check entity set, navigation, and property names against $metadata");
    meta!(m, path::INVALID_RESOURCE_PATH, "Path", Medium, true, 400,
        "Path segments violate the resource-path grammar",
        "Check segment ordering and $value/$count/$links placement");
    meta!(m, path::INVALID_KEY_PREDICATE, "Path", Medium, true, 400,
        "Key predicate does not match the entity key",
        "Supply every key property exactly once with a type-correct literal");
    meta!(m, path::TOO_MANY_SEGMENTS, "Path", High, true, 400,
        "Resource path exceeds the segment limit",
        "Shorten the navigation chain");

    // Expression
    meta!(m, expression::INVALID_FILTER_EXPRESSION, "Expression", Medium, true, 400,
        "$filter expression is not parseable or not boolean",
        "Check the expression grammar and its root type");
    meta!(m, expression::INVALID_ORDERBY_EXPRESSION, "Expression", Medium, true, 400,
        "$orderby expression is not parseable or not orderable",
        "Order only by simple-typed expressions, optionally with asc/desc");
    meta!(m, expression::INVALID_FILTER_OPERAND, "Expression", Medium, true, 400,
        "Operator applied to incompatible operand types",
        "Consult the operator/type compatibility table");
    meta!(m, expression::INVALID_METHOD_ARGUMENTS, "Expression", Medium, true, 400,
        "Method called with wrong arity or argument types",
        "Check the method signature table");
    meta!(m, expression::PROPERTY_NOT_FOUND, "Expression", Medium, true, 404,
        "Identifier does not resolve to a property in scope",
        "Check the property path against the target entity type");
    meta!(m, expression::MAX_EXPRESSION_DEPTH, "Expression", High, true, 400,
        "Expression nesting exceeds the depth limit",
        "Flatten the expression");

    // Literal
    meta!(m, literal::LITERAL_TYPE_MISMATCH, "Literal", Medium, true, 400,
        "Literal lexeme does not belong to the declared type family",
        "Check quoting conventions and type suffixes");
    meta!(m, literal::LITERAL_OUT_OF_RANGE, "Literal", Medium, true, 400,
        "Literal is well-formed but outside the value domain",
        "Check numeric ranges and declared facets");

    // Options
    meta!(m, options::INVALID_TOP, "Options", Low, true, 400,
        "$top is not a non-negative integer",
        "Supply $top as a non-negative integer");
    meta!(m, options::INVALID_SKIP, "Options", Low, true, 400,
        "$skip is not a non-negative integer",
        "Supply $skip as a non-negative integer");
    meta!(m, options::INVALID_INLINE_COUNT, "Options", Low, true, 400,
        "$inlinecount is neither 'allpages' nor 'none'",
        "Use $inlinecount=allpages or $inlinecount=none");
    meta!(m, options::INCOMPATIBLE_QUERY_OPTION, "Options", Medium, true, 400,
        "Query options are individually valid but mutually exclusive",
        "Remove one of the conflicting options");
    meta!(m, options::INVALID_SYSTEM_OPTION, "Options", Low, true, 400,
        "Unknown $-prefixed query option",
        "Check the option name; custom options must not start with $");

    // Builder
    meta!(m, builder::INCOMPLETE_URI_INFO, "Builder", High, false, 500,
        "Builder stages do not cover the resolved path shape",
        "Engine defect: a mandatory builder stage was skipped");

    m
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get severity for a code (Medium when unknown)
pub fn get_severity(code: &str) -> Severity {
    registry()
        .get(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

/// Get category for a code
pub fn get_category(code: &str) -> &'static str {
    registry().get(code).map(|m| m.category).unwrap_or("Unknown")
}

/// Get human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    registry()
        .get(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

/// Get recommended client action for a code
pub fn get_action(code: &str) -> &'static str {
    registry()
        .get(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}

/// Check if an error with this code is recoverable for the client
pub fn is_recoverable(code: &str) -> bool {
    registry().get(code).map(|m| m.recoverable).unwrap_or(true)
}

/// HTTP status class for a code (400 when unknown)
pub fn http_status(code: &str) -> u16 {
    registry().get(code).map(|m| m.http_status).unwrap_or(400)
}

/// All registered error codes (for registry validation at startup)
pub fn registered_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = registry().keys().copied().collect();
    codes.sort_unstable();
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_metadata_lookup() {
        assert_eq!(get_category(path::RESOURCE_NOT_FOUND.as_str()), "Path");
        assert_eq!(get_severity(system::INTERNAL_ERROR.as_str()), Severity::Critical);
        assert!(!is_recoverable(system::INTERNAL_ERROR.as_str()));
        assert!(is_recoverable(options::INVALID_TOP.as_str()));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(http_status(path::RESOURCE_NOT_FOUND.as_str()), 404);
        assert_eq!(http_status(expression::PROPERTY_NOT_FOUND.as_str()), 404);
        assert_eq!(http_status(options::INVALID_TOP.as_str()), 400);
        assert_eq!(http_status(system::INTERNAL_ERROR.as_str()), 500);
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(http_status("E999"), 400);
    }

    #[test]
    fn test_registry_is_populated() {
        let codes = registered_codes();
        assert!(codes.len() >= 20);
        assert!(codes.contains(&"E100"));
        assert!(codes.contains(&"E180"));
    }
}
