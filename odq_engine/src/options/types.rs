//! Validated query-option structures

use crate::expr::{CommonExpression, OrderByItem};
use crate::literal::TypedValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// $inlinecount request, when present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineCount {
    AllPages,
    None,
}

/// $format request, known formats separated from custom ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    Atom,
    Json,
    Xml,
    Custom(String),
}

impl FormatKind {
    pub fn from_value(value: &str) -> Self {
        match value {
            "atom" => Self::Atom,
            "json" => Self::Json,
            "xml" => Self::Xml,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// One navigation step of an $expand chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandSegment {
    pub navigation_property: String,
    pub entity_set: String,
    pub target_type: String,
}

/// One comma-separated $select item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectItem {
    /// Navigation prefix plus optional final property name
    pub segments: Vec<String>,
    /// Path ended with a * wildcard
    pub star: bool,
}

/// All validated query options of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueryOptions {
    pub filter: Option<CommonExpression>,
    pub order_by: Vec<OrderByItem>,
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub skip_token: Option<String>,
    pub inline_count: Option<InlineCount>,
    pub format: Option<FormatKind>,
    /// Each item is one chain of navigation steps
    pub expand: Vec<Vec<ExpandSegment>>,
    pub select: Vec<SelectItem>,
    /// Function import parameters parsed against their declared types
    pub function_parameters: HashMap<String, TypedValue>,
    /// Options without a $ prefix, passed through untouched
    pub custom: HashMap<String, String>,
}

impl QueryOptions {
    pub fn is_empty(&self) -> bool {
        self.filter.is_none()
            && self.order_by.is_empty()
            && self.top.is_none()
            && self.skip.is_none()
            && self.skip_token.is_none()
            && self.inline_count.is_none()
            && self.format.is_none()
            && self.expand.is_empty()
            && self.select.is_empty()
            && self.function_parameters.is_empty()
            && self.custom.is_empty()
    }
}
