//! The immutable resolved request
//!
//! `UriInfo` is built once per request by the staged builder and never
//! mutated afterwards; all state is behind accessors. It is the single
//! structure downstream query translators and serializers consume.

use crate::options::QueryOptions;
use crate::path::{KeyPredicate, NavigationSegment, ResolvedPath, TargetType};
use serde::{Deserialize, Serialize};

/// Closed set of request shapes, selecting the assembly path at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextKind {
    ServiceDocument,
    Metadata,
    EntityCollection,
    SingleEntity,
    Property,
    Count,
    Value,
    Links,
    FunctionCall,
}

impl ContextKind {
    /// Classify a resolved path into its request shape
    pub fn classify(resolved: &ResolvedPath) -> Self {
        if resolved.is_service_document {
            Self::ServiceDocument
        } else if resolved.is_metadata {
            Self::Metadata
        } else if resolved.is_count {
            Self::Count
        } else if resolved.is_value {
            Self::Value
        } else if resolved.is_links {
            Self::Links
        } else if resolved.function_import.is_some() {
            Self::FunctionCall
        } else if !resolved.property_path.is_empty() {
            Self::Property
        } else if resolved.targets_collection() {
            Self::EntityCollection
        } else {
            Self::SingleEntity
        }
    }
}

/// Fully resolved, type-checked representation of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UriInfo {
    pub(super) context_kind: ContextKind,
    pub(super) entity_container: String,
    pub(super) start_entity_set: Option<String>,
    pub(super) target_entity_set: Option<String>,
    pub(super) function_import: Option<String>,
    pub(super) target_type: Option<TargetType>,
    pub(super) key_predicates: Vec<KeyPredicate>,
    pub(super) navigation_segments: Vec<NavigationSegment>,
    pub(super) property_path: Vec<String>,
    pub(super) is_count: bool,
    pub(super) is_value: bool,
    pub(super) is_links: bool,
    pub(super) options: QueryOptions,
}

impl UriInfo {
    pub fn context_kind(&self) -> ContextKind {
        self.context_kind
    }

    pub fn entity_container(&self) -> &str {
        &self.entity_container
    }

    pub fn start_entity_set(&self) -> Option<&str> {
        self.start_entity_set.as_deref()
    }

    /// Entity set the path finally addresses, None for non-entity targets
    pub fn target_entity_set(&self) -> Option<&str> {
        self.target_entity_set.as_deref()
    }

    pub fn function_import(&self) -> Option<&str> {
        self.function_import.as_deref()
    }

    pub fn target_type(&self) -> Option<&TargetType> {
        self.target_type.as_ref()
    }

    pub fn key_predicates(&self) -> &[KeyPredicate] {
        &self.key_predicates
    }

    pub fn navigation_segments(&self) -> &[NavigationSegment] {
        &self.navigation_segments
    }

    pub fn property_path(&self) -> &[String] {
        &self.property_path
    }

    pub fn is_count(&self) -> bool {
        self.is_count
    }

    pub fn is_value(&self) -> bool {
        self.is_value
    }

    pub fn is_links(&self) -> bool {
        self.is_links
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_kind_classification() {
        let mut path = ResolvedPath::empty();
        path.start_entity_set = Some("Employees".to_string());
        assert_eq!(ContextKind::classify(&path), ContextKind::EntityCollection);

        path.key_predicates.push(crate::path::KeyPredicate {
            property: "Id".to_string(),
            edm_type: crate::edm::EdmSimpleType::String,
            value: crate::literal::TypedValue::String("1".to_string()),
        });
        assert_eq!(ContextKind::classify(&path), ContextKind::SingleEntity);

        path.property_path.push("Age".to_string());
        assert_eq!(ContextKind::classify(&path), ContextKind::Property);

        path.is_value = true;
        assert_eq!(ContextKind::classify(&path), ContextKind::Value);

        assert_eq!(
            ContextKind::classify(&ResolvedPath::service_document()),
            ContextKind::ServiceDocument
        );
        assert_eq!(
            ContextKind::classify(&ResolvedPath::metadata()),
            ContextKind::Metadata
        );
    }
}
