//! Resolved resource-path structures

use crate::edm::{EdmSimpleType, Multiplicity};
use crate::literal::TypedValue;
use serde::{Deserialize, Serialize};

/// One key property bound to a parsed literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPredicate {
    pub property: String,
    pub edm_type: EdmSimpleType,
    pub value: TypedValue,
}

/// One navigation step in the resolved path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSegment {
    pub navigation_property: String,
    /// Entity set the far end resolves into
    pub entity_set: String,
    pub target_type: String,
    pub multiplicity: Multiplicity,
    pub key_predicates: Vec<KeyPredicate>,
}

impl NavigationSegment {
    /// Whether this step still addresses a collection
    pub fn targets_collection(&self) -> bool {
        self.multiplicity.is_collection() && self.key_predicates.is_empty()
    }
}

/// Type of the resource a path finally addresses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetType {
    Entity(String),
    Complex(String),
    Simple(EdmSimpleType),
}

impl TargetType {
    pub fn name(&self) -> String {
        match self {
            Self::Entity(name) | Self::Complex(name) => name.clone(),
            Self::Simple(ty) => ty.name().to_string(),
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity(_))
    }
}

/// Everything the resolver learned from the resource path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPath {
    /// Empty path addressing the service document
    pub is_service_document: bool,
    /// $metadata request
    pub is_metadata: bool,
    pub start_entity_set: Option<String>,
    pub target_entity_set: Option<String>,
    pub target_type: Option<TargetType>,
    pub key_predicates: Vec<KeyPredicate>,
    pub navigation_segments: Vec<NavigationSegment>,
    /// Trailing structural property segments
    pub property_path: Vec<String>,
    pub function_import: Option<String>,
    pub is_count: bool,
    pub is_value: bool,
    pub is_links: bool,
}

impl ResolvedPath {
    pub fn service_document() -> Self {
        Self {
            is_service_document: true,
            ..Self::empty()
        }
    }

    pub fn metadata() -> Self {
        Self {
            is_metadata: true,
            ..Self::empty()
        }
    }

    pub fn empty() -> Self {
        Self {
            is_service_document: false,
            is_metadata: false,
            start_entity_set: None,
            target_entity_set: None,
            target_type: None,
            key_predicates: Vec::new(),
            navigation_segments: Vec::new(),
            property_path: Vec::new(),
            function_import: None,
            is_count: false,
            is_value: false,
            is_links: false,
        }
    }

    /// Whether the addressed resource is a collection of entities
    pub fn targets_collection(&self) -> bool {
        if self.is_count {
            // $count collapses the collection to a scalar
            return false;
        }
        if !self.property_path.is_empty() || self.is_value {
            return false;
        }
        match self.navigation_segments.last() {
            Some(segment) => segment.targets_collection(),
            None => {
                self.start_entity_set.is_some()
                    && self.key_predicates.is_empty()
                    && self.function_import.is_none()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_collection_flags() {
        let collection = NavigationSegment {
            navigation_property: "Employees".to_string(),
            entity_set: "Employees".to_string(),
            target_type: "Employee".to_string(),
            multiplicity: Multiplicity::Many,
            key_predicates: vec![],
        };
        assert!(collection.targets_collection());

        let qualified = NavigationSegment {
            key_predicates: vec![KeyPredicate {
                property: "Id".to_string(),
                edm_type: EdmSimpleType::String,
                value: TypedValue::String("1".to_string()),
            }],
            ..collection.clone()
        };
        assert!(!qualified.targets_collection());
    }

    #[test]
    fn test_resolved_path_collection_detection() {
        let mut path = ResolvedPath::empty();
        path.start_entity_set = Some("Employees".to_string());
        assert!(path.targets_collection());

        path.key_predicates.push(KeyPredicate {
            property: "Id".to_string(),
            edm_type: EdmSimpleType::String,
            value: TypedValue::String("1".to_string()),
        });
        assert!(!path.targets_collection());
    }

    #[test]
    fn test_count_is_not_a_collection() {
        let mut path = ResolvedPath::empty();
        path.start_entity_set = Some("Employees".to_string());
        path.is_count = true;
        assert!(!path.targets_collection());
    }
}
