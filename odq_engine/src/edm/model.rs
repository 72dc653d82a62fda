//! Metadata model structures
//!
//! The declared schema requests resolve against. Built once by the host
//! before any request is served and shared read-only across concurrent
//! resolutions; every type here is Send + Sync by construction.

use super::simple_type::EdmSimpleType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value constraints attached to a property declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub nullable: Option<bool>,
    pub max_length: Option<usize>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl Facets {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn not_nullable() -> Self {
        Self {
            nullable: Some(false),
            ..Self::default()
        }
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::default()
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(true)
    }
}

/// Declared type of a structural property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Simple(EdmSimpleType),
    Complex(String),
}

impl PropertyType {
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }

    pub fn simple(&self) -> Option<EdmSimpleType> {
        match self {
            Self::Simple(ty) => Some(*ty),
            Self::Complex(_) => None,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Simple(ty) => ty.name().to_string(),
            Self::Complex(name) => name.clone(),
        }
    }
}

/// Structural property of an entity or complex type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub property_type: PropertyType,
    pub facets: Facets,
}

impl Property {
    pub fn simple(name: &str, ty: EdmSimpleType) -> Self {
        Self {
            name: name.to_string(),
            property_type: PropertyType::Simple(ty),
            facets: Facets::none(),
        }
    }

    pub fn simple_with_facets(name: &str, ty: EdmSimpleType, facets: Facets) -> Self {
        Self {
            name: name.to_string(),
            property_type: PropertyType::Simple(ty),
            facets,
        }
    }

    pub fn complex(name: &str, complex_type: &str) -> Self {
        Self {
            name: name.to_string(),
            property_type: PropertyType::Complex(complex_type.to_string()),
            facets: Facets::none(),
        }
    }
}

/// Complex (structured, keyless) type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexType {
    pub name: String,
    pub properties: Vec<Property>,
}

impl ComplexType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Cardinality of an association end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Multiplicity {
    One,
    ZeroOrOne,
    Many,
}

impl Multiplicity {
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Many)
    }
}

/// One end of an association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationEnd {
    pub role: String,
    pub entity_type: String,
    pub multiplicity: Multiplicity,
}

/// Relationship between two entity types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub name: String,
    pub end1: AssociationEnd,
    pub end2: AssociationEnd,
}

impl Association {
    pub fn end_by_role(&self, role: &str) -> Option<&AssociationEnd> {
        if self.end1.role == role {
            Some(&self.end1)
        } else if self.end2.role == role {
            Some(&self.end2)
        } else {
            None
        }
    }
}

/// Navigation property declared on an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationProperty {
    pub name: String,
    pub relationship: String,
    pub from_role: String,
    pub to_role: String,
}

/// Entity type with key properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    pub key_properties: Vec<String>,
    pub properties: Vec<Property>,
    pub navigation_properties: Vec<NavigationProperty>,
    /// Media-resource entities allow $value directly after a key-qualified segment
    pub has_media_stream: bool,
}

impl EntityType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn navigation_property(&self, name: &str) -> Option<&NavigationProperty> {
        self.navigation_properties.iter().find(|n| n.name == name)
    }

    pub fn is_key_property(&self, name: &str) -> bool {
        self.key_properties.iter().any(|k| k == name)
    }
}

/// Named collection of entities of one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub name: String,
    pub entity_type: String,
}

/// Parameter of a function import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionImportParameter {
    pub name: String,
    pub parameter_type: EdmSimpleType,
    pub facets: Facets,
}

/// Return shape of a function import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionReturnType {
    None,
    Simple(EdmSimpleType),
    Entity { entity_type: String, many: bool },
}

/// Service operation addressable as the first path segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionImport {
    pub name: String,
    pub return_type: FunctionReturnType,
    /// Entity set the result belongs to, for entity-returning imports
    pub entity_set: Option<String>,
    pub parameters: Vec<FunctionImportParameter>,
}

impl FunctionImport {
    pub fn parameter(&self, name: &str) -> Option<&FunctionImportParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Scope holding entity sets and function imports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityContainer {
    pub name: String,
    pub is_default: bool,
    pub entity_sets: Vec<EntitySet>,
    pub function_imports: Vec<FunctionImport>,
}

impl EntityContainer {
    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    pub fn function_import(&self, name: &str) -> Option<&FunctionImport> {
        self.function_imports.iter().find(|f| f.name == name)
    }

    /// First entity set holding entities of the given type
    pub fn entity_set_for_type(&self, entity_type: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.entity_type == entity_type)
    }
}

/// The complete declared schema, shared read-only across resolutions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataModel {
    pub containers: Vec<EntityContainer>,
    pub entity_types: HashMap<String, EntityType>,
    pub complex_types: HashMap<String, ComplexType>,
    pub associations: HashMap<String, Association>,
}

impl MetadataModel {
    pub fn new() -> Self {
        Self {
            containers: Vec::new(),
            entity_types: HashMap::new(),
            complex_types: HashMap::new(),
            associations: HashMap::new(),
        }
    }

    pub fn add_container(&mut self, container: EntityContainer) {
        self.containers.push(container);
    }

    pub fn add_entity_type(&mut self, entity_type: EntityType) {
        self.entity_types
            .insert(entity_type.name.clone(), entity_type);
    }

    pub fn add_complex_type(&mut self, complex_type: ComplexType) {
        self.complex_types
            .insert(complex_type.name.clone(), complex_type);
    }

    pub fn add_association(&mut self, association: Association) {
        self.associations
            .insert(association.name.clone(), association);
    }

    /// The container first-segment names resolve in
    pub fn default_container(&self) -> Option<&EntityContainer> {
        self.containers
            .iter()
            .find(|c| c.is_default)
            .or_else(|| self.containers.first())
    }

    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types.get(name)
    }

    pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.complex_types.get(name)
    }

    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    /// Resolve the far end of a navigation property
    pub fn navigation_target(&self, nav: &NavigationProperty) -> Option<&AssociationEnd> {
        self.association(&nav.relationship)
            .and_then(|a| a.end_by_role(&nav.to_role))
    }
}

impl Default for MetadataModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> MetadataModel {
        let mut model = MetadataModel::new();

        model.add_entity_type(EntityType {
            name: "Employee".to_string(),
            key_properties: vec!["Id".to_string()],
            properties: vec![
                Property::simple_with_facets("Id", EdmSimpleType::String, Facets::not_nullable()),
                Property::simple("Age", EdmSimpleType::Int32),
            ],
            navigation_properties: vec![NavigationProperty {
                name: "Team".to_string(),
                relationship: "EmployeeTeam".to_string(),
                from_role: "Employees".to_string(),
                to_role: "Team".to_string(),
            }],
            has_media_stream: false,
        });

        model.add_entity_type(EntityType {
            name: "Team".to_string(),
            key_properties: vec!["Id".to_string()],
            properties: vec![Property::simple("Id", EdmSimpleType::String)],
            navigation_properties: vec![],
            has_media_stream: false,
        });

        model.add_association(Association {
            name: "EmployeeTeam".to_string(),
            end1: AssociationEnd {
                role: "Employees".to_string(),
                entity_type: "Employee".to_string(),
                multiplicity: Multiplicity::Many,
            },
            end2: AssociationEnd {
                role: "Team".to_string(),
                entity_type: "Team".to_string(),
                multiplicity: Multiplicity::One,
            },
        });

        model.add_container(EntityContainer {
            name: "Container".to_string(),
            is_default: true,
            entity_sets: vec![
                EntitySet {
                    name: "Employees".to_string(),
                    entity_type: "Employee".to_string(),
                },
                EntitySet {
                    name: "Teams".to_string(),
                    entity_type: "Team".to_string(),
                },
            ],
            function_imports: vec![],
        });

        model
    }

    #[test]
    fn test_container_lookups() {
        let model = sample_model();
        let container = model.default_container().unwrap();

        assert!(container.entity_set("Employees").is_some());
        assert!(container.entity_set("Nope").is_none());
        assert_eq!(
            container.entity_set_for_type("Team").unwrap().name,
            "Teams"
        );
    }

    #[test]
    fn test_navigation_target_resolution() {
        let model = sample_model();
        let employee = model.entity_type("Employee").unwrap();
        let nav = employee.navigation_property("Team").unwrap();

        let target = model.navigation_target(nav).unwrap();
        assert_eq!(target.entity_type, "Team");
        assert_eq!(target.multiplicity, Multiplicity::One);
        assert!(!target.multiplicity.is_collection());
    }

    #[test]
    fn test_key_property_checks() {
        let model = sample_model();
        let employee = model.entity_type("Employee").unwrap();

        assert!(employee.is_key_property("Id"));
        assert!(!employee.is_key_property("Age"));
        assert!(employee.property("Age").is_some());
        assert!(employee.property("Salary").is_none());
    }

    #[test]
    fn test_facets() {
        assert!(Facets::none().is_nullable());
        assert!(!Facets::not_nullable().is_nullable());
        assert_eq!(Facets::with_max_length(10).max_length, Some(10));
    }
}
