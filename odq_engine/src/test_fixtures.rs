//! Shared metadata model for tests across modules

use crate::edm::{
    Association, AssociationEnd, ComplexType, EdmSimpleType, EntityContainer, EntitySet,
    EntityType, Facets, FunctionImport, FunctionImportParameter, FunctionReturnType,
    MetadataModel, Multiplicity, NavigationProperty, Property,
};

/// Small HR-flavored schema exercising keys, navigation in both directions,
/// nested complex types, media entities, and function imports.
pub fn scenario_model() -> MetadataModel {
    let mut model = MetadataModel::new();

    model.add_entity_type(EntityType {
        name: "Employee".to_string(),
        key_properties: vec!["Id".to_string()],
        properties: vec![
            Property::simple_with_facets("Id", EdmSimpleType::String, Facets::not_nullable()),
            Property::simple("Name", EdmSimpleType::String),
            Property::simple("Age", EdmSimpleType::Int32),
            Property::simple("EntryDate", EdmSimpleType::DateTime),
            Property::complex("Location", "Location"),
        ],
        navigation_properties: vec![NavigationProperty {
            name: "Team".to_string(),
            relationship: "EmployeeTeam".to_string(),
            from_role: "Employees".to_string(),
            to_role: "Team".to_string(),
        }],
        has_media_stream: true,
    });

    model.add_entity_type(EntityType {
        name: "Team".to_string(),
        key_properties: vec!["Id".to_string()],
        properties: vec![
            Property::simple_with_facets("Id", EdmSimpleType::String, Facets::not_nullable()),
            Property::simple("Name", EdmSimpleType::String),
        ],
        navigation_properties: vec![NavigationProperty {
            name: "Employees".to_string(),
            relationship: "EmployeeTeam".to_string(),
            from_role: "Team".to_string(),
            to_role: "Employees".to_string(),
        }],
        has_media_stream: false,
    });

    model.add_entity_type(EntityType {
        name: "Assignment".to_string(),
        key_properties: vec!["EmployeeId".to_string(), "ProjectId".to_string()],
        properties: vec![
            Property::simple_with_facets(
                "EmployeeId",
                EdmSimpleType::String,
                Facets::not_nullable(),
            ),
            Property::simple_with_facets(
                "ProjectId",
                EdmSimpleType::String,
                Facets::not_nullable(),
            ),
        ],
        navigation_properties: vec![],
        has_media_stream: false,
    });

    model.add_complex_type(ComplexType {
        name: "Location".to_string(),
        properties: vec![
            Property::complex("City", "City"),
            Property::simple("Country", EdmSimpleType::String),
        ],
    });

    model.add_complex_type(ComplexType {
        name: "City".to_string(),
        properties: vec![
            Property::simple("PostalCode", EdmSimpleType::String),
            Property::simple("CityName", EdmSimpleType::String),
        ],
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
            EntitySet {
                name: "Assignments".to_string(),
                entity_type: "Assignment".to_string(),
            },
        ],
        function_imports: vec![
            FunctionImport {
                name: "SearchEmployees".to_string(),
                return_type: FunctionReturnType::Entity {
                    entity_type: "Employee".to_string(),
                    many: true,
                },
                entity_set: Some("Employees".to_string()),
                parameters: vec![FunctionImportParameter {
                    name: "query".to_string(),
                    parameter_type: EdmSimpleType::String,
                    facets: Facets::not_nullable(),
                }],
            },
            FunctionImport {
                name: "EmployeeCount".to_string(),
                return_type: FunctionReturnType::Simple(EdmSimpleType::Int32),
                entity_set: None,
                parameters: vec![],
            },
        ],
    });

    model
}
