//! Entity data model
//!
//! `simple_type` defines the closed primitive type set and its promotion
//! rules; `model` defines the schema structures requests resolve against.

pub mod model;
pub mod simple_type;

pub use model::{
    Association, AssociationEnd, ComplexType, EntityContainer, EntitySet, EntityType, Facets,
    FunctionImport, FunctionImportParameter, FunctionReturnType, MetadataModel, Multiplicity,
    NavigationProperty, Property, PropertyType,
};
pub use simple_type::EdmSimpleType;
