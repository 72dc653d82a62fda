//! Staged builder for `UriInfo`
//!
//! Construction order is enforced by the type system: each stage consumes
//! the previous one and returns the next, so a stage can be neither skipped
//! nor repeated. `build` performs the final cross-validation against the
//! metadata model before releasing the immutable result.

use super::info::{ContextKind, UriInfo};
use crate::edm::MetadataModel;
use crate::error::{UriResult, UriSyntaxError};
use crate::options::QueryOptions;
use crate::path::{KeyPredicate, NavigationSegment, ResolvedPath, TargetType};

/// Entry point: stage one fixes the entity container
pub struct UriInfoBuilder;

impl UriInfoBuilder {
    pub fn for_container(name: &str) -> TargetStage {
        TargetStage {
            entity_container: name.to_string(),
        }
    }
}

/// Stage two: what the first path segment addressed
pub struct TargetStage {
    entity_container: String,
}

impl TargetStage {
    pub fn service_document(self) -> OptionsStage {
        OptionsStage {
            entity_container: self.entity_container,
            kind_hint: Some(ContextKind::ServiceDocument),
            start_entity_set: None,
            function_import: None,
            target_entity_set: None,
            target_type: None,
            key_predicates: Vec::new(),
            navigation_segments: Vec::new(),
            property_path: Vec::new(),
            is_count: false,
            is_value: false,
            is_links: false,
        }
    }

    pub fn metadata(self) -> OptionsStage {
        let mut stage = self.service_document();
        stage.kind_hint = Some(ContextKind::Metadata);
        stage
    }

    pub fn start_entity_set(self, name: &str, target_type: TargetType) -> SegmentsStage {
        SegmentsStage {
            entity_container: self.entity_container,
            start_entity_set: Some(name.to_string()),
            function_import: None,
            target_entity_set: Some(name.to_string()),
            target_type: Some(target_type),
        }
    }

    pub fn function_import(
        self,
        name: &str,
        target_entity_set: Option<String>,
        target_type: Option<TargetType>,
    ) -> SegmentsStage {
        SegmentsStage {
            entity_container: self.entity_container,
            start_entity_set: None,
            function_import: Some(name.to_string()),
            target_entity_set,
            target_type,
        }
    }
}

/// Stage three: key predicates, navigation chain, property path, markers
pub struct SegmentsStage {
    entity_container: String,
    start_entity_set: Option<String>,
    function_import: Option<String>,
    target_entity_set: Option<String>,
    target_type: Option<TargetType>,
}

impl SegmentsStage {
    #[allow(clippy::too_many_arguments)]
    pub fn segments(
        self,
        key_predicates: Vec<KeyPredicate>,
        navigation_segments: Vec<NavigationSegment>,
        property_path: Vec<String>,
        final_target_entity_set: Option<String>,
        final_target_type: Option<TargetType>,
        is_count: bool,
        is_value: bool,
        is_links: bool,
    ) -> OptionsStage {
        OptionsStage {
            entity_container: self.entity_container,
            kind_hint: None,
            start_entity_set: self.start_entity_set,
            function_import: self.function_import,
            target_entity_set: final_target_entity_set.or(self.target_entity_set),
            target_type: final_target_type.or(self.target_type),
            key_predicates,
            navigation_segments,
            property_path,
            is_count,
            is_value,
            is_links,
        }
    }
}

/// Stage four: validated query options
pub struct OptionsStage {
    entity_container: String,
    kind_hint: Option<ContextKind>,
    start_entity_set: Option<String>,
    function_import: Option<String>,
    target_entity_set: Option<String>,
    target_type: Option<TargetType>,
    key_predicates: Vec<KeyPredicate>,
    navigation_segments: Vec<NavigationSegment>,
    property_path: Vec<String>,
    is_count: bool,
    is_value: bool,
    is_links: bool,
}

impl OptionsStage {
    pub fn query_options(self, options: QueryOptions) -> BuildStage {
        BuildStage {
            stage: self,
            options,
        }
    }
}

/// Final stage: cross-validation and release
pub struct BuildStage {
    stage: OptionsStage,
    options: QueryOptions,
}

impl BuildStage {
    pub fn build(self, model: &MetadataModel) -> UriResult<UriInfo> {
        let stage = self.stage;

        let markers = [stage.is_count, stage.is_value, stage.is_links]
            .iter()
            .filter(|m| **m)
            .count();
        if markers > 1 {
            return Err(UriSyntaxError::incomplete_uri_info(
                "at most one of $count, $value, $links per request",
            ));
        }

        let context_kind = stage.kind_hint.unwrap_or_else(|| {
            let shape = ResolvedPath {
                is_service_document: false,
                is_metadata: false,
                start_entity_set: stage.start_entity_set.clone(),
                target_entity_set: stage.target_entity_set.clone(),
                target_type: stage.target_type.clone(),
                key_predicates: stage.key_predicates.clone(),
                navigation_segments: stage.navigation_segments.clone(),
                property_path: stage.property_path.clone(),
                function_import: stage.function_import.clone(),
                is_count: stage.is_count,
                is_value: stage.is_value,
                is_links: stage.is_links,
            };
            ContextKind::classify(&shape)
        });

        validate_shape(&stage, context_kind)?;
        validate_option_reachability(&stage, &self.options, model)?;

        Ok(UriInfo {
            context_kind,
            entity_container: stage.entity_container,
            start_entity_set: stage.start_entity_set,
            target_entity_set: stage.target_entity_set,
            function_import: stage.function_import,
            target_type: stage.target_type,
            key_predicates: stage.key_predicates,
            navigation_segments: stage.navigation_segments,
            property_path: stage.property_path,
            is_count: stage.is_count,
            is_value: stage.is_value,
            is_links: stage.is_links,
            options: self.options,
        })
    }
}

/// Mandatory fields per request shape
fn validate_shape(stage: &OptionsStage, kind: ContextKind) -> UriResult<()> {
    match kind {
        ContextKind::ServiceDocument | ContextKind::Metadata => Ok(()),
        ContextKind::FunctionCall => {
            if stage.function_import.is_none() {
                return Err(UriSyntaxError::incomplete_uri_info(
                    "function call without a function import",
                ));
            }
            Ok(())
        }
        ContextKind::Property | ContextKind::Value => {
            if stage.start_entity_set.is_none() && stage.function_import.is_none() {
                return Err(UriSyntaxError::incomplete_uri_info(
                    "property access without a start entity set",
                ));
            }
            if stage.target_type.is_none() {
                return Err(UriSyntaxError::incomplete_uri_info(
                    "property access without a target type",
                ));
            }
            Ok(())
        }
        ContextKind::EntityCollection
        | ContextKind::SingleEntity
        | ContextKind::Count
        | ContextKind::Links => {
            if stage.start_entity_set.is_none() {
                return Err(UriSyntaxError::incomplete_uri_info(
                    "entity access without a start entity set",
                ));
            }
            if stage.target_entity_set.is_none() || stage.target_type.is_none() {
                return Err(UriSyntaxError::incomplete_uri_info(
                    "entity access without a resolved target",
                ));
            }
            Ok(())
        }
    }
}

/// $expand and $select targets must remain reachable from the target type
fn validate_option_reachability(
    stage: &OptionsStage,
    options: &QueryOptions,
    model: &MetadataModel,
) -> UriResult<()> {
    if options.expand.is_empty() && options.select.is_empty() {
        return Ok(());
    }

    let entity_name = match &stage.target_type {
        Some(TargetType::Entity(name)) => name,
        _ => {
            return Err(UriSyntaxError::incomplete_uri_info(
                "$expand/$select require an entity target",
            ));
        }
    };
    let mut scope = model.entity_type(entity_name).ok_or_else(|| {
        UriSyntaxError::incomplete_uri_info("target entity type missing from model")
    })?;

    for chain in &options.expand {
        let mut current = scope;
        for segment in chain {
            let nav = current
                .navigation_property(&segment.navigation_property)
                .ok_or_else(|| {
                    UriSyntaxError::incomplete_uri_info(&format!(
                        "$expand path '{}' unreachable from '{}'",
                        segment.navigation_property, current.name
                    ))
                })?;
            let end = model.navigation_target(nav).ok_or_else(|| {
                UriSyntaxError::incomplete_uri_info("unresolvable association in $expand")
            })?;
            current = model.entity_type(&end.entity_type).ok_or_else(|| {
                UriSyntaxError::incomplete_uri_info("entity type missing from model in $expand")
            })?;
        }
    }

    for item in &options.select {
        scope = model.entity_type(entity_name).ok_or_else(|| {
            UriSyntaxError::incomplete_uri_info("target entity type missing from model")
        })?;
        for (index, segment) in item.segments.iter().enumerate() {
            let is_last = index == item.segments.len() - 1;
            if let Some(nav) = scope.navigation_property(segment) {
                let end = model.navigation_target(nav).ok_or_else(|| {
                    UriSyntaxError::incomplete_uri_info("unresolvable association in $select")
                })?;
                scope = model.entity_type(&end.entity_type).ok_or_else(|| {
                    UriSyntaxError::incomplete_uri_info("entity type missing from model in $select")
                })?;
            } else if scope.property(segment).is_some() {
                if !is_last || item.star {
                    return Err(UriSyntaxError::incomplete_uri_info(&format!(
                        "$select path continues past property '{}'",
                        segment
                    )));
                }
            } else {
                return Err(UriSyntaxError::incomplete_uri_info(&format!(
                    "$select path '{}' unreachable from '{}'",
                    segment, scope.name
                )));
            }
        }
    }

    Ok(())
}
