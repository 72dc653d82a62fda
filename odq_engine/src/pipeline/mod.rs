//! End-to-end request resolution
//!
//! Runs the full sequence for one request: resource-path resolution, then
//! query-option validation, then `UriInfo` assembly. Path errors always win
//! over option errors because the path is processed first. All lookups share
//! one request-scoped `ResolutionCache` that is dropped when this returns.

pub mod cache;

pub use cache::{NavTarget, ResolutionCache};

use crate::edm::MetadataModel;
use crate::error::{UriResult, UriSyntaxError};
use crate::logging::{codes, RequestContext};
use crate::options::validate_options;
use crate::path::{resolve_path, ResolvedPath, TargetType};
use crate::{log_performance, log_success};
use crate::uri::{UriInfo, UriInfoBuilder};
use std::collections::HashMap;
use std::time::Instant;

/// Resolve one request into an immutable `UriInfo`
pub fn resolve(
    model: &MetadataModel,
    request_id: u64,
    raw_path: &str,
    raw_options: &HashMap<String, String>,
) -> UriResult<UriInfo> {
    crate::logging::with_request_context(RequestContext::new(request_id, raw_path), || {
        resolve_inner(model, raw_path, raw_options)
    })
}

fn resolve_inner(
    model: &MetadataModel,
    raw_path: &str,
    raw_options: &HashMap<String, String>,
) -> UriResult<UriInfo> {
    let started = Instant::now();
    let mut cache = ResolutionCache::new();

    let resolved = resolve_path(raw_path, model, &mut cache)?;
    log_success!(
        codes::success::PATH_RESOLUTION_COMPLETE,
        "Path resolved",
        "navigation_steps" => resolved.navigation_segments.len()
    );

    let options = validate_options(raw_options, &resolved, model, &mut cache)?;
    log_success!(
        codes::success::OPTION_VALIDATION_COMPLETE,
        "Query options validated",
        "option_count" => raw_options.len()
    );

    let info = assemble(model, resolved, options)?;

    log_performance!(
        codes::success::URI_RESOLUTION_COMPLETE,
        "Request resolved",
        duration = started.elapsed(),
        "cache_hits" => cache.hit_count(),
        "cache_lookups" => cache.lookup_count()
    );

    Ok(info)
}

/// Feed a resolved path through the staged builder
fn assemble(
    model: &MetadataModel,
    resolved: ResolvedPath,
    options: crate::options::QueryOptions,
) -> UriResult<UriInfo> {
    let container = model
        .default_container()
        .ok_or_else(|| UriSyntaxError::internal("metadata model has no entity container"))?;
    let target = UriInfoBuilder::for_container(&container.name);

    if resolved.is_service_document {
        return target.service_document().query_options(options).build(model);
    }
    if resolved.is_metadata {
        return target.metadata().query_options(options).build(model);
    }

    let segments = if let Some(function_name) = &resolved.function_import {
        target.function_import(
            function_name,
            resolved.target_entity_set.clone(),
            resolved.target_type.clone(),
        )
    } else {
        let set_name = resolved
            .start_entity_set
            .as_deref()
            .ok_or_else(|| UriSyntaxError::incomplete_uri_info("path without a start segment"))?;
        let set = container.entity_set(set_name).ok_or_else(|| {
            UriSyntaxError::internal(&format!("start entity set '{}' vanished", set_name))
        })?;
        target.start_entity_set(set_name, TargetType::Entity(set.entity_type.clone()))
    };

    segments
        .segments(
            resolved.key_predicates,
            resolved.navigation_segments,
            resolved.property_path,
            resolved.target_entity_set,
            resolved.target_type,
            resolved.is_count,
            resolved.is_value,
            resolved.is_links,
        )
        .query_options(options)
        .build(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::TypedValue;
    use crate::options::{FormatKind, InlineCount};
    use crate::test_fixtures::scenario_model;
    use crate::uri::ContextKind;
    use assert_matches::assert_matches;

    fn opts(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_service_document() {
        let model = scenario_model();
        let info = resolve(&model, 1, "/", &HashMap::new()).unwrap();
        assert_eq!(info.context_kind(), ContextKind::ServiceDocument);
    }

    #[test]
    fn test_single_entity_with_navigation() {
        let model = scenario_model();
        let info = resolve(&model, 2, "Employees('1')/Team", &HashMap::new()).unwrap();

        assert_eq!(info.context_kind(), ContextKind::SingleEntity);
        assert_eq!(info.start_entity_set(), Some("Employees"));
        assert_eq!(info.target_entity_set(), Some("Teams"));
        assert!(!info.is_count());
        assert_eq!(info.navigation_segments().len(), 1);
        // One-multiplicity step carries no key of its own
        assert!(info.navigation_segments()[0].key_predicates.is_empty());
        assert_eq!(info.key_predicates().len(), 1);
        assert_eq!(
            info.key_predicates()[0].value,
            TypedValue::String("1".to_string())
        );
    }

    #[test]
    fn test_collection_with_options() {
        let model = scenario_model();
        let raw = opts(&[
            ("$filter", "Age gt 30"),
            ("$orderby", "Name desc"),
            ("$top", "10"),
            ("$inlinecount", "allpages"),
            ("$format", "json"),
        ]);
        let info = resolve(&model, 3, "Employees", &raw).unwrap();

        assert_eq!(info.context_kind(), ContextKind::EntityCollection);
        let options = info.options();
        assert!(options.filter.is_some());
        assert_eq!(options.order_by.len(), 1);
        assert_eq!(options.top, Some(10));
        assert_eq!(options.inline_count, Some(InlineCount::AllPages));
        assert_eq!(options.format, Some(FormatKind::Json));
    }

    #[test]
    fn test_count_rejects_all_options() {
        let model = scenario_model();
        let raw = opts(&[("$top", "5")]);
        let result = resolve(&model, 4, "Employees/$count", &raw);
        assert_matches!(
            result,
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
    }

    #[test]
    fn test_path_error_wins_over_option_error() {
        let model = scenario_model();
        // Both the path and $top are invalid; the path error must surface
        let raw = opts(&[("$top", "abc")]);
        let result = resolve(&model, 5, "Employes", &raw);
        assert_matches!(result, Err(UriSyntaxError::ResourceNotFound { .. }));
    }

    #[test]
    fn test_function_import_with_parameters() {
        let model = scenario_model();
        let raw = opts(&[("query", "'dev'")]);
        let info = resolve(&model, 6, "SearchEmployees", &raw).unwrap();

        assert_eq!(info.context_kind(), ContextKind::FunctionCall);
        assert_eq!(info.function_import(), Some("SearchEmployees"));
        assert_eq!(
            info.options().function_parameters.get("query"),
            Some(&TypedValue::String("dev".to_string()))
        );
    }

    #[test]
    fn test_expand_and_select() {
        let model = scenario_model();
        let raw = opts(&[("$expand", "Team"), ("$select", "Name,Team/Name")]);
        let info = resolve(&model, 7, "Employees", &raw).unwrap();

        assert_eq!(info.options().expand.len(), 1);
        assert_eq!(info.options().expand[0][0].entity_set, "Teams");
        assert_eq!(info.options().select.len(), 2);
    }

    #[test]
    fn test_value_on_media_entity() {
        let model = scenario_model();
        let info = resolve(&model, 8, "Employees('1')/$value", &HashMap::new()).unwrap();
        assert_eq!(info.context_kind(), ContextKind::Value);
        assert!(info.is_value());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let model = scenario_model();
        let raw = opts(&[("$filter", "Age gt 30 and startswith(Name, 'A')")]);

        let first = resolve(&model, 9, "Employees('1')/Team/Employees", &raw).unwrap();
        let second = resolve(&model, 10, "Employees('1')/Team/Employees", &raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_options_pass_through() {
        let model = scenario_model();
        let raw = opts(&[("sap-client", "100")]);
        let info = resolve(&model, 11, "Employees", &raw).unwrap();
        assert_eq!(
            info.options().custom.get("sap-client"),
            Some(&"100".to_string())
        );
    }
}
