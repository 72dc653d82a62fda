//! Query-option validation against the resolved path target
//!
//! Options are checked in a fixed order so the first error reported is
//! deterministic for a given request. Structural markers restrict what may
//! appear at all: a $count path accepts no other options, a $value path no
//! system options, and collection-scoped options require a collection target.

use super::types::{ExpandSegment, FormatKind, InlineCount, QueryOptions, SelectItem};
use crate::config::constants::compile_time::options::{
    MAX_EXPAND_DEPTH, MAX_EXPAND_ITEMS, MAX_SELECT_ITEMS,
};
use crate::edm::{EntityType, MetadataModel};
use crate::error::{UriResult, UriSyntaxError};
use crate::expr::{parse_filter, parse_orderby};
use crate::literal::parse_literal;
use crate::log_error;
use crate::logging::codes;
use crate::path::ResolvedPath;
use crate::pipeline::cache::ResolutionCache;
use crate::utils::Span;
use std::collections::{HashMap, HashSet};

/// System options in validation order
const SYSTEM_ORDER: &[&str] = &[
    "$filter",
    "$orderby",
    "$top",
    "$skip",
    "$skiptoken",
    "$inlinecount",
    "$format",
    "$expand",
    "$select",
];

/// Options that only make sense against a collection of entities
const COLLECTION_ONLY: &[&str] = &[
    "$filter",
    "$orderby",
    "$top",
    "$skip",
    "$skiptoken",
    "$inlinecount",
];

/// Validate raw query options against the resolved path
pub fn validate_options(
    raw: &HashMap<String, String>,
    resolved: &ResolvedPath,
    model: &MetadataModel,
    cache: &mut ResolutionCache,
) -> UriResult<QueryOptions> {
    let mut options = QueryOptions::default();
    let mut consumed: HashSet<&str> = HashSet::new();

    check_marker_restrictions(raw, resolved)?;

    for &name in SYSTEM_ORDER {
        let Some(value) = raw.get(name) else {
            continue;
        };
        consumed.insert(name);

        if COLLECTION_ONLY.contains(&name) && !resolved.targets_collection() {
            return Err(UriSyntaxError::incompatible_option(
                name,
                "requires a collection target",
            ));
        }

        match name {
            "$filter" => {
                let scope = entity_scope(resolved, model, name)?;
                options.filter = Some(parse_filter(value, scope, model)?);
            }
            "$orderby" => {
                let scope = entity_scope(resolved, model, name)?;
                options.order_by = parse_orderby(value, scope, model)?;
            }
            "$top" => {
                options.top = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| UriSyntaxError::invalid_top(value))?,
                );
            }
            "$skip" => {
                options.skip = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| UriSyntaxError::invalid_skip(value))?,
                );
            }
            "$skiptoken" => {
                options.skip_token = Some(value.clone());
            }
            "$inlinecount" => {
                options.inline_count = Some(match value.as_str() {
                    "allpages" => InlineCount::AllPages,
                    "none" => InlineCount::None,
                    _ => return Err(UriSyntaxError::invalid_inline_count(value)),
                });
            }
            "$format" => {
                options.format = Some(FormatKind::from_value(value));
            }
            "$expand" => {
                let scope = entity_scope(resolved, model, name)?;
                if resolved.is_links {
                    return Err(UriSyntaxError::incompatible_option(
                        name,
                        "not allowed on a $links request",
                    ));
                }
                options.expand = resolve_expand(value, scope, model, cache)?;
            }
            "$select" => {
                let scope = entity_scope(resolved, model, name)?;
                if resolved.is_links {
                    return Err(UriSyntaxError::incompatible_option(
                        name,
                        "not allowed on a $links request",
                    ));
                }
                options.select = resolve_select(value, scope, model, cache)?;
            }
            _ => {}
        }
    }

    resolve_function_parameters(raw, resolved, model, &mut options, &mut consumed)?;

    for (name, value) in raw {
        if consumed.contains(name.as_str()) {
            continue;
        }
        if name.starts_with('$') {
            log_error!(
                codes::options::INVALID_SYSTEM_OPTION,
                "Unknown system query option",
                "option" => name
            );
            return Err(UriSyntaxError::incompatible_option(
                name,
                "unknown system query option",
            ));
        }
        options.custom.insert(name.clone(), value.clone());
    }

    Ok(options)
}

/// Reject options the path shape excludes outright
fn check_marker_restrictions(
    raw: &HashMap<String, String>,
    resolved: &ResolvedPath,
) -> UriResult<()> {
    let first_present = |filter: &dyn Fn(&str) -> bool| -> Option<String> {
        for &name in SYSTEM_ORDER {
            if raw.contains_key(name) && filter(name) {
                return Some(name.to_string());
            }
        }
        let mut others: Vec<&String> = raw
            .keys()
            .filter(|k| !SYSTEM_ORDER.contains(&k.as_str()) && filter(k))
            .collect();
        others.sort();
        others.first().map(|s| s.to_string())
    };

    if resolved.is_count {
        if let Some(name) = first_present(&|_| true) {
            return Err(UriSyntaxError::incompatible_option(
                &name,
                "not allowed together with a $count path",
            ));
        }
    }

    if resolved.is_value {
        if let Some(name) = first_present(&|n| n.starts_with('$')) {
            return Err(UriSyntaxError::incompatible_option(
                &name,
                "not allowed together with a $value path",
            ));
        }
    }

    if resolved.is_metadata || resolved.is_service_document {
        if let Some(name) = first_present(&|n| n.starts_with('$') && n != "$format") {
            return Err(UriSyntaxError::incompatible_option(
                &name,
                "not allowed on this request",
            ));
        }
    }

    Ok(())
}

/// Entity type the option-level expressions and paths resolve against
fn entity_scope<'a>(
    resolved: &ResolvedPath,
    model: &'a MetadataModel,
    option: &str,
) -> UriResult<&'a EntityType> {
    let entity_name = match &resolved.target_type {
        Some(crate::path::TargetType::Entity(name)) => name,
        _ => {
            return Err(UriSyntaxError::incompatible_option(
                option,
                "target is not an entity collection",
            ));
        }
    };
    model
        .entity_type(entity_name)
        .ok_or_else(|| UriSyntaxError::internal(&format!("entity type '{}' missing from model", entity_name)))
}

fn resolve_expand(
    value: &str,
    scope: &EntityType,
    model: &MetadataModel,
    cache: &mut ResolutionCache,
) -> UriResult<Vec<Vec<ExpandSegment>>> {
    let container = model
        .default_container()
        .ok_or_else(|| UriSyntaxError::internal("metadata model has no entity container"))?;

    let mut chains = Vec::new();
    let mut offset = 0;

    for item in value.split(',') {
        let item_start = offset;
        offset += item.len() + 1;

        let item = item.trim();
        if item.is_empty() {
            return Err(UriSyntaxError::incompatible_option(
                "$expand",
                "empty expand item",
            ));
        }

        let mut chain = Vec::new();
        let mut current = scope.name.clone();
        let mut segment_offset = item_start;

        for segment in item.split('/') {
            let span = Span::new(segment_offset, segment_offset + segment.len());
            segment_offset += segment.len() + 1;

            if chain.len() >= MAX_EXPAND_DEPTH {
                return Err(UriSyntaxError::incompatible_option(
                    "$expand",
                    "expand chain too deep",
                ));
            }

            let current_type = model.entity_type(&current).ok_or_else(|| {
                UriSyntaxError::internal(&format!("entity type '{}' missing from model", current))
            })?;
            let target = cache
                .navigation_target(model, container, current_type, segment)?
                .ok_or_else(|| UriSyntaxError::resource_not_found(segment, span))?;

            chain.push(ExpandSegment {
                navigation_property: segment.to_string(),
                entity_set: target.entity_set.clone(),
                target_type: target.entity_type.clone(),
            });
            current = target.entity_type;
        }

        chains.push(chain);
        if chains.len() > MAX_EXPAND_ITEMS {
            return Err(UriSyntaxError::incompatible_option(
                "$expand",
                "too many expand items",
            ));
        }
    }

    Ok(chains)
}

fn resolve_select(
    value: &str,
    scope: &EntityType,
    model: &MetadataModel,
    cache: &mut ResolutionCache,
) -> UriResult<Vec<SelectItem>> {
    let container = model
        .default_container()
        .ok_or_else(|| UriSyntaxError::internal("metadata model has no entity container"))?;

    let mut items = Vec::new();
    let mut offset = 0;

    for item in value.split(',') {
        let item_start = offset;
        offset += item.len() + 1;

        let item = item.trim();
        if item.is_empty() {
            return Err(UriSyntaxError::incompatible_option(
                "$select",
                "empty select item",
            ));
        }

        let raw_segments: Vec<&str> = item.split('/').collect();
        let star = raw_segments.last() == Some(&"*");
        let named = if star {
            &raw_segments[..raw_segments.len() - 1]
        } else {
            &raw_segments[..]
        };

        let mut segments = Vec::with_capacity(named.len());
        let mut current = scope.name.clone();
        let mut segment_offset = item_start;

        for (index, segment) in named.iter().enumerate() {
            let span = Span::new(segment_offset, segment_offset + segment.len());
            segment_offset += segment.len() + 1;

            if *segment == "*" {
                return Err(UriSyntaxError::incompatible_option(
                    "$select",
                    "wildcard must be the last path segment",
                ));
            }

            let current_type = model.entity_type(&current).ok_or_else(|| {
                UriSyntaxError::internal(&format!("entity type '{}' missing from model", current))
            })?;
            let is_last = index == named.len() - 1;

            if let Some(target) =
                cache.navigation_target(model, container, current_type, segment)?
            {
                segments.push(segment.to_string());
                current = target.entity_type;
                continue;
            }

            // Structural properties may only terminate a select path
            if current_type.property(segment).is_some() {
                if !is_last || star {
                    return Err(UriSyntaxError::incompatible_option(
                        "$select",
                        &format!("'{}' is not a navigation property", segment),
                    ));
                }
                segments.push(segment.to_string());
                continue;
            }

            return Err(UriSyntaxError::resource_not_found(segment, span));
        }

        items.push(SelectItem { segments, star });
        if items.len() > MAX_SELECT_ITEMS {
            return Err(UriSyntaxError::incompatible_option(
                "$select",
                "too many select items",
            ));
        }
    }

    Ok(items)
}

/// Bind declared function import parameters from the raw option map
fn resolve_function_parameters<'a>(
    raw: &'a HashMap<String, String>,
    resolved: &ResolvedPath,
    model: &MetadataModel,
    options: &mut QueryOptions,
    consumed: &mut HashSet<&'a str>,
) -> UriResult<()> {
    let Some(import_name) = &resolved.function_import else {
        return Ok(());
    };
    let container = model
        .default_container()
        .ok_or_else(|| UriSyntaxError::internal("metadata model has no entity container"))?;
    let import = container.function_import(import_name).ok_or_else(|| {
        UriSyntaxError::internal(&format!("function import '{}' missing from model", import_name))
    })?;

    for parameter in &import.parameters {
        match raw.get_key_value(parameter.name.as_str()) {
            Some((key, value)) => {
                consumed.insert(key.as_str());
                let parsed = parse_literal(
                    value,
                    parameter.parameter_type,
                    &parameter.facets,
                    Span::new(0, value.len()),
                )?;
                options
                    .function_parameters
                    .insert(parameter.name.clone(), parsed);
            }
            None => {
                if !parameter.facets.is_nullable() {
                    return Err(UriSyntaxError::incompatible_option(
                        &parameter.name,
                        "missing function import parameter",
                    ));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::TypedValue;
    use crate::path::resolve_path;
    use crate::test_fixtures::scenario_model;
    use assert_matches::assert_matches;

    fn validate(path: &str, pairs: &[(&str, &str)]) -> UriResult<QueryOptions> {
        let model = scenario_model();
        let mut cache = ResolutionCache::new();
        let resolved = resolve_path(path, &model, &mut cache)?;
        let raw: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        validate_options(&raw, &resolved, &model, &mut cache)
    }

    #[test]
    fn test_empty_options() {
        let options = validate("Employees", &[]).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn test_top_and_skip() {
        let options = validate("Employees", &[("$top", "10"), ("$skip", "20")]).unwrap();
        assert_eq!(options.top, Some(10));
        assert_eq!(options.skip, Some(20));
    }

    #[test]
    fn test_negative_top_rejected() {
        assert_matches!(
            validate("Employees", &[("$top", "-1")]),
            Err(UriSyntaxError::InvalidTop { value }) if value == "-1"
        );
        assert_matches!(
            validate("Employees", &[("$skip", "abc")]),
            Err(UriSyntaxError::InvalidSkip { .. })
        );
    }

    #[test]
    fn test_inline_count_values() {
        let options = validate("Employees", &[("$inlinecount", "allpages")]).unwrap();
        assert_eq!(options.inline_count, Some(InlineCount::AllPages));

        let options = validate("Employees", &[("$inlinecount", "none")]).unwrap();
        assert_eq!(options.inline_count, Some(InlineCount::None));

        assert_matches!(
            validate("Employees", &[("$inlinecount", "always")]),
            Err(UriSyntaxError::InvalidInlineCount { .. })
        );
    }

    #[test]
    fn test_count_path_rejects_other_options() {
        assert_matches!(
            validate("Employees/$count", &[("$top", "5")]),
            Err(UriSyntaxError::IncompatibleQueryOption { option, .. }) if option == "$top"
        );
        assert_matches!(
            validate("Employees/$count", &[("custom", "1")]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
        assert!(validate("Employees/$count", &[]).is_ok());
    }

    #[test]
    fn test_value_path_rejects_format() {
        assert_matches!(
            validate("Employees('1')/Age/$value", &[("$format", "json")]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
        // Custom options stay legal on a $value path
        let options = validate("Employees('1')/Age/$value", &[("debug", "1")]).unwrap();
        assert_eq!(options.custom.get("debug").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_collection_options_need_collection_target() {
        assert_matches!(
            validate("Employees('1')", &[("$top", "5")]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
        assert_matches!(
            validate("Employees('1')", &[("$filter", "Age gt 1")]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
    }

    #[test]
    fn test_filter_and_orderby() {
        let options = validate(
            "Employees",
            &[("$filter", "Age gt 30"), ("$orderby", "Name desc")],
        )
        .unwrap();
        assert!(options.filter.is_some());
        assert_eq!(options.order_by.len(), 1);
    }

    #[test]
    fn test_filter_must_be_boolean() {
        assert_matches!(
            validate("Employees", &[("$filter", "Age add 1")]),
            Err(UriSyntaxError::InvalidFilterExpression { .. })
        );
    }

    #[test]
    fn test_expand_resolution() {
        let options = validate("Employees", &[("$expand", "Team")]).unwrap();
        assert_eq!(options.expand.len(), 1);
        assert_eq!(options.expand[0][0].entity_set, "Teams");

        let chained = validate("Teams", &[("$expand", "Employees/Team")]).unwrap();
        assert_eq!(chained.expand[0].len(), 2);

        assert_matches!(
            validate("Employees", &[("$expand", "Nope")]),
            Err(UriSyntaxError::ResourceNotFound { .. })
        );
    }

    #[test]
    fn test_select_resolution() {
        let options =
            validate("Employees", &[("$select", "Name,Age,Team/Name,*")]).unwrap();
        assert_eq!(options.select.len(), 4);
        assert!(options.select[3].star);
        assert_eq!(options.select[2].segments, vec!["Team", "Name"]);

        assert_matches!(
            validate("Employees", &[("$select", "Nope")]),
            Err(UriSyntaxError::ResourceNotFound { .. })
        );
        assert_matches!(
            validate("Employees", &[("$select", "Age/Nope")]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
    }

    #[test]
    fn test_expand_on_links_rejected() {
        assert_matches!(
            validate("Teams('1')/$links/Employees", &[("$expand", "Team")]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
    }

    #[test]
    fn test_unknown_system_option() {
        assert_matches!(
            validate("Employees", &[("$unknown", "1")]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
    }

    #[test]
    fn test_custom_options_pass_through() {
        let options = validate("Employees", &[("sap-client", "100")]).unwrap();
        assert_eq!(
            options.custom.get("sap-client").map(String::as_str),
            Some("100")
        );
    }

    #[test]
    fn test_function_import_parameters() {
        let options = validate("SearchEmployees", &[("query", "'Walter'")]).unwrap();
        assert_eq!(
            options.function_parameters.get("query"),
            Some(&TypedValue::String("Walter".to_string()))
        );

        // query is declared non-nullable and therefore required
        assert_matches!(
            validate("SearchEmployees", &[]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );

        assert_matches!(
            validate("SearchEmployees", &[("query", "42")]),
            Err(UriSyntaxError::LiteralTypeMismatch { .. })
        );
    }

    #[test]
    fn test_format_on_metadata_allowed() {
        let options = validate("$metadata", &[("$format", "xml")]).unwrap();
        assert_eq!(options.format, Some(FormatKind::Xml));

        assert_matches!(
            validate("$metadata", &[("$top", "5")]),
            Err(UriSyntaxError::IncompatibleQueryOption { .. })
        );
    }
}
