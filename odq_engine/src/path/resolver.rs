//! Resource-path resolution against the metadata model
//!
//! Walks percent-decoded path segments left to right, tracking what kind of
//! resource the path addresses so far. Key predicates are validated for
//! completeness against the entity's key set, navigation steps follow
//! association multiplicity, and structural markers ($count, $value, $links)
//! are only accepted where the current position allows them.

use super::segment::{KeyPredicate, NavigationSegment, ResolvedPath, TargetType};
use crate::config::constants::compile_time::path::{MAX_KEY_PREDICATES, MAX_PATH_SEGMENTS};
use crate::edm::{EntityContainer, EntityType, MetadataModel, PropertyType};
use crate::error::{UriResult, UriSyntaxError};
use crate::literal::parse_literal;
use crate::log_error;
use crate::logging::codes;
use crate::pipeline::cache::ResolutionCache;
use crate::utils::Span;

/// Resolve a raw resource path into its typed target
pub fn resolve_path(
    raw_path: &str,
    model: &MetadataModel,
    cache: &mut ResolutionCache,
) -> UriResult<ResolvedPath> {
    let container = model
        .default_container()
        .ok_or_else(|| UriSyntaxError::internal("metadata model has no entity container"))?;

    let segments = split_segments(raw_path)?;
    if segments.is_empty() {
        return Ok(ResolvedPath::service_document());
    }
    if segments.len() > MAX_PATH_SEGMENTS {
        log_error!(
            codes::path::TOO_MANY_SEGMENTS,
            "Resource path segment limit exceeded",
            "segments" => segments.len()
        );
        return Err(UriSyntaxError::invalid_resource_path(
            "too many path segments",
            segments[MAX_PATH_SEGMENTS].span,
        ));
    }

    let mut resolver = PathResolver {
        model,
        container,
        cache,
    };
    resolver.resolve(&segments)
}

/// What the already-consumed prefix of the path addresses
#[derive(Debug, Clone)]
enum Position {
    Collection { entity_type: String },
    Entity { entity_type: String },
    ComplexProperty { complex_type: String },
    SimpleProperty,
    AwaitingLinksTarget { entity_type: String },
    Terminal,
}

struct RawSegment<'a> {
    name: &'a str,
    key_text: Option<&'a str>,
    span: Span,
}

struct PathResolver<'a> {
    model: &'a MetadataModel,
    container: &'a EntityContainer,
    cache: &'a mut ResolutionCache,
}

impl<'a> PathResolver<'a> {
    fn resolve(&mut self, segments: &[RawSegment<'_>]) -> UriResult<ResolvedPath> {
        let first = &segments[0];

        if first.name == "$metadata" {
            if segments.len() > 1 || first.key_text.is_some() {
                return Err(UriSyntaxError::invalid_resource_path(
                    "$metadata must be the only segment",
                    first.span,
                ));
            }
            return Ok(ResolvedPath::metadata());
        }

        let (mut resolved, mut position) = self.resolve_first(first)?;

        for segment in &segments[1..] {
            position = self.resolve_next(segment, position, &mut resolved)?;
        }

        Ok(resolved)
    }

    fn resolve_first(&mut self, segment: &RawSegment<'_>) -> UriResult<(ResolvedPath, Position)> {
        if let Some(entity_set) = self.container.entity_set(segment.name) {
            let entity_type = self.entity_type(&entity_set.entity_type)?;

            let mut resolved = ResolvedPath::empty();
            resolved.start_entity_set = Some(entity_set.name.clone());
            resolved.target_entity_set = Some(entity_set.name.clone());
            resolved.target_type = Some(TargetType::Entity(entity_type.name.clone()));

            let position = match segment.key_text {
                Some(key_text) => {
                    resolved.key_predicates =
                        self.parse_key_predicate(key_text, segment.span, entity_type)?;
                    Position::Entity {
                        entity_type: entity_type.name.clone(),
                    }
                }
                None => Position::Collection {
                    entity_type: entity_type.name.clone(),
                },
            };
            return Ok((resolved, position));
        }

        if let Some(import) = self.container.function_import(segment.name) {
            if segment.key_text.is_some() {
                return Err(UriSyntaxError::invalid_resource_path(
                    "function import parameters are passed as query options",
                    segment.span,
                ));
            }

            let mut resolved = ResolvedPath::empty();
            resolved.function_import = Some(import.name.clone());

            match &import.return_type {
                crate::edm::FunctionReturnType::Entity { entity_type, .. } => {
                    let entity_set = match &import.entity_set {
                        Some(name) => self.container.entity_set(name),
                        None => self.container.entity_set_for_type(entity_type),
                    };
                    resolved.target_entity_set = entity_set.map(|s| s.name.clone());
                    resolved.target_type = Some(TargetType::Entity(entity_type.clone()));
                }
                crate::edm::FunctionReturnType::Simple(ty) => {
                    resolved.target_type = Some(TargetType::Simple(*ty));
                }
                crate::edm::FunctionReturnType::None => {}
            }
            return Ok((resolved, Position::Terminal));
        }

        Err(UriSyntaxError::resource_not_found(segment.name, segment.span))
    }

    fn resolve_next(
        &mut self,
        segment: &RawSegment<'_>,
        position: Position,
        resolved: &mut ResolvedPath,
    ) -> UriResult<Position> {
        match position {
            Position::Terminal => Err(UriSyntaxError::invalid_resource_path(
                &format!("no segments allowed after '{}'", segment.name),
                segment.span,
            )),

            Position::Collection { .. } => {
                if segment.name == "$count" && segment.key_text.is_none() {
                    // Markers are mutually exclusive within one path
                    if resolved.is_links {
                        return Err(UriSyntaxError::invalid_resource_path(
                            "$count not allowed on a $links path",
                            segment.span,
                        ));
                    }
                    resolved.is_count = true;
                    return Ok(Position::Terminal);
                }
                Err(UriSyntaxError::invalid_resource_path(
                    &format!(
                        "collection must be key-qualified before '{}'",
                        segment.name
                    ),
                    segment.span,
                ))
            }

            Position::Entity { entity_type } => {
                self.resolve_from_entity(segment, &entity_type, resolved)
            }

            Position::ComplexProperty { complex_type } => {
                self.resolve_from_complex(segment, &complex_type, resolved)
            }

            Position::SimpleProperty => {
                if segment.name == "$value" && segment.key_text.is_none() {
                    resolved.is_value = true;
                    return Ok(Position::Terminal);
                }
                Err(UriSyntaxError::invalid_resource_path(
                    &format!("only $value may follow a simple property, found '{}'", segment.name),
                    segment.span,
                ))
            }

            Position::AwaitingLinksTarget { entity_type } => {
                let scope = self.entity_type(&entity_type)?;
                let Some(target) = self.cache.navigation_target(
                    self.model,
                    self.container,
                    scope,
                    segment.name,
                )?
                else {
                    return Err(UriSyntaxError::resource_not_found(segment.name, segment.span));
                };

                let nav_segment = self.build_navigation_segment(segment, &target)?;
                let still_collection = nav_segment.targets_collection();
                resolved.navigation_segments.push(nav_segment);
                resolved.target_entity_set = Some(target.entity_set.clone());
                resolved.target_type = Some(TargetType::Entity(target.entity_type.clone()));

                if still_collection {
                    Ok(Position::Collection {
                        entity_type: target.entity_type,
                    })
                } else {
                    Ok(Position::Terminal)
                }
            }
        }
    }

    fn resolve_from_entity(
        &mut self,
        segment: &RawSegment<'_>,
        entity_type: &str,
        resolved: &mut ResolvedPath,
    ) -> UriResult<Position> {
        let scope = self.entity_type(entity_type)?;

        match segment.name {
            "$links" => {
                return if segment.key_text.is_none() {
                    resolved.is_links = true;
                    Ok(Position::AwaitingLinksTarget {
                        entity_type: entity_type.to_string(),
                    })
                } else {
                    Err(UriSyntaxError::invalid_resource_path(
                        "$links takes no key predicate",
                        segment.span,
                    ))
                };
            }
            "$value" => {
                return if scope.has_media_stream {
                    resolved.is_value = true;
                    Ok(Position::Terminal)
                } else {
                    Err(UriSyntaxError::invalid_resource_path(
                        &format!("'{}' is not a media resource", entity_type),
                        segment.span,
                    ))
                };
            }
            "$count" => {
                return Err(UriSyntaxError::invalid_resource_path(
                    "$count applies to collections only",
                    segment.span,
                ));
            }
            _ => {}
        }

        if let Some(target) =
            self.cache
                .navigation_target(self.model, self.container, scope, segment.name)?
        {
            let nav_segment = self.build_navigation_segment(segment, &target)?;
            let still_collection = nav_segment.targets_collection();
            resolved.navigation_segments.push(nav_segment);
            resolved.target_entity_set = Some(target.entity_set.clone());
            resolved.target_type = Some(TargetType::Entity(target.entity_type.clone()));

            return Ok(if still_collection {
                Position::Collection {
                    entity_type: target.entity_type,
                }
            } else {
                Position::Entity {
                    entity_type: target.entity_type,
                }
            });
        }

        if let Some(property) = scope.property(segment.name) {
            if segment.key_text.is_some() {
                return Err(UriSyntaxError::invalid_resource_path(
                    "properties take no key predicate",
                    segment.span,
                ));
            }
            resolved.property_path.push(property.name.clone());
            return Ok(match &property.property_type {
                PropertyType::Simple(ty) => {
                    resolved.target_type = Some(TargetType::Simple(*ty));
                    Position::SimpleProperty
                }
                PropertyType::Complex(name) => {
                    resolved.target_type = Some(TargetType::Complex(name.clone()));
                    Position::ComplexProperty {
                        complex_type: name.clone(),
                    }
                }
            });
        }

        Err(UriSyntaxError::resource_not_found(segment.name, segment.span))
    }

    fn resolve_from_complex(
        &mut self,
        segment: &RawSegment<'_>,
        complex_type: &str,
        resolved: &mut ResolvedPath,
    ) -> UriResult<Position> {
        let scope = self.model.complex_type(complex_type).ok_or_else(|| {
            UriSyntaxError::internal(&format!("complex type '{}' missing from model", complex_type))
        })?;

        if segment.name.starts_with('$') {
            return Err(UriSyntaxError::invalid_resource_path(
                &format!("'{}' not allowed after a complex property", segment.name),
                segment.span,
            ));
        }
        let Some(property) = scope.property(segment.name) else {
            return Err(UriSyntaxError::resource_not_found(segment.name, segment.span));
        };
        if segment.key_text.is_some() {
            return Err(UriSyntaxError::invalid_resource_path(
                "properties take no key predicate",
                segment.span,
            ));
        }

        resolved.property_path.push(property.name.clone());
        Ok(match &property.property_type {
            PropertyType::Simple(ty) => {
                resolved.target_type = Some(TargetType::Simple(*ty));
                Position::SimpleProperty
            }
            PropertyType::Complex(name) => {
                resolved.target_type = Some(TargetType::Complex(name.clone()));
                Position::ComplexProperty {
                    complex_type: name.clone(),
                }
            }
        })
    }

    fn build_navigation_segment(
        &mut self,
        segment: &RawSegment<'_>,
        target: &crate::pipeline::cache::NavTarget,
    ) -> UriResult<NavigationSegment> {
        let key_predicates = match segment.key_text {
            Some(key_text) => {
                if !target.multiplicity.is_collection() {
                    return Err(UriSyntaxError::invalid_key_predicate(
                        &format!(
                            "'{}' targets a single entity, key predicate not allowed",
                            segment.name
                        ),
                        segment.span,
                    ));
                }
                let target_type = self.entity_type(&target.entity_type)?;
                self.parse_key_predicate(key_text, segment.span, target_type)?
            }
            None => Vec::new(),
        };

        Ok(NavigationSegment {
            navigation_property: segment.name.to_string(),
            entity_set: target.entity_set.clone(),
            target_type: target.entity_type.clone(),
            multiplicity: target.multiplicity,
            key_predicates,
        })
    }

    /// Parse and validate a parenthesized key predicate for completeness
    fn parse_key_predicate(
        &self,
        text: &str,
        span: Span,
        entity_type: &EntityType,
    ) -> UriResult<Vec<KeyPredicate>> {
        let parts = split_key_parts(text);
        if parts.is_empty() || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(UriSyntaxError::invalid_key_predicate(
                "empty key predicate",
                span,
            ));
        }
        if parts.len() > MAX_KEY_PREDICATES {
            return Err(UriSyntaxError::invalid_key_predicate(
                "too many key properties",
                span,
            ));
        }

        let mut named: Vec<(String, &str)> = Vec::new();
        for part in &parts {
            let part = part.trim();
            let is_named = !part.starts_with('\'')
                && part.split_once('=').is_some();

            if let (true, Some((name, value))) = (is_named, part.split_once('=')) {
                named.push((name.trim().to_string(), value.trim()));
            } else {
                // Positional form is only unambiguous for a single-part key
                if parts.len() != 1 || entity_type.key_properties.len() != 1 {
                    return Err(UriSyntaxError::invalid_key_predicate(
                        "multi-part keys must use name=value form",
                        span,
                    ));
                }
                named.push((entity_type.key_properties[0].clone(), part));
            }
        }

        // Every key property exactly once, nothing else
        for (name, _) in &named {
            if !entity_type.is_key_property(name) {
                return Err(UriSyntaxError::invalid_key_predicate(
                    &format!("'{}' is not a key property of '{}'", name, entity_type.name),
                    span,
                ));
            }
            if named.iter().filter(|(n, _)| n == name).count() > 1 {
                return Err(UriSyntaxError::invalid_key_predicate(
                    &format!("key property '{}' supplied more than once", name),
                    span,
                ));
            }
        }
        for key_name in &entity_type.key_properties {
            if !named.iter().any(|(n, _)| n == key_name) {
                return Err(UriSyntaxError::invalid_key_predicate(
                    &format!("missing key property '{}'", key_name),
                    span,
                ));
            }
        }

        // Normalize to declaration order
        let mut predicates = Vec::with_capacity(named.len());
        for key_name in &entity_type.key_properties {
            let (_, raw) = named
                .iter()
                .find(|(n, _)| n == key_name)
                .ok_or_else(|| UriSyntaxError::internal("key lookup after completeness check"))?;
            let property = entity_type.property(key_name).ok_or_else(|| {
                UriSyntaxError::internal(&format!(
                    "key property '{}' not declared on '{}'",
                    key_name, entity_type.name
                ))
            })?;
            let edm_type = property.property_type.simple().ok_or_else(|| {
                UriSyntaxError::internal(&format!("key property '{}' is not simple", key_name))
            })?;

            let value = parse_literal(raw, edm_type, &property.facets, span)?;
            predicates.push(KeyPredicate {
                property: key_name.clone(),
                edm_type,
                value,
            });
        }

        Ok(predicates)
    }

    fn entity_type(&self, name: &str) -> UriResult<&'a EntityType> {
        self.model
            .entity_type(name)
            .ok_or_else(|| UriSyntaxError::internal(&format!("entity type '{}' missing from model", name)))
    }
}

/// Split a raw path into named segments with byte-accurate spans
fn split_segments(raw_path: &str) -> UriResult<Vec<RawSegment<'_>>> {
    let trimmed = raw_path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let base = raw_path.find(trimmed).unwrap_or(0);

    let mut segments = Vec::new();
    let mut offset = 0;
    for piece in trimmed.split('/') {
        let start = base + offset;
        let span = Span::new(start, start + piece.len());
        offset += piece.len() + 1;

        if piece.is_empty() {
            return Err(UriSyntaxError::invalid_resource_path(
                "empty path segment",
                span,
            ));
        }

        let (name, key_text) = match piece.find('(') {
            Some(open) => {
                let close = piece
                    .rfind(')')
                    .filter(|close| *close == piece.len() - 1 && *close > open)
                    .ok_or_else(|| {
                        UriSyntaxError::invalid_resource_path(
                            "unmatched parenthesis in segment",
                            span,
                        )
                    })?;
                (&piece[..open], Some(&piece[open + 1..close]))
            }
            None => (piece, None),
        };

        if name.is_empty() {
            return Err(UriSyntaxError::invalid_resource_path(
                "segment has no name",
                span,
            ));
        }
        segments.push(RawSegment {
            name,
            key_text,
            span,
        });
    }

    Ok(segments)
}

/// Split key-predicate text on commas outside quoted literals
fn split_key_parts(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quote = false;

    for (index, byte) in text.bytes().enumerate() {
        match byte {
            b'\'' => in_quote = !in_quote,
            b',' if !in_quote => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
