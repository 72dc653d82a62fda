//! Request-scoped resolution cache
//!
//! Owned by a single resolution call and dropped with it. Navigation-target
//! lookups walk association metadata; repeated steps within one request
//! ($expand chains revisiting path segments) hit the cache instead.

use crate::edm::{EntityContainer, EntityType, MetadataModel, Multiplicity};
use crate::error::{UriResult, UriSyntaxError};
use std::collections::HashMap;

/// Resolved far end of a navigation property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTarget {
    pub entity_type: String,
    pub entity_set: String,
    pub multiplicity: Multiplicity,
}

#[derive(Debug, Default)]
pub struct ResolutionCache {
    navigation_targets: HashMap<(String, String), NavTarget>,
    hits: usize,
    misses: usize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a navigation property's target, None when the name is unknown
    pub fn navigation_target(
        &mut self,
        model: &MetadataModel,
        container: &EntityContainer,
        scope: &EntityType,
        navigation_name: &str,
    ) -> UriResult<Option<NavTarget>> {
        let key = (scope.name.clone(), navigation_name.to_string());
        if let Some(target) = self.navigation_targets.get(&key) {
            self.hits += 1;
            return Ok(Some(target.clone()));
        }

        let nav = match scope.navigation_property(navigation_name) {
            Some(nav) => nav,
            None => return Ok(None),
        };

        let end = model.navigation_target(nav).ok_or_else(|| {
            UriSyntaxError::internal(&format!(
                "association '{}' unresolvable for navigation '{}'",
                nav.relationship, nav.name
            ))
        })?;
        let entity_set = container
            .entity_set_for_type(&end.entity_type)
            .ok_or_else(|| {
                UriSyntaxError::internal(&format!(
                    "no entity set holds type '{}'",
                    end.entity_type
                ))
            })?;

        let target = NavTarget {
            entity_type: end.entity_type.clone(),
            entity_set: entity_set.name.clone(),
            multiplicity: end.multiplicity,
        };
        self.misses += 1;
        self.navigation_targets.insert(key, target.clone());
        Ok(Some(target))
    }

    pub fn hit_count(&self) -> usize {
        self.hits
    }

    pub fn lookup_count(&self) -> usize {
        self.hits + self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::scenario_model;

    #[test]
    fn test_cache_hits_on_repeat_lookup() {
        let model = scenario_model();
        let container = model.default_container().unwrap();
        let employee = model.entity_type("Employee").unwrap();
        let mut cache = ResolutionCache::new();

        let first = cache
            .navigation_target(&model, container, employee, "Team")
            .unwrap()
            .unwrap();
        assert_eq!(first.entity_set, "Teams");
        assert_eq!(cache.hit_count(), 0);

        let second = cache
            .navigation_target(&model, container, employee, "Team")
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.hit_count(), 1);
    }

    #[test]
    fn test_unknown_navigation_is_none() {
        let model = scenario_model();
        let container = model.default_container().unwrap();
        let employee = model.entity_type("Employee").unwrap();
        let mut cache = ResolutionCache::new();

        let result = cache
            .navigation_target(&model, container, employee, "Nonexistent")
            .unwrap();
        assert!(result.is_none());
    }
}
