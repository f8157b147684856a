//! In-memory zone registry.

use silentzone_geo::{Zone, ZoneId};
use std::sync::Arc;

/// Ordered collection of zones, in insertion order.
///
/// Storage is copy-on-write: a snapshot handed to the evaluator is never
/// affected by a later add or remove.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Arc<Vec<Zone>>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, zone: Zone) {
        Arc::make_mut(&mut self.zones).push(zone);
    }

    /// Remove a zone by id, returning it. No-op if not found.
    pub fn remove(&mut self, id: ZoneId) -> Option<Zone> {
        let index = self.zones.iter().position(|z| z.id == id)?;
        Some(Arc::make_mut(&mut self.zones).remove(index))
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn contains(&self, id: ZoneId) -> bool {
        self.get(id).is_some()
    }

    /// Consistent view of the current zone list.
    pub fn snapshot(&self) -> Arc<Vec<Zone>> {
        Arc::clone(&self.zones)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silentzone_geo::{Coordinates, ZoneDraft};

    fn zone(name: &str) -> Zone {
        ZoneDraft::new(name, "Math")
            .center(Coordinates::new(0.0, 0.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut registry = ZoneRegistry::new();
        registry.add(zone("a"));
        registry.add(zone("b"));
        registry.add(zone("c"));

        let names: Vec<_> = registry.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = ZoneRegistry::new();
        registry.add(zone("a"));
        assert!(registry.remove(ZoneId::new()).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_returns_zone() {
        let mut registry = ZoneRegistry::new();
        let a = zone("a");
        let id = a.id;
        registry.add(a);
        registry.add(zone("b"));

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.name, "a");
        assert!(!registry.contains(id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_is_isolated_from_mutation() {
        let mut registry = ZoneRegistry::new();
        let a = zone("a");
        let id = a.id;
        registry.add(a);

        let snapshot = registry.snapshot();
        registry.add(zone("b"));
        registry.remove(id);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert_eq!(registry.len(), 1);
    }
}
