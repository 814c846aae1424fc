//! Lookup of lightboxes by element id.
//!
//! The registry owns every [`Lightbox`] on a page. Instances are addressed
//! internally by [`LightboxId`] (an index) and externally by the id of their
//! source element. Sources without an id are given one from a counter.

use crate::lightbox::Lightbox;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Index of a lightbox within its page's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LightboxId(pub usize);

impl fmt::Display for LightboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct Registry {
    id_prefix: String,
    next_uid: u64,
    lightboxes: Vec<Lightbox>,
    by_name: BTreeMap<String, LightboxId>,
}

impl Registry {
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            next_uid: 0,
            lightboxes: Vec::new(),
            by_name: BTreeMap::new(),
        }
    }

    /// A fresh element id: `<prefix>0`, `<prefix>1`, ...
    pub fn generate_name(&mut self) -> String {
        let name = format!("{}{}", self.id_prefix, self.next_uid);
        self.next_uid += 1;
        name
    }

    /// The id the next inserted lightbox will receive.
    pub fn next_id(&self) -> LightboxId {
        LightboxId(self.lightboxes.len())
    }

    /// Register a lightbox under its element id.
    ///
    /// A second lightbox with the same name replaces the first in name
    /// lookups; both stay reachable by [`LightboxId`].
    pub fn insert(&mut self, lightbox: Lightbox) -> LightboxId {
        let id = self.next_id();
        debug_assert_eq!(lightbox.id(), id);
        self.by_name.insert(lightbox.name().to_string(), id);
        self.lightboxes.push(lightbox);
        id
    }

    pub fn get(&self, id: LightboxId) -> Option<&Lightbox> {
        self.lightboxes.get(id.0)
    }

    pub fn get_mut(&mut self, id: LightboxId) -> Option<&mut Lightbox> {
        self.lightboxes.get_mut(id.0)
    }

    pub fn lookup(&self, name: &str) -> Option<&Lightbox> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.lightboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lightboxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lightbox> {
        self.lightboxes.iter()
    }

    /// Element ids in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.lightboxes.iter().map(Lightbox::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ElementId;
    use crate::options::LightboxConfig;

    fn lightbox(registry: &Registry, name: &str, element: u64) -> Lightbox {
        Lightbox::new(
            registry.next_id(),
            name.to_string(),
            ElementId(element),
            ElementId(element + 1),
            LightboxConfig::default(),
        )
    }

    #[test]
    fn generated_names_count_up() {
        let mut registry = Registry::new("litebox");
        assert_eq!(registry.generate_name(), "litebox0");
        assert_eq!(registry.generate_name(), "litebox1");
    }

    #[test]
    fn insert_and_lookup() {
        let mut registry = Registry::new("litebox");
        let first = lightbox(&registry, "hero", 1);
        let id = registry.insert(first);
        assert_eq!(id, LightboxId(0));
        let second = lightbox(&registry, "detail", 3);
        registry.insert(second);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("hero").map(Lightbox::id), Some(LightboxId(0)));
        assert_eq!(registry.lookup("detail").map(Lightbox::id), Some(LightboxId(1)));
        assert!(registry.lookup("missing").is_none());
        assert_eq!(registry.names(), vec!["hero", "detail"]);
    }

    #[test]
    fn duplicate_name_points_at_latest() {
        let mut registry = Registry::new("litebox");
        let first = lightbox(&registry, "dup", 1);
        registry.insert(first);
        let second = lightbox(&registry, "dup", 3);
        registry.insert(second);
        assert_eq!(registry.lookup("dup").map(Lightbox::id), Some(LightboxId(1)));
        assert!(registry.get(LightboxId(0)).is_some());
    }
}
