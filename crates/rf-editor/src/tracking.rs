//! Components created or adopted by a tool
//!
//! One ordered list across all kinds. Entries are weak: a component destroyed
//! behind the tool's back stays listed until the next [`TrackingList::prune`].

use rf_core::{ComponentId, ComponentKind, SceneGraph};

/// A component the tool manages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedComponent {
    pub component: ComponentId,
    /// The tool created the node the component lives on, and may destroy it
    pub owns_node: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TrackingList {
    entries: Vec<TrackedComponent>,
}

impl TrackingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TrackedComponent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, component: ComponentId) -> bool {
        self.position(component).is_some()
    }

    pub fn get(&self, component: ComponentId) -> Option<&TrackedComponent> {
        self.entries.iter().find(|e| e.component == component)
    }

    fn position(&self, component: ComponentId) -> Option<usize> {
        self.entries.iter().position(|e| e.component == component)
    }

    /// Append an entry unless the component is already tracked.
    ///
    /// Returns whether the entry was added.
    pub fn track(&mut self, component: ComponentId, owns_node: bool) -> bool {
        if self.contains(component) {
            return false;
        }
        self.entries.push(TrackedComponent {
            component,
            owns_node,
        });
        true
    }

    pub fn remove(&mut self, component: ComponentId) -> Option<TrackedComponent> {
        let index = self.position(component)?;
        Some(self.entries.remove(index))
    }

    /// Put `new` in place of `old`, keeping its position and `owns_node`
    pub fn replace(&mut self, old: ComponentId, new: ComponentId) -> bool {
        match self.position(old) {
            Some(index) => {
                self.entries[index].component = new;
                true
            }
            None => false,
        }
    }

    /// Drop entries whose component no longer exists.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self, scene: &dyn SceneGraph) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| scene.contains_component(e.component));
        before - self.entries.len()
    }

    /// Live tracked components of one kind, in list order
    pub fn of_kind(&self, scene: &dyn SceneGraph, kind: ComponentKind) -> Vec<TrackedComponent> {
        self.entries
            .iter()
            .filter(|e| scene.component(e.component).is_some_and(|c| c.kind() == kind))
            .copied()
            .collect()
    }

    /// Live tracked colliders, in list order
    pub fn colliders(&self, scene: &dyn SceneGraph) -> Vec<TrackedComponent> {
        self.entries
            .iter()
            .filter(|e| scene.component(e.component).is_some_and(|c| c.is_collider()))
            .copied()
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
