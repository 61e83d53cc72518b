//! Hierarchy queries used by the tools
//!
//! Every query walks the hierarchy again on each call. Components are created
//! and destroyed between calls, so nothing here is cached.

use crate::component::{ComponentId, ComponentKind, NodeId};

use super::SceneGraph;

/// Nodes under `root` (root included) that do not carry a collider
pub fn bones<'a>(scene: &'a dyn SceneGraph, root: NodeId) -> impl Iterator<Item = NodeId> + 'a {
    scene
        .descendants(root)
        .into_iter()
        .filter(move |node| !scene.has_collider(*node))
}

/// Components of one kind attached anywhere under `root` (root included)
pub fn components_of_kind<'a>(
    scene: &'a dyn SceneGraph,
    root: NodeId,
    kind: ComponentKind,
) -> impl Iterator<Item = ComponentId> + 'a {
    scene
        .descendants(root)
        .into_iter()
        .flat_map(move |node| scene.components_on(node))
        .filter(move |id| scene.component(*id).is_some_and(|c| c.kind() == kind))
}

/// Capsule and box colliders under `root`
pub fn colliders<'a>(
    scene: &'a dyn SceneGraph,
    root: NodeId,
) -> impl Iterator<Item = ComponentId> + 'a {
    scene
        .descendants(root)
        .into_iter()
        .flat_map(move |node| scene.components_on(node))
        .filter(move |id| scene.component(*id).is_some_and(|c| c.is_collider()))
}

pub fn rigidbodies<'a>(
    scene: &'a dyn SceneGraph,
    root: NodeId,
) -> impl Iterator<Item = ComponentId> + 'a {
    components_of_kind(scene, root, ComponentKind::Rigidbody)
}

pub fn joints<'a>(scene: &'a dyn SceneGraph, root: NodeId) -> impl Iterator<Item = ComponentId> + 'a {
    components_of_kind(scene, root, ComponentKind::Joint)
}
