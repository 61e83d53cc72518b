//! In-memory scene graph

use std::collections::{HashMap, HashSet};

use crate::component::{Component, ComponentId, ComponentKind, NodeId};

use super::{SceneError, SceneGraph, Transform};

/// A node of the in-memory hierarchy
#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    transform: Transform,
    components: Vec<ComponentId>,
    /// Created by a tool to carry a collision primitive
    collision_object: bool,
}

/// A component together with the node that owns it
#[derive(Debug, Clone)]
struct Attached {
    node: NodeId,
    component: Component,
}

/// In-memory transform hierarchy with attached physics components
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    components: HashMap<ComponentId, Attached>,
    /// Root nodes in creation order
    roots: Vec<NodeId>,
    /// Nodes the host refuses to destroy (e.g. parts of an instanced model)
    protected: HashSet<NodeId>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with a local translation
    pub fn spawn(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        translation: glam::Vec3,
    ) -> Result<NodeId, SceneError> {
        let id = self.create_node(name, parent)?;
        self.set_local_transform(id, Transform::from_translation(translation))?;
        Ok(id)
    }

    /// Mark a node as not destroyable
    pub fn protect(&mut self, node: NodeId) {
        self.protected.insert(node);
    }

    pub fn is_protected(&self, node: NodeId) -> bool {
        self.protected.contains(&node)
    }

    /// Root nodes in creation order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of live components of one kind
    pub fn count_of_kind(&self, kind: ComponentKind) -> usize {
        self.components
            .values()
            .filter(|a| a.component.kind() == kind)
            .count()
    }

    /// Find a node by name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| *id)
    }

    fn detach_from_parent(&mut self, node: NodeId) {
        let parent = self.nodes.get(&node).and_then(|n| n.parent);
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.retain(|c| *c != node);
                }
            }
            None => self.roots.retain(|r| *r != node),
        }
    }
}

impl SceneGraph for Scene {
    fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.name.as_str())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn local_transform(&self, node: NodeId) -> Option<Transform> {
        self.nodes.get(&node).map(|n| n.transform)
    }

    fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        if let Some(parent) = parent
            && !self.nodes.contains_key(&parent)
        {
            return Err(SceneError::NodeNotFound(parent));
        }

        let id = NodeId::new();
        self.nodes.insert(
            id,
            Node {
                name: name.to_string(),
                parent,
                children: Vec::new(),
                transform: Transform::IDENTITY,
                components: Vec::new(),
                collision_object: false,
            },
        );
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        Ok(id)
    }

    fn destroy_node(&mut self, node: NodeId) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&node) {
            return Err(SceneError::NodeNotFound(node));
        }

        let subtree = self.descendants(node);
        if let Some(blocked) = subtree.iter().find(|n| self.protected.contains(*n)) {
            return Err(SceneError::DestroyNotPermitted(*blocked));
        }

        self.detach_from_parent(node);
        for id in subtree {
            if let Some(removed) = self.nodes.remove(&id) {
                for component in removed.components {
                    self.components.remove(&component);
                }
            }
        }
        Ok(())
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&node) {
            return Err(SceneError::NodeNotFound(node));
        }
        if let Some(parent) = parent {
            if !self.nodes.contains_key(&parent) {
                return Err(SceneError::NodeNotFound(parent));
            }
            if parent == node || self.is_descendant(parent, node) {
                return Err(SceneError::WouldCreateCycle);
            }
        }

        self.detach_from_parent(node);
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = parent;
        }
        match parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.children.push(node);
                }
            }
            None => self.roots.push(node),
        }
        Ok(())
    }

    fn set_local_transform(
        &mut self,
        node: NodeId,
        transform: Transform,
    ) -> Result<(), SceneError> {
        let n = self
            .nodes
            .get_mut(&node)
            .ok_or(SceneError::NodeNotFound(node))?;
        n.transform = transform;
        Ok(())
    }

    fn attach(&mut self, node: NodeId, component: Component) -> Result<ComponentId, SceneError> {
        if !self.nodes.contains_key(&node) {
            return Err(SceneError::NodeNotFound(node));
        }
        // A node carries at most one rigidbody
        if component.kind() == ComponentKind::Rigidbody
            && self.find_component(node, ComponentKind::Rigidbody).is_some()
        {
            return Err(SceneError::DuplicateComponent {
                node,
                kind: ComponentKind::Rigidbody,
            });
        }

        let id = ComponentId::new();
        self.components.insert(id, Attached { node, component });
        if let Some(n) = self.nodes.get_mut(&node) {
            n.components.push(id);
        }
        Ok(id)
    }

    fn remove_component(&mut self, id: ComponentId) -> Result<Component, SceneError> {
        let attached = self
            .components
            .remove(&id)
            .ok_or(SceneError::ComponentNotFound(id))?;
        if let Some(n) = self.nodes.get_mut(&attached.node) {
            n.components.retain(|c| *c != id);
        }
        Ok(attached.component)
    }

    fn mark_collision_object(&mut self, node: NodeId) -> Result<(), SceneError> {
        let n = self
            .nodes
            .get_mut(&node)
            .ok_or(SceneError::NodeNotFound(node))?;
        n.collision_object = true;
        Ok(())
    }

    fn is_collision_object(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.collision_object)
    }

    fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id).map(|a| &a.component)
    }

    fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(&id).map(|a| &mut a.component)
    }

    fn component_node(&self, id: ComponentId) -> Option<NodeId> {
        self.components.get(&id).map(|a| a.node)
    }

    fn components_on(&self, node: NodeId) -> Vec<ComponentId> {
        self.nodes
            .get(&node)
            .map(|n| n.components.clone())
            .unwrap_or_default()
    }
}
