//! Scene graph interface
//!
//! The host editor owns the transform hierarchy. The tools only hold
//! [`NodeId`]/[`ComponentId`] handles and go through [`SceneGraph`] for every
//! query or mutation. [`Scene`] is an in-memory implementation used headless
//! and in tests.

mod memory;
pub mod queries;

pub use memory::Scene;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentId, ComponentKind, NodeId};

/// Local transform of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Query and mutation capability over the host hierarchy
pub trait SceneGraph {
    /// Whether the node is still alive
    fn contains_node(&self, node: NodeId) -> bool;

    fn name(&self, node: NodeId) -> Option<&str>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Direct children in sibling order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn local_transform(&self, node: NodeId) -> Option<Transform>;

    fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> Result<NodeId, SceneError>;

    /// Destroy a node, its descendants and every component on them
    fn destroy_node(&mut self, node: NodeId) -> Result<(), SceneError>;

    /// Reparent a node, keeping its local transform
    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), SceneError>;

    fn set_local_transform(&mut self, node: NodeId, transform: Transform)
    -> Result<(), SceneError>;

    fn attach(&mut self, node: NodeId, component: Component) -> Result<ComponentId, SceneError>;

    fn remove_component(&mut self, id: ComponentId) -> Result<Component, SceneError>;

    /// Tag a node as a collision object created by a tool
    fn mark_collision_object(&mut self, node: NodeId) -> Result<(), SceneError>;

    /// Whether a tool created `node` to carry a collision primitive
    fn is_collision_object(&self, node: NodeId) -> bool;

    fn component(&self, id: ComponentId) -> Option<&Component>;

    fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component>;

    /// Node a component is attached to
    fn component_node(&self, id: ComponentId) -> Option<NodeId>;

    /// Components attached to a node in attachment order
    fn components_on(&self, node: NodeId) -> Vec<ComponentId>;

    // ============== Provided ==============

    fn contains_component(&self, id: ComponentId) -> bool {
        self.component(id).is_some()
    }

    /// The node itself followed by all of its descendants, depth-first
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        if !self.contains_node(node) {
            return result;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            result.push(current);
            let children = self.children(current);
            stack.extend(children.into_iter().rev());
        }
        result
    }

    /// Whether `node` sits strictly below `ancestor`
    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    fn world_transform(&self, node: NodeId) -> Option<Mat4> {
        let local = self.local_transform(node)?.to_mat4();
        match self.parent(node) {
            Some(parent) => Some(self.world_transform(parent)? * local),
            None => Some(local),
        }
    }

    fn world_position(&self, node: NodeId) -> Option<Vec3> {
        self.world_transform(node)
            .map(|m| m.transform_point3(Vec3::ZERO))
    }

    fn world_rotation(&self, node: NodeId) -> Option<Quat> {
        let local = self.local_transform(node)?.rotation;
        match self.parent(node) {
            Some(parent) => Some(self.world_rotation(parent)? * local),
            None => Some(local),
        }
    }

    /// Node's forward (+Z) axis in world space
    fn forward(&self, node: NodeId) -> Option<Vec3> {
        self.world_rotation(node).map(|r| r * Vec3::Z)
    }

    fn set_world_position(&mut self, node: NodeId, position: Vec3) -> Result<(), SceneError> {
        let mut local = self
            .local_transform(node)
            .ok_or(SceneError::NodeNotFound(node))?;
        local.translation = match self.parent(node) {
            Some(parent) => self
                .world_transform(parent)
                .ok_or(SceneError::NodeNotFound(parent))?
                .inverse()
                .transform_point3(position),
            None => position,
        };
        self.set_local_transform(node, local)
    }

    /// Rotate a node so its forward (+Z) axis points along `direction` in world space.
    /// A zero direction leaves the rotation untouched.
    fn set_forward(&mut self, node: NodeId, direction: Vec3) -> Result<(), SceneError> {
        let mut local = self
            .local_transform(node)
            .ok_or(SceneError::NodeNotFound(node))?;
        let Some(direction) = direction.try_normalize() else {
            return Ok(());
        };
        let world = Quat::from_rotation_arc(Vec3::Z, direction);
        let parent_rotation = match self.parent(node) {
            Some(parent) => self
                .world_rotation(parent)
                .ok_or(SceneError::NodeNotFound(parent))?,
            None => Quat::IDENTITY,
        };
        local.rotation = (parent_rotation.inverse() * world).normalize();
        self.set_local_transform(node, local)
    }

    /// First component of the given kind on a node
    fn find_component(&self, node: NodeId, kind: ComponentKind) -> Option<ComponentId> {
        self.components_on(node)
            .into_iter()
            .find(|id| self.component(*id).is_some_and(|c| c.kind() == kind))
    }

    /// Whether any collider is attached to the node
    fn has_collider(&self, node: NodeId) -> bool {
        self.components_on(node)
            .into_iter()
            .any(|id| self.component(id).is_some_and(Component::is_collider))
    }

    /// World position of the node a component is attached to
    fn component_position(&self, id: ComponentId) -> Option<Vec3> {
        self.component_node(id)
            .and_then(|node| self.world_position(node))
    }
}

/// Scene-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentId),
    #[error("Node {0} cannot be destroyed")]
    DestroyNotPermitted(NodeId),
    #[error("Reparenting would create a cycle")]
    WouldCreateCycle,
    #[error("Node {node} already has a {} component", .kind.display_name())]
    DuplicateComponent { node: NodeId, kind: ComponentKind },
}
