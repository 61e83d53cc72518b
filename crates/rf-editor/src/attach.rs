//! Attaching tools to scene nodes

use std::collections::HashSet;

use rf_core::{NodeId, SceneError, SceneGraph, ToolConfig, UndoService, UndoTarget};

use crate::controller::{CollisionBuilder, RagdollFactory};
use crate::error::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    RagdollFactory,
    CollisionBuilder,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::RagdollFactory => "Ragdoll Factory",
            ToolKind::CollisionBuilder => "Collision Builder",
        }
    }
}

/// Which tools are attached to which nodes.
///
/// A node carries at most one instance of each tool.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    attached: HashSet<(NodeId, ToolKind)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the menu entry for `kind` is enabled on `node`
    pub fn can_attach(&self, scene: &dyn SceneGraph, node: NodeId, kind: ToolKind) -> bool {
        scene.contains_node(node) && !self.attached.contains(&(node, kind))
    }

    pub fn is_attached(&self, node: NodeId, kind: ToolKind) -> bool {
        self.attached.contains(&(node, kind))
    }

    fn register(
        &mut self,
        scene: &dyn SceneGraph,
        undo: &mut dyn UndoService,
        node: NodeId,
        kind: ToolKind,
    ) -> Result<(), ToolError> {
        if !scene.contains_node(node) {
            return Err(SceneError::NodeNotFound(node).into());
        }
        if !self.attached.insert((node, kind)) {
            return Err(ToolError::AlreadyAttached);
        }
        undo.record_created(UndoTarget::Tool, &format!("Created {}", kind.name()));
        tracing::info!("Attached {} to {}", kind.name(), node);
        Ok(())
    }

    pub fn attach_ragdoll_factory(
        &mut self,
        scene: &dyn SceneGraph,
        undo: &mut dyn UndoService,
        node: NodeId,
        config: ToolConfig,
    ) -> Result<RagdollFactory, ToolError> {
        self.register(scene, undo, node, ToolKind::RagdollFactory)?;
        Ok(RagdollFactory::enable(scene, node, config))
    }

    pub fn attach_collision_builder(
        &mut self,
        scene: &dyn SceneGraph,
        undo: &mut dyn UndoService,
        node: NodeId,
        config: ToolConfig,
    ) -> Result<CollisionBuilder, ToolError> {
        self.register(scene, undo, node, ToolKind::CollisionBuilder)?;
        Ok(CollisionBuilder::enable(scene, node, config))
    }

    /// Forget a tool; returns whether it was attached
    pub fn detach(&mut self, node: NodeId, kind: ToolKind) -> bool {
        self.attached.remove(&(node, kind))
    }
}
