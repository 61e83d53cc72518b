//! Action handling module
//!
//! Inspector buttons queue actions on the tool; the host drains the queue once
//! per frame with scene and undo access and dispatches each action here.

mod collision;
mod ragdoll;

use std::sync::Arc;

use parking_lot::Mutex;
use rf_core::{ComponentKind, SceneGraph, UndoService};

use crate::controller::{BuilderMode, Mode};

pub use collision::handle_builder_action;
pub use ragdoll::handle_ragdoll_action;

/// Ragdoll Factory inspector actions
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    SetMode(Mode),
    SetKind(ComponentKind),
    /// Push the edited parameters onto the selected component
    ApplyParameters,
    ConvertTo(ComponentKind),
    DeleteSelected,
    DeleteAll,
    Deselect,
}

/// Collision Builder inspector actions
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderAction {
    /// Start drawing colliders of a kind
    DrawColliders(ComponentKind),
    SetMode(BuilderMode),
    ApplyParameters,
    ConvertSelected,
    DeleteSelected,
    DeleteLast,
    DeleteAll,
}

/// Context for action handlers
pub struct ActionContext<'a, T> {
    pub tool: &'a Arc<Mutex<T>>,
    pub scene: &'a mut dyn SceneGraph,
    pub undo: &'a mut dyn UndoService,
}

impl<'a, T> ActionContext<'a, T> {
    pub fn new(
        tool: &'a Arc<Mutex<T>>,
        scene: &'a mut dyn SceneGraph,
        undo: &'a mut dyn UndoService,
    ) -> Self {
        Self { tool, scene, undo }
    }
}

/// Dispatch a Ragdoll Factory action
pub fn dispatch_action(action: ToolAction, ctx: &mut ActionContext<'_, crate::RagdollFactory>) {
    tracing::debug!("Dispatching {:?}", action);
    handle_ragdoll_action(action, ctx);
}

/// Dispatch a Collision Builder action
pub fn dispatch_builder_action(
    action: BuilderAction,
    ctx: &mut ActionContext<'_, crate::CollisionBuilder>,
) {
    tracing::debug!("Dispatching {:?}", action);
    handle_builder_action(action, ctx);
}

/// Drain and dispatch the Ragdoll Factory queue
pub fn process_actions(ctx: &mut ActionContext<'_, crate::RagdollFactory>) {
    let actions = ctx.tool.lock().take_pending_actions();
    for action in actions {
        dispatch_action(action, ctx);
    }
}

/// Drain and dispatch the Collision Builder queue
pub fn process_builder_actions(ctx: &mut ActionContext<'_, crate::CollisionBuilder>) {
    let actions = ctx.tool.lock().take_pending_actions();
    for action in actions {
        dispatch_builder_action(action, ctx);
    }
}
