//! Interactive editor tools for building ragdolls
//!
//! Two tools sit on top of `rf-core`: the Collision Builder places capsule and
//! box colliders between bones, and the Ragdoll Factory additionally creates
//! joints and rigidbodies. Both are driven through [`SceneView`] events, edited
//! through the [`inspector`] panels, and mutate the scene only through queued
//! actions.

pub mod actions;
pub mod attach;
pub mod controller;
pub mod error;
pub mod inspector;
pub mod scene_view;
pub mod strategy;
pub mod surface;
pub mod tracking;

use std::sync::Arc;

use parking_lot::Mutex;

pub use actions::{ActionContext, BuilderAction, ToolAction};
pub use attach::{ToolKind, ToolRegistry};
pub use controller::{BuilderMode, CollisionBuilder, Mode, RagdollFactory, SceneTool, ToolCore};
pub use error::ToolError;
pub use scene_view::{Key, SceneEvent, SceneResponse, SceneView};
pub use strategy::{
    BoxStrategy, CapsuleStrategy, ComponentStrategy, JointStrategy, RigidbodyStrategy,
};
pub use surface::{DrawCommand, DrawList, HandleId, InteractionSurface, LimitAxis};
pub use tracking::TrackingList;

/// Shared Ragdoll Factory state
pub type SharedToolState = Arc<Mutex<RagdollFactory>>;

/// Shared Collision Builder state
pub type SharedBuilderState = Arc<Mutex<CollisionBuilder>>;

/// Wrap a Ragdoll Factory for sharing between panels
pub fn create_shared_tool(tool: RagdollFactory) -> SharedToolState {
    Arc::new(Mutex::new(tool))
}

/// Wrap a Collision Builder for sharing between panels
pub fn create_shared_builder(tool: CollisionBuilder) -> SharedBuilderState {
    Arc::new(Mutex::new(tool))
}
