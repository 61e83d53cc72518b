//! Core model for the Ragdoll Factory editor tools
//!
//! Physics component records, the scene-graph and undo interfaces the tools
//! talk to, cursor selection math, shared tool parameters and configuration.

pub mod component;
pub mod config;
pub mod constants;
pub mod params;
pub mod scene;
pub mod selection;
pub mod undo;

pub use component::{
    Axis, BoxCollider, CapsuleCollider, Component, ComponentId, ComponentKind, ConfigurableJoint,
    JointMotion, NodeId, Rigidbody,
};
pub use config::{ConfigError, ToolConfig};
pub use params::{BoxParams, CapsuleParams, JointParams, RigidbodyParams, SharedParameters};
pub use scene::{Scene, SceneError, SceneGraph, Transform};
pub use selection::Ray;
pub use undo::{UndoLog, UndoService, UndoTarget};
