//! Physics component records attached to scene nodes
//!
//! The physics engine's own semantics are opaque here: these are plain data
//! records that the editor tools populate, read back and destroy.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a node in the host hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

/// Identifier of a component attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub Uuid);

impl ComponentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component:{}", self.0)
    }
}

/// Kind of physics component handled by the tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComponentKind {
    #[default]
    Capsule,
    Box,
    Joint,
    Rigidbody,
}

impl ComponentKind {
    /// All kinds in toolbar order
    pub fn all() -> &'static [ComponentKind] {
        &[
            ComponentKind::Capsule,
            ComponentKind::Box,
            ComponentKind::Joint,
            ComponentKind::Rigidbody,
        ]
    }

    /// Position of the kind in toolbar order
    pub fn index(&self) -> usize {
        match self {
            ComponentKind::Capsule => 0,
            ComponentKind::Box => 1,
            ComponentKind::Joint => 2,
            ComponentKind::Rigidbody => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentKind::Capsule => "Capsule Collider",
            ComponentKind::Box => "Box Collider",
            ComponentKind::Joint => "Configurable Joint",
            ComponentKind::Rigidbody => "Rigidbody",
        }
    }

    /// Whether the kind is a collision shape
    pub fn is_collider(&self) -> bool {
        matches!(self, ComponentKind::Capsule | ComponentKind::Box)
    }

    /// Whether creating this kind needs a first (anchor) bone
    pub fn needs_anchor_bone(&self) -> bool {
        !matches!(self, ComponentKind::Rigidbody)
    }
}

/// Local axis a capsule is aligned with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub fn direction(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Capsule collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleCollider {
    pub radius: f32,
    /// Total height along `direction`, caps included
    pub height: f32,
    /// Center offset in the node's local space
    pub center: Vec3,
    pub direction: Axis,
}

impl Default for CapsuleCollider {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            center: Vec3::ZERO,
            direction: Axis::Z,
        }
    }
}

impl CapsuleCollider {
    /// Distance between the two bone endpoints the capsule spans
    pub fn axial_length(&self) -> f32 {
        self.center.z * 2.0
    }
}

/// Box collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider {
    /// x = width, y = depth, z = length along the bone
    pub size: Vec3,
    pub center: Vec3,
}

impl Default for BoxCollider {
    fn default() -> Self {
        Self {
            size: Vec3::ONE,
            center: Vec3::ZERO,
        }
    }
}

/// Motion constraint for one joint degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JointMotion {
    Locked,
    Limited,
    #[default]
    Free,
}

/// Configurable joint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfigurableJoint {
    /// Primary rotation axis in the node's local space
    pub axis: Vec3,
    /// Rigidbody the joint is anchored to (its parent body)
    pub connected_body: Option<ComponentId>,
    pub linear_motion: [JointMotion; 3],
    pub angular_motion: [JointMotion; 3],
    /// Degrees, stored as a non-positive value
    pub low_angular_x_limit: f32,
    /// Degrees
    pub high_angular_x_limit: f32,
    /// Degrees
    pub angular_y_limit: f32,
    /// Degrees
    pub angular_z_limit: f32,
}

impl Default for ConfigurableJoint {
    fn default() -> Self {
        Self {
            axis: Vec3::X,
            connected_body: None,
            linear_motion: [JointMotion::Free; 3],
            angular_motion: [JointMotion::Free; 3],
            low_angular_x_limit: 0.0,
            high_angular_x_limit: 0.0,
            angular_y_limit: 0.0,
            angular_z_limit: 0.0,
        }
    }
}

/// Rigidbody
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rigidbody {
    pub mass: f32,
    pub drag: f32,
    pub angular_drag: f32,
    pub use_gravity: bool,
    pub is_kinematic: bool,
    /// Center of mass in the node's local space
    pub center_of_mass: Vec3,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            drag: 0.0,
            angular_drag: 0.05,
            use_gravity: true,
            is_kinematic: false,
            center_of_mass: Vec3::ZERO,
        }
    }
}

/// A physics component record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Capsule(CapsuleCollider),
    Box(BoxCollider),
    Joint(ConfigurableJoint),
    Rigidbody(Rigidbody),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Capsule(_) => ComponentKind::Capsule,
            Component::Box(_) => ComponentKind::Box,
            Component::Joint(_) => ComponentKind::Joint,
            Component::Rigidbody(_) => ComponentKind::Rigidbody,
        }
    }

    pub fn is_collider(&self) -> bool {
        self.kind().is_collider()
    }

    pub fn as_capsule(&self) -> Option<&CapsuleCollider> {
        match self {
            Component::Capsule(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_capsule_mut(&mut self) -> Option<&mut CapsuleCollider> {
        match self {
            Component::Capsule(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_box(&self) -> Option<&BoxCollider> {
        match self {
            Component::Box(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_box_mut(&mut self) -> Option<&mut BoxCollider> {
        match self {
            Component::Box(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_joint(&self) -> Option<&ConfigurableJoint> {
        match self {
            Component::Joint(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_joint_mut(&mut self) -> Option<&mut ConfigurableJoint> {
        match self {
            Component::Joint(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_rigidbody(&self) -> Option<&Rigidbody> {
        match self {
            Component::Rigidbody(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_rigidbody_mut(&mut self) -> Option<&mut Rigidbody> {
        match self {
            Component::Rigidbody(r) => Some(r),
            _ => None,
        }
    }
}

impl From<CapsuleCollider> for Component {
    fn from(c: CapsuleCollider) -> Self {
        Component::Capsule(c)
    }
}

impl From<BoxCollider> for Component {
    fn from(b: BoxCollider) -> Self {
        Component::Box(b)
    }
}

impl From<ConfigurableJoint> for Component {
    fn from(j: ConfigurableJoint) -> Self {
        Component::Joint(j)
    }
}

impl From<Rigidbody> for Component {
    fn from(r: Rigidbody) -> Self {
        Component::Rigidbody(r)
    }
}
