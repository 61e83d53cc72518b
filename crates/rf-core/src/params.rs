//! Parameters shared between the inspector and the tool strategies
//!
//! The inspector edits these values; the active strategy pushes them onto the
//! selected component on update and pulls live values back on select.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::component::{BoxCollider, CapsuleCollider, ConfigurableJoint, Rigidbody};
use crate::constants::MAX_ANGULAR_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleParams {
    pub radius: f32,
    /// Distance between the two bones the capsule spans
    pub length: f32,
}

impl Default for CapsuleParams {
    fn default() -> Self {
        Self {
            radius: 0.1,
            length: 0.0,
        }
    }
}

impl CapsuleParams {
    /// Clamp negative values to zero
    pub fn clamp(&mut self) {
        self.radius = self.radius.max(0.0);
        self.length = self.length.max(0.0);
    }

    /// Read radius and length from a live capsule; inverse of `height = length + radius`
    pub fn pull(&mut self, capsule: &CapsuleCollider) {
        self.radius = capsule.radius;
        self.length = (capsule.height - capsule.radius).max(0.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub width: f32,
    pub depth: f32,
    pub length: f32,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            width: 0.1,
            depth: 0.1,
            length: 0.0,
        }
    }
}

impl BoxParams {
    pub fn clamp(&mut self) {
        self.width = self.width.max(0.0);
        self.depth = self.depth.max(0.0);
        self.length = self.length.max(0.0);
    }

    pub fn pull(&mut self, collider: &BoxCollider) {
        self.width = collider.size.x;
        self.depth = collider.size.y;
        self.length = collider.size.z;
    }

    /// Box size as (width, depth, length)
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.depth, self.length)
    }
}

/// Joint axis and angular limits, in degrees.
///
/// `low_x` is entered as a positive angle and stored negated on the joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointParams {
    pub axis: Vec3,
    pub low_x: f32,
    pub high_x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for JointParams {
    fn default() -> Self {
        Self {
            axis: Vec3::X,
            low_x: 0.0,
            high_x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl JointParams {
    /// Normalize the axis (zero falls back to +X) and clamp limits to [0, 180]
    pub fn clamp(&mut self) {
        self.axis = self.axis.try_normalize().unwrap_or(Vec3::X);
        self.low_x = self.low_x.clamp(0.0, MAX_ANGULAR_LIMIT);
        self.high_x = self.high_x.clamp(0.0, MAX_ANGULAR_LIMIT);
        self.y = self.y.clamp(0.0, MAX_ANGULAR_LIMIT);
        self.z = self.z.clamp(0.0, MAX_ANGULAR_LIMIT);
    }

    pub fn pull(&mut self, joint: &ConfigurableJoint) {
        self.axis = joint.axis;
        self.low_x = -joint.low_angular_x_limit;
        self.high_x = joint.high_angular_x_limit;
        self.y = joint.angular_y_limit;
        self.z = joint.angular_z_limit;
    }

    /// Write axis and limits onto a joint
    pub fn apply(&self, joint: &mut ConfigurableJoint) {
        joint.axis = self.axis;
        joint.low_angular_x_limit = -self.low_x;
        joint.high_angular_x_limit = self.high_x;
        joint.angular_y_limit = self.y;
        joint.angular_z_limit = self.z;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidbodyParams {
    pub mass: f32,
    pub drag: f32,
    pub angular_drag: f32,
    pub use_gravity: bool,
    pub is_kinematic: bool,
}

impl Default for RigidbodyParams {
    fn default() -> Self {
        let body = Rigidbody::default();
        Self {
            mass: body.mass,
            drag: body.drag,
            angular_drag: body.angular_drag,
            use_gravity: body.use_gravity,
            is_kinematic: body.is_kinematic,
        }
    }
}

impl RigidbodyParams {
    pub fn clamp(&mut self) {
        self.mass = self.mass.max(0.0);
        self.drag = self.drag.max(0.0);
        self.angular_drag = self.angular_drag.max(0.0);
    }

    pub fn pull(&mut self, body: &Rigidbody) {
        self.mass = body.mass;
        self.drag = body.drag;
        self.angular_drag = body.angular_drag;
        self.use_gravity = body.use_gravity;
        self.is_kinematic = body.is_kinematic;
    }

    pub fn apply(&self, body: &mut Rigidbody) {
        body.mass = self.mass;
        body.drag = self.drag;
        body.angular_drag = self.angular_drag;
        body.use_gravity = self.use_gravity;
        body.is_kinematic = self.is_kinematic;
    }
}

/// All parameter groups of a tool
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SharedParameters {
    pub capsule: CapsuleParams,
    #[serde(rename = "box")]
    pub box_collider: BoxParams,
    pub joint: JointParams,
    pub rigidbody: RigidbodyParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_joint_clamp() {
        let mut params = JointParams {
            axis: Vec3::ZERO,
            low_x: -10.0,
            high_x: 270.0,
            y: 45.0,
            z: -1.0,
        };
        params.clamp();
        assert_eq!(params.axis, Vec3::X);
        assert_eq!(params.low_x, 0.0);
        assert_eq!(params.high_x, 180.0);
        assert_eq!(params.y, 45.0);
        assert_eq!(params.z, 0.0);
    }

    #[test]
    fn test_joint_low_limit_is_negated() {
        let params = JointParams {
            axis: Vec3::new(0.0, 2.0, 0.0).normalize(),
            low_x: 30.0,
            high_x: 45.0,
            ..Default::default()
        };
        let mut joint = ConfigurableJoint::default();
        params.apply(&mut joint);
        assert_eq!(joint.low_angular_x_limit, -30.0);

        let mut pulled = JointParams::default();
        pulled.pull(&joint);
        assert_eq!(pulled, params);
    }

    #[test]
    fn test_capsule_pull_subtracts_radius_from_height() {
        let capsule = CapsuleCollider {
            radius: 0.3,
            height: 1.3,
            center: Vec3::ZERO,
            ..Default::default()
        };
        let mut params = CapsuleParams::default();
        params.pull(&capsule);
        assert_relative_eq!(params.radius, 0.3);
        assert_relative_eq!(params.length, 1.0);

        // Shorter than its radius
        params.pull(&CapsuleCollider {
            radius: 0.5,
            height: 0.2,
            ..capsule
        });
        assert_eq!(params.length, 0.0);
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        let mut params = SharedParameters::default();
        params.capsule.radius = -1.0;
        params.box_collider.depth = -0.5;
        params.rigidbody.mass = -2.0;
        params.capsule.clamp();
        params.box_collider.clamp();
        params.rigidbody.clamp();
        assert_eq!(params.capsule.radius, 0.0);
        assert_eq!(params.box_collider.depth, 0.0);
        assert_eq!(params.rigidbody.mass, 0.0);
    }
}
