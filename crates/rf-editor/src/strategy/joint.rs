use glam::{Quat, Vec3};
use rf_core::constants::{ALERT_COLOR, AXIS_COLORS, CONNECTED_COLOR, JOINT_HANDLE_SIZE};
use rf_core::scene::SceneGraph;
use rf_core::{
    Component, ComponentId, ComponentKind, ConfigurableJoint, JointMotion, NodeId, Rigidbody,
    SceneError, SharedParameters, UndoTarget,
};

use super::{
    ComponentStrategy, DrawContext, ToolContext, get_or_add, grouped, require_bones,
    require_descendant,
};
use crate::controller::Mode;
use crate::error::ToolError;
use crate::scene_view::SceneResponse;
use crate::surface::{Color, HandleId, InteractionSurface, LimitAxis};

/// Opacity of the limit arcs of unselected joints
const LIMIT_OPACITY: f32 = 0.25;

/// Configurable joints connecting a bone to its ancestor's rigidbody
#[derive(Debug, Default)]
pub struct JointStrategy {
    selected: Option<ComponentId>,
}

impl JointStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rotation planes of a joint's three angular limits, in world space
struct LimitFrame {
    position: Vec3,
    normals: [Vec3; 3],
    froms: [Vec3; 3],
}

impl LimitFrame {
    fn new(position: Vec3, rotation: Quat, axis: Vec3) -> Self {
        let normal_x = rotation * axis;
        let from_x = normal_x.cross(rotation * Vec3::Y);
        let normal_y = rotation * axis.cross(Vec3::NEG_Z);
        let from_y = normal_x.cross(normal_y);
        let normal_z = rotation * axis.cross(Vec3::NEG_Y);
        let from_z = normal_x.cross(normal_z);
        Self {
            position,
            normals: [normal_x, normal_y, normal_z],
            froms: [from_x, from_y, from_z],
        }
    }
}

fn faded(color: Color, opacity: f32) -> Color {
    [color[0], color[1], color[2], color[3] * opacity]
}

impl JointStrategy {
    /// Status disc, plus a dotted line to the connected body or a warning
    fn draw_status(
        &self,
        ctx: &DrawContext<'_>,
        surface: &mut dyn InteractionSurface,
        position: Vec3,
        joint: &ConfigurableJoint,
    ) {
        let connected = joint
            .connected_body
            .and_then(|body| ctx.scene.component_position(body));
        let normal = surface.camera_forward();
        match connected {
            Some(target) => {
                surface.draw_disc(position, normal, ctx.config.disc_radius, CONNECTED_COLOR, false);
                surface.draw_line(position, target, CONNECTED_COLOR, true);
            }
            None => {
                surface.draw_disc(position, normal, ctx.config.disc_radius, ALERT_COLOR, false);
                surface.draw_label(position, "MISSING CONNECTION", ALERT_COLOR);
            }
        }
    }

    /// Read-only limit arcs
    fn draw_limits(
        &self,
        ctx: &DrawContext<'_>,
        surface: &mut dyn InteractionSurface,
        frame: &LimitFrame,
        joint: &ConfigurableJoint,
    ) {
        let radius = ctx.config.joint_handle_radius;
        let sweeps = [
            [-joint.low_angular_x_limit, -joint.high_angular_x_limit],
            [joint.angular_y_limit, -joint.angular_y_limit],
            [joint.angular_z_limit, -joint.angular_z_limit],
        ];
        for (i, pair) in sweeps.iter().enumerate() {
            let tip = frame.position + frame.normals[i] * radius / 2.0;
            surface.draw_line(frame.position, tip, AXIS_COLORS[i], true);
            for angle in pair {
                surface.draw_arc(
                    frame.position,
                    frame.normals[i],
                    frame.froms[i],
                    *angle,
                    radius,
                    faded(AXIS_COLORS[i], LIMIT_OPACITY),
                );
            }
        }
    }

    /// Editable limit arcs for the selected joint, driven by the parameters
    fn draw_limit_handles(
        &self,
        ctx: &DrawContext<'_>,
        surface: &mut dyn InteractionSurface,
        frame: &LimitFrame,
        id: ComponentId,
    ) -> Option<SceneResponse> {
        let radius = ctx.config.joint_handle_radius;
        let params = ctx.params.joint;

        for i in 1..3 {
            let limit = if i == 1 { params.y } else { params.z };
            surface.draw_arc(
                frame.position,
                frame.normals[i],
                frame.froms[i],
                -limit,
                radius,
                faded(AXIS_COLORS[i], 0.2),
            );
        }

        let mut handle = |axis: LimitAxis, plane: usize, angle: f32| {
            surface.angle_handle(
                HandleId::Limit(id, axis),
                frame.position,
                frame.normals[plane],
                frame.froms[plane],
                angle,
                radius,
                AXIS_COLORS[plane],
            )
        };
        let low_x = handle(LimitAxis::LowX, 0, params.low_x);
        let high_x = -handle(LimitAxis::HighX, 0, -params.high_x);
        let y = handle(LimitAxis::Y, 1, params.y);
        let z = handle(LimitAxis::Z, 2, params.z);

        let edited = (low_x, high_x, y, z) != (params.low_x, params.high_x, params.y, params.z);
        edited.then_some(SceneResponse::JointLimitsEdited {
            component: id,
            low_x,
            high_x,
            y,
            z,
        })
    }
}

impl ComponentStrategy for JointStrategy {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Joint
    }

    fn selected(&self) -> Option<ComponentId> {
        self.selected
    }

    fn set_selected(&mut self, component: Option<ComponentId>) {
        self.selected = component;
    }

    fn create(
        &mut self,
        ctx: &mut ToolContext<'_>,
        anchor: Option<NodeId>,
        endpoint: Option<NodeId>,
    ) -> Result<ComponentId, ToolError> {
        let (anchor, endpoint) = require_bones(anchor, endpoint)?;
        require_descendant(&*ctx.scene, anchor, endpoint)?;

        let label = "Created Configurable Joint";
        let id = grouped(ctx, label, |ctx| {
            let (body_a, _) = get_or_add(ctx, anchor, Rigidbody::default().into())?;
            let (body_b, _) = get_or_add(ctx, endpoint, Rigidbody::default().into())?;
            let (joint_id, _) = get_or_add(ctx, endpoint, ConfigurableJoint::default().into())?;
            ctx.tracked.track(body_a, false);
            ctx.tracked.track(body_b, false);

            ctx.params.joint.clamp();
            let params = ctx.params.joint;
            ctx.undo.record_state(UndoTarget::Component(joint_id), label);
            let joint = ctx
                .scene
                .component_mut(joint_id)
                .and_then(Component::as_joint_mut)
                .ok_or(SceneError::ComponentNotFound(joint_id))?;
            joint.connected_body = Some(body_a);
            joint.linear_motion = [JointMotion::Locked; 3];
            joint.angular_motion = [JointMotion::Limited; 3];
            params.apply(joint);
            Ok(joint_id)
        })?;

        self.select(ctx, id)?;
        tracing::info!("Created configurable joint {}", id);
        Ok(id)
    }

    fn apply_parameters(&self, params: &mut SharedParameters, component: &mut Component) {
        if let Some(joint) = component.as_joint_mut() {
            params.joint.clamp();
            params.joint.apply(joint);
        }
    }

    fn pull_parameters(&self, component: &Component, params: &mut SharedParameters) {
        if let Some(joint) = component.as_joint() {
            params.joint.pull(joint);
        }
    }

    /// The rigidbody on the joint's node goes with it
    fn companions(&self, scene: &dyn SceneGraph, component: ComponentId) -> Vec<ComponentId> {
        scene
            .component_node(component)
            .and_then(|node| scene.find_component(node, ComponentKind::Rigidbody))
            .into_iter()
            .collect()
    }

    fn draw(
        &self,
        ctx: &DrawContext<'_>,
        surface: &mut dyn InteractionSurface,
    ) -> Vec<SceneResponse> {
        let mut responses = Vec::new();

        for entry in ctx.tracked.of_kind(ctx.scene, ComponentKind::Joint) {
            let id = entry.component;
            let Some(joint) = ctx.scene.component(id).and_then(Component::as_joint) else {
                continue;
            };
            let Some(node) = ctx.scene.component_node(id) else {
                continue;
            };
            let (Some(position), Some(rotation)) =
                (ctx.scene.world_position(node), ctx.scene.world_rotation(node))
            else {
                continue;
            };
            let frame = LimitFrame::new(position, rotation, joint.axis);

            if self.is_selected(id) {
                responses.extend(self.draw_limit_handles(ctx, surface, &frame, id));
            } else {
                self.draw_limits(ctx, surface, &frame, joint);
            }

            if ctx.mode != Mode::Select {
                self.draw_status(ctx, surface, position, joint);
            }
            if ctx.accepts_clicks()
                && surface.button(
                    HandleId::Component(id),
                    position,
                    JOINT_HANDLE_SIZE,
                    ctx.config.selected_color,
                )
            {
                responses.push(SceneResponse::Activated(id));
            }
        }
        responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Mode;
    use crate::strategy::testing::Fixture;
    use crate::surface::{DrawCommand, DrawList};
    use crate::strategy::RigidbodyStrategy;
    use approx::assert_relative_eq;

    fn joint_at(fx: &Fixture, id: ComponentId) -> ConfigurableJoint {
        *fx.scene.component(id).unwrap().as_joint().unwrap()
    }

    #[test]
    fn test_create_connects_to_anchor_body() {
        let mut fx = Fixture::new();
        let mut strategy = JointStrategy::new();
        let (hip, spine) = (fx.hip, fx.spine);
        fx.params.joint.low_x = 30.0;
        fx.params.joint.high_x = 45.0;

        let id = strategy
            .create(&mut fx.ctx(), Some(hip), Some(spine))
            .unwrap();

        let body_a = fx.scene.find_component(hip, ComponentKind::Rigidbody).unwrap();
        let body_b = fx.scene.find_component(spine, ComponentKind::Rigidbody).unwrap();
        let joint = joint_at(&fx, id);
        assert_eq!(fx.scene.component_node(id), Some(spine));
        assert_eq!(joint.connected_body, Some(body_a));
        assert_eq!(joint.low_angular_x_limit, -30.0);
        assert_eq!(joint.high_angular_x_limit, 45.0);
        assert_eq!(joint.angular_y_limit, 0.0);
        assert_eq!(joint.angular_z_limit, 0.0);
        assert_eq!(joint.linear_motion, [JointMotion::Locked; 3]);
        assert_eq!(joint.angular_motion, [JointMotion::Limited; 3]);
        assert!(fx.tracked.contains(body_a));
        assert!(fx.tracked.contains(body_b));
        assert!(fx.tracked.contains(id));
        assert_eq!(fx.undo.groups().len(), 1);
    }

    #[test]
    fn test_create_reuses_existing_components() {
        let mut fx = Fixture::new();
        let mut strategy = JointStrategy::new();
        let (hip, spine) = (fx.hip, fx.spine);
        let existing = fx.scene.attach(hip, Rigidbody::default().into()).unwrap();

        strategy.create(&mut fx.ctx(), Some(hip), Some(spine)).unwrap();
        strategy.create(&mut fx.ctx(), Some(hip), Some(spine)).unwrap();

        assert_eq!(fx.scene.count_of_kind(ComponentKind::Rigidbody), 2);
        assert_eq!(fx.scene.count_of_kind(ComponentKind::Joint), 1);
        assert_eq!(fx.scene.find_component(hip, ComponentKind::Rigidbody), Some(existing));
    }

    #[test]
    fn test_update_normalizes_axis_and_clamps_limits() {
        let mut fx = Fixture::new();
        let mut strategy = JointStrategy::new();
        let (hip, spine) = (fx.hip, fx.spine);
        let id = strategy
            .create(&mut fx.ctx(), Some(hip), Some(spine))
            .unwrap();

        fx.params.joint.axis = Vec3::new(0.0, 0.0, 3.0);
        fx.params.joint.y = 200.0;
        fx.params.joint.z = -5.0;
        strategy.update(&mut fx.ctx()).unwrap();

        let joint = joint_at(&fx, id);
        assert_eq!(joint.axis, Vec3::Z);
        assert_eq!(joint.angular_y_limit, 180.0);
        assert_eq!(joint.angular_z_limit, 0.0);
        assert_eq!(fx.params.joint.y, 180.0);

        fx.params.joint.axis = Vec3::ZERO;
        strategy.update(&mut fx.ctx()).unwrap();
        assert_eq!(joint_at(&fx, id).axis, Vec3::X);
    }

    #[test]
    fn test_delete_removes_companion_body() {
        let mut fx = Fixture::new();
        let mut strategy = JointStrategy::new();
        let (hip, spine) = (fx.hip, fx.spine);
        strategy
            .create(&mut fx.ctx(), Some(hip), Some(spine))
            .unwrap();

        strategy.delete(&mut fx.ctx()).unwrap();

        assert_eq!(fx.scene.count_of_kind(ComponentKind::Joint), 0);
        assert!(fx.scene.find_component(spine, ComponentKind::Rigidbody).is_none());
        assert!(fx.scene.find_component(hip, ComponentKind::Rigidbody).is_some());
        assert_eq!(fx.tracked.len(), 1);
        assert_eq!(fx.scene.node_count(), 3);
    }

    #[test]
    fn test_delete_all_skips_companions_already_gone() {
        let mut fx = Fixture::new();
        let mut joints = JointStrategy::new();
        let mut bodies = RigidbodyStrategy::new();
        let (hip, spine, head) = (fx.hip, fx.spine, fx.head);
        joints.create(&mut fx.ctx(), Some(hip), Some(spine)).unwrap();
        joints.create(&mut fx.ctx(), Some(spine), Some(head)).unwrap();
        assert_eq!(fx.tracked.len(), 5);

        let deleted = joints.delete_all(&mut fx.ctx()).unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(fx.undo.destroyed_of_kind(ComponentKind::Joint), 2);
        assert_eq!(fx.undo.destroyed_of_kind(ComponentKind::Rigidbody), 2);

        // Only the hip body is left for the rigidbody pass
        let destroyed = fx.undo.destroy_count();
        let deleted = bodies.delete_all(&mut fx.ctx()).unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(fx.undo.destroy_count(), destroyed + 1);
        assert!(fx.tracked.is_empty());
        assert_eq!(fx.scene.component_count(), 0);
    }

    #[test]
    fn test_draw_warns_about_missing_connection() {
        let mut fx = Fixture::new();
        let spine = fx.spine;
        let id = fx
            .scene
            .attach(spine, ConfigurableJoint::default().into())
            .unwrap();
        fx.tracked.track(id, false);
        let strategy = JointStrategy::new();

        let mut surface = DrawList::default();
        strategy.draw(&fx.draw_ctx(Mode::Create), &mut surface);

        assert_eq!(surface.labels(), vec!["MISSING CONNECTION"]);
        assert!(surface.button_for(HandleId::Component(id)).is_none());
    }

    #[test]
    fn test_draw_connection_line_to_parent_body() {
        let mut fx = Fixture::new();
        let mut strategy = JointStrategy::new();
        let (hip, spine) = (fx.hip, fx.spine);
        strategy
            .create(&mut fx.ctx(), Some(hip), Some(spine))
            .unwrap();
        strategy.deselect();

        let mut surface = DrawList::default();
        strategy.draw(&fx.draw_ctx(Mode::Delete), &mut surface);

        assert!(surface.labels().is_empty());
        let hip_position = fx.scene.world_position(hip).unwrap();
        assert!(surface.lines().iter().any(|line| matches!(
            line,
            DrawCommand::Line { to, dotted: true, color, .. }
                if *to == hip_position && *color == CONNECTED_COLOR
        )));
    }

    #[test]
    fn test_limit_handles_report_edits() {
        let mut fx = Fixture::new();
        let mut strategy = JointStrategy::new();
        let (hip, spine) = (fx.hip, fx.spine);
        fx.params.joint.high_x = 45.0;
        let id = strategy
            .create(&mut fx.ctx(), Some(hip), Some(spine))
            .unwrap();

        let mut surface = DrawList::default();
        assert!(strategy.draw(&fx.draw_ctx(Mode::Select), &mut surface).is_empty());

        surface.set_angle(HandleId::Limit(id, LimitAxis::HighX), -60.0);
        let responses = strategy.draw(&fx.draw_ctx(Mode::Select), &mut surface);
        match responses.as_slice() {
            [SceneResponse::JointLimitsEdited { component, high_x, low_x, .. }] => {
                assert_eq!(*component, id);
                assert_relative_eq!(*high_x, 60.0);
                assert_relative_eq!(*low_x, 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
