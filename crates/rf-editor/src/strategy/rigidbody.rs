use glam::Vec3;
use rf_core::{
    Component, ComponentId, ComponentKind, NodeId, Rigidbody, SceneError, SharedParameters,
};

use super::{ComponentStrategy, DrawContext, ToolContext, get_or_add, grouped};
use crate::controller::Mode;
use crate::error::ToolError;
use crate::scene_view::SceneResponse;
use crate::surface::{Color, HandleId, InteractionSurface};

const KINEMATIC_TINT: Color = [1.0, 0.0, 0.0, 1.0];
const DYNAMIC_TINT: Color = [0.0, 1.0, 0.0, 1.0];

/// Rigidbodies on single bones
#[derive(Debug, Default)]
pub struct RigidbodyStrategy {
    selected: Option<ComponentId>,
}

impl RigidbodyStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

fn tint(color: Color, by: Color) -> Color {
    [
        color[0] * by[0],
        color[1] * by[1],
        color[2] * by[2],
        color[3] * by[3],
    ]
}

/// Mass-weighted center of the given bodies; `None` without mass
fn center_of_mass(ctx: &DrawContext<'_>, bodies: &[ComponentId]) -> Option<Vec3> {
    let mut weighted = Vec3::ZERO;
    let mut total = 0.0;
    for id in bodies {
        let Some(body) = ctx.scene.component(*id).and_then(Component::as_rigidbody) else {
            continue;
        };
        let Some(world) = ctx
            .scene
            .component_node(*id)
            .and_then(|node| ctx.scene.world_transform(node))
        else {
            continue;
        };
        weighted += world.transform_point3(body.center_of_mass) * body.mass;
        total += body.mass;
    }
    (total > 0.0).then(|| weighted / total)
}

impl ComponentStrategy for RigidbodyStrategy {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Rigidbody
    }

    fn selected(&self) -> Option<ComponentId> {
        self.selected
    }

    fn set_selected(&mut self, component: Option<ComponentId>) {
        self.selected = component;
    }

    /// Only the endpoint bone is used
    fn create(
        &mut self,
        ctx: &mut ToolContext<'_>,
        _anchor: Option<NodeId>,
        endpoint: Option<NodeId>,
    ) -> Result<ComponentId, ToolError> {
        let node = endpoint.ok_or(ToolError::MissingBone)?;
        if !ctx.scene.contains_node(node) {
            return Err(SceneError::NodeNotFound(node).into());
        }

        let id = grouped(ctx, "Created Rigidbody", |ctx| {
            let (id, created) = get_or_add(ctx, node, Rigidbody::default().into())?;
            if created
                && let Some(component) = ctx.scene.component_mut(id)
            {
                ctx.params.rigidbody.clamp();
                if let Some(body) = component.as_rigidbody_mut() {
                    ctx.params.rigidbody.apply(body);
                }
            }
            ctx.tracked.track(id, false);
            Ok(id)
        })?;

        self.select(ctx, id)?;
        tracing::info!("Created rigidbody {}", id);
        Ok(id)
    }

    fn apply_parameters(&self, params: &mut SharedParameters, component: &mut Component) {
        if let Some(body) = component.as_rigidbody_mut() {
            params.rigidbody.clamp();
            params.rigidbody.apply(body);
        }
    }

    fn pull_parameters(&self, component: &Component, params: &mut SharedParameters) {
        if let Some(body) = component.as_rigidbody() {
            params.rigidbody.pull(body);
        }
    }

    fn draw(
        &self,
        ctx: &DrawContext<'_>,
        surface: &mut dyn InteractionSurface,
    ) -> Vec<SceneResponse> {
        let mut responses = Vec::new();
        let normal = surface.camera_forward();
        let entries = ctx.tracked.of_kind(ctx.scene, ComponentKind::Rigidbody);
        let ids: Vec<_> = entries.iter().map(|e| e.component).collect();

        if let Some(center) = center_of_mass(ctx, &ids) {
            surface.draw_disc(
                center,
                normal,
                ctx.config.disc_radius * 2.0,
                ctx.config.normal_color,
                false,
            );
        }

        let hovered = ctx.hovered(ComponentKind::Rigidbody);
        for id in ids {
            let Some(body) = ctx.scene.component(id).and_then(Component::as_rigidbody) else {
                continue;
            };
            let Some(position) = ctx.scene.component_position(id) else {
                continue;
            };

            let color = if self.is_selected(id) || hovered == Some(id) {
                ctx.config.selected_color
            } else if body.is_kinematic {
                tint(ctx.config.normal_color, KINEMATIC_TINT)
            } else {
                tint(ctx.config.normal_color, DYNAMIC_TINT)
            };
            let size = body.mass * ctx.config.disc_radius;
            surface.draw_disc(position, normal, size, color, true);

            if ctx.mode != Mode::Create
                && surface.button(HandleId::Component(id), position, size, color)
            {
                responses.push(SceneResponse::Activated(id));
            }
        }
        responses
    }
}
