use glam::Vec3;
use rf_core::{
    Axis, BoxCollider, CapsuleCollider, Component, ComponentId, ComponentKind, NodeId,
    SceneError, SharedParameters,
};

use super::{
    ComponentStrategy, DrawContext, ToolContext, draw_colliders, grouped, replace_collider,
    require_bones, require_descendant, spawn_collision_node,
};
use crate::error::ToolError;
use crate::scene_view::SceneResponse;
use crate::surface::InteractionSurface;

/// Capsule colliders spanning two bones
#[derive(Debug, Default)]
pub struct CapsuleStrategy {
    selected: Option<ComponentId>,
}

impl CapsuleStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Capsule with the given radius whose axis covers `length` along +Z
fn capsule_along_z(radius: f32, length: f32) -> CapsuleCollider {
    CapsuleCollider {
        radius,
        height: length + radius,
        center: Vec3::Z * length / 2.0,
        direction: Axis::Z,
    }
}

impl ComponentStrategy for CapsuleStrategy {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Capsule
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

        let label = "Created Capsule Collider Object";
        let id = grouped(ctx, label, |ctx| {
            let (node, distance) = spawn_collision_node(ctx, anchor, endpoint, label)?;
            ctx.params.capsule.clamp();
            let capsule = capsule_along_z(ctx.params.capsule.radius, distance);
            let id = ctx.scene.attach(node, capsule.into())?;
            ctx.params.capsule.length = distance;
            ctx.tracked.track(id, true);
            Ok(id)
        })?;

        self.select(ctx, id)?;
        tracing::info!("Created capsule collider {}", id);
        Ok(id)
    }

    fn apply_parameters(&self, params: &mut SharedParameters, component: &mut Component) {
        let Some(capsule) = component.as_capsule_mut() else {
            return;
        };
        params.capsule.clamp();
        *capsule = CapsuleCollider {
            direction: capsule.direction,
            ..capsule_along_z(params.capsule.radius, params.capsule.length)
        };
    }

    fn pull_parameters(&self, component: &Component, params: &mut SharedParameters) {
        if let Some(capsule) = component.as_capsule() {
            params.capsule.pull(capsule);
        }
    }

    fn convert_to(
        &mut self,
        ctx: &mut ToolContext<'_>,
        target: ComponentKind,
    ) -> Result<ComponentId, ToolError> {
        if target != ComponentKind::Box {
            return Err(ToolError::UnsupportedConversion {
                from: self.kind(),
                to: target,
            });
        }
        let old = self.selected.ok_or(ToolError::NothingSelected)?;
        let capsule = ctx
            .scene
            .component(old)
            .and_then(Component::as_capsule)
            .copied()
            .ok_or(SceneError::ComponentNotFound(old))?;

        let width = capsule.radius * 2.0;
        let length = capsule.axial_length();
        let replacement = BoxCollider {
            size: Vec3::new(width, width, length),
            center: Vec3::Z * length / 2.0,
        };
        let new = replace_collider(
            ctx,
            old,
            replacement.into(),
            "Converted Capsule Collider to Box Collider",
        )?;
        self.selected = None;
        tracing::info!("Converted capsule {} to box {}", old, new);
        Ok(new)
    }

    fn draw(
        &self,
        ctx: &DrawContext<'_>,
        surface: &mut dyn InteractionSurface,
    ) -> Vec<SceneResponse> {
        draw_colliders(self, ctx, surface, |component| {
            component.as_capsule().map_or(0.0, |c| c.radius * 2.0)
        })
    }
}
