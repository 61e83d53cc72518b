use glam::Vec3;
use rf_core::constants::BOX_HANDLE_SCALE;
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

/// Box colliders spanning two bones
#[derive(Debug, Default)]
pub struct BoxStrategy {
    selected: Option<ComponentId>,
}

impl BoxStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComponentStrategy for BoxStrategy {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Box
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

        let label = "Created Box Collider Object";
        let id = grouped(ctx, label, |ctx| {
            let (node, distance) = spawn_collision_node(ctx, anchor, endpoint, label)?;
            ctx.params.box_collider.clamp();
            ctx.params.box_collider.length = distance;
            let collider = BoxCollider {
                size: ctx.params.box_collider.size(),
                center: Vec3::Z * distance / 2.0,
            };
            let id = ctx.scene.attach(node, collider.into())?;
            ctx.tracked.track(id, true);
            Ok(id)
        })?;

        self.select(ctx, id)?;
        tracing::info!("Created box collider {}", id);
        Ok(id)
    }

    fn apply_parameters(&self, params: &mut SharedParameters, component: &mut Component) {
        let Some(collider) = component.as_box_mut() else {
            return;
        };
        params.box_collider.clamp();
        collider.size = params.box_collider.size();
        collider.center = Vec3::Z * params.box_collider.length / 2.0;
    }

    fn pull_parameters(&self, component: &Component, params: &mut SharedParameters) {
        if let Some(collider) = component.as_box() {
            params.box_collider.pull(collider);
        }
    }

    fn convert_to(
        &mut self,
        ctx: &mut ToolContext<'_>,
        target: ComponentKind,
    ) -> Result<ComponentId, ToolError> {
        if target != ComponentKind::Capsule {
            return Err(ToolError::UnsupportedConversion {
                from: self.kind(),
                to: target,
            });
        }
        let old = self.selected.ok_or(ToolError::NothingSelected)?;
        let collider = ctx
            .scene
            .component(old)
            .and_then(Component::as_box)
            .copied()
            .ok_or(SceneError::ComponentNotFound(old))?;

        // Width and depth collapse into one radius
        let radius = collider.size.x.max(collider.size.y) / 2.0;
        let length = collider.size.z;
        let replacement = CapsuleCollider {
            radius,
            height: length + radius,
            center: Vec3::Z * length / 2.0,
            direction: Axis::Z,
        };
        let new = replace_collider(
            ctx,
            old,
            replacement.into(),
            "Converted Box Collider to Capsule Collider",
        )?;
        self.selected = None;
        tracing::info!("Converted box {} to capsule {}", old, new);
        Ok(new)
    }

    fn draw(
        &self,
        ctx: &DrawContext<'_>,
        surface: &mut dyn InteractionSurface,
    ) -> Vec<SceneResponse> {
        draw_colliders(self, ctx, surface, |component| {
            component
                .as_box()
                .map_or(0.0, |b| b.size.x.max(b.size.y) * BOX_HANDLE_SCALE)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Mode;
    use crate::strategy::CapsuleStrategy;
    use crate::strategy::testing::Fixture;
    use crate::surface::{DrawCommand, DrawList, HandleId};
    use approx::assert_relative_eq;
    use rf_core::SceneGraph;

    #[test]
    fn test_create_uses_width_and_depth() {
        let mut fx = Fixture::new();
        let mut strategy = BoxStrategy::new();
        let (hip, head) = (fx.hip, fx.head);
        fx.params.box_collider.width = 0.3;
        fx.params.box_collider.depth = 0.2;

        let id = strategy
            .create(&mut fx.ctx(), Some(hip), Some(head))
            .unwrap();

        let collider = *fx.scene.component(id).unwrap().as_box().unwrap();
        assert_relative_eq!(collider.size.x, 0.3);
        assert_relative_eq!(collider.size.y, 0.2);
        assert_relative_eq!(collider.size.z, 1.0);
        assert_relative_eq!(collider.center.z, 0.5);
        assert_relative_eq!(fx.params.box_collider.length, 1.0);
        assert_eq!(strategy.selected(), Some(id));
    }

    #[test]
    fn test_update_clamps_negative_dimensions() {
        let mut fx = Fixture::new();
        let mut strategy = BoxStrategy::new();
        let (hip, spine) = (fx.hip, fx.spine);
        let id = strategy
            .create(&mut fx.ctx(), Some(hip), Some(spine))
            .unwrap();

        fx.params.box_collider.width = -1.0;
        fx.params.box_collider.length = 2.0;
        strategy.update(&mut fx.ctx()).unwrap();

        let collider = *fx.scene.component(id).unwrap().as_box().unwrap();
        assert_eq!(fx.params.box_collider.width, 0.0);
        assert_eq!(collider.size, Vec3::new(0.0, 0.1, 2.0));
        assert_relative_eq!(collider.center.z, 1.0);
    }

    #[test]
    fn test_select_pulls_size() {
        let mut fx = Fixture::new();
        let mut strategy = BoxStrategy::new();
        let spine = fx.spine;
        let id = fx
            .scene
            .attach(
                spine,
                BoxCollider {
                    size: Vec3::new(0.4, 0.5, 0.6),
                    center: Vec3::ZERO,
                }
                .into(),
            )
            .unwrap();

        strategy.select(&mut fx.ctx(), id).unwrap();

        assert_eq!(fx.params.box_collider.width, 0.4);
        assert_eq!(fx.params.box_collider.depth, 0.5);
        assert_eq!(fx.params.box_collider.length, 0.6);
        // Attached to a bone, so only the component is ours
        assert!(!fx.tracked.get(id).unwrap().owns_node);
    }

    #[test]
    fn test_delete_collider_on_leaf_bone_keeps_the_bone() {
        let mut fx = Fixture::new();
        let mut strategy = BoxStrategy::new();
        let head = fx.head;
        let id = fx
            .scene
            .attach(head, BoxCollider::default().into())
            .unwrap();

        strategy.delete_component(&mut fx.ctx(), id).unwrap();

        assert!(fx.scene.contains_node(head));
        assert!(!fx.scene.contains_component(id));
        assert!(fx.tracked.is_empty());
        assert!(fx.warnings.is_empty());
    }

    #[test]
    fn test_round_trip_through_capsule_keeps_length_only() {
        let mut fx = Fixture::new();
        let mut boxes = BoxStrategy::new();
        let mut capsules = CapsuleStrategy::new();
        let (hip, head) = (fx.hip, fx.head);
        fx.params.box_collider.width = 0.4;
        fx.params.box_collider.depth = 0.2;
        let original = boxes.create(&mut fx.ctx(), Some(hip), Some(head)).unwrap();
        let node = fx.scene.component_node(original).unwrap();

        let capsule = boxes
            .convert_to(&mut fx.ctx(), ComponentKind::Capsule)
            .unwrap();
        capsules.select(&mut fx.ctx(), capsule).unwrap();
        assert_relative_eq!(fx.params.capsule.radius, 0.2);
        assert_relative_eq!(fx.params.capsule.length, 1.0);

        let back = capsules
            .convert_to(&mut fx.ctx(), ComponentKind::Box)
            .unwrap();
        let collider = *fx.scene.component(back).unwrap().as_box().unwrap();

        assert_relative_eq!(collider.size.z, 1.0);
        assert_relative_eq!(collider.size.x, 0.4);
        assert_relative_eq!(collider.size.y, 0.4);
        assert_eq!(fx.scene.component_node(back), Some(node));
        assert_eq!(fx.tracked.len(), 1);
        assert_eq!(fx.tracked.entries()[0].component, back);
        assert_eq!(fx.scene.component_count(), 1);
    }

    #[test]
    fn test_convert_without_selection() {
        let mut fx = Fixture::new();
        let mut strategy = BoxStrategy::new();
        let err = strategy
            .convert_to(&mut fx.ctx(), ComponentKind::Capsule)
            .unwrap_err();
        assert_eq!(err, ToolError::NothingSelected);
        let err = strategy
            .convert_to(&mut fx.ctx(), ComponentKind::Rigidbody)
            .unwrap_err();
        assert!(matches!(err, ToolError::UnsupportedConversion { .. }));
    }

    #[test]
    fn test_draw_region_size_and_drag() {
        let mut fx = Fixture::new();
        let mut strategy = BoxStrategy::new();
        let (hip, spine) = (fx.hip, fx.spine);
        fx.params.box_collider.width = 0.2;
        fx.params.box_collider.depth = 0.1;
        let id = strategy
            .create(&mut fx.ctx(), Some(hip), Some(spine))
            .unwrap();

        let mut surface = DrawList::default();
        surface.drag(HandleId::Component(id), Vec3::new(1.0, 1.0, 0.0));
        let responses = strategy.draw(&fx.draw_ctx(Mode::Delete), &mut surface);

        assert_eq!(
            responses,
            vec![SceneResponse::HandleMoved {
                component: id,
                position: Vec3::new(1.0, 1.0, 0.0)
            }]
        );
        match surface.button_for(HandleId::Component(id)) {
            Some(DrawCommand::Button { size, .. }) => assert_relative_eq!(*size, 0.14),
            other => panic!("unexpected {:?}", other),
        }
    }
}
