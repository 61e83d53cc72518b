//! Scene view tick
//!
//! One tick runs three passes in order: pending input events go to the tool,
//! the tool's state is drawn onto the surface, and whatever the surface
//! reported during drawing is applied to the scene.

use glam::Vec3;
use rf_core::constants::ALERT_COLOR;
use rf_core::scene::queries;
use rf_core::selection::{self, Ray};
use rf_core::{ComponentId, ComponentKind, NodeId, SceneGraph, UndoService, UndoTarget};

use crate::controller::{Mode, SceneTool};
use crate::surface::{HandleId, InteractionSurface};

/// Height of the pending-bone label above the bone
const LABEL_OFFSET: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
}

/// Raw viewport input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    PointerMove { ray: Ray },
    /// The pointer left the viewport
    PointerLeave,
    PointerDown { ray: Ray },
    KeyDown(Key),
}

/// Interaction reported by the surface while drawing
#[derive(Debug, Clone, PartialEq)]
pub enum SceneResponse {
    /// A component's hit region was clicked
    Activated(ComponentId),
    /// A bone button was clicked
    BoneActivated(NodeId),
    /// The position handle of a selected collider moved
    HandleMoved {
        component: ComponentId,
        position: Vec3,
    },
    /// The limit handles of a selected joint changed (degrees)
    JointLimitsEdited {
        component: ComponentId,
        low_x: f32,
        high_x: f32,
        y: f32,
        z: f32,
    },
}

/// Drives one tool from viewport input
#[derive(Debug, Default)]
pub struct SceneView {
    /// A pointer-down was handed to the tool during the current tick
    pointer_consumed: bool,
}

impl SceneView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run input, draw and response passes.
    ///
    /// Returns the responses collected in the draw pass.
    pub fn tick(
        &mut self,
        tool: &mut dyn SceneTool,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        events: &[SceneEvent],
        surface: &mut dyn InteractionSurface,
    ) -> Vec<SceneResponse> {
        self.pointer_consumed = false;
        for event in events {
            self.handle_event(tool, scene, undo, event);
        }

        let responses = draw(tool, &*scene, surface);

        for response in &responses {
            self.apply(tool, scene, undo, response);
        }
        responses
    }

    fn handle_event(
        &mut self,
        tool: &mut dyn SceneTool,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        event: &SceneEvent,
    ) {
        match event {
            SceneEvent::PointerMove { ray } => tool.core_mut().set_hover(Some(*ray)),
            SceneEvent::PointerLeave => tool.core_mut().set_hover(None),
            SceneEvent::PointerDown { ray } => {
                tool.core_mut().set_hover(Some(*ray));
                tool.pointer_down(scene, undo, ray);
                self.pointer_consumed = true;
            }
            SceneEvent::KeyDown(Key::Escape) => tool.escape(),
        }
    }

    fn apply(
        &self,
        tool: &mut dyn SceneTool,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        response: &SceneResponse,
    ) {
        match response {
            // The pointer-down already acted on this click
            SceneResponse::Activated(_) | SceneResponse::BoneActivated(_)
                if self.pointer_consumed => {}
            SceneResponse::Activated(component) => tool.activate(scene, undo, *component),
            SceneResponse::BoneActivated(bone) => tool.activate_bone(scene, undo, *bone),
            SceneResponse::HandleMoved {
                component,
                position,
            } => {
                let Some(node) = scene.component_node(*component) else {
                    return;
                };
                undo.record_state(UndoTarget::Node(node), "Move Collider");
                if let Err(e) = scene.set_world_position(node, *position) {
                    tracing::warn!("Failed to move {}: {}", node, e);
                }
            }
            SceneResponse::JointLimitsEdited {
                low_x,
                high_x,
                y,
                z,
                ..
            } => {
                let joint = &mut tool.core_mut().params_mut().joint;
                joint.low_x = *low_x;
                joint.high_x = *high_x;
                joint.y = *y;
                joint.z = *z;
                tool.update_kind(scene, undo, ComponentKind::Joint);
            }
        }
    }
}

/// Draw bones, the pending-bone hint and the components of the drawn kinds
fn draw(
    tool: &dyn SceneTool,
    scene: &dyn SceneGraph,
    surface: &mut dyn InteractionSurface,
) -> Vec<SceneResponse> {
    let mut responses = Vec::new();
    let core = tool.core();
    let config = core.config();
    let mode = tool.draw_mode();
    let normal = surface.camera_forward();

    let bones: Vec<(NodeId, Vec3)> = queries::bones(scene, core.root())
        .filter_map(|bone| Some((bone, scene.world_position(bone)?)))
        .collect();

    for (bone, position) in &bones {
        let chosen = core.anchor() == Some(*bone) || core.endpoint() == Some(*bone);
        let hovered = core.hover().is_some_and(|ray| {
            selection::is_under_cursor(&ray, bone, bones.iter().copied(), config.hit_threshold)
        });
        let color = if chosen || hovered {
            config.selected_color
        } else {
            config.normal_color
        };

        if mode == Mode::Create {
            if surface.button(HandleId::Bone(*bone), *position, config.disc_radius, color) {
                responses.push(SceneResponse::BoneActivated(*bone));
            }
        } else {
            surface.draw_disc(*position, normal, config.disc_radius, color, false);
        }

        if config.show_names
            && let Some(name) = scene.name(*bone)
        {
            surface.draw_label(*position, name, config.normal_color);
        }
    }

    if mode == Mode::Create
        && let Some(position) = core.anchor().and_then(|a| scene.world_position(a))
    {
        surface.draw_label(
            position + Vec3::Y * LABEL_OFFSET,
            tool.pending_bone_label(),
            ALERT_COLOR,
        );
    }

    if config.show_gizmos {
        let ctx = core.draw_context(scene, mode);
        for kind in tool.drawn_kinds() {
            responses.extend(core.strategy(kind).draw(&ctx, surface));
        }
    }
    responses
}
