//! Inspector panels
//!
//! Parameter fields are edited in place; everything that touches the scene is
//! queued as an action and runs on the next action pass.

mod helpers;

use egui::{Color32, RichText, Ui};
use glam::Vec3;
use rf_core::{ComponentKind, SceneGraph, SharedParameters, ToolConfig};

use crate::actions::{BuilderAction, ToolAction};
use crate::controller::{BuilderMode, CollisionBuilder, Mode, RagdollFactory};

use helpers::{angle_drag_value, color_row, labeled_drag_value, vector3_row};

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 60);

/// Ragdoll Factory inspector
pub fn ragdoll_factory_ui(ui: &mut Ui, tool: &mut RagdollFactory) {
    ui.horizontal(|ui| {
        for mode in Mode::all() {
            if ui
                .selectable_label(tool.mode() == *mode, mode.name())
                .clicked()
            {
                tool.queue_action(ToolAction::SetMode(*mode));
            }
        }
    });
    ui.horizontal(|ui| {
        for kind in ComponentKind::all() {
            if ui
                .selectable_label(tool.kind() == *kind, kind.display_name())
                .clicked()
            {
                tool.queue_action(ToolAction::SetKind(*kind));
            }
        }
    });

    ui.add_space(4.0);
    ui.label(tool.help_text());
    ui.separator();

    let kind = tool.kind();
    let has_selection = tool.selected().is_some();
    if has_selection {
        let changed = parameter_fields(ui, kind, tool.params_mut());
        if changed {
            tool.queue_action(ToolAction::ApplyParameters);
        }
        ui.separator();
    }

    if has_selection && kind == ComponentKind::Box && ui.button("Convert to Capsule Collider").clicked()
    {
        tool.queue_action(ToolAction::ConvertTo(ComponentKind::Capsule));
    }
    if has_selection && kind == ComponentKind::Capsule && ui.button("Convert to Box Collider").clicked()
    {
        tool.queue_action(ToolAction::ConvertTo(ComponentKind::Box));
    }
    ui.horizontal(|ui| {
        if ui.button("Delete All").clicked() {
            tool.queue_action(ToolAction::DeleteAll);
        }
        if has_selection && ui.button("Delete Selected").clicked() {
            tool.queue_action(ToolAction::DeleteSelected);
        }
    });

    warnings_ui(ui, tool.core().warnings());

    ui.collapsing("Gizmos", |ui| {
        gizmo_settings(ui, tool.core_mut().config_mut());
    });
}

/// Collision Builder inspector
pub fn collision_builder_ui(ui: &mut Ui, tool: &mut CollisionBuilder, scene: &dyn SceneGraph) {
    if let Some(header) = tool.header() {
        ui.label(RichText::new(header).strong());
    }

    let selecting = tool.mode() == BuilderMode::SelectCollider;
    ui.horizontal(|ui| {
        if (selecting || tool.kind() != ComponentKind::Box) && ui.button("Draw Boxes").clicked() {
            tool.queue_action(BuilderAction::DrawColliders(ComponentKind::Box));
        }
        if (selecting || tool.kind() != ComponentKind::Capsule)
            && ui.button("Draw Capsules").clicked()
        {
            tool.queue_action(BuilderAction::DrawColliders(ComponentKind::Capsule));
        }
        if !selecting && ui.button("Select a Collider").clicked() {
            tool.queue_action(BuilderAction::SetMode(BuilderMode::SelectCollider));
        }
    });

    let count = tool.collider_count(scene);
    if count > 0 {
        ui.horizontal(|ui| {
            if count > 1 && ui.button("DELETE ALL").clicked() {
                tool.queue_action(BuilderAction::DeleteAll);
            }
            if ui.button("DELETE LAST").clicked() {
                tool.queue_action(BuilderAction::DeleteLast);
            }
        });
    }

    if tool.selected().is_some() {
        ui.separator();
        let kind = tool.kind();
        if parameter_fields(ui, kind, tool.core_mut().params_mut()) {
            tool.queue_action(BuilderAction::ApplyParameters);
        }
        ui.horizontal(|ui| {
            let convert = match kind {
                ComponentKind::Capsule => "Convert to Box Collider",
                _ => "Convert to Capsule Collider",
            };
            if ui.button(convert).clicked() {
                tool.queue_action(BuilderAction::ConvertSelected);
            }
            if ui.button("Delete").clicked() {
                tool.queue_action(BuilderAction::DeleteSelected);
            }
        });
    }

    warnings_ui(ui, tool.core().warnings());
}

/// Fields of the parameter group of `kind`; true if any changed
fn parameter_fields(ui: &mut Ui, kind: ComponentKind, params: &mut SharedParameters) -> bool {
    let mut changed = false;
    match kind {
        ComponentKind::Capsule => {
            let capsule = &mut params.capsule;
            changed |= labeled_drag_value(ui, "Length", &mut capsule.length, 0.01, 0.0..=f32::MAX);
            changed |= labeled_drag_value(ui, "Radius", &mut capsule.radius, 0.005, 0.0..=f32::MAX);
        }
        ComponentKind::Box => {
            let size = &mut params.box_collider;
            changed |= labeled_drag_value(ui, "Length", &mut size.length, 0.01, 0.0..=f32::MAX);
            changed |= labeled_drag_value(ui, "Width", &mut size.width, 0.005, 0.0..=f32::MAX);
            changed |= labeled_drag_value(ui, "Depth", &mut size.depth, 0.005, 0.0..=f32::MAX);
        }
        ComponentKind::Joint => {
            let joint = &mut params.joint;
            let mut axis = joint.axis.to_array();
            if vector3_row(ui, "Axis", &mut axis, 0.01) {
                joint.axis = Vec3::from_array(axis);
                changed = true;
            }
            changed |= angle_drag_value(ui, "Low X Limit", &mut joint.low_x);
            changed |= angle_drag_value(ui, "High X Limit", &mut joint.high_x);
            changed |= angle_drag_value(ui, "Y Limit", &mut joint.y);
            changed |= angle_drag_value(ui, "Z Limit", &mut joint.z);
        }
        ComponentKind::Rigidbody => {
            let body = &mut params.rigidbody;
            changed |= labeled_drag_value(ui, "Mass", &mut body.mass, 0.05, 0.0..=f32::MAX);
            changed |= labeled_drag_value(ui, "Drag", &mut body.drag, 0.01, 0.0..=f32::MAX);
            changed |= labeled_drag_value(
                ui,
                "Angular Drag",
                &mut body.angular_drag,
                0.01,
                0.0..=f32::MAX,
            );
            changed |= ui.checkbox(&mut body.use_gravity, "Use Gravity").changed();
            changed |= ui.checkbox(&mut body.is_kinematic, "Is Kinematic").changed();
        }
    }
    changed
}

fn gizmo_settings(ui: &mut Ui, config: &mut ToolConfig) {
    ui.checkbox(&mut config.show_gizmos, "Show Gizmos");
    ui.checkbox(&mut config.show_names, "Show Names");
    labeled_drag_value(ui, "Disc Radius", &mut config.disc_radius, 0.001, 0.001..=1.0);
    color_row(ui, "Normal Color", &mut config.normal_color);
    color_row(ui, "Selected Color", &mut config.selected_color);
}

fn warnings_ui(ui: &mut Ui, warnings: &[String]) {
    for warning in warnings {
        ui.label(RichText::new(warning).color(WARNING_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rf_core::{Scene, ToolConfig, UndoLog};

    fn show(mut add_contents: impl FnMut(&mut Ui)) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| add_contents(ui));
        });
    }

    #[test]
    fn test_panels_render_without_queueing() {
        let mut scene = Scene::new();
        let hip = scene.spawn("Hip", None, Vec3::ZERO).unwrap();
        let spine = scene.spawn("Spine", Some(hip), Vec3::Y).unwrap();
        let mut undo = UndoLog::new();

        let mut factory = RagdollFactory::new(hip, ToolConfig::ragdoll_factory());
        factory
            .create(&mut scene, &mut undo, Some(hip), Some(spine))
            .unwrap();
        let mut builder = CollisionBuilder::enable(&scene, hip, ToolConfig::collision_builder());

        show(|ui| ragdoll_factory_ui(ui, &mut factory));
        show(|ui| collision_builder_ui(ui, &mut builder, &scene));

        assert!(factory.take_pending_actions().is_empty());
        assert!(builder.take_pending_actions().is_empty());
        assert_eq!(builder.collider_count(&scene), 1);
    }
}
