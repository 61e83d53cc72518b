//! Collision Builder action handlers

use crate::controller::CollisionBuilder;

use super::{ActionContext, BuilderAction};

/// Handle a Collision Builder action
pub fn handle_builder_action(action: BuilderAction, ctx: &mut ActionContext<'_, CollisionBuilder>) {
    let mut tool = ctx.tool.lock();
    let scene = &mut *ctx.scene;
    let undo = &mut *ctx.undo;

    match action {
        BuilderAction::DrawColliders(kind) => tool.draw_colliders_of(kind),
        BuilderAction::SetMode(mode) => tool.set_mode(mode),
        BuilderAction::ApplyParameters => {
            let result = tool.update(scene, undo);
            tool.core_mut().report("Update failed", result);
        }
        BuilderAction::ConvertSelected => {
            let result = tool.convert_selected(scene, undo);
            tool.core_mut().report("Conversion failed", result);
        }
        BuilderAction::DeleteSelected => {
            let result = tool.delete_selected(scene, undo);
            tool.core_mut().report("Delete failed", result);
        }
        BuilderAction::DeleteLast => {
            let result = tool.delete_last(scene, undo);
            tool.core_mut().report("Delete last failed", result);
        }
        BuilderAction::DeleteAll => {
            let result = tool.delete_all(scene, undo);
            tool.core_mut().report("Delete all failed", result);
        }
    }
}
