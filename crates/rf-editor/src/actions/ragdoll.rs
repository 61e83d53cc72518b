//! Ragdoll Factory action handlers

use crate::controller::RagdollFactory;

use super::{ActionContext, ToolAction};

/// Handle a Ragdoll Factory action
pub fn handle_ragdoll_action(action: ToolAction, ctx: &mut ActionContext<'_, RagdollFactory>) {
    let mut tool = ctx.tool.lock();
    let scene = &mut *ctx.scene;
    let undo = &mut *ctx.undo;

    match action {
        ToolAction::SetMode(mode) => tool.set_mode(mode),
        ToolAction::SetKind(kind) => tool.set_kind(kind),
        ToolAction::Deselect => tool.deselect(scene, undo),
        ToolAction::ApplyParameters => {
            let result = tool.update(scene, undo);
            tool.core_mut().report("Update failed", result);
        }
        ToolAction::ConvertTo(target) => {
            let result = tool.convert_to(scene, undo, target);
            if let Some(id) = tool.core_mut().report("Conversion failed", result) {
                tracing::info!("Converted to {} {}", target.display_name(), id);
            }
        }
        ToolAction::DeleteSelected => {
            let result = tool.delete(scene, undo);
            tool.core_mut().report("Delete failed", result);
        }
        ToolAction::DeleteAll => {
            let result = tool.delete_all(scene, undo);
            tool.core_mut().report("Delete all failed", result);
        }
    }
}
