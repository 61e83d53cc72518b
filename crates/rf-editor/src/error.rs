//! Tool errors

use rf_core::{ComponentKind, NodeId, SceneError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("{endpoint} is not a descendant of {anchor}")]
    InvalidHierarchy { anchor: NodeId, endpoint: NodeId },
    #[error("Cannot convert {} to {}", .from.display_name(), .to.display_name())]
    UnsupportedConversion {
        from: ComponentKind,
        to: ComponentKind,
    },
    #[error("Node {0} cannot be destroyed")]
    DestroyNotPermitted(NodeId),
    #[error("Select two bones first")]
    MissingBone,
    #[error("Nothing is selected")]
    NothingSelected,
    #[error("The tool is already attached to this object")]
    AlreadyAttached,
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}
