//! Undo/transaction interface
//!
//! The host's undo log is an external service. The tools tell it what they
//! create, what they are about to mutate and what they destroy; [`UndoLog`]
//! records those calls in memory.

use crate::component::{ComponentId, ComponentKind, NodeId};
use crate::scene::{SceneError, SceneGraph};

/// Object an undo record refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UndoTarget {
    Node(NodeId),
    Component(ComponentId),
    /// The tool's own state (parameters, tracking list)
    Tool,
}

/// Transaction log capability
pub trait UndoService {
    /// Record that an object was just created
    fn record_created(&mut self, target: UndoTarget, label: &str);

    /// Record the complete state of an object before it is mutated
    fn record_state(&mut self, target: UndoTarget, label: &str);

    /// Record and destroy an object immediately.
    ///
    /// Fails with [`SceneError::DestroyNotPermitted`] when the host refuses to
    /// remove the object in its current state.
    fn destroy_immediate(
        &mut self,
        scene: &mut dyn SceneGraph,
        target: UndoTarget,
    ) -> Result<(), SceneError>;

    /// Open a group; records until [`UndoService::end_group`] undo as one step
    fn begin_group(&mut self, label: &str);

    fn end_group(&mut self);
}

/// What happened to an object
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOperation {
    Created,
    StateRecorded,
    /// Destroyed; for components the kind is kept for inspection
    Destroyed(Option<ComponentKind>),
}

/// A single undo record
#[derive(Debug, Clone, PartialEq)]
pub struct UndoRecord {
    pub target: UndoTarget,
    pub operation: UndoOperation,
    pub label: String,
    /// Index of the group this record belongs to
    pub group: Option<usize>,
}

/// In-memory undo log
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
    /// Labels of every group opened so far
    groups: Vec<String>,
    /// Currently open group (nested groups merge into the outermost)
    open_group: Option<usize>,
    depth: usize,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[UndoRecord] {
        &self.records
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn is_group_open(&self) -> bool {
        self.open_group.is_some()
    }

    /// Number of successful destroy calls
    pub fn destroy_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.operation, UndoOperation::Destroyed(_)))
            .count()
    }

    /// Number of successful destroy calls on components of one kind
    pub fn destroyed_of_kind(&self, kind: ComponentKind) -> usize {
        self.records
            .iter()
            .filter(|r| r.operation == UndoOperation::Destroyed(Some(kind)))
            .count()
    }

    /// Number of successful node destroy calls
    pub fn destroyed_nodes(&self) -> usize {
        self.records
            .iter()
            .filter(|r| {
                matches!(r.target, UndoTarget::Node(_))
                    && matches!(r.operation, UndoOperation::Destroyed(_))
            })
            .count()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn push(&mut self, target: UndoTarget, operation: UndoOperation, label: &str) {
        self.records.push(UndoRecord {
            target,
            operation,
            label: label.to_string(),
            group: self.open_group,
        });
    }
}

impl UndoService for UndoLog {
    fn record_created(&mut self, target: UndoTarget, label: &str) {
        self.push(target, UndoOperation::Created, label);
    }

    fn record_state(&mut self, target: UndoTarget, label: &str) {
        self.push(target, UndoOperation::StateRecorded, label);
    }

    fn destroy_immediate(
        &mut self,
        scene: &mut dyn SceneGraph,
        target: UndoTarget,
    ) -> Result<(), SceneError> {
        let (kind, label) = match target {
            UndoTarget::Node(node) => {
                scene.destroy_node(node)?;
                (None, "Destroyed node")
            }
            UndoTarget::Component(id) => {
                let removed = scene.remove_component(id)?;
                (Some(removed.kind()), "Destroyed component")
            }
            UndoTarget::Tool => return Ok(()),
        };
        self.push(target, UndoOperation::Destroyed(kind), label);
        Ok(())
    }

    fn begin_group(&mut self, label: &str) {
        if self.depth == 0 {
            self.groups.push(label.to_string());
            self.open_group = Some(self.groups.len() - 1);
        }
        self.depth += 1;
    }

    fn end_group(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.open_group = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Rigidbody;
    use crate::scene::Scene;
    use glam::Vec3;

    #[test]
    fn test_records_are_grouped() {
        let mut log = UndoLog::new();
        log.begin_group("Create capsule");
        log.record_created(UndoTarget::Tool, "a");
        log.begin_group("nested");
        log.record_state(UndoTarget::Tool, "b");
        log.end_group();
        log.end_group();
        log.record_state(UndoTarget::Tool, "c");

        assert_eq!(log.groups(), ["Create capsule".to_string()]);
        assert_eq!(log.records()[0].group, Some(0));
        assert_eq!(log.records()[1].group, Some(0));
        assert_eq!(log.records()[2].group, None);
        assert!(!log.is_group_open());
    }

    #[test]
    fn test_failed_destroy_is_not_recorded() {
        let mut scene = Scene::new();
        let root = scene.spawn("root", None, Vec3::ZERO).unwrap();
        scene.protect(root);
        let body = scene.attach(root, Rigidbody::default().into()).unwrap();
        let mut log = UndoLog::new();

        let err = log
            .destroy_immediate(&mut scene, UndoTarget::Node(root))
            .unwrap_err();
        assert_eq!(err, SceneError::DestroyNotPermitted(root));
        assert_eq!(log.destroy_count(), 0);

        log.destroy_immediate(&mut scene, UndoTarget::Component(body))
            .unwrap();
        assert_eq!(log.destroyed_of_kind(ComponentKind::Rigidbody), 1);
        assert!(!scene.contains_component(body));
    }
}
