//! Collision Builder controller
//!
//! The collider-only tool. It shares the capsule and box strategies with the
//! Ragdoll Factory but has its own mode flow: the second bone click is a mode
//! of its own, and selection works across both collider kinds at once.

use rf_core::selection::Ray;
use rf_core::{
    ComponentId, ComponentKind, NodeId, SceneError, SceneGraph, ToolConfig, UndoService,
};

use super::{Mode, SceneTool, ToolCore};
use crate::actions::BuilderAction;
use crate::error::ToolError;

const COLLIDER_KINDS: [ComponentKind; 2] = [ComponentKind::Capsule, ComponentKind::Box];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum BuilderMode {
    #[default]
    CreateColliders,
    SecondBoneSelected,
    SelectCollider,
    Delete,
}

impl BuilderMode {
    /// Mode the strategies draw in
    pub fn as_mode(&self) -> Mode {
        match self {
            BuilderMode::CreateColliders | BuilderMode::SecondBoneSelected => Mode::Create,
            BuilderMode::SelectCollider => Mode::Select,
            BuilderMode::Delete => Mode::Delete,
        }
    }
}

pub struct CollisionBuilder {
    core: ToolCore,
    mode: BuilderMode,
    kind: ComponentKind,
    pending_actions: Vec<BuilderAction>,
}

impl CollisionBuilder {
    pub fn new(root: NodeId, config: ToolConfig) -> Self {
        Self {
            core: ToolCore::new(root, config),
            mode: BuilderMode::default(),
            kind: ComponentKind::Capsule,
            pending_actions: Vec::new(),
        }
    }

    /// Enable the tool on `root`, adopting the colliders already under it
    pub fn enable(scene: &dyn SceneGraph, root: NodeId, config: ToolConfig) -> Self {
        let mut tool = Self::new(root, config);
        tool.core.seed(scene, &COLLIDER_KINDS);
        tracing::info!("Collision Builder enabled on {}", root);
        tool
    }

    pub fn core(&self) -> &ToolCore {
        &self.core
    }

    /// Queue an action, dispatched on the next action pass
    pub fn queue_action(&mut self, action: BuilderAction) {
        self.pending_actions.push(action);
    }

    pub fn take_pending_actions(&mut self) -> Vec<BuilderAction> {
        std::mem::take(&mut self.pending_actions)
    }

    pub fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    pub fn mode(&self) -> BuilderMode {
        self.mode
    }

    /// Collider kind being built or last selected
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Start drawing colliders of `kind`
    pub fn draw_colliders_of(&mut self, kind: ComponentKind) {
        if !kind.is_collider() {
            tracing::warn!("{} is not a collider", kind.display_name());
            return;
        }
        self.kind = kind;
        self.set_mode(BuilderMode::CreateColliders);
    }

    pub fn set_mode(&mut self, mode: BuilderMode) {
        if mode == self.mode {
            return;
        }
        tracing::debug!("Collision Builder mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        if self.core.config().clear_selection_on_mode_switch {
            self.core.clear_bones();
        }
    }

    /// Selected collider, of either kind
    pub fn selected(&self) -> Option<ComponentId> {
        self.core.selected(self.kind)
    }

    /// Bold header of the inspector
    pub fn header(&self) -> Option<String> {
        match self.mode {
            BuilderMode::CreateColliders | BuilderMode::SecondBoneSelected => {
                let kind = match self.kind {
                    ComponentKind::Box => "BOX",
                    _ => "CAPSULE",
                };
                Some(format!("CREATING {} COLLIDERS", kind))
            }
            BuilderMode::SelectCollider => Some("SELECTING COLLIDERS".to_string()),
            BuilderMode::Delete => None,
        }
    }

    /// Colliders currently tracked and alive
    pub fn collider_count(&self, scene: &dyn SceneGraph) -> usize {
        self.core.tracked().colliders(scene).len()
    }

    /// Select a collider, switching to its kind
    pub fn select(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        component: ComponentId,
    ) -> Result<(), ToolError> {
        let kind = scene
            .component(component)
            .map(|c| c.kind())
            .filter(ComponentKind::is_collider)
            .ok_or(SceneError::ComponentNotFound(component))?;

        // One selection across both kinds
        let other = if kind == ComponentKind::Box {
            ComponentKind::Capsule
        } else {
            ComponentKind::Box
        };
        self.core
            .with_strategy(scene, undo, other, |strategy, _| strategy.deselect());
        self.kind = kind;
        self.core
            .with_strategy(scene, undo, kind, |strategy, ctx| strategy.select(ctx, component))
    }

    pub fn delete_selected(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
    ) -> Result<(), ToolError> {
        self.core
            .with_strategy(scene, undo, self.kind, |strategy, ctx| strategy.delete(ctx))
    }

    /// Delete the most recently tracked collider
    pub fn delete_last(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
    ) -> Result<(), ToolError> {
        let last = self
            .core
            .tracked()
            .colliders(&*scene)
            .last()
            .map(|entry| entry.component)
            .ok_or(ToolError::NothingSelected)?;
        let kind = scene
            .component(last)
            .map(|c| c.kind())
            .ok_or(SceneError::ComponentNotFound(last))?;
        self.core.with_strategy(scene, undo, kind, |strategy, ctx| {
            strategy.delete_component(ctx, last)
        })
    }

    /// Delete every tracked collider of both kinds
    pub fn delete_all(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
    ) -> Result<usize, ToolError> {
        let mut count = 0;
        for kind in COLLIDER_KINDS {
            count += self
                .core
                .with_strategy(scene, undo, kind, |strategy, ctx| strategy.delete_all(ctx))?;
        }
        tracing::info!("Deleted {} colliders", count);
        Ok(count)
    }

    /// Turn the selected capsule into a box or the other way round
    pub fn convert_selected(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
    ) -> Result<ComponentId, ToolError> {
        let target = match self.kind {
            ComponentKind::Capsule => ComponentKind::Box,
            _ => ComponentKind::Capsule,
        };
        let converted = self
            .core
            .with_strategy(scene, undo, self.kind, |strategy, ctx| {
                strategy.convert_to(ctx, target)
            })?;
        self.kind = target;
        self.core
            .with_strategy(scene, undo, target, |strategy, ctx| strategy.select(ctx, converted))?;
        Ok(converted)
    }

    pub fn update(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
    ) -> Result<(), ToolError> {
        self.core
            .with_strategy(scene, undo, self.kind, |strategy, ctx| strategy.update(ctx))
    }
}

impl SceneTool for CollisionBuilder {
    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn draw_mode(&self) -> Mode {
        self.mode.as_mode()
    }

    fn drawn_kinds(&self) -> Vec<ComponentKind> {
        COLLIDER_KINDS.to_vec()
    }

    fn pending_bone_label(&self) -> &'static str {
        "Select a second bone..."
    }

    fn pointer_down(&mut self, scene: &mut dyn SceneGraph, undo: &mut dyn UndoService, ray: &Ray) {
        self.core.clear_stale_selections(&*scene);
        match self.mode {
            BuilderMode::CreateColliders | BuilderMode::SecondBoneSelected => {
                if let Some(bone) = self.core.pick_bone(&*scene, ray) {
                    self.activate_bone(scene, undo, bone);
                }
            }
            BuilderMode::SelectCollider => {
                if let Some(hit) = self.core.pick_component(&*scene, ray, &COLLIDER_KINDS) {
                    let result = self.select(scene, undo, hit);
                    self.core.report("Select failed", result);
                }
            }
            BuilderMode::Delete => {
                if let Some(hit) = self.core.pick_component(&*scene, ray, &COLLIDER_KINDS) {
                    self.activate(scene, undo, hit);
                }
            }
        }
    }

    fn activate_bone(&mut self, scene: &mut dyn SceneGraph, undo: &mut dyn UndoService, bone: NodeId) {
        match self.mode {
            BuilderMode::CreateColliders => {
                self.core.set_bones(Some(bone), None);
                self.mode = BuilderMode::SecondBoneSelected;
            }
            BuilderMode::SecondBoneSelected => {
                self.core.accept_bone(scene, undo, bone, self.kind);
                self.mode = BuilderMode::CreateColliders;
            }
            BuilderMode::SelectCollider | BuilderMode::Delete => {}
        }
    }

    fn escape(&mut self) {
        self.core.clear_bones();
        if self.mode == BuilderMode::SecondBoneSelected {
            self.mode = BuilderMode::CreateColliders;
        }
    }

    fn activate(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        component: ComponentId,
    ) {
        let result = match self.mode {
            BuilderMode::SelectCollider => self.select(scene, undo, component),
            BuilderMode::Delete => match self.select(scene, undo, component) {
                Ok(()) => self.delete_selected(scene, undo),
                Err(e) => Err(e),
            },
            _ => return,
        };
        self.core.report("Action failed", result);
    }
}
