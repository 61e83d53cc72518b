//! Ragdoll Factory controller

use rf_core::selection::Ray;
use rf_core::{
    ComponentId, ComponentKind, NodeId, SceneError, SceneGraph, SharedParameters, ToolConfig,
    UndoService,
};

use super::{Mode, SceneTool, ToolCore};
use crate::actions::ToolAction;
use crate::error::ToolError;

/// Create, select and delete any of the four component kinds on a skeleton
pub struct RagdollFactory {
    core: ToolCore,
    mode: Mode,
    kind: ComponentKind,
    pending_actions: Vec<ToolAction>,
}

impl RagdollFactory {
    pub fn new(root: NodeId, config: ToolConfig) -> Self {
        Self {
            core: ToolCore::new(root, config),
            mode: Mode::default(),
            kind: ComponentKind::default(),
            pending_actions: Vec::new(),
        }
    }

    /// Enable the tool on `root`, adopting the components already under it
    pub fn enable(scene: &dyn SceneGraph, root: NodeId, config: ToolConfig) -> Self {
        let mut tool = Self::new(root, config);
        tool.core.seed(scene, ComponentKind::all());
        tracing::info!("Ragdoll Factory enabled on {}", root);
        tool
    }

    pub fn core(&self) -> &ToolCore {
        &self.core
    }

    /// Queue an action, dispatched on the next action pass
    pub fn queue_action(&mut self, action: ToolAction) {
        self.pending_actions.push(action);
    }

    pub fn take_pending_actions(&mut self) -> Vec<ToolAction> {
        std::mem::take(&mut self.pending_actions)
    }

    pub fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    pub fn params(&self) -> &SharedParameters {
        self.core.params()
    }

    pub fn params_mut(&mut self) -> &mut SharedParameters {
        self.core.params_mut()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        tracing::debug!("Mode {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        if self.core.config().clear_selection_on_mode_switch {
            self.core.clear_bones();
        }
    }

    /// Active component kind
    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ComponentKind) {
        if kind == self.kind {
            return;
        }
        tracing::debug!(
            "Kind {} -> {}",
            self.kind.display_name(),
            kind.display_name()
        );
        self.kind = kind;
        if self.core.config().clear_selection_on_mode_switch {
            self.core.clear_bones();
        }
    }

    /// Selected component of the active kind
    pub fn selected(&self) -> Option<ComponentId> {
        self.core.selected(self.kind)
    }

    /// Whether the anchor bone is set and the endpoint is pending
    pub fn is_first_bone_selected(&self) -> bool {
        self.core.anchor().is_some()
    }

    /// Create a component of the active kind between two bones.
    ///
    /// The bone slots are cleared whatever the outcome.
    pub fn create(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        anchor: Option<NodeId>,
        endpoint: Option<NodeId>,
    ) -> Result<ComponentId, ToolError> {
        self.core.set_bones(anchor, endpoint);
        self.core.create_from_slots(scene, undo, self.kind)
    }

    /// Select a component, switching to its kind
    pub fn select(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        component: ComponentId,
    ) -> Result<(), ToolError> {
        let kind = scene
            .component(component)
            .map(|c| c.kind())
            .ok_or(SceneError::ComponentNotFound(component))?;
        self.set_kind(kind);
        self.core
            .with_strategy(scene, undo, kind, |strategy, ctx| strategy.select(ctx, component))
    }

    pub fn deselect(&mut self, scene: &mut dyn SceneGraph, undo: &mut dyn UndoService) {
        self.core
            .with_strategy(scene, undo, self.kind, |strategy, _| strategy.deselect());
    }

    /// Delete the selected component of the active kind
    pub fn delete(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
    ) -> Result<(), ToolError> {
        self.core
            .with_strategy(scene, undo, self.kind, |strategy, ctx| strategy.delete(ctx))
    }

    /// Delete every tracked component of the active kind
    pub fn delete_all(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
    ) -> Result<usize, ToolError> {
        let count = self
            .core
            .with_strategy(scene, undo, self.kind, |strategy, ctx| strategy.delete_all(ctx))?;
        tracing::info!("Deleted {} {} components", count, self.kind.display_name());
        Ok(count)
    }

    /// Convert the selected collider and select the result under its new kind
    pub fn convert_to(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        target: ComponentKind,
    ) -> Result<ComponentId, ToolError> {
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

    /// Push the parameters onto the selected component of the active kind
    pub fn update(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
    ) -> Result<(), ToolError> {
        self.core
            .with_strategy(scene, undo, self.kind, |strategy, ctx| strategy.update(ctx))
    }

    /// Hint for the current mode and kind
    pub fn help_text(&self) -> &'static str {
        let first_bone = self.is_first_bone_selected();
        match (self.kind, self.mode) {
            (ComponentKind::Capsule | ComponentKind::Box, Mode::Create) if first_bone => {
                "Now select the end point for your collider."
            }
            (ComponentKind::Capsule | ComponentKind::Box, Mode::Create) => {
                "Select the bone that's going to have a collider."
            }
            (ComponentKind::Capsule | ComponentKind::Box, Mode::Select) => {
                "Select a collider in the scene view with left click to begin editing its properties."
            }
            (ComponentKind::Capsule | ComponentKind::Box, Mode::Delete) => {
                "Select a collider in the scene view with left click to delete it."
            }
            (ComponentKind::Joint, Mode::Create) if first_bone => {
                "Select the bone that is going to have the joint connecting to the first bone."
            }
            (ComponentKind::Joint, Mode::Create) => {
                "Select the bone that is going to be the parent of the joint you want to create."
            }
            (ComponentKind::Joint, Mode::Select) => {
                "Select a joint in the scene view with left click to edit its properties."
            }
            (ComponentKind::Joint, Mode::Delete) => {
                "Select a joint in the scene view with left click to delete it."
            }
            (ComponentKind::Rigidbody, Mode::Create) => "Click on a bone to create a rigidbody on it.",
            (ComponentKind::Rigidbody, Mode::Select) => "Click on a rigidbody to edit its properties.",
            (ComponentKind::Rigidbody, Mode::Delete) => "Click on a rigidbody to delete it.",
        }
    }
}

impl SceneTool for RagdollFactory {
    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn draw_mode(&self) -> Mode {
        self.mode
    }

    fn drawn_kinds(&self) -> Vec<ComponentKind> {
        vec![self.kind]
    }

    fn pending_bone_label(&self) -> &'static str {
        "Waiting for second bone..."
    }

    fn pointer_down(&mut self, scene: &mut dyn SceneGraph, undo: &mut dyn UndoService, ray: &Ray) {
        self.core.clear_stale_selections(&*scene);
        match self.mode {
            Mode::Create => {
                self.core.click_bone(scene, undo, ray, self.kind);
            }
            Mode::Select => {
                let Some(hit) = self.core.pick_component(&*scene, ray, &[self.kind]) else {
                    return;
                };
                let result = self
                    .core
                    .with_strategy(scene, undo, self.kind, |strategy, ctx| strategy.select(ctx, hit));
                self.core.report("Select failed", result);
            }
            Mode::Delete => {
                let Some(hit) = self.core.pick_component(&*scene, ray, &[self.kind]) else {
                    return;
                };
                let result = self.core.with_strategy(scene, undo, self.kind, |strategy, ctx| {
                    strategy.delete_component(ctx, hit)
                });
                self.core.report("Delete failed", result);
            }
        }
    }

    fn escape(&mut self) {
        self.core.clear_bones();
    }

    fn activate_bone(&mut self, scene: &mut dyn SceneGraph, undo: &mut dyn UndoService, bone: NodeId) {
        if self.mode == Mode::Create {
            self.core.accept_bone(scene, undo, bone, self.kind);
        }
    }

    fn activate(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        component: ComponentId,
    ) {
        let Some(kind) = scene.component(component).map(|c| c.kind()) else {
            return;
        };
        let result = match self.mode {
            Mode::Create => return,
            Mode::Select => self
                .core
                .with_strategy(scene, undo, kind, |strategy, ctx| strategy.select(ctx, component)),
            Mode::Delete => self.core.with_strategy(scene, undo, kind, |strategy, ctx| {
                strategy.delete_component(ctx, component)
            }),
        };
        self.core.report("Action failed", result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use rf_core::{CapsuleCollider, Rigidbody, Scene, UndoLog};

    struct Rig {
        scene: Scene,
        undo: UndoLog,
        tool: RagdollFactory,
        hip: NodeId,
        spine: NodeId,
        head: NodeId,
    }

    impl Rig {
        fn new() -> Self {
            let mut scene = Scene::new();
            let hip = scene.spawn("Hip", None, Vec3::new(0.0, 1.0, 0.0)).unwrap();
            let spine = scene
                .spawn("Spine", Some(hip), Vec3::new(0.0, 0.5, 0.0))
                .unwrap();
            let head = scene
                .spawn("Head", Some(spine), Vec3::new(0.0, 0.5, 0.0))
                .unwrap();
            let tool = RagdollFactory::enable(&scene, hip, ToolConfig::default());
            Self {
                scene,
                undo: UndoLog::new(),
                tool,
                hip,
                spine,
                head,
            }
        }

        fn click(&mut self, node: NodeId) {
            let target = self.scene.world_position(node).unwrap();
            let ray = Ray::towards(target + Vec3::new(0.0, 0.0, 5.0), target);
            self.tool.pointer_down(&mut self.scene, &mut self.undo, &ray);
        }

        fn click_component(&mut self, id: ComponentId) {
            let target = self.scene.component_position(id).unwrap();
            let ray = Ray::towards(target + Vec3::new(5.0, 0.0, 0.0), target);
            self.tool.pointer_down(&mut self.scene, &mut self.undo, &ray);
        }
    }

    #[test]
    fn test_two_clicks_create_capsule() {
        let mut rig = Rig::new();
        let (hip, head) = (rig.hip, rig.head);

        rig.click(hip);
        assert!(rig.tool.is_first_bone_selected());
        rig.click(head);

        let id = rig.tool.selected().unwrap();
        let capsule = *rig.scene.component(id).unwrap().as_capsule().unwrap();
        assert_relative_eq!(capsule.height, 1.0 + 0.1);
        assert_relative_eq!(capsule.center.z, 0.5);
        assert_relative_eq!(rig.tool.params().capsule.length, 1.0);
        assert!(!rig.tool.is_first_bone_selected());
        assert!(rig.tool.core().tracked().get(id).unwrap().owns_node);
    }

    #[test]
    fn test_reversed_bones_warn_and_clear() {
        let mut rig = Rig::new();
        let (hip, head) = (rig.hip, rig.head);
        let nodes = rig.scene.node_count();

        rig.click(head);
        rig.click(hip);

        assert!(!rig.tool.is_first_bone_selected());
        assert_eq!(rig.scene.node_count(), nodes);
        assert!(rig.tool.selected().is_none());
        assert_eq!(rig.tool.core_mut().take_warnings().len(), 1);
    }

    #[test]
    fn test_create_api_reports_invalid_hierarchy() {
        let mut rig = Rig::new();
        let (hip, head) = (rig.hip, rig.head);
        let err = rig
            .tool
            .create(&mut rig.scene, &mut rig.undo, Some(head), Some(hip))
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::InvalidHierarchy {
                anchor: head,
                endpoint: hip
            }
        );
        assert_eq!(rig.tool.core().anchor(), None);
    }

    #[test]
    fn test_joint_scenario() {
        let mut rig = Rig::new();
        let (hip, spine) = (rig.hip, rig.spine);
        rig.tool.set_kind(ComponentKind::Joint);
        rig.tool.params_mut().joint.low_x = 20.0;

        rig.click(hip);
        rig.click(spine);

        let id = rig.tool.selected().unwrap();
        let joint = *rig.scene.component(id).unwrap().as_joint().unwrap();
        let hip_body = rig
            .scene
            .find_component(hip, ComponentKind::Rigidbody)
            .unwrap();
        assert_eq!(joint.connected_body, Some(hip_body));
        assert_eq!(joint.low_angular_x_limit, -20.0);
        assert_eq!(rig.scene.component_node(id), Some(spine));
        assert_eq!(rig.scene.count_of_kind(ComponentKind::Rigidbody), 2);
    }

    #[test]
    fn test_rigidbody_needs_one_click() {
        let mut rig = Rig::new();
        let spine = rig.spine;
        rig.tool.set_kind(ComponentKind::Rigidbody);

        rig.click(spine);

        let id = rig.tool.selected().unwrap();
        assert_eq!(rig.scene.component_node(id), Some(spine));
        assert!(!rig.tool.is_first_bone_selected());
    }

    #[test]
    fn test_select_mode_pulls_parameters() {
        let mut rig = Rig::new();
        let (hip, head) = (rig.hip, rig.head);
        rig.click(hip);
        rig.click(head);
        let id = rig.tool.selected().unwrap();
        rig.tool.deselect(&mut rig.scene, &mut rig.undo);

        rig.scene
            .component_mut(id)
            .unwrap()
            .as_capsule_mut()
            .unwrap()
            .radius = 0.3;
        rig.tool.set_mode(Mode::Select);
        rig.click_component(id);

        assert_eq!(rig.tool.selected(), Some(id));
        assert_relative_eq!(rig.tool.params().capsule.radius, 0.3);
    }

    #[test]
    fn test_select_mode_ignores_other_kinds() {
        let mut rig = Rig::new();
        let spine = rig.spine;
        let body = rig
            .scene
            .attach(spine, Rigidbody::default().into())
            .unwrap();
        rig.tool.set_mode(Mode::Select);

        rig.click_component(body);
        assert!(rig.tool.selected().is_none());
    }

    #[test]
    fn test_delete_mode_removes_collision_node() {
        let mut rig = Rig::new();
        let (hip, head) = (rig.hip, rig.head);
        rig.click(hip);
        rig.click(head);
        let id = rig.tool.selected().unwrap();
        let node = rig.scene.component_node(id).unwrap();

        rig.tool.set_mode(Mode::Delete);
        rig.click_component(id);

        assert!(!rig.scene.contains_node(node));
        assert!(rig.tool.core().tracked().is_empty());
        assert!(rig.tool.selected().is_none());
    }

    #[test]
    fn test_escape_clears_bones() {
        let mut rig = Rig::new();
        let hip = rig.hip;
        rig.click(hip);
        rig.tool.escape();
        assert!(!rig.tool.is_first_bone_selected());
    }

    #[test]
    fn test_mode_switch_clears_bones_when_configured() {
        let mut rig = Rig::new();
        let hip = rig.hip;
        rig.click(hip);
        rig.tool.set_kind(ComponentKind::Box);
        assert!(!rig.tool.is_first_bone_selected());

        rig.tool.core_mut().config_mut().clear_selection_on_mode_switch = false;
        rig.click(hip);
        rig.tool.set_mode(Mode::Select);
        rig.tool.set_mode(Mode::Create);
        assert!(rig.tool.is_first_bone_selected());
    }

    #[test]
    fn test_delete_falls_back_on_protected_node() {
        let mut rig = Rig::new();
        let (hip, spine) = (rig.hip, rig.spine);
        let id = rig
            .tool
            .create(&mut rig.scene, &mut rig.undo, Some(hip), Some(spine))
            .unwrap();
        let node = rig.scene.component_node(id).unwrap();
        rig.scene.protect(node);

        rig.tool.delete(&mut rig.scene, &mut rig.undo).unwrap();

        assert!(rig.scene.contains_node(node));
        assert!(!rig.scene.contains_component(id));
        let warnings = rig.tool.core_mut().take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Hip - Spine"));
    }

    #[test]
    fn test_convert_switches_kind_and_selects() {
        let mut rig = Rig::new();
        let (hip, head) = (rig.hip, rig.head);
        rig.tool
            .create(&mut rig.scene, &mut rig.undo, Some(hip), Some(head))
            .unwrap();

        let converted = rig
            .tool
            .convert_to(&mut rig.scene, &mut rig.undo, ComponentKind::Box)
            .unwrap();

        assert_eq!(rig.tool.kind(), ComponentKind::Box);
        assert_eq!(rig.tool.selected(), Some(converted));
        assert_relative_eq!(rig.tool.params().box_collider.length, 1.0);
        assert_relative_eq!(rig.tool.params().box_collider.width, 0.2);
    }

    #[test]
    fn test_convert_joint_is_rejected() {
        let mut rig = Rig::new();
        rig.tool.set_kind(ComponentKind::Joint);
        let err = rig
            .tool
            .convert_to(&mut rig.scene, &mut rig.undo, ComponentKind::Box)
            .unwrap_err();
        assert!(matches!(err, ToolError::UnsupportedConversion { .. }));
        assert_eq!(rig.tool.kind(), ComponentKind::Joint);
    }

    #[test]
    fn test_enable_seeds_existing_colliders() {
        let mut scene = Scene::new();
        let hip = scene.spawn("Hip", None, Vec3::ZERO).unwrap();
        let node = scene.spawn("Hip - Leg", Some(hip), Vec3::ZERO).unwrap();
        scene.mark_collision_object(node).unwrap();
        let id = scene
            .attach(node, CapsuleCollider::default().into())
            .unwrap();
        let mut undo = UndoLog::new();

        let mut tool = RagdollFactory::enable(&scene, hip, ToolConfig::default());
        assert_eq!(tool.delete_all(&mut scene, &mut undo).unwrap(), 1);
        assert!(!scene.contains_node(node));
        assert!(!scene.contains_component(id));
    }

    #[test]
    fn test_help_text_follows_bone_slots() {
        let mut rig = Rig::new();
        let hip = rig.hip;
        assert_eq!(
            rig.tool.help_text(),
            "Select the bone that's going to have a collider."
        );
        rig.click(hip);
        assert_eq!(
            rig.tool.help_text(),
            "Now select the end point for your collider."
        );
    }
}
