//! Tool controllers
//!
//! A controller owns the state of one tool instance: the shared parameters,
//! the bone slots, the tracking list and one strategy per component kind. It
//! turns pointer and key input into strategy calls.

mod collision_builder;
mod ragdoll_factory;

pub use collision_builder::{BuilderMode, CollisionBuilder};
pub use ragdoll_factory::RagdollFactory;

use rf_core::scene::queries;
use rf_core::selection::{self, Ray};
use rf_core::{
    ComponentId, ComponentKind, NodeId, SceneGraph, SharedParameters, ToolConfig, UndoService,
};

use crate::error::ToolError;
use crate::strategy::{
    BoxStrategy, CapsuleStrategy, ComponentStrategy, DrawContext, JointStrategy,
    RigidbodyStrategy, ToolContext, owns_collision_node,
};
use crate::tracking::TrackingList;

/// What a pointer-down does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Mode {
    #[default]
    Create,
    Select,
    Delete,
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::Create, Mode::Select, Mode::Delete]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Create => "Create",
            Mode::Select => "Select",
            Mode::Delete => "Delete",
        }
    }
}

/// State shared by both tools
pub struct ToolCore {
    root: NodeId,
    params: SharedParameters,
    tracked: TrackingList,
    anchor: Option<NodeId>,
    endpoint: Option<NodeId>,
    config: ToolConfig,
    strategies: [Box<dyn ComponentStrategy>; 4],
    warnings: Vec<String>,
    hover: Option<Ray>,
}

impl ToolCore {
    pub fn new(root: NodeId, config: ToolConfig) -> Self {
        Self {
            root,
            params: config.defaults,
            tracked: TrackingList::new(),
            anchor: None,
            endpoint: None,
            config,
            // Indexed by ComponentKind::index
            strategies: [
                Box::new(CapsuleStrategy::new()),
                Box::new(BoxStrategy::new()),
                Box::new(JointStrategy::new()),
                Box::new(RigidbodyStrategy::new()),
            ],
            warnings: Vec::new(),
            hover: None,
        }
    }

    /// Adopt the components of `kinds` already present under the root.
    ///
    /// Returns the number of entries added.
    pub fn seed(&mut self, scene: &dyn SceneGraph, kinds: &[ComponentKind]) -> usize {
        let mut added = 0;
        for kind in kinds {
            for id in queries::components_of_kind(scene, self.root, *kind) {
                if self.tracked.track(id, owns_collision_node(scene, id)) {
                    added += 1;
                }
            }
        }
        tracing::debug!("Seeded {} existing components", added);
        added
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn params(&self) -> &SharedParameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SharedParameters {
        &mut self.params
    }

    pub fn tracked(&self) -> &TrackingList {
        &self.tracked
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ToolConfig {
        &mut self.config
    }

    /// First bone slot
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Second bone slot
    pub fn endpoint(&self) -> Option<NodeId> {
        self.endpoint
    }

    pub fn clear_bones(&mut self) {
        self.anchor = None;
        self.endpoint = None;
    }

    pub fn strategy(&self, kind: ComponentKind) -> &dyn ComponentStrategy {
        self.strategies[kind.index()].as_ref()
    }

    /// Selected component of `kind`
    pub fn selected(&self, kind: ComponentKind) -> Option<ComponentId> {
        self.strategy(kind).selected()
    }

    /// Warnings raised since the last call
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn hover(&self) -> Option<Ray> {
        self.hover
    }

    pub fn set_hover(&mut self, ray: Option<Ray>) {
        self.hover = ray;
    }

    /// Run `f` with the strategy of `kind` and a context over this tool's state
    pub fn with_strategy<T>(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        kind: ComponentKind,
        f: impl FnOnce(&mut dyn ComponentStrategy, &mut ToolContext<'_>) -> T,
    ) -> T {
        let Self {
            params,
            tracked,
            config,
            strategies,
            warnings,
            ..
        } = self;
        let mut ctx = ToolContext {
            scene,
            undo,
            params,
            tracked,
            config,
            warnings,
        };
        f(strategies[kind.index()].as_mut(), &mut ctx)
    }

    pub fn draw_context<'a>(&'a self, scene: &'a dyn SceneGraph, mode: Mode) -> DrawContext<'a> {
        DrawContext {
            scene,
            tracked: &self.tracked,
            params: &self.params,
            config: &self.config,
            mode,
            hover: self.hover,
        }
    }

    /// Drop selections whose component no longer exists
    pub fn clear_stale_selections(&mut self, scene: &dyn SceneGraph) {
        for strategy in self.strategies.iter_mut() {
            if let Some(id) = strategy.selected()
                && !scene.contains_component(id)
            {
                strategy.deselect();
            }
        }
    }

    /// Bone under the cursor
    pub fn pick_bone(&self, scene: &dyn SceneGraph, ray: &Ray) -> Option<NodeId> {
        let candidates = queries::bones(scene, self.root)
            .filter_map(|bone| Some((bone, scene.world_position(bone)?)));
        selection::pick_with_threshold(ray, candidates, self.config.hit_threshold)
    }

    /// Component of one of `kinds` under the cursor, searched in the live hierarchy
    pub fn pick_component(
        &self,
        scene: &dyn SceneGraph,
        ray: &Ray,
        kinds: &[ComponentKind],
    ) -> Option<ComponentId> {
        let candidates = kinds
            .iter()
            .flat_map(|kind| queries::components_of_kind(scene, self.root, *kind))
            .filter_map(|id| Some((id, scene.component_position(id)?)));
        selection::pick_with_threshold(ray, candidates, self.config.hit_threshold)
    }

    /// Fill the bone slots from a click in create mode
    pub fn click_bone(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        ray: &Ray,
        kind: ComponentKind,
    ) -> Option<ComponentId> {
        let bone = self.pick_bone(&*scene, ray)?;
        self.accept_bone(scene, undo, bone, kind)
    }

    /// Put a clicked bone into the next free slot.
    ///
    /// Kinds that need an anchor take the first bone into the anchor slot.
    /// The bone completing the pair runs the strategy's create and clears
    /// both slots whatever the outcome.
    pub fn accept_bone(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        bone: NodeId,
        kind: ComponentKind,
    ) -> Option<ComponentId> {
        if kind.needs_anchor_bone() && self.anchor.is_none() {
            self.anchor = Some(bone);
            tracing::debug!("First bone {}", bone);
            return None;
        }
        self.endpoint = Some(bone);
        let result = self.create_from_slots(scene, undo, kind);
        self.report("Create failed", result)
    }

    /// Create a component of `kind` from the bone slots, then clear them
    pub fn create_from_slots(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        kind: ComponentKind,
    ) -> Result<ComponentId, ToolError> {
        let (anchor, endpoint) = (self.anchor, self.endpoint);
        let result = self.with_strategy(scene, undo, kind, |strategy, ctx| {
            strategy.create(ctx, anchor, endpoint)
        });
        self.clear_bones();
        result
    }

    /// Turn an interactive failure into a logged, user-visible warning
    pub fn report<T>(&mut self, action: &str, result: Result<T, ToolError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let message = format!("{}: {}", action, e);
                tracing::warn!("{}", message);
                self.warnings.push(message);
                None
            }
        }
    }

    pub(crate) fn set_bones(&mut self, anchor: Option<NodeId>, endpoint: Option<NodeId>) {
        self.anchor = anchor;
        self.endpoint = endpoint;
    }
}

/// The surface both tools expose to the scene view
pub trait SceneTool {
    fn core(&self) -> &ToolCore;

    fn core_mut(&mut self) -> &mut ToolCore;

    /// Mode the strategies draw in
    fn draw_mode(&self) -> Mode;

    /// Kinds whose affordances are drawn
    fn drawn_kinds(&self) -> Vec<ComponentKind>;

    /// Label shown next to the first bone while the second is pending
    fn pending_bone_label(&self) -> &'static str;

    fn pointer_down(&mut self, scene: &mut dyn SceneGraph, undo: &mut dyn UndoService, ray: &Ray);

    fn escape(&mut self);

    /// A bone button was clicked in create mode
    fn activate_bone(&mut self, scene: &mut dyn SceneGraph, undo: &mut dyn UndoService, bone: NodeId);

    /// A hit region was clicked
    fn activate(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        component: ComponentId,
    );

    /// Push the parameters onto the selected component of `kind`
    fn update_kind(
        &mut self,
        scene: &mut dyn SceneGraph,
        undo: &mut dyn UndoService,
        kind: ComponentKind,
    ) {
        let result = self
            .core_mut()
            .with_strategy(scene, undo, kind, |strategy, ctx| strategy.update(ctx));
        self.core_mut().report("Update failed", result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rf_core::{BoxCollider, Scene, UndoLog};

    fn chain() -> (Scene, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new();
        let hip = scene.spawn("Hip", None, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let spine = scene
            .spawn("Spine", Some(hip), Vec3::new(0.0, 0.5, 0.0))
            .unwrap();
        let head = scene
            .spawn("Head", Some(spine), Vec3::new(0.0, 0.5, 0.0))
            .unwrap();
        (scene, hip, spine, head)
    }

    fn ray_at(point: Vec3) -> Ray {
        Ray::towards(point + Vec3::new(0.0, 0.0, 5.0), point)
    }

    #[test]
    fn test_seed_adopts_existing_components() {
        let (mut scene, hip, spine, _) = chain();
        let node = scene.spawn("Hip - Spine", Some(hip), Vec3::ZERO).unwrap();
        scene.mark_collision_object(node).unwrap();
        let on_node = scene.attach(node, BoxCollider::default().into()).unwrap();
        let on_bone = scene.attach(spine, BoxCollider::default().into()).unwrap();

        let mut core = ToolCore::new(hip, ToolConfig::default());
        assert_eq!(core.seed(&scene, &[ComponentKind::Box]), 2);
        assert!(core.tracked().get(on_node).unwrap().owns_node);
        assert!(!core.tracked().get(on_bone).unwrap().owns_node);
        // Seeding twice adds nothing
        assert_eq!(core.seed(&scene, &[ComponentKind::Box]), 0);
    }

    #[test]
    fn test_pick_bone_skips_collision_nodes() {
        let (mut scene, hip, spine, _) = chain();
        let node = scene
            .spawn("Hip - Spine", Some(hip), Vec3::new(0.0, 0.5, 0.0))
            .unwrap();
        scene.attach(node, BoxCollider::default().into()).unwrap();
        let core = ToolCore::new(hip, ToolConfig::default());

        let ray = ray_at(Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(core.pick_bone(&scene, &ray), Some(spine));
    }

    #[test]
    fn test_pick_bone_misses() {
        let (scene, hip, _, _) = chain();
        let core = ToolCore::new(hip, ToolConfig::default());
        let ray = ray_at(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(core.pick_bone(&scene, &ray), None);
    }

    #[test]
    fn test_click_bone_fills_slots_then_clears() {
        let (mut scene, hip, _, _) = chain();
        let mut undo = UndoLog::new();
        let mut core = ToolCore::new(hip, ToolConfig::default());

        let first = ray_at(Vec3::new(0.0, 1.0, 0.0));
        let created = core.click_bone(&mut scene, &mut undo, &first, ComponentKind::Capsule);
        assert!(created.is_none());
        assert_eq!(core.anchor(), Some(hip));

        let second = ray_at(Vec3::new(0.0, 2.0, 0.0));
        let created = core.click_bone(&mut scene, &mut undo, &second, ComponentKind::Capsule);
        assert!(created.is_some());
        assert_eq!(core.anchor(), None);
        assert_eq!(core.endpoint(), None);
        assert!(scene.find_by_name("Hip - Head").is_some());
    }

    #[test]
    fn test_failed_create_becomes_warning() {
        let (mut scene, hip, _, _) = chain();
        let mut undo = UndoLog::new();
        let mut core = ToolCore::new(hip, ToolConfig::default());

        let ray = ray_at(Vec3::new(0.0, 1.0, 0.0));
        core.click_bone(&mut scene, &mut undo, &ray, ComponentKind::Box);
        core.click_bone(&mut scene, &mut undo, &ray, ComponentKind::Box);

        assert_eq!(core.anchor(), None);
        let warnings = core.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Create failed"));
        assert!(core.take_warnings().is_empty());
    }

    #[test]
    fn test_clear_stale_selections() {
        let (mut scene, hip, spine, _) = chain();
        let mut undo = UndoLog::new();
        let mut core = ToolCore::new(hip, ToolConfig::default());
        let id = scene.attach(spine, BoxCollider::default().into()).unwrap();
        core.with_strategy(&mut scene, &mut undo, ComponentKind::Box, |s, ctx| {
            s.select(ctx, id)
        })
        .unwrap();

        scene.remove_component(id).unwrap();
        core.clear_stale_selections(&scene);
        assert_eq!(core.selected(ComponentKind::Box), None);
    }
}
