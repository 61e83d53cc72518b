//! Per-kind component strategies
//!
//! Each strategy knows how to create, update, select, convert, delete and draw
//! one kind of physics component. Selection bookkeeping and the delete policy
//! are shared through the trait's provided methods; geometry lives in the
//! implementations.

mod box_collider;
mod capsule;
mod joint;
mod rigidbody;
#[cfg(test)]
pub(crate) mod testing;

pub use box_collider::BoxStrategy;
pub use capsule::CapsuleStrategy;
pub use joint::JointStrategy;
pub use rigidbody::RigidbodyStrategy;

use rf_core::scene::SceneGraph;
use rf_core::selection::{self, Ray};
use rf_core::{
    Component, ComponentId, ComponentKind, NodeId, SceneError, SharedParameters, ToolConfig,
    UndoService, UndoTarget,
};

use crate::controller::Mode;
use crate::error::ToolError;
use crate::scene_view::SceneResponse;
use crate::surface::{Color, InteractionSurface};
use crate::tracking::{TrackedComponent, TrackingList};

/// Mutable state a strategy operation works on
pub struct ToolContext<'a> {
    pub scene: &'a mut dyn SceneGraph,
    pub undo: &'a mut dyn UndoService,
    pub params: &'a mut SharedParameters,
    pub tracked: &'a mut TrackingList,
    pub config: &'a ToolConfig,
    /// User-visible warnings raised by recovered failures
    pub warnings: &'a mut Vec<String>,
}

impl ToolContext<'_> {
    fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Read-only state for the draw pass
pub struct DrawContext<'a> {
    pub scene: &'a dyn SceneGraph,
    pub tracked: &'a TrackingList,
    pub params: &'a SharedParameters,
    pub config: &'a ToolConfig,
    pub mode: Mode,
    /// Last pointer ray, if the pointer is over the viewport
    pub hover: Option<Ray>,
}

impl DrawContext<'_> {
    /// Tracked component of `kind` under the cursor
    pub fn hovered(&self, kind: ComponentKind) -> Option<ComponentId> {
        let ray = self.hover?;
        let candidates = self
            .tracked
            .of_kind(self.scene, kind)
            .into_iter()
            .filter_map(|e| Some((e.component, self.scene.component_position(e.component)?)));
        selection::pick_with_threshold(&ray, candidates, self.config.hit_threshold)
    }

    /// Fill color of a hit region
    pub fn region_color(&self, selected: bool, highlighted: bool) -> Color {
        if selected || highlighted {
            self.config.selected_color
        } else {
            self.config.normal_color
        }
    }

    /// Whether hit regions accept clicks in the current mode
    pub fn accepts_clicks(&self) -> bool {
        matches!(self.mode, Mode::Select | Mode::Delete)
    }
}

/// Create, edit and delete components of one kind
pub trait ComponentStrategy: Send {
    fn kind(&self) -> ComponentKind;

    /// Currently selected component, if any
    fn selected(&self) -> Option<ComponentId>;

    fn set_selected(&mut self, component: Option<ComponentId>);

    /// Create a component between an anchor bone and an endpoint bone, then
    /// track and select it
    fn create(
        &mut self,
        ctx: &mut ToolContext<'_>,
        anchor: Option<NodeId>,
        endpoint: Option<NodeId>,
    ) -> Result<ComponentId, ToolError>;

    /// Clamp the parameters of this kind and write them onto `component`
    fn apply_parameters(&self, params: &mut SharedParameters, component: &mut Component);

    /// Read live values of `component` into the parameters
    fn pull_parameters(&self, component: &Component, params: &mut SharedParameters);

    /// Draw affordances for every tracked component of this kind
    fn draw(&self, ctx: &DrawContext<'_>, surface: &mut dyn InteractionSurface)
    -> Vec<SceneResponse>;

    /// Components destroyed together with `component`
    fn companions(&self, _scene: &dyn SceneGraph, _component: ComponentId) -> Vec<ComponentId> {
        Vec::new()
    }

    /// Replace the selected component with one of `target` kind on the same node
    fn convert_to(
        &mut self,
        _ctx: &mut ToolContext<'_>,
        target: ComponentKind,
    ) -> Result<ComponentId, ToolError> {
        Err(ToolError::UnsupportedConversion {
            from: self.kind(),
            to: target,
        })
    }

    fn is_selected(&self, component: ComponentId) -> bool {
        self.selected() == Some(component)
    }

    /// Push the parameters onto the selected component
    fn update(&mut self, ctx: &mut ToolContext<'_>) -> Result<(), ToolError> {
        let Some(id) = self.selected() else {
            return Ok(());
        };
        if !ctx.scene.contains_component(id) {
            self.set_selected(None);
            return Ok(());
        }

        let label = format!("Update {}", self.kind().display_name());
        ctx.undo.record_state(UndoTarget::Component(id), &label);
        let component = ctx
            .scene
            .component_mut(id)
            .ok_or(SceneError::ComponentNotFound(id))?;
        self.apply_parameters(ctx.params, component);
        Ok(())
    }

    /// Track and select a component, pulling its values into the parameters
    fn select(&mut self, ctx: &mut ToolContext<'_>, component: ComponentId) -> Result<(), ToolError> {
        let live = ctx
            .scene
            .component(component)
            .filter(|c| c.kind() == self.kind())
            .copied()
            .ok_or(SceneError::ComponentNotFound(component))?;

        ctx.tracked.prune(&*ctx.scene);
        let owns_node = owns_collision_node(&*ctx.scene, component);
        ctx.tracked.track(component, owns_node);
        self.set_selected(Some(component));
        self.pull_parameters(&live, ctx.params);
        tracing::debug!("Selected {} {}", self.kind().display_name(), component);
        Ok(())
    }

    fn deselect(&mut self) {
        self.set_selected(None);
    }

    /// Destroy the selected component, then untrack it.
    ///
    /// A failed destroy leaves the entry tracked and selected.
    fn delete(&mut self, ctx: &mut ToolContext<'_>) -> Result<(), ToolError> {
        let component = self.selected().ok_or(ToolError::NothingSelected)?;

        let companions = self.companions(&*ctx.scene, component);
        let entry = ctx.tracked.get(component).copied().unwrap_or(TrackedComponent {
            component,
            owns_node: false,
        });
        let destroyed = destroy_tracked(ctx, entry)?;
        ctx.tracked.remove(component);
        self.set_selected(None);
        if destroyed {
            tracing::info!("Deleted {} {}", self.kind().display_name(), component);
        }

        for companion in companions {
            ctx.tracked.remove(companion);
            if ctx.scene.contains_component(companion) {
                ctx.undo
                    .destroy_immediate(ctx.scene, UndoTarget::Component(companion))?;
            }
        }
        Ok(())
    }

    /// Select `component` and delete it
    fn delete_component(
        &mut self,
        ctx: &mut ToolContext<'_>,
        component: ComponentId,
    ) -> Result<(), ToolError> {
        self.select(ctx, component)?;
        self.delete(ctx)
    }

    /// Delete every tracked component of this kind, first entry first.
    ///
    /// Returns the number of components deleted.
    fn delete_all(&mut self, ctx: &mut ToolContext<'_>) -> Result<usize, ToolError> {
        let mut deleted = 0;
        loop {
            ctx.tracked.prune(&*ctx.scene);
            let Some(entry) = ctx
                .tracked
                .of_kind(&*ctx.scene, self.kind())
                .first()
                .copied()
            else {
                break;
            };
            self.set_selected(Some(entry.component));
            self.delete(ctx)?;
            deleted += 1;
        }
        Ok(deleted)
    }
}

/// Run `f` inside one undo group
pub(crate) fn grouped<T>(
    ctx: &mut ToolContext<'_>,
    label: &str,
    f: impl FnOnce(&mut ToolContext<'_>) -> Result<T, ToolError>,
) -> Result<T, ToolError> {
    ctx.undo.begin_group(label);
    let result = f(ctx);
    ctx.undo.end_group();
    result
}

/// Whether the tool may destroy the node a collider lives on.
///
/// Only nodes a tool created for a collision primitive qualify; bones and
/// other host nodes never do.
pub fn owns_collision_node(scene: &dyn SceneGraph, component: ComponentId) -> bool {
    let Some(node) = scene.component_node(component) else {
        return false;
    };
    scene.component(component).is_some_and(Component::is_collider)
        && scene.is_collision_object(node)
}

/// Destroy a tracked component according to its ownership.
///
/// A node the host refuses to destroy downgrades to destroying the component
/// with a warning. Returns false when the component was already gone.
pub(crate) fn destroy_tracked(
    ctx: &mut ToolContext<'_>,
    entry: TrackedComponent,
) -> Result<bool, ToolError> {
    if !ctx.scene.contains_component(entry.component) {
        return Ok(false);
    }

    if entry.owns_node
        && let Some(node) = ctx.scene.component_node(entry.component)
    {
        match ctx.undo.destroy_immediate(ctx.scene, UndoTarget::Node(node)) {
            Ok(()) => return Ok(true),
            Err(SceneError::DestroyNotPermitted(_)) => {
                let name = ctx.scene.name(node).unwrap_or_default().to_string();
                ctx.warn(format!(
                    "Unable to delete '{}', deleting the component instead (is it part of a model?)",
                    name
                ));
            }
            Err(e) => return Err(e.into()),
        }
    }

    ctx.undo
        .destroy_immediate(ctx.scene, UndoTarget::Component(entry.component))?;
    Ok(true)
}

/// Both bone slots, or `MissingBone`
pub(crate) fn require_bones(
    anchor: Option<NodeId>,
    endpoint: Option<NodeId>,
) -> Result<(NodeId, NodeId), ToolError> {
    match (anchor, endpoint) {
        (Some(anchor), Some(endpoint)) => Ok((anchor, endpoint)),
        _ => Err(ToolError::MissingBone),
    }
}

/// `endpoint` must sit strictly below `anchor`
pub(crate) fn require_descendant(
    scene: &dyn SceneGraph,
    anchor: NodeId,
    endpoint: NodeId,
) -> Result<(), ToolError> {
    for node in [anchor, endpoint] {
        if !scene.contains_node(node) {
            return Err(SceneError::NodeNotFound(node).into());
        }
    }
    if !scene.is_descendant(endpoint, anchor) {
        return Err(ToolError::InvalidHierarchy { anchor, endpoint });
    }
    Ok(())
}

/// Create the node a collision primitive lives on.
///
/// Parented to the anchor at its origin, forward pointing at the endpoint.
/// Returns the node and the anchor-endpoint distance.
pub(crate) fn spawn_collision_node(
    ctx: &mut ToolContext<'_>,
    anchor: NodeId,
    endpoint: NodeId,
    label: &str,
) -> Result<(NodeId, f32), ToolError> {
    let from = ctx
        .scene
        .world_position(anchor)
        .ok_or(SceneError::NodeNotFound(anchor))?;
    let to = ctx
        .scene
        .world_position(endpoint)
        .ok_or(SceneError::NodeNotFound(endpoint))?;
    let name = format!(
        "{} - {}",
        ctx.scene.name(anchor).unwrap_or_default(),
        ctx.scene.name(endpoint).unwrap_or_default()
    );

    let node = ctx.scene.create_node(&name, Some(anchor))?;
    ctx.scene.mark_collision_object(node)?;
    ctx.scene.set_forward(node, to - from)?;
    ctx.undo.record_created(UndoTarget::Node(node), label);
    Ok((node, from.distance(to)))
}

/// Existing component of `kind` on a node, or a newly attached one.
///
/// Returns the id and whether it was created.
pub(crate) fn get_or_add(
    ctx: &mut ToolContext<'_>,
    node: NodeId,
    component: Component,
) -> Result<(ComponentId, bool), ToolError> {
    if let Some(existing) = ctx.scene.find_component(node, component.kind()) {
        return Ok((existing, false));
    }
    let id = ctx.scene.attach(node, component)?;
    let label = format!("Created {}", component.kind().display_name());
    ctx.undo.record_created(UndoTarget::Component(id), &label);
    Ok((id, true))
}

/// Swap a collider for another on the same node, keeping its tracking slot
pub(crate) fn replace_collider(
    ctx: &mut ToolContext<'_>,
    old: ComponentId,
    replacement: Component,
    label: &str,
) -> Result<ComponentId, ToolError> {
    let node = ctx
        .scene
        .component_node(old)
        .ok_or(SceneError::ComponentNotFound(old))?;

    let new = grouped(ctx, label, |ctx| swap_component(ctx, old, node, replacement, label))?;
    if !ctx.tracked.replace(old, new) {
        let owns_node = owns_collision_node(&*ctx.scene, new);
        ctx.tracked.track(new, owns_node);
    }
    Ok(new)
}

fn swap_component(
    ctx: &mut ToolContext<'_>,
    old: ComponentId,
    node: NodeId,
    replacement: Component,
    label: &str,
) -> Result<ComponentId, ToolError> {
    ctx.undo
        .destroy_immediate(ctx.scene, UndoTarget::Component(old))?;
    let new = ctx.scene.attach(node, replacement)?;
    ctx.undo.record_created(UndoTarget::Component(new), label);
    Ok(new)
}

/// Draw collider hit regions and the position handle of the selected one
pub(crate) fn draw_colliders(
    strategy: &dyn ComponentStrategy,
    ctx: &DrawContext<'_>,
    surface: &mut dyn InteractionSurface,
    region_size: impl Fn(&Component) -> f32,
) -> Vec<SceneResponse> {
    use crate::surface::HandleId;

    let mut responses = Vec::new();
    let hovered = ctx.hovered(strategy.kind());

    for entry in ctx.tracked.of_kind(ctx.scene, strategy.kind()) {
        let id = entry.component;
        let (Some(component), Some(node)) = (ctx.scene.component(id), ctx.scene.component_node(id))
        else {
            continue;
        };
        let Some(position) = ctx.scene.world_position(node) else {
            continue;
        };
        let selected = strategy.is_selected(id);

        if selected {
            let rotation = ctx.scene.world_rotation(node).unwrap_or_default();
            let moved = surface.position_handle(HandleId::Component(id), position, rotation);
            if moved != position {
                responses.push(SceneResponse::HandleMoved {
                    component: id,
                    position: moved,
                });
            }
        }

        if ctx.accepts_clicks() {
            let color = ctx.region_color(selected, hovered == Some(id));
            if surface.button(HandleId::Component(id), position, region_size(component), color) {
                responses.push(SceneResponse::Activated(id));
            }
        }
    }
    responses
}
