//! Shared fixture for strategy and controller tests

use glam::Vec3;
use rf_core::{NodeId, Scene, SharedParameters, ToolConfig, UndoLog};

use super::{DrawContext, ToolContext};
use crate::controller::Mode;
use crate::tracking::TrackingList;

/// Hip -> Spine -> Head chain, half a unit apart along +Y
pub(crate) struct Fixture {
    pub scene: Scene,
    pub undo: UndoLog,
    pub params: SharedParameters,
    pub tracked: TrackingList,
    pub config: ToolConfig,
    pub warnings: Vec<String>,
    pub hip: NodeId,
    pub spine: NodeId,
    pub head: NodeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut scene = Scene::new();
        let hip = scene.spawn("Hip", None, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let spine = scene
            .spawn("Spine", Some(hip), Vec3::new(0.0, 0.5, 0.0))
            .unwrap();
        let head = scene
            .spawn("Head", Some(spine), Vec3::new(0.0, 0.5, 0.0))
            .unwrap();
        let config = ToolConfig::default();
        Self {
            scene,
            undo: UndoLog::new(),
            params: config.defaults,
            tracked: TrackingList::new(),
            config,
            warnings: Vec::new(),
            hip,
            spine,
            head,
        }
    }

    pub fn ctx(&mut self) -> ToolContext<'_> {
        ToolContext {
            scene: &mut self.scene,
            undo: &mut self.undo,
            params: &mut self.params,
            tracked: &mut self.tracked,
            config: &self.config,
            warnings: &mut self.warnings,
        }
    }

    pub fn draw_ctx(&self, mode: Mode) -> DrawContext<'_> {
        DrawContext {
            scene: &self.scene,
            tracked: &self.tracked,
            params: &self.params,
            config: &self.config,
            mode,
            hover: None,
        }
    }
}
