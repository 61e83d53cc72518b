//! Viewport drawing and handle interface
//!
//! The host editor provides immediate-mode gizmo primitives. Strategies call
//! them once per tick; buttons and handles report user interaction through
//! their return values. [`DrawList`] records every call and replays scripted
//! interaction, for headless use and tests.

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};
use rf_core::{ComponentId, NodeId};

/// RGBA color
pub type Color = [f32; 4];

/// Joint limit edited by an angle handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitAxis {
    LowX,
    HighX,
    Y,
    Z,
}

/// Stable identity of an interactive handle across ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleId {
    Bone(NodeId),
    Component(ComponentId),
    Limit(ComponentId, LimitAxis),
}

/// Immediate-mode gizmo primitives of the host viewport
pub trait InteractionSurface {
    /// World-space view direction of the viewport camera
    fn camera_forward(&self) -> Vec3;

    fn draw_disc(&mut self, center: Vec3, normal: Vec3, radius: f32, color: Color, filled: bool);

    /// Arc of `angle` degrees starting at `from`, rotating around `normal`
    fn draw_arc(
        &mut self,
        center: Vec3,
        normal: Vec3,
        from: Vec3,
        angle: f32,
        radius: f32,
        color: Color,
    );

    fn draw_line(&mut self, from: Vec3, to: Vec3, color: Color, dotted: bool);

    fn draw_label(&mut self, position: Vec3, text: &str, color: Color);

    /// Clickable camera-facing region; returns true on the tick it is clicked
    fn button(&mut self, id: HandleId, position: Vec3, size: f32, color: Color) -> bool;

    /// Translation handle; returns the (possibly dragged) position
    fn position_handle(&mut self, id: HandleId, position: Vec3, rotation: Quat) -> Vec3;

    /// Arc handle editing an angle in degrees; returns the (possibly dragged) angle
    #[allow(clippy::too_many_arguments)]
    fn angle_handle(
        &mut self,
        id: HandleId,
        center: Vec3,
        normal: Vec3,
        from: Vec3,
        angle: f32,
        radius: f32,
        color: Color,
    ) -> f32;
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Disc {
        center: Vec3,
        radius: f32,
        color: Color,
        filled: bool,
    },
    Arc {
        center: Vec3,
        normal: Vec3,
        angle: f32,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec3,
        to: Vec3,
        color: Color,
        dotted: bool,
    },
    Label {
        position: Vec3,
        text: String,
        color: Color,
    },
    Button {
        id: HandleId,
        position: Vec3,
        size: f32,
        color: Color,
    },
    PositionHandle {
        id: HandleId,
        position: Vec3,
    },
    AngleHandle {
        id: HandleId,
        angle: f32,
    },
}

/// Recording surface with scripted interaction
#[derive(Debug, Clone)]
pub struct DrawList {
    camera_forward: Vec3,
    commands: Vec<DrawCommand>,
    /// Buttons reporting a click on the next tick
    pressed: HashSet<HandleId>,
    /// Position handles dragged to a new position
    dragged: HashMap<HandleId, Vec3>,
    /// Angle handles dragged to a new angle
    angles: HashMap<HandleId, f32>,
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new(Vec3::NEG_Z)
    }
}

impl DrawList {
    pub fn new(camera_forward: Vec3) -> Self {
        Self {
            camera_forward: camera_forward.normalize_or_zero(),
            commands: Vec::new(),
            pressed: HashSet::new(),
            dragged: HashMap::new(),
            angles: HashMap::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands, keeping scripted interaction
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Click a button on the next tick
    pub fn press(&mut self, id: HandleId) {
        self.pressed.insert(id);
    }

    /// Drag a position handle on the next tick
    pub fn drag(&mut self, id: HandleId, position: Vec3) {
        self.dragged.insert(id, position);
    }

    /// Drag an angle handle on the next tick
    pub fn set_angle(&mut self, id: HandleId, angle: f32) {
        self.angles.insert(id, angle);
    }

    pub fn labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded button for a handle
    pub fn button_for(&self, id: HandleId) -> Option<&DrawCommand> {
        self.commands
            .iter()
            .find(|c| matches!(c, DrawCommand::Button { id: button, .. } if *button == id))
    }

    pub fn has_position_handle(&self, id: HandleId) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCommand::PositionHandle { id: handle, .. } if *handle == id))
    }

    pub fn discs(&self) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
            .collect()
    }

    pub fn lines(&self) -> Vec<&DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .collect()
    }
}

impl InteractionSurface for DrawList {
    fn camera_forward(&self) -> Vec3 {
        self.camera_forward
    }

    fn draw_disc(&mut self, center: Vec3, _normal: Vec3, radius: f32, color: Color, filled: bool) {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
            filled,
        });
    }

    fn draw_arc(
        &mut self,
        center: Vec3,
        normal: Vec3,
        _from: Vec3,
        angle: f32,
        radius: f32,
        color: Color,
    ) {
        self.commands.push(DrawCommand::Arc {
            center,
            normal,
            angle,
            radius,
            color,
        });
    }

    fn draw_line(&mut self, from: Vec3, to: Vec3, color: Color, dotted: bool) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            dotted,
        });
    }

    fn draw_label(&mut self, position: Vec3, text: &str, color: Color) {
        self.commands.push(DrawCommand::Label {
            position,
            text: text.to_string(),
            color,
        });
    }

    fn button(&mut self, id: HandleId, position: Vec3, size: f32, color: Color) -> bool {
        self.commands.push(DrawCommand::Button {
            id,
            position,
            size,
            color,
        });
        self.pressed.remove(&id)
    }

    fn position_handle(&mut self, id: HandleId, position: Vec3, _rotation: Quat) -> Vec3 {
        self.commands
            .push(DrawCommand::PositionHandle { id, position });
        self.dragged.remove(&id).unwrap_or(position)
    }

    fn angle_handle(
        &mut self,
        id: HandleId,
        _center: Vec3,
        _normal: Vec3,
        _from: Vec3,
        angle: f32,
        _radius: f32,
        _color: Color,
    ) -> f32 {
        self.commands.push(DrawCommand::AngleHandle { id, angle });
        self.angles.remove(&id).unwrap_or(angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_button_reports_once() {
        let mut list = DrawList::default();
        let id = HandleId::Component(ComponentId::new());
        list.press(id);
        assert!(list.button(id, Vec3::ZERO, 1.0, [1.0; 4]));
        assert!(!list.button(id, Vec3::ZERO, 1.0, [1.0; 4]));
        assert!(list.button_for(id).is_some());
    }

    #[test]
    fn test_handles_return_scripted_values() {
        let mut list = DrawList::default();
        let id = HandleId::Component(ComponentId::new());
        assert_eq!(list.position_handle(id, Vec3::X, Quat::IDENTITY), Vec3::X);
        list.drag(id, Vec3::Y);
        assert_eq!(list.position_handle(id, Vec3::X, Quat::IDENTITY), Vec3::Y);
        assert!(list.has_position_handle(id));

        let limit = HandleId::Limit(ComponentId::new(), LimitAxis::HighX);
        list.set_angle(limit, 60.0);
        let angle = list.angle_handle(limit, Vec3::ZERO, Vec3::X, Vec3::Y, 45.0, 0.1, [1.0; 4]);
        assert_eq!(angle, 60.0);
    }
}
