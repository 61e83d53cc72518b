//! Common UI helper functions for the tool inspectors

use egui::{DragValue, Ui};

/// Render a labeled XYZ vector3 row with drag values
/// Returns true if any value was changed
pub fn vector3_row(ui: &mut Ui, label: &str, values: &mut [f32; 3], speed: f32) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut changed = false;
        for (axis, value) in ["X", "Y", "Z"].into_iter().zip(values.iter_mut()) {
            ui.label(axis);
            changed |= ui.add(DragValue::new(value).speed(speed)).changed();
        }
        changed
    })
    .inner
}

/// Render a labeled drag value
/// Returns true if the value was changed
pub fn labeled_drag_value(
    ui: &mut Ui,
    label: &str,
    value: &mut f32,
    speed: f32,
    range: std::ops::RangeInclusive<f32>,
) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(DragValue::new(value).speed(speed).range(range))
            .changed()
    })
    .inner
}

/// Render a labeled angle in degrees
pub fn angle_drag_value(ui: &mut Ui, label: &str, value: &mut f32) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(
            DragValue::new(value)
                .speed(0.5)
                .range(0.0..=180.0)
                .suffix("°"),
        )
        .changed()
    })
    .inner
}

/// Render an RGBA color picker
pub fn color_row(ui: &mut Ui, label: &str, color: &mut [f32; 4]) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.color_edit_button_rgba_unmultiplied(color).changed()
    })
    .inner
}
