//! Shape generation for 2D primitives
//!
//! Everything is built in field coordinates: origin top-left, y down.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::sim::Dimensions;

/// Axis-aligned filled rectangle as two triangles
pub fn quad(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> [Vertex; 6] {
    let (l, r, t, b) = (x, x + w, y, y + h);
    [
        Vertex::new(l, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside the bounds
pub fn outline(x: f32, y: f32, w: f32, h: f32, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(quad(x, y, w, thickness, color));
    vertices.extend(quad(x, y + h - thickness, w, thickness, color));
    vertices.extend(quad(x, y, thickness, h, color));
    vertices.extend(quad(x + w - thickness, y, thickness, h, color));
    vertices
}

/// Vertical dashed line between `y_start` and `y_end`.
///
/// The dash pattern repeats every `period` and is pushed down by `phase`, so
/// an increasing phase scrolls the dashes toward the bottom of the field.
#[allow(clippy::too_many_arguments)]
pub fn dashed_vline(
    x: f32,
    y_start: f32,
    y_end: f32,
    width: f32,
    dash: f32,
    period: f32,
    phase: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if period <= 0.0 || y_end <= y_start {
        return vertices;
    }

    let mut start = y_start + phase.rem_euclid(period) - period;
    while start < y_end {
        let top = start.max(y_start);
        let bottom = (start + dash).min(y_end);
        if bottom > top {
            vertices.extend(quad(x - width / 2.0, top, width, bottom - top, color));
        }
        start += period;
    }
    vertices
}

/// Which details a car gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarStyle {
    /// Accent-tinted cabin plus a bright outline
    Player,
    Traffic,
}

/// Top-down car body: tires, body, cabin, windows, lights, centre stripe
pub fn car(pos: Vec2, dim: Dimensions, color: [f32; 4], style: CarStyle) -> Vec<Vertex> {
    let (x, y, w, h) = (pos.x, pos.y, dim.width, dim.height);
    let mut vertices = Vec::with_capacity(16 * 6);

    let tire_w = 14.0;
    let tire_h = 32.0;
    let tire_inset = 25.0;
    for (tx, ty) in [
        (x + 2.0, y + tire_inset),
        (x + w - tire_w - 2.0, y + tire_inset),
        (x + 2.0, y + h - tire_inset - tire_h),
        (x + w - tire_w - 2.0, y + h - tire_inset - tire_h),
    ] {
        vertices.extend(quad(tx, ty, tire_w, tire_h, colors::TIRE));
    }

    let body_margin = 8.0;
    vertices.extend(quad(x + body_margin, y, w - body_margin * 2.0, h, color));

    let (cabin, window) = match style {
        CarStyle::Player => (colors::shade(color, 0.13), colors::shade(color, 0.27)),
        CarStyle::Traffic => (colors::TRAFFIC_CABIN, colors::TRAFFIC_WINDOW),
    };
    let cabin_margin = 16.0;
    let cabin_y = y + h * 0.35;
    let cabin_h = h * 0.3;
    let cabin_w = w - cabin_margin * 2.0;
    vertices.extend(quad(x + cabin_margin, cabin_y, cabin_w, cabin_h, cabin));
    vertices.extend(quad(x + cabin_margin, cabin_y, cabin_w, 6.0, window));
    vertices.extend(quad(x + cabin_margin, cabin_y + cabin_h - 6.0, cabin_w, 6.0, window));

    let left_light = x + body_margin + 4.0;
    let right_light = x + w - body_margin - 16.0;
    vertices.extend(quad(left_light, y + 2.0, 12.0, 6.0, colors::HEADLIGHT));
    vertices.extend(quad(right_light, y + 2.0, 12.0, 6.0, colors::HEADLIGHT));
    vertices.extend(quad(left_light, y + h - 8.0, 12.0, 6.0, colors::TAIL_LIGHT));
    vertices.extend(quad(right_light, y + h - 8.0, 12.0, 6.0, colors::TAIL_LIGHT));

    vertices.extend(quad(x + w / 2.0 - 8.0, y, 16.0, h, colors::STRIPE));

    if style == CarStyle::Player {
        vertices.extend(outline(x + body_margin, y, w - body_margin * 2.0, h, 2.0, color));
    }

    vertices
}
