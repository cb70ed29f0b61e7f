//! Draw-list construction
//!
//! Projects one [`SimState`] into a flat triangle list in field coordinates.
//! Layers are appended back to front, so later layers paint over earlier ones:
//! road, lane markers, traffic, player, particles, speed lines, crash overlay.

use super::shapes::{self, CarStyle};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::SimState;

/// Presentation toggles for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneOptions {
    pub speed_lines: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self { speed_lines: true }
    }
}

/// Build the complete draw list for one console
pub fn build_frame(state: &SimState, options: SceneOptions) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);
    road_layer(state, &mut vertices);
    traffic_layer(state, &mut vertices);
    player_layer(state, &mut vertices);
    particle_layer(state, &mut vertices);
    if options.speed_lines {
        speed_line_layer(state, &mut vertices);
    }
    if state.crashed {
        crash_layer(state, &mut vertices);
    }
    vertices
}

/// Asphalt plus the scrolling lane dividers
pub fn road_layer(state: &SimState, out: &mut Vec<Vertex>) {
    let config = &state.config;
    let (w, h) = (config.field_width, config.field_height);
    out.extend(shapes::quad(0.0, 0.0, w, h, colors::ROAD));

    for lane in 1..config.lane_count {
        out.extend(shapes::dashed_vline(
            lane as f32 * config.lane_width(),
            -100.0,
            h + 100.0,
            4.0,
            ROAD_DASH_LENGTH,
            ROAD_DASH_PERIOD,
            state.road_offset,
            colors::LANE_MARK,
        ));
    }
}

pub fn traffic_layer(state: &SimState, out: &mut Vec<Vertex>) {
    for car in &state.traffic {
        out.extend(shapes::car(car.pos, car.dim, car.color, CarStyle::Traffic));
    }
}

pub fn player_layer(state: &SimState, out: &mut Vec<Vertex>) {
    let player = &state.player;
    out.extend(shapes::car(player.pos, player.dim, player.color, CarStyle::Player));
}

/// Particles fade out with their remaining life
pub fn particle_layer(state: &SimState, out: &mut Vec<Vertex>) {
    for p in &state.particles {
        let alpha = (p.life / p.max_life).clamp(0.0, 1.0);
        let color = colors::with_alpha(p.color, alpha);
        out.extend(shapes::quad(p.pos.x, p.pos.y, p.dim.width, p.dim.height, color));
    }
}

/// Streaks along both verges, only at high speed
pub fn speed_line_layer(state: &SimState, out: &mut Vec<Vertex>) {
    if state.player.speed <= SPEED_LINE_MIN_SPEED {
        return;
    }
    let (w, h) = (state.config.field_width, state.config.field_height);
    let phase = state.road_offset * 5.0;
    for x in [10.0, w - 10.0] {
        out.extend(shapes::dashed_vline(
            x,
            0.0,
            h,
            2.0,
            50.0,
            250.0,
            phase,
            colors::SPEED_LINE,
        ));
    }
}

/// Dimmed field with a red banner; the host draws the text on top
pub fn crash_layer(state: &SimState, out: &mut Vec<Vertex>) {
    let (w, h) = (state.config.field_width, state.config.field_height);
    out.extend(shapes::quad(0.0, 0.0, w, h, colors::CRASH_SHADE));
    out.extend(shapes::quad(0.0, h / 2.0 - 60.0, w, 120.0, colors::CRASH_BANNER));
}
