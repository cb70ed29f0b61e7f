//! Collision detection
//!
//! Axis-aligned rectangles, each pulled in by a small buffer so cars that only
//! graze at the edges do not count as a hit.

use glam::Vec2;

use super::events::SimEvent;
use super::state::{Dimensions, SimState};
use crate::consts::{COLLISION_BUFFER, CRASH_BURST};
use crate::palette;

/// Axis-aligned box in field space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn from_entity(pos: Vec2, dim: Dimensions) -> Self {
        Self {
            left: pos.x,
            right: pos.x + dim.width,
            top: pos.y,
            bottom: pos.y + dim.height,
        }
    }

    /// Shrink by `amount` on every side
    pub fn inset(self, amount: f32) -> Self {
        Self {
            left: self.left + amount,
            right: self.right - amount,
            top: self.top + amount,
            bottom: self.bottom - amount,
        }
    }

    /// Strict overlap; touching edges do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// First traffic car (in creation order) overlapping the player
pub fn find_collision(state: &SimState) -> Option<u32> {
    let player = Rect::from_entity(state.player.pos, state.player.dim).inset(COLLISION_BUFFER);
    state
        .traffic
        .iter()
        .find(|car| Rect::from_entity(car.pos, car.dim).inset(COLLISION_BUFFER).intersects(&player))
        .map(|car| car.id)
}

/// Test for a hit and, on the first one, put the run into the crashed state
pub fn resolve(state: &mut SimState) -> bool {
    if state.crashed {
        return false;
    }
    let Some(id) = find_collision(state) else {
        return false;
    };

    let center = state.player.center();
    state.emit_particles(center, palette::CRASH, CRASH_BURST);
    state.crashed = true;
    state.events.push(SimEvent::Crashed { id });
    log::info!("crashed into car {id} at distance {:.0}", state.score);
    true
}
