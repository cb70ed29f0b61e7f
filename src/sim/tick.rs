//! Per-tick simulation pipeline
//!
//! Physics, spawning, motion and collision always run in that order. Once the
//! run has crashed, ticks are no-ops until the state is reset.

use super::events::SimEvent;
use super::input::Intent;
use super::state::SimState;
use super::{collision, motion, physics, spawn};
use crate::consts::*;

/// Advance one player's simulation by `dt` tick units (1.0 = one 60 Hz frame)
pub fn tick(state: &mut SimState, intent: &Intent, dt: f32) {
    if state.crashed {
        return;
    }
    state.time_ticks += 1;

    physics::integrate(state, intent, dt);

    let speed = state.player.speed;
    state.road_offset = (state.road_offset + speed * ROAD_SCROLL_RATE * dt) % ROAD_DASH_PERIOD;
    state.score += speed * SCORE_RATE * dt;
    state.events.push(SimEvent::ScoreChanged(state.score));
    state.events.push(SimEvent::SpeedChanged(speed));
    state.difficulty = spawn::difficulty_multiplier(state.score);

    spawn::spawn_traffic(state, dt);
    motion::advance(state, dt);
    collision::resolve(state);
}
