//! Procedural traffic
//!
//! Two generators share one spacing guard: oncoming cars appear above the
//! field while the player is moving, overtaking cars appear below it once the
//! player has been stalled for a while. Oncoming spawns additionally refuse to
//! close off the last open lane.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;

use super::state::{Dimensions, SimState, TrafficCar, TrafficKind};
use crate::consts::*;
use crate::palette;

/// Why a spawn attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRejection {
    /// Another car is already near the spawn point
    TooClose,
    /// The new car would leave no open lane
    WouldBlockAllLanes,
}

/// `1 + floor(score / 1500) * 0.1`
pub fn difficulty_multiplier(score: f32) -> f32 {
    1.0 + (score / DIFFICULTY_STEP_SCORE).floor() * DIFFICULTY_STEP
}

/// Run both generators for one tick
pub fn spawn_traffic(state: &mut SimState, dt: f32) {
    let oncoming_chance = (ONCOMING_SPAWN_CHANCE * state.difficulty as f64).min(1.0);
    if state.rng.random_bool(oncoming_chance) && state.player.speed > ONCOMING_MIN_PLAYER_SPEED {
        let lane = state.rng.random_range(0..state.config.lane_count);
        if let Err(reason) = try_spawn_oncoming(state, lane) {
            log::debug!("oncoming spawn in lane {lane} rejected: {reason:?}");
        }
    }

    if state.player.speed < STALL_SPEED {
        state.stall_ticks += dt;
        if state.stall_ticks > STALL_TICKS && state.rng.random_bool(OVERTAKE_SPAWN_CHANCE) {
            let lane = state.rng.random_range(0..state.config.lane_count);
            if let Err(reason) = try_spawn_overtaking(state, lane) {
                log::debug!("overtaking spawn in lane {lane} rejected: {reason:?}");
            }
        }
    } else {
        state.stall_ticks = 0.0;
    }
}

/// Row where oncoming traffic appears, just above the visible field
pub fn oncoming_spawn_y(state: &SimState) -> f32 {
    -state.config.player_height - 100.0
}

/// Row where overtaking traffic appears, below the visible field
pub fn overtaking_spawn_y(state: &SimState) -> f32 {
    state.config.field_height + 200.0
}

/// Place an oncoming car in `lane` if spacing and lane coverage allow it
pub fn try_spawn_oncoming(state: &mut SimState, lane: u32) -> Result<u32, SpawnRejection> {
    let spawn = Vec2::new(state.config.lane_x(lane), oncoming_spawn_y(state));
    check_clearance(state, spawn)?;

    let window = state.config.player_height * LANE_BLOCK_HEIGHTS;
    let mut blocked: BTreeSet<u32> = state
        .traffic
        .iter()
        .filter(|car| (car.pos.y - spawn.y).abs() < window)
        .map(|car| state.config.lane_at(car.pos.x + car.dim.width / 2.0))
        .collect();
    blocked.insert(lane);
    if blocked.len() >= state.config.lane_count as usize {
        return Err(SpawnRejection::WouldBlockAllLanes);
    }

    let blocker = state.rng.random_bool(BLOCKER_CHANCE);
    let base = if blocker {
        BLOCKER_BASE_SPEED
    } else {
        NORMAL_BASE_SPEED
    };
    let speed = base
        + state.rng.random::<f32>() * TRAFFIC_SPEED_JITTER
        + state.difficulty * DIFFICULTY_SPEED_BONUS;
    let color = palette::TRAFFIC[state.rng.random_range(0..palette::TRAFFIC.len())];

    let id = push_car(state, TrafficKind::Oncoming, spawn, speed, color);
    log::debug!("oncoming car {id} in lane {lane}, speed {speed:.1}, blocker={blocker}");
    Ok(id)
}

/// Place an overtaking car in `lane` below the field if spacing allows it
pub fn try_spawn_overtaking(state: &mut SimState, lane: u32) -> Result<u32, SpawnRejection> {
    let spawn = Vec2::new(state.config.lane_x(lane), overtaking_spawn_y(state));
    check_clearance(state, spawn)?;

    let speed = OVERTAKE_BASE_SPEED + state.rng.random::<f32>() * OVERTAKE_SPEED_JITTER;
    let id = push_car(state, TrafficKind::Overtaking, spawn, speed, palette::OVERTAKING);
    log::debug!("overtaking car {id} in lane {lane}, speed {speed:.1}");
    Ok(id)
}

/// Nothing may sit within 50 units across and three car lengths along
fn check_clearance(state: &SimState, spawn: Vec2) -> Result<(), SpawnRejection> {
    let reach = state.config.player_height * SPAWN_CLEARANCE_HEIGHTS;
    let crowded = state.traffic.iter().any(|car| {
        (car.pos.x - spawn.x).abs() < SPAWN_CLEARANCE_X && (car.pos.y - spawn.y).abs() < reach
    });
    if crowded {
        Err(SpawnRejection::TooClose)
    } else {
        Ok(())
    }
}

fn push_car(
    state: &mut SimState,
    kind: TrafficKind,
    pos: Vec2,
    speed: f32,
    color: [f32; 4],
) -> u32 {
    let id = state.next_entity_id();
    state.traffic.push(TrafficCar {
        id,
        kind,
        pos,
        dim: Dimensions::new(state.config.player_width, state.config.player_height),
        color,
        speed,
        passed_player: false,
    });
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::SimConfig;

    fn state(seed: u64) -> SimState {
        SimState::new(SimConfig::default(), seed).expect("valid config")
    }

    #[test]
    fn test_difficulty_steps() {
        assert_eq!(difficulty_multiplier(0.0), 1.0);
        assert_eq!(difficulty_multiplier(1499.9), 1.0);
        assert!((difficulty_multiplier(1500.0) - 1.1).abs() < 1e-6);
        assert!((difficulty_multiplier(4600.0) - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_same_lane_respawn_is_refused() {
        let mut s = state(1);
        assert!(try_spawn_oncoming(&mut s, 2).is_ok());
        assert_eq!(try_spawn_oncoming(&mut s, 2), Err(SpawnRejection::TooClose));
        assert_eq!(s.traffic.len(), 1);
    }

    #[test]
    fn test_last_open_lane_is_kept() {
        let mut s = state(2);
        for lane in 0..3 {
            try_spawn_oncoming(&mut s, lane).expect("lane open");
        }
        assert_eq!(
            try_spawn_oncoming(&mut s, 3),
            Err(SpawnRejection::WouldBlockAllLanes)
        );
        assert_eq!(s.traffic.len(), 3);
    }

    #[test]
    fn test_lane_coverage_ignores_distant_rows() {
        let mut s = state(3);
        for lane in 0..3 {
            try_spawn_oncoming(&mut s, lane).expect("lane open");
        }
        for car in &mut s.traffic {
            car.pos.y += s.config.player_height * 4.0;
        }
        assert!(try_spawn_oncoming(&mut s, 3).is_ok());
    }

    #[test]
    fn test_oncoming_speed_bands() {
        let mut s = state(4);
        s.difficulty = 1.0;
        for lane in 0..3 {
            try_spawn_oncoming(&mut s, lane).expect("lane open");
        }
        for car in &s.traffic {
            assert_eq!(car.kind, TrafficKind::Oncoming);
            assert!(car.speed >= BLOCKER_BASE_SPEED + DIFFICULTY_SPEED_BONUS);
            assert!(car.speed < NORMAL_BASE_SPEED + TRAFFIC_SPEED_JITTER + DIFFICULTY_SPEED_BONUS);
            assert_eq!(car.pos.y, -s.config.player_height - 100.0);
        }
    }

    #[test]
    fn test_overtaking_skips_lane_coverage() {
        let mut s = state(5);
        for lane in 0..4 {
            try_spawn_overtaking(&mut s, lane).expect("spacing clear");
        }
        assert_eq!(s.traffic.len(), 4);
        for car in &s.traffic {
            assert_eq!(car.kind, TrafficKind::Overtaking);
            assert!(car.speed >= OVERTAKE_BASE_SPEED);
            assert!(car.speed < OVERTAKE_BASE_SPEED + OVERTAKE_SPEED_JITTER);
        }
        assert_eq!(try_spawn_overtaking(&mut s, 1), Err(SpawnRejection::TooClose));
    }

    #[test]
    fn test_no_oncoming_while_stopped() {
        let mut s = state(6);
        s.difficulty = 100.0;
        // Slow enough to gate oncoming traffic, fast enough to keep the stall timer at zero
        s.player.speed = 3.0;
        for _ in 0..200 {
            spawn_traffic(&mut s, 1.0);
        }
        assert!(s.traffic.is_empty());
    }

    #[test]
    fn test_overtaking_waits_for_stall_threshold() {
        let mut s = state(7);
        for _ in 0..100 {
            spawn_traffic(&mut s, 1.0);
            assert!(s.traffic.is_empty());
        }
        assert_eq!(s.stall_ticks, 100.0);
        for _ in 0..2000 {
            spawn_traffic(&mut s, 1.0);
        }
        assert!(!s.traffic.is_empty());
        assert!(s.traffic.iter().all(|c| c.kind == TrafficKind::Overtaking));
    }

    #[test]
    fn test_moving_resets_stall_timer() {
        let mut s = state(8);
        s.stall_ticks = 99.0;
        s.player.speed = STALL_SPEED;
        spawn_traffic(&mut s, 1.0);
        assert_eq!(s.stall_ticks, 0.0);
    }
}
