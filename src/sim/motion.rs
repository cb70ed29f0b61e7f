//! Frame-relative motion and entity lifecycle
//!
//! Traffic moves relative to the player: faster player means traffic scrolls
//! down harder, slow player means fast cars drive up from behind.

use glam::Vec2;

use super::events::SimEvent;
use super::state::SimState;
use crate::consts::*;
use crate::palette;

/// On-screen velocity of a traffic car, positive = downward
#[inline]
pub fn relative_speed(player_speed: f32, car_speed: f32) -> f32 {
    player_speed * PLAYER_SPEED_FACTOR - car_speed * TRAFFIC_SPEED_FACTOR
}

/// Move traffic and particles, raise pass events, drop expired entities
pub fn advance(state: &mut SimState, dt: f32) {
    advance_traffic(state, dt);
    advance_particles(state, dt);
    emit_exhaust(state);
}

fn advance_traffic(state: &mut SimState, dt: f32) {
    let player_speed = state.player.speed;
    let player_center_y = state.player.center().y;

    for car in &mut state.traffic {
        let rel = relative_speed(player_speed, car.speed);
        let before = car.center_y();
        car.pos.y += rel * MOTION_SCALE * dt;
        let after = car.center_y();

        let crossed = (before <= player_center_y) != (after <= player_center_y);
        if crossed && !car.passed_player {
            car.passed_player = true;
            if rel.abs() > PASS_MIN_RELATIVE_SPEED {
                state.events.push(SimEvent::Passed { id: car.id });
            }
        }
    }

    let top = -CULL_TOP_MARGIN;
    let bottom = state.config.field_height + CULL_BOTTOM_MARGIN;
    state
        .traffic
        .retain(|car| car.pos.y > top && car.pos.y < bottom);
}

fn advance_particles(state: &mut SimState, dt: f32) {
    let sweep = state.player.speed * PARTICLE_SWEEP * dt;
    for particle in &mut state.particles {
        particle.pos += particle.vel * dt;
        particle.pos.y += sweep;
        particle.life -= PARTICLE_DECAY * dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Dust off both rear wheels near top speed
fn emit_exhaust(state: &mut SimState) {
    if state.player.speed <= MAX_SPEED * EXHAUST_SPEED_RATIO {
        return;
    }
    let player = &state.player;
    let rear = player.pos.y + player.dim.height;
    let left = Vec2::new(player.pos.x + 10.0, rear);
    let right = Vec2::new(player.pos.x + player.dim.width - 10.0, rear);
    state.emit_particles(left, palette::EXHAUST, 1);
    state.emit_particles(right, palette::EXHAUST, 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::SimConfig;
    use crate::sim::spawn::{try_spawn_oncoming, try_spawn_overtaking};

    fn state() -> SimState {
        SimState::new(SimConfig::default(), 11).expect("valid config")
    }

    fn passes(state: &SimState) -> usize {
        state
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Passed { .. }))
            .count()
    }

    #[test]
    fn test_traffic_scrolls_relative_to_player() {
        let mut s = state();
        try_spawn_oncoming(&mut s, 0).expect("empty road");
        s.player.speed = 20.0;
        let car_speed = s.traffic[0].speed;
        let y = s.traffic[0].pos.y;
        advance(&mut s, 1.0);
        let expected = y + relative_speed(20.0, car_speed) * MOTION_SCALE;
        assert!((s.traffic[0].pos.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_pass_fires_once_on_crossing() {
        let mut s = state();
        try_spawn_oncoming(&mut s, 0).expect("empty road");
        s.player.speed = MAX_SPEED;
        // Park the car just above the player's centre line
        s.traffic[0].pos.y = s.player.pos.y - 5.0;
        advance(&mut s, 1.0);
        assert!(s.traffic[0].passed_player);
        assert_eq!(passes(&s), 1);

        s.events.clear();
        for _ in 0..3 {
            advance(&mut s, 0.1);
        }
        assert_eq!(passes(&s), 0);
    }

    #[test]
    fn test_slow_crossing_latches_without_event() {
        let mut s = state();
        try_spawn_oncoming(&mut s, 0).expect("empty road");
        let car_speed = s.traffic[0].speed;
        // Relative speed of exactly zero would never cross; aim just above the gate
        s.player.speed = (car_speed * TRAFFIC_SPEED_FACTOR + 0.5) / PLAYER_SPEED_FACTOR;
        s.traffic[0].pos.y = s.player.pos.y - 1.0;
        advance(&mut s, 1.0);
        assert!(s.traffic[0].passed_player);
        assert_eq!(passes(&s), 0);
    }

    #[test]
    fn test_overtaking_car_passes_upward() {
        let mut s = state();
        try_spawn_overtaking(&mut s, 1).expect("empty road");
        let mut seen = 0;
        for _ in 0..200 {
            advance(&mut s, 1.0);
            seen += passes(&s);
            s.events.clear();
        }
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_offscreen_traffic_is_culled() {
        let mut s = state();
        try_spawn_oncoming(&mut s, 0).expect("empty road");
        try_spawn_oncoming(&mut s, 2).expect("empty road");
        s.traffic[0].pos.y = s.config.field_height + CULL_BOTTOM_MARGIN + 1.0;
        s.traffic[1].pos.y = -CULL_TOP_MARGIN - 10.0;
        advance(&mut s, 0.0);
        assert!(s.traffic.is_empty());
    }

    #[test]
    fn test_particles_fade_and_sweep() {
        let mut s = state();
        s.emit_particles(Vec2::new(100.0, 100.0), palette::CRASH, 3);
        s.player.speed = 10.0;
        let before: Vec<_> = s.particles.iter().map(|p| (p.pos, p.vel, p.life)).collect();
        advance(&mut s, 1.0);
        for (p, (pos, vel, life)) in s.particles.iter().zip(before) {
            assert!(p.life < life);
            let expected = pos + vel + Vec2::new(0.0, 10.0 * PARTICLE_SWEEP);
            assert!((p.pos - expected).length() < 1e-3);
        }
        advance(&mut s, 1.0 / PARTICLE_DECAY);
        assert!(s.particles.is_empty());
    }

    #[test]
    fn test_exhaust_only_near_top_speed() {
        let mut s = state();
        s.player.speed = MAX_SPEED * EXHAUST_SPEED_RATIO;
        advance(&mut s, 1.0);
        assert!(s.particles.is_empty());
        s.player.speed = MAX_SPEED;
        advance(&mut s, 1.0);
        assert_eq!(s.particles.len(), 2);
    }
}
