//! Player physics
//!
//! Scalar forward speed plus horizontal steering. The player never moves
//! vertically; the road scrolls past instead.

use glam::Vec2;

use super::input::{Intent, Steer};
use super::state::SimState;
use crate::consts::*;
use crate::palette;

/// Advance player speed and position by `dt` tick units
pub fn integrate(state: &mut SimState, intent: &Intent, dt: f32) {
    let player = &mut state.player;

    if intent.accelerate {
        player.speed += ACCELERATION * dt;
    } else if intent.brake {
        player.speed -= BRAKING * dt;
    } else if player.speed > 0.0 {
        player.speed = (player.speed - FRICTION * dt).max(0.0);
    }
    player.speed = player.speed.clamp(0.0, MAX_SPEED);

    if player.speed > STEER_MIN_SPEED {
        let step = STEERING_SPEED * dt;
        if intent.steer_left {
            player.pos.x -= step;
        }
        if intent.steer_right {
            player.pos.x += step;
        }
        match intent.touch_steer {
            Some(Steer::Left) => player.pos.x -= step,
            Some(Steer::Right) => player.pos.x += step,
            None => {}
        }
    }

    clamp_to_field(state);
}

/// Keep the car on the road; scraping an edge costs speed and throws a spark
fn clamp_to_field(state: &mut SimState) {
    let max_x = state.config.max_player_x();
    let player = &mut state.player;
    let mid_y = player.pos.y + player.dim.height / 2.0;

    let contact = if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        Some(Vec2::new(0.0, mid_y))
    } else if player.pos.x > max_x {
        player.pos.x = max_x;
        Some(Vec2::new(max_x + player.dim.width, mid_y))
    } else {
        None
    };

    if let Some(edge) = contact {
        player.speed *= WALL_SCRAPE_DAMPING;
        state.emit_particles(edge, palette::SCRAPE, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::SimConfig;

    fn state() -> SimState {
        SimState::new(SimConfig::default(), 42).expect("valid config")
    }

    #[test]
    fn test_acceleration_is_capped() {
        let mut s = state();
        let gas = Intent {
            accelerate: true,
            ..Default::default()
        };
        integrate(&mut s, &gas, 1.0);
        assert!((s.player.speed - ACCELERATION).abs() < 1e-6);
        for _ in 0..500 {
            integrate(&mut s, &gas, 1.0);
        }
        assert_eq!(s.player.speed, MAX_SPEED);
    }

    #[test]
    fn test_brake_and_friction_stop_at_zero() {
        let mut s = state();
        s.player.speed = 0.3;
        let brake = Intent {
            brake: true,
            ..Default::default()
        };
        integrate(&mut s, &brake, 1.0);
        assert_eq!(s.player.speed, 0.0);

        s.player.speed = 1.0;
        integrate(&mut s, &Intent::default(), 2.0);
        assert!((s.player.speed - (1.0 - 2.0 * FRICTION)).abs() < 1e-6);
        integrate(&mut s, &Intent::default(), 100.0);
        assert_eq!(s.player.speed, 0.0);
    }

    #[test]
    fn test_no_steering_at_low_speed() {
        let mut s = state();
        s.player.speed = 0.5;
        let x = s.player.pos.x;
        let steer = Intent {
            steer_left: true,
            touch_steer: Some(Steer::Left),
            ..Default::default()
        };
        // Friction drops speed below the threshold before steering is checked
        integrate(&mut s, &steer, 1.0);
        assert_eq!(s.player.pos.x, x);
    }

    #[test]
    fn test_keyboard_and_touch_steering_stack() {
        let mut s = state();
        s.player.speed = 10.0;
        let x = s.player.pos.x;
        let steer = Intent {
            steer_right: true,
            touch_steer: Some(Steer::Right),
            ..Default::default()
        };
        integrate(&mut s, &steer, 1.0);
        assert!((s.player.pos.x - (x + 2.0 * STEERING_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_wall_scrape_clamps_and_damps() {
        let mut s = state();
        s.player.speed = 20.0;
        s.player.pos.x = 3.0;
        let left = Intent {
            steer_left: true,
            ..Default::default()
        };
        integrate(&mut s, &left, 1.0);
        assert_eq!(s.player.pos.x, 0.0);
        let expected = (20.0 - FRICTION) * WALL_SCRAPE_DAMPING;
        assert!((s.player.speed - expected).abs() < 1e-4);
        assert_eq!(s.particles.len(), 1);
        assert_eq!(s.particles[0].pos.x, 0.0);

        s.player.pos.x = s.config.max_player_x() - 1.0;
        let right = Intent {
            steer_right: true,
            ..Default::default()
        };
        integrate(&mut s, &right, 1.0);
        assert_eq!(s.player.pos.x, s.config.max_player_x());
        assert_eq!(s.particles.len(), 2);
        assert_eq!(s.particles[1].pos.x, s.config.field_width);
    }
}
