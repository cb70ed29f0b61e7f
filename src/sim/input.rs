//! Input mapping
//!
//! Raw key and touch state in, abstract driving intent out. Keyboard and
//! touch contribute independently.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::config::ControlScheme;
use crate::consts::TOUCH_DEAD_ZONE;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    /// Pause toggle, independent of control scheme
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "w" | "W" => Some(Key::W),
            "a" | "A" => Some(Key::A),
            "s" | "S" => Some(Key::S),
            "d" | "D" => Some(Key::D),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Currently held keys
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Horizontal nudge requested by a touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

/// Driving intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub accelerate: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// Touch steering, applied on top of the keyboard
    pub touch_steer: Option<Steer>,
}

fn any_held(keys: &KeyState, set: &[Key]) -> bool {
    set.iter().any(|&k| keys.is_held(k))
}

/// Build the intent for one console.
///
/// `touch_x` is the last touch point in field space; `player_center_x` anchors
/// the touch dead zone.
pub fn map_intent(
    keys: &KeyState,
    touch_x: Option<f32>,
    scheme: ControlScheme,
    player_center_x: f32,
) -> Intent {
    let (accel, brake, left, right): (&[Key], &[Key], &[Key], &[Key]) = match scheme {
        ControlScheme::Wasd => (&[Key::W], &[Key::S], &[Key::A], &[Key::D]),
        ControlScheme::Arrows => (&[Key::Up], &[Key::Down], &[Key::Left], &[Key::Right]),
        ControlScheme::Both => (
            &[Key::Up, Key::W],
            &[Key::Down, Key::S],
            &[Key::Left, Key::A],
            &[Key::Right, Key::D],
        ),
    };

    let mut intent = Intent {
        accelerate: any_held(keys, accel),
        brake: any_held(keys, brake),
        steer_left: any_held(keys, left),
        steer_right: any_held(keys, right),
        touch_steer: None,
    };

    if let Some(x) = touch_x.filter(|_| scheme.accepts_touch()) {
        intent.accelerate = true;
        intent.touch_steer = if x < player_center_x - TOUCH_DEAD_ZONE {
            Some(Steer::Left)
        } else if x > player_center_x + TOUCH_DEAD_ZONE {
            Some(Steer::Right)
        } else {
            None
        };
    }

    intent
}
