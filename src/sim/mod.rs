//! Per-player simulation
//!
//! All gameplay logic lives here and stays free of rendering and platform code:
//! - Elapsed time comes in as normalized tick units
//! - Seeded RNG only
//! - Traffic iterates in creation order

pub mod collision;
pub mod config;
pub mod events;
pub mod input;
pub mod motion;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, find_collision};
pub use config::{ControlScheme, SimConfig};
pub use events::{RaceObserver, SimEvent};
pub use input::{Intent, Key, KeyState, Steer, map_intent};
pub use spawn::{SpawnRejection, difficulty_multiplier};
pub use state::{Dimensions, Particle, Player, SimState, TrafficCar, TrafficKind};
pub use tick::tick;
