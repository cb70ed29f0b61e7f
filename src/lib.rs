//! Retro Racer - A top-down lane racing arcade game
//!
//! Core modules:
//! - `sim`: Per-player simulation (input, physics, traffic, collisions)
//! - `console`: One player's frame loop driver
//! - `session`: Run state machine shared by one or two consoles
//! - `frame`: Timestamp normalization and frame scheduling
//! - `renderer`: Draw-list projection and WebGPU pipeline

pub mod console;
pub mod error;
pub mod frame;
pub mod highscores;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use console::PlayerConsole;
pub use error::ConfigError;
pub use highscores::HighScores;
pub use session::{GameMode, RunState, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Duration of one nominal tick in milliseconds (60 fps)
    pub const NOMINAL_TICK_MS: f64 = 16.67;

    /// Field dimensions
    pub const FIELD_WIDTH: f32 = 700.0;
    pub const FIELD_HEIGHT: f32 = 1100.0;
    pub const LANE_COUNT: u32 = 4;

    /// Car dimensions (player and traffic share one body)
    pub const PLAYER_WIDTH: f32 = 125.0;
    pub const PLAYER_HEIGHT: f32 = 180.0;
    /// Player's fixed distance from the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 250.0;

    /// Speed model, per tick unit
    pub const MAX_SPEED: f32 = 25.0;
    pub const ACCELERATION: f32 = 0.3;
    pub const BRAKING: f32 = 0.5;
    pub const FRICTION: f32 = 0.05;
    pub const STEERING_SPEED: f32 = 8.0;
    /// Steering is ignored at or below this speed
    pub const STEER_MIN_SPEED: f32 = 0.5;
    /// Speed kept after scraping the field edge
    pub const WALL_SCRAPE_DAMPING: f32 = 0.9;
    /// Half-width of the touch steering dead zone
    pub const TOUCH_DEAD_ZONE: f32 = 30.0;

    /// Distance accrued per unit of speed per tick
    pub const SCORE_RATE: f32 = 0.1;
    /// Score needed for each difficulty step
    pub const DIFFICULTY_STEP_SCORE: f32 = 1500.0;
    pub const DIFFICULTY_STEP: f32 = 0.1;

    /// Oncoming traffic
    pub const ONCOMING_SPAWN_CHANCE: f64 = 0.015;
    pub const ONCOMING_MIN_PLAYER_SPEED: f32 = 5.0;
    pub const BLOCKER_CHANCE: f64 = 0.4;
    pub const BLOCKER_BASE_SPEED: f32 = 3.0;
    pub const NORMAL_BASE_SPEED: f32 = 10.0;
    pub const TRAFFIC_SPEED_JITTER: f32 = 5.0;
    pub const DIFFICULTY_SPEED_BONUS: f32 = 1.2;

    /// Overtaking traffic (spawned behind a stalled player)
    pub const STALL_SPEED: f32 = 2.0;
    pub const STALL_TICKS: f32 = 100.0;
    pub const OVERTAKE_SPAWN_CHANCE: f64 = 0.02;
    pub const OVERTAKE_BASE_SPEED: f32 = 40.0;
    pub const OVERTAKE_SPEED_JITTER: f32 = 20.0;

    /// Spawn guards
    pub const SPAWN_CLEARANCE_X: f32 = 50.0;
    pub const SPAWN_CLEARANCE_HEIGHTS: f32 = 3.0;
    pub const LANE_BLOCK_HEIGHTS: f32 = 1.5;

    /// Frame-relative traffic motion
    pub const PLAYER_SPEED_FACTOR: f32 = 0.85;
    pub const TRAFFIC_SPEED_FACTOR: f32 = 0.3;
    pub const MOTION_SCALE: f32 = 10.0;
    /// Minimum |relative speed| for an audible pass
    pub const PASS_MIN_RELATIVE_SPEED: f32 = 1.0;
    /// Traffic is culled outside [-TOP_MARGIN, height + BOTTOM_MARGIN]
    pub const CULL_TOP_MARGIN: f32 = 600.0;
    pub const CULL_BOTTOM_MARGIN: f32 = 300.0;

    /// Particles
    pub const PARTICLE_SIZE: f32 = 3.0;
    pub const PARTICLE_DECAY: f32 = 0.05;
    pub const PARTICLE_SWEEP: f32 = 5.0;
    pub const PARTICLE_SPREAD: f32 = 6.0;
    pub const PARTICLE_JITTER: f32 = 2.0;
    pub const MAX_PARTICLES: usize = 512;
    pub const CRASH_BURST: usize = 40;
    /// Exhaust kicks in above this fraction of max speed
    pub const EXHAUST_SPEED_RATIO: f32 = 0.8;

    /// Collision rectangles are shrunk by this much on every side
    pub const COLLISION_BUFFER: f32 = 4.0;

    /// Road marker scroll
    pub const ROAD_SCROLL_RATE: f32 = 15.0;
    pub const ROAD_DASH_PERIOD: f32 = 100.0;
    pub const ROAD_DASH_LENGTH: f32 = 40.0;
    /// Verge streaks appear above this speed
    pub const SPEED_LINE_MIN_SPEED: f32 = 15.0;
}

/// Display tags (linear RGBA)
pub mod palette {
    pub const PLAYER_ONE: [f32; 4] = [0.0, 1.0, 0.255, 1.0];
    pub const PLAYER_TWO: [f32; 4] = [0.0, 0.8, 1.0, 1.0];
    pub const TRAFFIC: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.333, 1.0],
        [1.0, 0.8, 0.0, 1.0],
        [0.741, 0.0, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
    ];
    pub const OVERTAKING: [f32; 4] = [0.533, 0.533, 0.533, 1.0];
    pub const SCRAPE: [f32; 4] = [0.533, 0.533, 0.533, 1.0];
    pub const EXHAUST: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    pub const CRASH: [f32; 4] = [1.0, 0.647, 0.0, 1.0];
}

/// Odometer readout: whole distance units, zero-padded to six digits
pub fn format_distance(score: f32) -> String {
    format!("{:06}", score.max(0.0).floor() as u64)
}

/// Speedometer readout in km/h
pub fn format_speed(speed: f32) -> String {
    format!("{} km/h", (speed.max(0.0) * 10.0).floor() as u32)
}

/// Speedometer fill, 0-100
pub fn speed_gauge_percent(speed: f32) -> f32 {
    (speed / consts::MAX_SPEED * 100.0).clamp(0.0, 100.0)
}
