//! Simulation state and entity types
//!
//! Everything one player's run owns lives in [`SimState`]. Two-player mode
//! builds two of these; nothing is shared between them.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::SimConfig;
use super::events::SimEvent;
use crate::consts::*;
use crate::error::ConfigError;

/// Bounding box size, fixed per entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player's car. Only `pos.x` and `speed` change during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub dim: Dimensions,
    /// Forward speed, always in [0, MAX_SPEED]
    pub speed: f32,
    pub color: [f32; 4],
}

impl Player {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.dim.width, self.dim.height) / 2.0
    }
}

/// Direction traffic entered the field from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficKind {
    /// Spawned ahead, scrolls down toward the player
    Oncoming,
    /// Spawned behind a stalled player, drives up past them
    Overtaking,
}

/// A traffic car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficCar {
    pub id: u32,
    pub kind: TrafficKind,
    pub pos: Vec2,
    pub dim: Dimensions,
    pub color: [f32; 4],
    /// The car's own speed contribution
    pub speed: f32,
    /// Latches true the first time the car's centre crosses the player's
    pub passed_player: bool,
}

impl TrafficCar {
    pub fn center_y(&self) -> f32 {
        self.pos.y + self.dim.height / 2.0
    }
}

/// A visual particle (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub dim: Dimensions,
    pub color: [f32; 4],
    /// Initial jitter magnitude
    pub jitter: f32,
    /// 0-1, decreases over time
    pub life: f32,
    pub max_life: f32,
}

/// One player's simulation context
#[derive(Debug, Clone)]
pub struct SimState {
    pub config: SimConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub player: Player,
    /// Active traffic, in creation order
    pub traffic: Vec<TrafficCar>,
    pub particles: Vec<Particle>,
    /// Distance travelled this run
    pub score: f32,
    /// Stepwise multiplier on spawn rate and traffic speed
    pub difficulty: f32,
    /// Lane marker scroll, in [0, ROAD_DASH_PERIOD)
    pub road_offset: f32,
    /// Accumulated tick units spent below STALL_SPEED
    pub stall_ticks: f32,
    /// Terminal sub-state: set by the collision detector, cleared by reset
    pub crashed: bool,
    /// Live ticks since reset
    pub time_ticks: u64,
    /// Events raised during the last tick, drained by the driver
    pub events: Vec<SimEvent>,
    /// Traffic decisions
    pub(crate) rng: Pcg32,
    /// Particle cosmetics, kept apart so visuals never shift traffic
    pub(crate) fx_rng: Pcg32,
    next_id: u32,
}

impl SimState {
    /// Build a fresh run. Fails fast on malformed geometry.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let player = Self::starting_player(&config);
        Ok(Self {
            config,
            seed,
            player,
            traffic: Vec::new(),
            particles: Vec::new(),
            score: 0.0,
            difficulty: 1.0,
            road_offset: 0.0,
            stall_ticks: 0.0,
            crashed: false,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            next_id: 1,
        })
    }

    fn starting_player(config: &SimConfig) -> Player {
        Player {
            pos: Vec2::new(config.max_player_x() / 2.0, config.player_y()),
            dim: Dimensions::new(config.player_width, config.player_height),
            speed: 0.0,
            color: config.accent,
        }
    }

    /// Zero all per-run state. The RNG streams keep going so the next run differs.
    pub fn reset(&mut self) {
        self.player = Self::starting_player(&self.config);
        self.traffic.clear();
        self.particles.clear();
        self.score = 0.0;
        self.difficulty = 1.0;
        self.road_offset = 0.0;
        self.stall_ticks = 0.0;
        self.crashed = false;
        self.time_ticks = 0;
        self.events.clear();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Scatter `count` particles from `at`
    pub fn emit_particles(&mut self, at: Vec2, color: [f32; 4], count: usize) {
        for _ in 0..count {
            let id = self.next_entity_id();
            let vel = Vec2::new(
                (self.fx_rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
                (self.fx_rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
            );
            self.particles.push(Particle {
                id,
                pos: at,
                vel,
                dim: Dimensions::new(PARTICLE_SIZE, PARTICLE_SIZE),
                color,
                jitter: self.fx_rng.random::<f32>() * PARTICLE_JITTER,
                life: 1.0,
                max_life: 1.0,
            });
        }
        let cap = self.config.max_particles;
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }
}
