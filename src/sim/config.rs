//! Per-instance simulation configuration

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::palette;

/// Which keys drive a console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlScheme {
    /// WASD or arrows (single player)
    #[default]
    Both,
    Wasd,
    Arrows,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::Both => "BOTH",
            ControlScheme::Wasd => "WASD",
            ControlScheme::Arrows => "ARROWS",
        }
    }

    /// Touch steering is wired to every layout except WASD-only
    pub fn accepts_touch(&self) -> bool {
        !matches!(self, ControlScheme::Wasd)
    }
}

/// Geometry and controls for one player's simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub field_width: f32,
    pub field_height: f32,
    pub lane_count: u32,
    pub player_width: f32,
    pub player_height: f32,
    pub controls: ControlScheme,
    /// Cosmetic only
    pub accent: [f32; 4],
    /// Oldest particles are dropped past this count
    pub max_particles: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            lane_count: LANE_COUNT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            controls: ControlScheme::Both,
            accent: palette::PLAYER_ONE,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl SimConfig {
    pub fn with_controls(mut self, controls: ControlScheme) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_accent(mut self, accent: [f32; 4]) -> Self {
        self.accent = accent;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::InvalidLaneCount(self.lane_count));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.field_width) || !positive(self.field_height) {
            return Err(ConfigError::InvalidField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if !positive(self.player_width) || !positive(self.player_height) {
            return Err(ConfigError::InvalidPlayer {
                width: self.player_width,
                height: self.player_height,
            });
        }
        if self.player_width > self.field_width {
            return Err(ConfigError::PlayerWiderThanField {
                player: self.player_width,
                field: self.field_width,
            });
        }
        Ok(())
    }

    pub fn lane_width(&self) -> f32 {
        self.field_width / self.lane_count as f32
    }

    /// Left edge of a car centred in `lane`
    pub fn lane_x(&self, lane: u32) -> f32 {
        lane as f32 * self.lane_width() + (self.lane_width() - self.player_width) / 2.0
    }

    /// Lane containing horizontal coordinate `x`, clamped to the field
    pub fn lane_at(&self, x: f32) -> u32 {
        let lane = (x / self.lane_width()).floor();
        (lane.max(0.0) as u32).min(self.lane_count - 1)
    }

    /// Rightmost legal player x
    pub fn max_player_x(&self) -> f32 {
        self.field_width - self.player_width
    }

    /// Player's fixed row
    pub fn player_y(&self) -> f32 {
        self.field_height - PLAYER_BOTTOM_OFFSET
    }
}
