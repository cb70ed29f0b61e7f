//! Construction-time errors
//!
//! The simulation itself has no recoverable failures; only a malformed
//! configuration is rejected, before any state is built.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("lane count must be at least 1, got {0}")]
    InvalidLaneCount(u32),

    #[error("field must have positive finite dimensions, got {width}x{height}")]
    InvalidField { width: f32, height: f32 },

    #[error("player must have positive finite dimensions, got {width}x{height}")]
    InvalidPlayer { width: f32, height: f32 },

    #[error("player width {player} does not fit in field width {field}")]
    PlayerWiderThanField { player: f32, field: f32 },

    #[error("frame delta clamp must be positive and finite, got {0}")]
    InvalidTickClamp(f32),
}
