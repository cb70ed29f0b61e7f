//! Host preferences
//!
//! Persisted in LocalStorage, separate from the high score table.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PARTICLES;
use crate::error::ConfigError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Largest simulation step per frame, in 60 Hz tick units
    pub max_frame_ticks: f32,
    /// Pause between the last crash and the game-over screen
    pub game_over_delay_ms: f64,
    /// Particle effects (sparks, exhaust, crash burst)
    pub particles: bool,
    /// Streaks along the verges at high speed
    pub speed_lines: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_frame_ticks: 4.0,
            game_over_delay_ms: 500.0,
            particles: true,
            speed_lines: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "retro_racer_settings";

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_frame_ticks.is_finite() && self.max_frame_ticks > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidTickClamp(self.max_frame_ticks))
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if self.particles { MAX_PARTICLES } else { 0 }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Settings>(&json) {
                    Ok(settings) if settings.validate().is_ok() => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Ok(_) => log::warn!("Stored settings out of range, using defaults"),
                    Err(e) => log::warn!("Stored settings unreadable: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
