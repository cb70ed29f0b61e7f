//! Player console: one player's frame loop driver
//!
//! Owns a [`SimState`] together with the input and timing state that feeds it.
//! Each frame the console maps input to intent, ticks the simulation if the
//! run is live and not crashed, and forwards the resulting events to its
//! [`RaceObserver`].

use crate::error::ConfigError;
use crate::frame::FrameClock;
use crate::session::RunState;
use crate::sim::events::{self, RaceObserver};
use crate::sim::{ControlScheme, Key, KeyState, SimConfig, SimState, map_intent, tick};

pub struct PlayerConsole<O: RaceObserver> {
    state: SimState,
    keys: KeyState,
    /// Last touch point in field space
    touch_x: Option<f32>,
    clock: FrameClock,
    observer: O,
}

impl<O: RaceObserver> PlayerConsole<O> {
    pub fn new(
        config: SimConfig,
        seed: u64,
        max_frame_ticks: f32,
        observer: O,
    ) -> Result<Self, ConfigError> {
        if !(max_frame_ticks.is_finite() && max_frame_ticks > 0.0) {
            return Err(ConfigError::InvalidTickClamp(max_frame_ticks));
        }
        Ok(Self {
            state: SimState::new(config, seed)?,
            keys: KeyState::default(),
            touch_x: None,
            clock: FrameClock::new(max_frame_ticks),
            observer,
        })
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn controls(&self) -> ControlScheme {
        self.state.config.controls
    }

    pub fn set_controls(&mut self, controls: ControlScheme) {
        self.state.config.controls = controls;
        if !controls.accepts_touch() {
            self.touch_x = None;
        }
    }

    pub fn is_crashed(&self) -> bool {
        self.state.crashed
    }

    /// Zero the run and report it to the observer
    pub fn reset(&mut self) {
        self.state.reset();
        self.keys.clear();
        self.touch_x = None;
        self.clock.reset();
        self.observer.score_changed(0.0);
        self.observer.speed_changed(0.0);
    }

    /// Returns true when the key asks for a pause toggle
    pub fn key_down(&mut self, key: Key) -> bool {
        if key == Key::Escape {
            self.observer.pause_toggle_requested();
            return true;
        }
        self.keys.press(key);
        false
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys.release(key);
    }

    /// Touch start/move with a field-space x, or `None` on touch end
    pub fn set_touch(&mut self, field_x: Option<f32>) {
        self.touch_x = field_x.filter(|_| self.controls().accepts_touch());
    }

    /// Drive one animation frame. Returns true if this frame crashed the run.
    pub fn frame(&mut self, now_ms: f64, run_state: RunState) -> bool {
        let dt = self.clock.advance(now_ms);
        if self.state.crashed || run_state != RunState::Playing {
            return false;
        }

        let center_x = self.state.player.center().x;
        let intent = map_intent(&self.keys, self.touch_x, self.controls(), center_x);
        tick(&mut self.state, &intent, dt);

        let crashed = self.state.crashed;
        events::dispatch(self.state.events.drain(..), &mut self.observer);
        crashed
    }
}
