//! Run state machine
//!
//! `Menu -> Playing <-> Paused -> GameOver -> Menu`. A session owns one console
//! per seat; single-player drives only the first. A crash freezes that
//! console immediately, but the run only ends once every active console has
//! crashed, after a short delay so the crash can play out on screen.

use serde::{Deserialize, Serialize};

use crate::console::PlayerConsole;
use crate::error::ConfigError;
use crate::highscores::{HighScores, unix_time_ms};
use crate::palette;
use crate::settings::Settings;
use crate::sim::{ControlScheme, Key, RaceObserver, SimConfig};

/// Outer run state shared by every console in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Menu,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Single,
    /// Two local players side by side
    Multi,
}

impl GameMode {
    pub fn player_count(&self) -> usize {
        match self {
            GameMode::Single => 1,
            GameMode::Multi => 2,
        }
    }
}

pub struct Session<O: RaceObserver> {
    run_state: RunState,
    mode: GameMode,
    consoles: [PlayerConsole<O>; 2],
    crashed: [bool; 2],
    /// Timestamp at which the pending game over lands
    game_over_at: Option<f64>,
    settings: Settings,
    high_scores: HighScores,
}

impl<O: RaceObserver> Session<O> {
    /// Build both seats. `config` sets the shared geometry; controls and accent
    /// colours are assigned per seat.
    pub fn new(
        config: SimConfig,
        settings: Settings,
        seed: u64,
        player_one: O,
        player_two: O,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let config = SimConfig {
            max_particles: settings.max_particles(),
            ..config
        };
        let p1 = config
            .clone()
            .with_controls(ControlScheme::Both)
            .with_accent(palette::PLAYER_ONE);
        let p2 = config
            .with_controls(ControlScheme::Arrows)
            .with_accent(palette::PLAYER_TWO);

        let max_ticks = settings.max_frame_ticks;
        let consoles = [
            PlayerConsole::new(p1, seed, max_ticks, player_one)?,
            PlayerConsole::new(p2, seed.wrapping_add(0x5eed), max_ticks, player_two)?,
        ];
        log::info!("session ready (seed {seed})");

        Ok(Self {
            run_state: RunState::Menu,
            mode: GameMode::Single,
            consoles,
            crashed: [false; 2],
            game_over_at: None,
            settings,
            high_scores: HighScores::new(),
        })
    }

    pub fn with_high_scores(mut self, high_scores: HighScores) -> Self {
        self.high_scores = high_scores;
        self
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn active_players(&self) -> usize {
        self.mode.player_count()
    }

    /// # Panics
    ///
    /// Panics if `seat` is not 0 or 1.
    pub fn console(&self, seat: usize) -> &PlayerConsole<O> {
        &self.consoles[seat]
    }

    /// # Panics
    ///
    /// Panics if `seat` is not 0 or 1.
    pub fn console_mut(&mut self, seat: usize) -> &mut PlayerConsole<O> {
        &mut self.consoles[seat]
    }

    /// False for any seat outside the session
    pub fn is_crashed(&self, seat: usize) -> bool {
        self.crashed.get(seat).copied().unwrap_or(false)
    }

    /// Floored distance of each seat
    pub fn final_distances(&self) -> [u64; 2] {
        self.consoles
            .each_ref()
            .map(|c| c.state().score.max(0.0).floor() as u64)
    }

    /// Winning seat of a two-player run. Ties go to the second seat.
    pub fn winner(&self) -> Option<usize> {
        if self.mode != GameMode::Multi {
            return None;
        }
        let [p1, p2] = self.final_distances();
        Some(if p1 > p2 { 0 } else { 1 })
    }

    /// Leave the menu. State was already zeroed on the way in.
    pub fn start(&mut self, mode: GameMode) -> bool {
        if self.run_state != RunState::Menu {
            log::debug!("start ignored in {:?}", self.run_state);
            return false;
        }
        self.mode = mode;
        let p1_controls = match mode {
            GameMode::Single => ControlScheme::Both,
            GameMode::Multi => ControlScheme::Wasd,
        };
        self.consoles[0].set_controls(p1_controls);
        self.crashed = [false; 2];
        self.game_over_at = None;
        self.run_state = RunState::Playing;
        log::info!("run started ({mode:?})");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.run_state = match self.run_state {
            RunState::Playing => RunState::Paused,
            RunState::Paused => RunState::Playing,
            other => {
                log::debug!("pause ignored in {other:?}");
                return false;
            }
        };
        log::info!("run state -> {:?}", self.run_state);
        true
    }

    /// Back to the menu after a finished run
    pub fn restart(&mut self) -> bool {
        if self.run_state != RunState::GameOver {
            log::debug!("restart ignored in {:?}", self.run_state);
            return false;
        }
        self.enter_menu();
        true
    }

    fn enter_menu(&mut self) {
        for console in &mut self.consoles {
            console.reset();
        }
        self.crashed = [false; 2];
        self.game_over_at = None;
        self.run_state = RunState::Menu;
        log::info!("run state -> Menu");
    }

    pub fn key_down(&mut self, key: Key) {
        let active = self.active_players();
        let mut pause_requested = false;
        for console in &mut self.consoles[..active] {
            pause_requested |= console.key_down(key);
        }
        if pause_requested {
            self.toggle_pause();
        }
    }

    pub fn key_up(&mut self, key: Key) {
        let active = self.active_players();
        for console in &mut self.consoles[..active] {
            console.key_up(key);
        }
    }

    pub fn touch(&mut self, seat: usize, field_x: Option<f32>) {
        if seat < self.active_players() {
            self.consoles[seat].set_touch(field_x);
        }
    }

    /// Drive every active console for one frame
    pub fn frame(&mut self, now_ms: f64) {
        for seat in 0..self.active_players() {
            self.console_frame(seat, now_ms);
        }
    }

    /// Drive one console; consoles may be scheduled independently
    pub fn console_frame(&mut self, seat: usize, now_ms: f64) {
        if seat >= self.active_players() {
            return;
        }
        if self.consoles[seat].frame(now_ms, self.run_state) {
            self.on_crash(seat, now_ms);
        }
        self.check_game_over(now_ms);
    }

    fn on_crash(&mut self, seat: usize, now_ms: f64) {
        self.crashed[seat] = true;
        let score = self.consoles[seat].state().score;
        log::info!("player {} crashed at distance {score:.0}", seat + 1);

        let active = self.active_players();
        if self.crashed[..active].iter().all(|&c| c) {
            self.game_over_at = Some(now_ms + self.settings.game_over_delay_ms);
        }
    }

    fn check_game_over(&mut self, now_ms: f64) {
        let due = match self.game_over_at {
            Some(at) => now_ms >= at,
            None => false,
        };
        if !due || !matches!(self.run_state, RunState::Playing | RunState::Paused) {
            return;
        }
        self.game_over_at = None;
        self.run_state = RunState::GameOver;
        log::info!("run state -> GameOver");

        if self.mode == GameMode::Single {
            let distance = self.final_distances()[0];
            if let Some(rank) = self.high_scores.add_score(distance, unix_time_ms()) {
                log::info!("distance {distance} ranks #{rank}");
                self.high_scores.save();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::NOMINAL_TICK_MS;
    use crate::sim::spawn::try_spawn_oncoming;

    #[derive(Default)]
    struct Counter {
        crashes: u32,
        pauses: u32,
    }

    impl RaceObserver for Counter {
        fn crashed(&mut self) {
            self.crashes += 1;
        }
        fn pause_toggle_requested(&mut self) {
            self.pauses += 1;
        }
    }

    fn session() -> Session<Counter> {
        Session::new(
            SimConfig::default(),
            Settings::default(),
            77,
            Counter::default(),
            Counter::default(),
        )
        .expect("valid config")
    }

    /// Park a car on top of the seat's player so its next live frame crashes
    fn doom(session: &mut Session<Counter>, seat: usize) {
        let state = session.console_mut(seat).state_mut();
        let lane = state.config.lane_at(state.player.center().x);
        state.traffic.clear();
        try_spawn_oncoming(state, lane).expect("empty road");
        let pos = state.player.pos;
        if let Some(car) = state.traffic.last_mut() {
            car.pos = pos;
        }
    }

    #[test]
    fn test_transitions() {
        let mut s = session();
        assert_eq!(s.run_state(), RunState::Menu);
        assert!(!s.toggle_pause());
        assert!(!s.restart());

        assert!(s.start(GameMode::Single));
        assert!(!s.start(GameMode::Multi));
        assert!(s.toggle_pause());
        assert_eq!(s.run_state(), RunState::Paused);
        assert!(s.toggle_pause());
        assert_eq!(s.run_state(), RunState::Playing);
        assert!(!s.restart());
    }

    #[test]
    fn test_controls_follow_mode() {
        let mut s = session();
        s.start(GameMode::Multi);
        assert_eq!(s.console(0).controls(), ControlScheme::Wasd);
        assert_eq!(s.console(1).controls(), ControlScheme::Arrows);
        assert_eq!(s.active_players(), 2);
    }

    #[test]
    fn test_escape_toggles_once_in_multi() {
        let mut s = session();
        s.start(GameMode::Multi);
        s.key_down(Key::Escape);
        assert_eq!(s.run_state(), RunState::Paused);
        assert_eq!(s.console(0).observer().pauses, 1);
        assert_eq!(s.console(1).observer().pauses, 1);
    }

    #[test]
    fn test_single_crash_ends_after_delay() {
        let mut s = session();
        s.start(GameMode::Single);
        s.console_mut(0).state_mut().player.speed = 10.0;
        s.key_down(Key::W);
        s.frame(0.0);
        s.frame(NOMINAL_TICK_MS);
        doom(&mut s, 0);
        s.frame(2.0 * NOMINAL_TICK_MS);
        assert!(s.is_crashed(0));
        assert_eq!(s.console(0).observer().crashes, 1);
        assert_eq!(s.run_state(), RunState::Playing);

        s.frame(2.0 * NOMINAL_TICK_MS + 499.0);
        assert_eq!(s.run_state(), RunState::Playing);
        s.frame(2.0 * NOMINAL_TICK_MS + 500.0);
        assert_eq!(s.run_state(), RunState::GameOver);
        assert_eq!(s.console(0).observer().crashes, 1);
        assert!(s.high_scores().best() > 0);
    }

    #[test]
    fn test_multi_waits_for_both_crashes() {
        let mut s = session();
        s.start(GameMode::Multi);
        s.frame(0.0);
        doom(&mut s, 0);
        s.frame(NOMINAL_TICK_MS);
        s.frame(5_000.0);
        assert!(s.is_crashed(0));
        assert_eq!(s.run_state(), RunState::Playing);

        doom(&mut s, 1);
        s.console_frame(1, 5_000.0 + NOMINAL_TICK_MS);
        s.frame(6_000.0);
        assert_eq!(s.run_state(), RunState::GameOver);
        assert!(s.high_scores().is_empty());
    }

    #[test]
    fn test_high_score_is_stamped_with_wall_clock() {
        let mut s = session();
        s.start(GameMode::Single);
        s.frame(0.0);
        s.console_mut(0).state_mut().score = 1234.6;
        doom(&mut s, 0);
        s.frame(NOMINAL_TICK_MS);
        s.frame(2_000.0);
        assert_eq!(s.run_state(), RunState::GameOver);
        let entry = s.high_scores().entries.first().expect("recorded");
        assert_eq!(entry.distance, 1234);
        // 2020-01-01T00:00:00Z
        assert!(entry.timestamp > 1_577_836_800_000.0);
    }

    #[test]
    fn test_winner_compares_floored_distances() {
        let mut s = session();
        assert_eq!(s.winner(), None);
        s.start(GameMode::Multi);

        s.console_mut(0).state_mut().score = 812.9;
        s.console_mut(1).state_mut().score = 400.0;
        assert_eq!(s.final_distances(), [812, 400]);
        assert_eq!(s.winner(), Some(0));

        s.console_mut(1).state_mut().score = 900.2;
        assert_eq!(s.winner(), Some(1));

        // Equal once floored
        s.console_mut(1).state_mut().score = 812.1;
        assert_eq!(s.winner(), Some(1));
    }

    #[test]
    fn test_single_has_no_winner() {
        let mut s = session();
        s.start(GameMode::Single);
        s.console_mut(0).state_mut().score = 50.0;
        assert_eq!(s.winner(), None);
        assert!(!s.is_crashed(5));
    }

    #[test]
    fn test_restart_resets_consoles() {
        let mut s = session();
        s.start(GameMode::Single);
        s.key_down(Key::Up);
        for i in 0..30 {
            s.frame(i as f64 * NOMINAL_TICK_MS);
        }
        doom(&mut s, 0);
        s.frame(30.0 * NOMINAL_TICK_MS);
        s.frame(10_000.0);
        assert_eq!(s.run_state(), RunState::GameOver);

        assert!(s.restart());
        assert_eq!(s.run_state(), RunState::Menu);
        for seat in 0..2 {
            let state = s.console(seat).state();
            assert_eq!(state.score, 0.0);
            assert_eq!(state.player.speed, 0.0);
            assert!(state.traffic.is_empty());
            assert!(!state.crashed);
        }
        assert!(!s.is_crashed(0));
    }

    #[test]
    fn test_inactive_seat_is_not_driven() {
        let mut s = session();
        s.start(GameMode::Single);
        s.console_mut(1).key_down(Key::Up);
        for i in 0..10 {
            s.console_frame(1, i as f64 * NOMINAL_TICK_MS);
        }
        assert_eq!(s.console(1).state().time_ticks, 0);
    }
}
