//! Events raised by the simulation and the callback surface they feed
//!
//! A tick pushes [`SimEvent`]s into `SimState::events`; the console drains
//! them into whatever [`RaceObserver`] the host supplied.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Running distance, raised every live tick
    ScoreChanged(f32),
    /// Current speed, raised every live tick
    SpeedChanged(f32),
    /// A traffic car crossed the player's centre line fast enough to be heard
    Passed { id: u32 },
    /// First collision of the run
    Crashed { id: u32 },
}

/// Host callbacks for one player console. All methods default to no-ops.
pub trait RaceObserver {
    fn score_changed(&mut self, _score: f32) {}
    fn speed_changed(&mut self, _speed: f32) {}
    fn passed(&mut self) {}
    /// Fires exactly once per run. The host decides when the run is over.
    fn crashed(&mut self) {}
    /// The cancel key was pressed; the host owns the pause state.
    fn pause_toggle_requested(&mut self) {}
}

/// Headless runs and tests that only care about state
impl RaceObserver for () {}

/// Forward drained events to an observer
pub fn dispatch(events: impl IntoIterator<Item = SimEvent>, observer: &mut impl RaceObserver) {
    for event in events {
        match event {
            SimEvent::ScoreChanged(score) => observer.score_changed(score),
            SimEvent::SpeedChanged(speed) => observer.speed_changed(speed),
            SimEvent::Passed { .. } => observer.passed(),
            SimEvent::Crashed { .. } => observer.crashed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tally {
        scores: Vec<f32>,
        passes: u32,
        crashes: u32,
    }

    impl RaceObserver for Tally {
        fn score_changed(&mut self, score: f32) {
            self.scores.push(score);
        }
        fn passed(&mut self) {
            self.passes += 1;
        }
        fn crashed(&mut self) {
            self.crashes += 1;
        }
    }

    #[test]
    fn test_dispatch_routes_each_event() {
        let mut tally = Tally::default();
        dispatch(
            [
                SimEvent::ScoreChanged(1.5),
                SimEvent::SpeedChanged(3.0),
                SimEvent::Passed { id: 4 },
                SimEvent::Crashed { id: 4 },
            ],
            &mut tally,
        );
        assert_eq!(tally.scores, vec![1.5]);
        assert_eq!(tally.passes, 1);
        assert_eq!(tally.crashes, 1);
    }
}
