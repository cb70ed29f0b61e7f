//! Property tests for the per-player simulation.
//!
//! Random intent sequences and frame steps are fed through `tick`, and the
//! run invariants are checked after every step.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use retro_racer::consts::*;
use retro_racer::sim::spawn::try_spawn_oncoming;
use retro_racer::sim::{Intent, SimConfig, SimEvent, SimState, Steer, TrafficKind, tick};

fn fresh(seed: u64) -> SimState {
    SimState::new(SimConfig::default(), seed).expect("valid config")
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop_oneof![Just(None), Just(Some(Steer::Left)), Just(Some(Steer::Right))],
    )
        .prop_map(|(accelerate, brake, steer_left, steer_right, touch_steer)| Intent {
            accelerate,
            brake,
            steer_left,
            steer_right,
            touch_steer,
        })
}

/// Frame steps in tick units, up to the default stall clamp
fn dt_strategy() -> impl Strategy<Value = f32> {
    (0u32..=400).prop_map(|v| v as f32 * 0.01)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn speed_and_position_stay_in_bounds(
        seed in any::<u64>(),
        steps in prop::collection::vec((intent_strategy(), dt_strategy()), 1..400),
    ) {
        let mut state = fresh(seed);
        let max_x = state.config.max_player_x();
        for (intent, dt) in steps {
            tick(&mut state, &intent, dt);
            state.events.clear();
            prop_assert!(state.player.speed >= 0.0);
            prop_assert!(state.player.speed <= MAX_SPEED);
            prop_assert!(state.player.pos.x >= 0.0);
            prop_assert!(state.player.pos.x <= max_x);
            prop_assert!(state.road_offset >= 0.0 && state.road_offset < ROAD_DASH_PERIOD);
        }
    }

    #[test]
    fn oncoming_spawns_leave_a_lane_open(
        seed in any::<u64>(),
        attempts in prop::collection::vec((0u32..LANE_COUNT, 0u32..400), 1..60),
    ) {
        let mut state = fresh(seed);
        for (lane, drift) in attempts {
            // Push existing traffic down so spawns interleave at varying spacing
            for car in &mut state.traffic {
                car.pos.y += drift as f32;
            }
            if try_spawn_oncoming(&mut state, lane).is_ok() {
                let spawn_y = state.traffic.last().map(|c| c.pos.y).unwrap_or_default();
                let window = state.config.player_height * LANE_BLOCK_HEIGHTS;
                let occupied: BTreeSet<u32> = state
                    .traffic
                    .iter()
                    .filter(|c| (c.pos.y - spawn_y).abs() < window)
                    .map(|c| state.config.lane_at(c.pos.x + c.dim.width / 2.0))
                    .collect();
                prop_assert!(occupied.len() < state.config.lane_count as usize);
            }
        }
    }

    #[test]
    fn each_car_is_passed_at_most_once(
        seed in any::<u64>(),
        steps in prop::collection::vec((intent_strategy(), dt_strategy()), 1..600),
    ) {
        let mut state = fresh(seed);
        let mut passed = HashSet::new();
        for (intent, dt) in steps {
            tick(&mut state, &intent, dt);
            for event in state.events.drain(..) {
                if let SimEvent::Passed { id } = event {
                    prop_assert!(passed.insert(id), "car {} passed twice", id);
                }
            }
        }
    }

    #[test]
    fn crash_stops_all_reporting(
        seed in any::<u64>(),
        lane in 0u32..LANE_COUNT,
        steps in prop::collection::vec((intent_strategy(), dt_strategy()), 1..50),
    ) {
        let mut state = fresh(seed);
        state.player.speed = 10.0;
        try_spawn_oncoming(&mut state, lane).expect("empty road");
        let player_pos = state.player.pos;
        if let Some(car) = state.traffic.last_mut() {
            car.pos = player_pos;
        }

        tick(&mut state, &Intent::default(), 1.0);
        prop_assert!(state.crashed);
        let crashes = state
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Crashed { .. }))
            .count();
        prop_assert_eq!(crashes, 1);
        state.events.clear();

        let frozen = (state.score, state.player.speed, state.player.pos, state.time_ticks);
        for (intent, dt) in steps {
            tick(&mut state, &intent, dt);
            prop_assert!(state.events.is_empty());
        }
        prop_assert_eq!(
            frozen,
            (state.score, state.player.speed, state.player.pos, state.time_ticks)
        );
    }

    #[test]
    fn no_overtaking_before_stall_threshold(
        seed in any::<u64>(),
        dts in prop::collection::vec(dt_strategy(), 1..200),
    ) {
        let mut state = fresh(seed);
        let mut stalled = 0.0;
        for dt in dts {
            if stalled + dt > STALL_TICKS {
                break;
            }
            stalled += dt;
            tick(&mut state, &Intent::default(), dt);
            state.events.clear();
            prop_assert!(state.traffic.iter().all(|c| c.kind != TrafficKind::Overtaking));
        }
    }
}
