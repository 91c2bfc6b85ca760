//! Per-frame simulation step
//!
//! Order within a frame: flight (or unload), effect aging, survival clock,
//! game-over handling, button, then pickups and hive checks.

use glam::Vec2;

use super::bee::StickInput;
use super::hive::UnloadStep;
use super::state::{GameEvent, GameState};
use super::time::{Millis, age};
use crate::consts::*;

/// Input sampled for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub stick: StickInput,
    /// Debounced button press edge
    pub pressed: bool,
}

/// Motion summary for the ambient wing buzz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientFeed {
    pub wing_speed: f32,
    pub vel: Vec2,
    pub speed: f32,
}

/// What happened this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// A flower was harvested
    pub collected: bool,
    /// Idle -> Unloading this frame
    pub unload_started: bool,
    /// Units delivered this frame (0 or 1)
    pub delivered: u8,
    /// Size of an unload run that completed this frame
    pub unload_finished: Option<u8>,
    /// First game-over frame
    pub game_over: bool,
    pub restarted: bool,
    /// Present only in normal play
    pub ambient: Option<AmbientFeed>,
}

/// Frame delta in seconds from two wrapping timestamps, capped at
/// [`MAX_DELTA_MS`]
pub fn frame_dt(now: Millis, last: Millis) -> f32 {
    age(now, last).min(MAX_DELTA_MS) as f32 / 1000.0
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &FrameInput, now: Millis, dt: f32) -> FrameReport {
    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    let mut report = FrameReport::default();

    if state.is_unloading() {
        state.was_boosting = false;
        state.bee.hold_at_hive();
        state.camera.settle(dt);
        step_unload(state, now, &mut report);
    } else {
        fly(state, &input.stick, now, dt);
    }

    state.effects.update(now);

    state.survival.tick(dt, now);
    if state.survival.game_over && !state.game_over_handled {
        state.game_over_handled = true;
        state.hive.abandon();
        state.emit(GameEvent::StopAll);
        state.emit(GameEvent::GameOver {
            score: state.survival.score,
        });
        report.game_over = true;
    }

    // Presses during an unload are swallowed, not queued
    let edge = input.pressed && !state.is_unloading();

    if state.is_game_over() {
        if edge {
            state.reset(now);
            state.emit(GameEvent::Restarted);
            report.restarted = true;
        }
        return report;
    }

    if state.is_unloading() {
        return report;
    }

    if edge {
        state.emit(GameEvent::Click);
        let carrying = state.survival.pollen > 0;
        let nearest = state.flowers.nearest(state.bee.cell_pos());
        state.radar.ping(now, carrying, nearest);
        state.emit(GameEvent::RadarPing {
            to_hive: state.radar.to_hive,
        });
    }

    state.radar.update(now);
    report.collected = try_collect(state, now);
    report.unload_started = state
        .hive
        .try_store(state.survival.pollen, state.bee.cell_pos(), now);
    if report.unload_started {
        // Cut the chirp and any radar tone so the first unload tone is clean
        state.emit(GameEvent::StopAll);
    }

    report.ambient = Some(AmbientFeed {
        wing_speed: state.bee.wing_speed,
        vel: state.bee.vel,
        speed: state.bee.speed(),
    });
    report
}

fn fly(state: &mut GameState, stick: &StickInput, now: Millis, dt: f32) {
    let boosting = state.bee.is_boosting(now);
    if boosting && !state.was_boosting {
        state
            .camera
            .trigger_shake(now, CAMERA_SHAKE_MAGNITUDE, CAMERA_SHAKE_DURATION_MS);
    }
    state.was_boosting = boosting;

    state.bee.step_physics(stick, dt, boosting);
    state.bee.update_wings(dt);

    if boosting && state.bee.wing_speed > TRAIL_MIN_WING_SPEED {
        let speed_n = state.bee.speed_norm();
        state
            .effects
            .emit_boost_trail(state.bee.pos, state.bee.vel, speed_n, now, &mut state.rng);
    }

    state.camera.update(dt, boosting, now);
}

fn step_unload(state: &mut GameState, now: Millis, report: &mut FrameReport) {
    match state.hive.update(now) {
        UnloadStep::Waiting => {}
        UnloadStep::Delivered {
            remaining,
            tone_hz,
            time_gain,
            ..
        } => {
            state.survival.pollen = remaining;
            state.survival.score = state.survival.score.saturating_add(1);
            state.effects.spawn_belt_item(now);
            state.effects.trigger_hive_pulse(now);
            state.survival.add_time(now, time_gain);
            state.emit(GameEvent::UnloadTone {
                hz: tone_hz,
                ms: UNLOAD_CHIRP_MS,
            });
            report.delivered = 1;
        }
        UnloadStep::Finished { total, tail_hz } => {
            if let Some(hz) = tail_hz {
                state.emit(GameEvent::UnloadTail {
                    hz,
                    ms: EVENT_TAIL_MS,
                });
            }
            if total > 0 {
                let at = state.camera.project(Vec2::ZERO, state.bee.pos);
                state.effects.spawn_popup(now, total, at, &mut state.rng);
            }
            log::info!("delivered {total}, score {}", state.survival.score);
            report.unload_finished = Some(total);
        }
    }
}

/// Harvest the first overlapping flower if there is room aboard
fn try_collect(state: &mut GameState, now: Millis) -> bool {
    if !state.survival.can_carry_more() || state.is_unloading() {
        return false;
    }
    let bee = state.bee.cell_pos();
    let Some(slot) = state.flowers.harvest(bee, &mut state.rng, now) else {
        return false;
    };
    state.survival.pollen += 1;
    state.bee.trigger_auto_boost(now);
    state.emit(GameEvent::PollenChirp);
    log::debug!("flower {slot} harvested, carrying {}", state.survival.pollen);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hive::survival_gain;

    const DT: f32 = 0.016;

    fn idle() -> FrameInput {
        FrameInput {
            stick: StickInput::NEUTRAL,
            pressed: false,
        }
    }

    fn press() -> FrameInput {
        FrameInput {
            stick: StickInput::NEUTRAL,
            pressed: true,
        }
    }

    /// Fresh state with one flower sitting on the bee and the rest far away
    fn state_with_flower_on_bee(now: Millis) -> GameState {
        let mut state = GameState::new(99, now, true);
        for f in state.flowers.flowers.iter_mut() {
            f.alive = false;
        }
        let f = &mut state.flowers.flowers[0];
        f.alive = true;
        f.wx = 5;
        f.wy = 0;
        f.radius = 8;
        state
    }

    #[test]
    fn test_collect_near_flower() {
        let mut state = state_with_flower_on_bee(1_000);
        let report = tick(&mut state, &idle(), 1_016, DT);

        assert!(report.collected);
        assert_eq!(state.survival.pollen, 1);
        assert!(state.bee.is_boosting(1_016));
        assert!(state.bee.is_boost_on_cooldown(1_016));
        assert!(state.events.contains(&GameEvent::PollenChirp));
        // Respawned elsewhere, out of reach
        let f = &state.flowers.flowers[0];
        assert!(f.alive);
        assert_eq!(state.flowers.first_hit(state.bee.cell_pos()), None);
    }

    #[test]
    fn test_full_carry_blocks_collection() {
        let mut state = state_with_flower_on_bee(1_000);
        state.survival.pollen = MAX_POLLEN_CARRY;
        // Keep the bee off the hive so no unload starts
        state.bee.pos = Vec2::new(60.0, 0.0);
        state.flowers.flowers[0].wx = 60;
        let report = tick(&mut state, &FrameInput {
            stick: StickInput::new(60.0 / ROAM_RADIUS, 0.0),
            pressed: false,
        }, 1_016, DT);
        assert!(!report.collected);
        assert_eq!(state.survival.pollen, MAX_POLLEN_CARRY);
        assert!(state.flowers.flowers[0].alive);
        assert_eq!(state.flowers.flowers[0].wx, 60);
    }

    #[test]
    fn test_collect_at_seven_reaches_cap() {
        let mut state = state_with_flower_on_bee(1_000);
        state.survival.pollen = MAX_POLLEN_CARRY - 1;
        state.bee.pos = Vec2::new(60.0, 0.0);
        state.flowers.flowers[0].wx = 60;
        let report = tick(&mut state, &FrameInput {
            stick: StickInput::new(60.0 / ROAM_RADIUS, 0.0),
            pressed: false,
        }, 1_016, DT);
        assert!(report.collected);
        assert_eq!(state.survival.pollen, MAX_POLLEN_CARRY);
        assert!(!state.survival.can_carry_more());
    }

    /// Run frames until the unload finishes, returning the frame it ended on
    fn run_unload(state: &mut GameState, start: Millis) -> Millis {
        let mut now = start;
        for _ in 0..200 {
            now = now.wrapping_add(16);
            if tick(state, &idle(), now, DT).unload_finished.is_some() {
                return now;
            }
        }
        panic!("unload never finished");
    }

    #[test]
    fn test_unload_three_pollen() {
        let start = 5_000;
        let mut state = GameState::new(5, start, true);
        state.survival.pollen = 3;
        state.survival.time_left = 5.0;

        let report = tick(&mut state, &idle(), start + 16, DT);
        assert!(report.unload_started);
        assert!(state.is_unloading());

        state.drain_events();
        let before = state.survival.time_left;
        run_unload(&mut state, start + 16);

        assert_eq!(state.survival.score, 3);
        assert_eq!(state.survival.pollen, 0);
        assert!(!state.is_unloading());
        assert_eq!(state.effects.belt.alive_count(), 3);
        assert_eq!(state.effects.popups.alive_count(), 1);
        assert_eq!(state.effects.popups.alive().next().map(|p| p.value), Some(3));

        let tones: Vec<u16> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::UnloadTone { hz, .. } => Some(*hz),
                _ => None,
            })
            .collect();
        assert_eq!(tones, vec![760, 850, 940]);
        assert!(state.events.contains(&GameEvent::UnloadTail {
            hz: 940,
            ms: EVENT_TAIL_MS
        }));

        // Gains 0.65, 1.0075, 1.365 minus the clock running meanwhile
        let gained: f32 = (0..3).map(survival_gain).sum();
        assert!((gained - 3.0225).abs() < 1e-4);
        assert!(state.survival.time_left > before + gained - 1.0);
    }

    #[test]
    fn test_unload_start_silences_before_first_tone() {
        let mut state = GameState::new(5, 0, true);
        state.survival.pollen = 2;
        state.drain_events();

        assert!(tick(&mut state, &idle(), 16, DT).unload_started);
        assert_eq!(state.drain_events(), vec![GameEvent::StopAll]);

        tick(&mut state, &idle(), 32, DT);
        let events = state.drain_events();
        assert!(matches!(events.first(), Some(GameEvent::UnloadTone { hz: 760, .. })));
        assert!(!events.contains(&GameEvent::StopAll));
    }

    #[test]
    fn test_unload_conserves_pollen() {
        let mut state = GameState::new(11, 0, true);
        state.survival.pollen = MAX_POLLEN_CARRY;
        tick(&mut state, &idle(), 16, DT);
        assert!(state.is_unloading());
        run_unload(&mut state, 16);
        assert_eq!(state.survival.score, MAX_POLLEN_CARRY as u32);
        assert_eq!(state.survival.pollen, 0);
        // Full clock stays clamped at the cap
        assert!(state.survival.time_left <= SURVIVAL_TIME_MAX);
        assert!(state.survival.time_left > SURVIVAL_TIME_MAX - 0.5);
    }

    #[test]
    fn test_late_frame_delivers_once() {
        let mut state = GameState::new(3, 0, true);
        state.survival.pollen = 4;
        tick(&mut state, &idle(), 16, DT);
        // First tick due immediately
        assert_eq!(tick(&mut state, &idle(), 32, DT).delivered, 1);
        // A 500 ms stall still pays out a single unit
        assert_eq!(tick(&mut state, &idle(), 532, DT).delivered, 1);
        assert_eq!(state.survival.score, 2);
        assert_eq!(state.survival.pollen, 2);
    }

    #[test]
    fn test_unload_across_clock_wrap() {
        let start = u32::MAX - 150;
        let mut state = GameState::new(8, start, true);
        state.survival.pollen = 3;
        tick(&mut state, &idle(), start.wrapping_add(16), DT);
        assert!(state.is_unloading());
        let end = run_unload(&mut state, start.wrapping_add(16));
        assert!(end < start, "should finish after the wrap");
        assert_eq!(state.survival.score, 3);
    }

    #[test]
    fn test_bee_parked_while_unloading() {
        let mut state = GameState::new(4, 0, true);
        state.survival.pollen = 2;
        state.bee.pos = Vec2::new(10.0, 5.0);
        tick(&mut state, &idle(), 16, DT);
        assert!(state.is_unloading());
        let report = tick(
            &mut state,
            &FrameInput {
                stick: StickInput::new(1.0, 1.0),
                pressed: true,
            },
            32,
            DT,
        );
        assert_eq!(state.bee.pos, Vec2::ZERO);
        assert_eq!(state.bee.vel, Vec2::ZERO);
        // Button swallowed: no click, no radar
        assert!(!state.radar.active);
        assert!(!state.events.contains(&GameEvent::Click));
        assert!(report.ambient.is_none());
    }

    #[test]
    fn test_press_pings_radar() {
        let mut state = GameState::new(21, 0, true);
        state.bee.pos = Vec2::new(40.0, 0.0);
        tick(&mut state, &press(), 16, DT);
        assert!(state.radar.showing(16));
        assert!(!state.radar.to_hive);
        assert_eq!(state.events[0], GameEvent::Click);
        assert_eq!(state.events[1], GameEvent::RadarPing { to_hive: false });

        state.survival.pollen = 1;
        tick(&mut state, &press(), 32, DT);
        assert!(state.radar.to_hive);
    }

    #[test]
    fn test_game_over_stops_sound_once_and_abandons_unload() {
        let mut state = GameState::new(6, 0, true);
        state.survival.pollen = 5;
        tick(&mut state, &idle(), 16, DT);
        assert!(state.is_unloading());
        // Hold off the next unload tick so no time is granted this frame
        state.hive.unload_next_ms = 10_000;
        state.survival.time_left = 0.001;
        state.drain_events();

        let report = tick(&mut state, &idle(), 32, 0.05);
        assert!(report.game_over);
        assert!(state.is_game_over());
        assert!(!state.is_unloading());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::StopAll, GameEvent::GameOver { score: 0 }]
        );

        let report = tick(&mut state, &idle(), 48, DT);
        assert!(!report.game_over);
        assert!(state.drain_events().is_empty());
        assert!(report.ambient.is_none());
    }

    #[test]
    fn test_press_after_game_over_restarts() {
        let mut state = GameState::new(6, 0, true);
        state.survival.score = 12;
        state.survival.time_left = 0.001;
        tick(&mut state, &idle(), 16, 0.05);
        assert!(state.is_game_over());

        let report = tick(&mut state, &press(), 32, DT);
        assert!(report.restarted);
        assert!(!state.is_game_over());
        assert_eq!(state.survival.score, 0);
        assert_eq!(state.survival.time_left, SURVIVAL_TIME_MAX);
        assert_eq!(state.flowers.alive_count(), FLOWER_N);
        assert!(state.events.contains(&GameEvent::Restarted));
        assert!(!state.radar.active);
    }

    #[test]
    fn test_boost_edge_shakes_camera_once() {
        let mut state = GameState::new(2, 0, true);
        state.bee.trigger_auto_boost(0);
        tick(&mut state, &idle(), 16, DT);
        assert!(state.was_boosting);
        let first_until = state.camera.shake_until;
        assert_eq!(first_until, 16 + CAMERA_SHAKE_DURATION_MS);
        tick(&mut state, &idle(), 32, DT);
        assert_eq!(state.camera.shake_until, first_until);
    }

    #[test]
    fn test_boost_trail_needs_speed() {
        let mut state = GameState::new(2, 0, true);
        state.bee.trigger_auto_boost(0);
        tick(&mut state, &idle(), 30, DT);
        assert!(!state.effects.trail.any_alive());

        state.bee.pos = Vec2::new(-150.0, 0.0);
        state.bee.vel = Vec2::new(400.0, 0.0);
        tick(&mut state, &idle(), 60, DT);
        assert_eq!(state.effects.trail.alive_count(), 2);
    }

    #[test]
    fn test_frame_dt_caps_and_wraps() {
        assert_eq!(frame_dt(1_016, 1_000), 0.016);
        assert_eq!(frame_dt(5_000, 1_000), 0.06);
        assert_eq!(frame_dt(10, u32::MAX - 5), 0.016);
    }
}
