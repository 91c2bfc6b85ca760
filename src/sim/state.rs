//! Game state and simulation events
//!
//! Everything the frame loop mutates lives in [`GameState`]. The renderer
//! only ever reads it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bee::Bee;
use super::flowers::FlowerField;
use super::hive::Hive;
use super::radar::Radar;
use super::rng::Xorshift32;
use super::survival::Survival;
use super::time::Millis;
use crate::camera::Camera;
use crate::consts::*;
use crate::vfx::Effects;

/// Something the sound collaborator (or a test) should hear about.
///
/// The simulation appends these during a frame; the driver drains them
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Button edge in normal play
    Click,
    /// Radar ping started
    RadarPing { to_hive: bool },
    /// Pollen picked up from a flower
    PollenChirp,
    /// One unit unloaded at the hive
    UnloadTone { hz: u16, ms: u16 },
    /// Unload run finished; hold the last tone briefly
    UnloadTail { hz: u16, ms: u32 },
    /// Silence everything (unload start, first game-over frame)
    StopAll,
    /// Survival clock ran out
    GameOver { score: u32 },
    /// Full reset after game over
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the current run started from
    pub seed: u32,
    pub rng: Xorshift32,
    pub bee: Bee,
    pub flowers: FlowerField,
    pub hive: Hive,
    pub survival: Survival,
    pub radar: Radar,
    /// Visual-only pools (not gameplay-affecting)
    pub effects: Effects,
    pub camera: Camera,
    /// Boost state on the previous flying frame (rising-edge detection)
    pub was_boosting: bool,
    /// Game-over side effects already applied for this run
    pub game_over_handled: bool,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed, started at `now`
    pub fn new(seed: u32, now: Millis, shake_enabled: bool) -> Self {
        let mut state = Self {
            seed,
            rng: Xorshift32::new(seed),
            bee: Bee::default(),
            flowers: FlowerField::default(),
            hive: Hive::default(),
            survival: Survival::default(),
            radar: Radar::default(),
            effects: Effects::default(),
            camera: Camera::new(shake_enabled),
            was_boosting: false,
            game_over_handled: false,
            events: Vec::with_capacity(16),
        };
        state.reset(now);
        state
    }

    /// Re-initialize every subsystem in one go. The RNG keeps running so a
    /// restart lays out a fresh field.
    pub fn reset(&mut self, now: Millis) {
        self.bee.reset_at(now);
        self.hive.reset();
        self.effects.reset(now);
        self.survival.reset(now);
        self.radar.reset();
        self.camera.reset(now);
        self.flowers.reset(&mut self.rng, now);
        self.was_boosting = false;
        self.game_over_handled = false;
        log::info!(
            "new run: {} flowers, {:.0}s on the clock",
            self.flowers.alive_count(),
            self.survival.time_left
        );
    }

    pub fn is_game_over(&self) -> bool {
        self.survival.game_over
    }

    pub fn is_unloading(&self) -> bool {
        self.hive.is_unloading()
    }

    pub fn is_boosting(&self, now: Millis) -> bool {
        self.bee.is_boosting(now)
    }

    /// Anything on screen still moving on its own. Drives the render cadence.
    pub fn is_animating(&self, now: Millis) -> bool {
        self.is_game_over()
            || self.is_unloading()
            || self.radar.showing(now)
            || self.is_boosting(now)
            || self.bee.wing_speed >= WING_IDLE_THRESHOLD
            || self.effects.any_alive()
    }

    /// Bee world position
    pub fn bee_pos(&self) -> Vec2 {
        self.bee.pos
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        log::debug!("event {event:?}");
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_fresh() {
        let state = GameState::new(42, 1_000, true);
        assert_eq!(state.flowers.alive_count(), FLOWER_N);
        assert_eq!(state.survival.time_left, SURVIVAL_TIME_MAX);
        assert_eq!(state.survival.pollen, 0);
        assert_eq!(state.survival.score, 0);
        assert!(!state.is_game_over());
        assert!(!state.is_unloading());
        assert!(!state.is_boosting(1_000));
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_fresh_state_near_wrap_is_idle() {
        let now = u32::MAX - 10;
        let state = GameState::new(7, now, true);
        assert!(!state.is_animating(now));
        assert!(!state.is_animating(now.wrapping_add(100)));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(1234, 0, true);
        let b = GameState::new(1234, 0, true);
        for (fa, fb) in a.flowers.flowers.iter().zip(&b.flowers.flowers) {
            assert_eq!((fa.wx, fa.wy, fa.radius, fa.petal), (fb.wx, fb.wy, fb.radius, fb.petal));
        }
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut state = GameState::new(1, 0, true);
        state.emit(GameEvent::Click);
        state.emit(GameEvent::PollenChirp);
        assert_eq!(state.drain_events(), vec![GameEvent::Click, GameEvent::PollenChirp]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_effects_keep_state_animating() {
        let mut state = GameState::new(1, 0, true);
        state.effects.spawn_belt_item(0);
        assert!(state.is_animating(10));
    }
}
