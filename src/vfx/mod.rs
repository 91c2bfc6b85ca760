//! Visual effect pools
//!
//! Trails, score popups and delivery-belt tokens live in fixed pools and age
//! out on their own. Nothing here feeds back into gameplay.

pub mod pool;

use glam::{IVec2, Vec2};
use rand::Rng;

pub use pool::{Slot, SlotPool};

use crate::consts::*;
use crate::sim::rng::Xorshift32;
use crate::sim::time::{Millis, age, is_before};

/// Number of trail sparkle variants
const TRAIL_VARIANTS: u8 = 3;

/// A fading speck left behind while boosting
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailParticle {
    pub pos: Vec2,
    pub born_ms: Millis,
    pub alive: bool,
    pub variant: u8,
    /// Bee speed at spawn, normalized [0, 1]
    pub speed_n: f32,
}

/// A "+N" label floating up from the hive after a delivery
#[derive(Debug, Clone, Copy, Default)]
pub struct ScorePopup {
    pub born_ms: Millis,
    /// Screen position at spawn
    pub base: IVec2,
    pub drift_x: i8,
    pub value: u8,
    pub alive: bool,
}

/// One delivered pollen riding the belt widget
#[derive(Debug, Clone, Copy, Default)]
pub struct BeltItem {
    pub born_ms: Millis,
    pub alive: bool,
}

macro_rules! impl_slot {
    ($($ty:ty),*) => {$(
        impl Slot for $ty {
            fn born_ms(&self) -> Millis {
                self.born_ms
            }
            fn is_alive(&self) -> bool {
                self.alive
            }
            fn set_alive(&mut self, alive: bool) {
                self.alive = alive;
            }
        }
    )*};
}

impl_slot!(TrailParticle, ScorePopup, BeltItem);

/// Normalized age in [0, 1] over `life_ms`
pub fn life_t(now: Millis, born: Millis, life_ms: u32) -> f32 {
    (age(now, born) as f32 / life_ms as f32).clamp(0.0, 1.0)
}

/// Trail opacity: quadratic fade that hits zero exactly at expiry
pub fn trail_alpha(now: Millis, born: Millis) -> f32 {
    let t = life_t(now, born, TRAIL_LIFE_MS);
    1.0 - t * t
}

/// Opacity that holds at 1 until `from`, then falls linearly to 0 at t = 1
pub fn tail_fade(t: f32, from: f32) -> f32 {
    if t <= from {
        1.0
    } else {
        ((1.0 - t) / (1.0 - from)).clamp(0.0, 1.0)
    }
}

/// All effect pools plus the hive pulse timer
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub trail: SlotPool<TrailParticle, TRAIL_MAX>,
    pub popups: SlotPool<ScorePopup, SCORE_POPUP_N>,
    pub belt: SlotPool<BeltItem, BELT_ITEM_N>,
    pub hive_pulse_until: Millis,
    /// Last trail emission time
    pub last_trail_ms: Millis,
}

impl Effects {
    pub fn reset(&mut self, now: Millis) {
        self.trail.reset();
        self.popups.reset();
        self.belt.reset();
        self.hive_pulse_until = now;
        self.last_trail_ms = now;
    }

    /// Age out every pool (once per frame, independent of rendering)
    pub fn update(&mut self, now: Millis) {
        self.trail.expire(now, TRAIL_LIFE_MS);
        self.popups.expire(now, SCORE_POPUP_LIFE_MS);
        self.belt.expire(now, BELT_LIFE_MS);
    }

    pub fn any_alive(&self) -> bool {
        self.trail.any_alive() || self.popups.any_alive() || self.belt.any_alive()
    }

    pub fn spawn_trail(&mut self, pos: Vec2, speed_n: f32, now: Millis, rng: &mut Xorshift32) {
        self.trail.alloc_round_robin(TrailParticle {
            pos,
            born_ms: now,
            alive: true,
            variant: rng.random_range(0..TRAIL_VARIANTS),
            speed_n: speed_n.clamp(0.0, 1.0),
        });
    }

    /// Emit the boost trail pair (at the bee and just behind it) if the
    /// emission interval has passed. Returns true when particles were added.
    pub fn emit_boost_trail(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        speed_n: f32,
        now: Millis,
        rng: &mut Xorshift32,
    ) -> bool {
        if age(now, self.last_trail_ms) <= TRAIL_SPAWN_INTERVAL_MS {
            return false;
        }
        self.spawn_trail(pos, speed_n, now, rng);
        self.spawn_trail(pos - vel * 0.02, speed_n, now, rng);
        self.last_trail_ms = now;
        true
    }

    pub fn spawn_popup(&mut self, now: Millis, value: u8, at: IVec2, rng: &mut Xorshift32) {
        let drift_x = rng.random_range(SCORE_POPUP_DRIFT_MIN..=SCORE_POPUP_DRIFT_MAX);
        self.popups.alloc(
            now,
            ScorePopup {
                born_ms: now,
                base: at,
                drift_x,
                value,
                alive: true,
            },
        );
    }

    pub fn spawn_belt_item(&mut self, now: Millis) {
        self.belt.alloc(
            now,
            BeltItem {
                born_ms: now,
                alive: true,
            },
        );
    }

    pub fn trigger_hive_pulse(&mut self, now: Millis) {
        self.hive_pulse_until = now.wrapping_add(HIVE_PULSE_MS);
    }

    pub fn hive_pulse_active(&self, now: Millis) -> bool {
        is_before(now, self.hive_pulse_until)
    }
}
