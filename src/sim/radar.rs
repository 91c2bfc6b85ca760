//! Radar ping toward the current goal
//!
//! Only the target and an expiry are stored; the arrow direction is
//! recomputed from the live bee position every time it is drawn.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::time::{Millis, has_reached, is_before};
use crate::consts::RADAR_DURATION_MS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Radar {
    pub active: bool,
    pub until_ms: Millis,
    /// World-space goal
    pub target: IVec2,
    /// Goal is the hive rather than a flower
    pub to_hive: bool,
}

impl Radar {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Start a ping. Carrying pollen points home; otherwise the nearest live
    /// flower, falling back to the hive when none is alive.
    pub fn ping(&mut self, now: Millis, carrying: bool, nearest_flower: Option<(i32, i32)>) {
        self.active = true;
        self.until_ms = now.wrapping_add(RADAR_DURATION_MS);
        match (carrying, nearest_flower) {
            (false, Some((wx, wy))) => {
                self.target = IVec2::new(wx, wy);
                self.to_hive = false;
            }
            _ => {
                self.target = IVec2::ZERO;
                self.to_hive = true;
            }
        }
    }

    /// Lazily drop the ping once it has expired
    pub fn update(&mut self, now: Millis) {
        if self.active && has_reached(now, self.until_ms) {
            self.active = false;
        }
    }

    /// Visible at `now` (independent of whether `update` ran yet)
    pub fn showing(&self, now: Millis) -> bool {
        self.active && is_before(now, self.until_ms)
    }

    /// Fraction of the ping elapsed, 0 at start to 1 at expiry
    pub fn progress(&self, now: Millis) -> f32 {
        let left = super::time::remaining(now, self.until_ms) as f32;
        (1.0 - left / RADAR_DURATION_MS as f32).clamp(0.0, 1.0)
    }

    /// Unit vector and distance from `from` to the target
    pub fn bearing(&self, from: Vec2) -> (Vec2, f32) {
        let delta = self.target.as_vec2() - from;
        let len = delta.length().max(1.0);
        (delta / len, len)
    }
}
