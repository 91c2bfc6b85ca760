//! Survival countdown, score and carried pollen

use serde::{Deserialize, Serialize};

use super::time::{Millis, is_before};
use crate::consts::*;

/// Before/after fill fractions drawn as a brief highlight when time is granted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurvivalFlash {
    pub start_pct: f32,
    pub end_pct: f32,
    pub until_ms: Millis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survival {
    /// Seconds left, always within [0, SURVIVAL_TIME_MAX]
    pub time_left: f32,
    pub game_over: bool,
    pub game_over_ms: Millis,
    pub flash: SurvivalFlash,
    /// Pollen aboard the bee
    pub pollen: u8,
    /// Pollen delivered this run
    pub score: u32,
}

impl Default for Survival {
    fn default() -> Self {
        Self {
            time_left: SURVIVAL_TIME_MAX,
            game_over: false,
            game_over_ms: 0,
            flash: SurvivalFlash::default(),
            pollen: 0,
            score: 0,
        }
    }
}

impl Survival {
    pub fn reset(&mut self, now: Millis) {
        *self = Self::default();
        self.flash.until_ms = now;
    }

    /// Count down by `dt` seconds. Returns true on the frame the clock runs out.
    pub fn tick(&mut self, dt: f32, now: Millis) -> bool {
        if self.game_over {
            return false;
        }
        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.game_over = true;
            self.game_over_ms = now;
            log::info!("out of time with {} delivered", self.score);
            return true;
        }
        false
    }

    /// Grant (or remove) time, clamped into [0, SURVIVAL_TIME_MAX]
    pub fn add_time(&mut self, now: Millis, amount: f32) {
        let before = self.time_left;
        let after = (before + amount).clamp(0.0, SURVIVAL_TIME_MAX);
        self.time_left = after;

        self.flash = SurvivalFlash {
            start_pct: (before / SURVIVAL_TIME_MAX).clamp(0.0, 1.0),
            end_pct: (after / SURVIVAL_TIME_MAX).clamp(0.0, 1.0),
            until_ms: now.wrapping_add(SURVIVAL_FLASH_MS),
        };
    }

    pub fn fraction(&self) -> f32 {
        (self.time_left / SURVIVAL_TIME_MAX).clamp(0.0, 1.0)
    }

    pub fn flash_active(&self, now: Millis) -> bool {
        is_before(now, self.flash.until_ms)
    }

    pub fn can_carry_more(&self) -> bool {
        self.pollen < MAX_POLLEN_CARRY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_to_game_over() {
        let mut s = Survival::default();
        assert!(!s.tick(10.0, 100));
        assert!(s.tick(6.0, 200));
        assert!(s.game_over);
        assert_eq!(s.time_left, 0.0);
        assert_eq!(s.game_over_ms, 200);
        // Terminal until reset
        assert!(!s.tick(1.0, 300));
        assert_eq!(s.game_over_ms, 200);
    }

    #[test]
    fn test_add_time_clamps_and_flashes() {
        let mut s = Survival::default();
        s.time_left = 14.0;
        s.add_time(1_000, 5.0);
        assert_eq!(s.time_left, SURVIVAL_TIME_MAX);
        assert!((s.flash.start_pct - 14.0 / 15.0).abs() < 1e-6);
        assert_eq!(s.flash.end_pct, 1.0);
        assert!(s.flash_active(1_139));
        assert!(!s.flash_active(1_140));

        s.add_time(2_000, -100.0);
        assert_eq!(s.time_left, 0.0);
    }

    #[test]
    fn test_reset_restores_full_clock() {
        let mut s = Survival {
            time_left: 0.0,
            game_over: true,
            pollen: 4,
            score: 12,
            ..Default::default()
        };
        s.reset(50);
        assert_eq!(s.time_left, SURVIVAL_TIME_MAX);
        assert!(!s.game_over);
        assert_eq!((s.pollen, s.score), (0, 0));
        assert!(!s.flash_active(50));
    }
}
