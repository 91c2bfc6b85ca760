//! Hive unloading state machine
//!
//! Idle -> Unloading -> Idle. Unloading drains one pollen per
//! [`UNLOAD_TICK_MS`]; the bee is parked on the hive for the whole run.

use serde::{Deserialize, Serialize};

use super::time::{Millis, is_before};
use crate::consts::*;
use crate::dist2_i;

/// Hive interaction phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HivePhase {
    #[default]
    Idle,
    Unloading,
}

/// What a single unload update produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnloadStep {
    /// Nothing due this frame
    Waiting,
    /// One unit delivered
    Delivered {
        /// 0-based tick index within this unload run
        step_index: u8,
        /// Units still aboard after this tick
        remaining: u8,
        /// Rising chirp frequency for this tick (Hz)
        tone_hz: u16,
        /// Survival seconds granted for this tick
        time_gain: f32,
    },
    /// Run complete; `total` units were delivered
    Finished { total: u8, tail_hz: Option<u16> },
}

/// Survival seconds granted by the `step_index`-th tick of an unload run.
/// Later ticks pay more, rewarding bigger deliveries.
pub fn survival_gain(step_index: u8) -> f32 {
    SURVIVAL_POLLEN_BASE * (1.0 + step_index as f32 * SURVIVAL_POLLEN_MULT_STEP)
}

/// Chirp frequency for the `step_index`-th tick
pub fn unload_tone(step_index: u8) -> u16 {
    UNLOAD_CHIRP_BASE.saturating_add((step_index as u16).saturating_mul(UNLOAD_CHIRP_STEP))
}

/// Hive state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hive {
    pub phase: HivePhase,
    pub unload_total: u8,
    pub unload_remaining: u8,
    pub unload_next_ms: Millis,
    /// Last tone played in this run, handed to the synth as a tail
    last_tone_hz: Option<u16>,
}

impl Hive {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_unloading(&self) -> bool {
        self.phase == HivePhase::Unloading
    }

    /// Bee (integer world position) is inside the drop-off radius
    pub fn in_range(bee: (i32, i32)) -> bool {
        dist2_i(bee.0, bee.1, 0, 0) <= (HIVE_COLLECTION_RADIUS as i64).pow(2)
    }

    /// Start unloading if the bee is carrying pollen and sits on the hive.
    /// Returns true on the Idle -> Unloading transition.
    pub fn try_store(&mut self, carried: u8, bee: (i32, i32), now: Millis) -> bool {
        if carried == 0 || self.is_unloading() || !Self::in_range(bee) {
            return false;
        }
        self.phase = HivePhase::Unloading;
        self.unload_total = carried;
        self.unload_remaining = carried;
        self.unload_next_ms = now;
        self.last_tone_hz = None;
        log::debug!("unload started with {carried} pollen");
        true
    }

    /// Advance the unload run. Fires at most one tick per call, however late
    /// the frame is.
    pub fn update(&mut self, now: Millis) -> UnloadStep {
        if !self.is_unloading() || is_before(now, self.unload_next_ms) {
            return UnloadStep::Waiting;
        }

        if self.unload_remaining > 0 {
            let step_index = self.unload_total - self.unload_remaining;
            self.unload_remaining -= 1;
            self.unload_next_ms = now.wrapping_add(UNLOAD_TICK_MS);
            let tone_hz = unload_tone(step_index);
            self.last_tone_hz = Some(tone_hz);
            return UnloadStep::Delivered {
                step_index,
                remaining: self.unload_remaining,
                tone_hz,
                time_gain: survival_gain(step_index),
            };
        }

        let total = self.unload_total;
        let tail_hz = self.last_tone_hz.take();
        self.phase = HivePhase::Idle;
        self.unload_total = 0;
        log::debug!("unload finished, delivered {total}");
        UnloadStep::Finished { total, tail_hz }
    }

    /// Drop an in-progress run without paying out (game over)
    pub fn abandon(&mut self) {
        self.phase = HivePhase::Idle;
        self.unload_remaining = 0;
        self.unload_total = 0;
        self.last_tone_hz = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_requires_pollen_and_range() {
        let mut hive = Hive::default();
        assert!(!hive.try_store(0, (0, 0), 0));
        assert!(!hive.try_store(3, (23, 0), 0));
        assert!(hive.try_store(3, (22, 0), 0));
        assert!(hive.is_unloading());
        // Already unloading
        assert!(!hive.try_store(3, (0, 0), 0));
    }

    #[test]
    fn test_unload_drains_one_per_tick() {
        let mut hive = Hive::default();
        assert!(hive.try_store(3, (0, 0), 1_000));

        let mut now = 1_000;
        let mut delivered = Vec::new();
        loop {
            match hive.update(now) {
                UnloadStep::Delivered {
                    step_index,
                    remaining,
                    tone_hz,
                    ..
                } => delivered.push((step_index, remaining, tone_hz)),
                UnloadStep::Finished { total, tail_hz } => {
                    assert_eq!(total, 3);
                    assert_eq!(tail_hz, Some(760 + 2 * 90));
                    break;
                }
                UnloadStep::Waiting => panic!("tick should be due at {now}"),
            }
            now += UNLOAD_TICK_MS;
        }
        assert_eq!(delivered, vec![(0, 2, 760), (1, 1, 850), (2, 0, 940)]);
        assert!(!hive.is_unloading());
    }

    #[test]
    fn test_late_frame_fires_once() {
        let mut hive = Hive::default();
        hive.try_store(5, (0, 0), 0);
        assert!(matches!(hive.update(0), UnloadStep::Delivered { .. }));
        // 1 second late: still a single tick
        assert!(matches!(
            hive.update(1_000),
            UnloadStep::Delivered { remaining: 3, .. }
        ));
        assert_eq!(hive.update(1_050), UnloadStep::Waiting);
    }

    #[test]
    fn test_gain_grows_with_step() {
        assert!((survival_gain(0) - 0.65).abs() < 1e-6);
        assert!((survival_gain(2) - 0.65 * 2.1).abs() < 1e-6);
        assert!(survival_gain(7) > survival_gain(6));
    }

    #[test]
    fn test_abandon_returns_to_idle() {
        let mut hive = Hive::default();
        hive.try_store(4, (0, 0), 0);
        hive.abandon();
        assert!(!hive.is_unloading());
        assert_eq!(hive.update(500), UnloadStep::Waiting);
    }
}
