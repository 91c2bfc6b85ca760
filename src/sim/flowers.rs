//! Flowers: styling, rejection-sampled spawning, pollen pickup
//!
//! The field always holds [`FLOWER_N`] slots. A picked flower is replaced in
//! the same frame by one spawned elsewhere, so the live count only dips if a
//! spawn had to fall back to unconditional placement.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::Xorshift32;
use super::time::Millis;
use crate::consts::*;
use crate::dist2_i;
use crate::renderer::color::rgb565;

/// Petal palettes (RGB) a flower is dressed in
const PETAL_PALETTE: [(u8, u8, u8); 5] = [
    (255, 120, 180),
    (170, 120, 255),
    (120, 200, 255),
    (255, 170, 80),
    (120, 255, 170),
];
/// How much darker the shadow petal shade is per channel
const PETAL_SHADE_STEP: u8 = 52;
const CENTER_RGB: (u8, u8, u8) = (255, 235, 130);

/// Unconditional placement bands used when sampling runs out of tries
const NEAR_FALLBACK_BAND: (i32, i32) = (100, 180);
const ELSEWHERE_FALLBACK_BAND: (i32, i32) = (80, 200);

/// A collectible flower
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Flower {
    pub wx: i32,
    pub wy: i32,
    pub alive: bool,
    pub radius: u8,
    /// RGB565 petal colour
    pub petal: u16,
    /// Darker petal shade for the drop shadow
    pub petal_lo: u16,
    pub center: u16,
    pub born_ms: Millis,
}

impl Flower {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.wx as f32, self.wy as f32)
    }

    fn restyle(&mut self, rng: &mut Xorshift32) {
        let (r, g, b) = PETAL_PALETTE[rng.random_range(0..PETAL_PALETTE.len())];
        self.petal = rgb565(r, g, b);
        self.petal_lo = rgb565(
            r.saturating_sub(PETAL_SHADE_STEP),
            g.saturating_sub(PETAL_SHADE_STEP),
            b.saturating_sub(PETAL_SHADE_STEP),
        );
        self.center = rgb565(CENTER_RGB.0, CENTER_RGB.1, CENTER_RGB.2);
    }
}

/// Random point at an integer distance band and whole-degree angle
fn polar_sample(rng: &mut Xorshift32, band: (i32, i32)) -> (i32, i32) {
    let r = rng.random_range(band.0..=band.1) as f32;
    let angle = (rng.random_range(0..=359) as f32).to_radians();
    ((angle.cos() * r) as i32, (angle.sin() * r) as i32)
}

/// The fixed set of flower slots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowerField {
    pub flowers: [Flower; FLOWER_N],
}

impl FlowerField {
    /// Kill every slot and repopulate the ring around the hive
    pub fn reset(&mut self, rng: &mut Xorshift32, now: Millis) {
        for flower in &mut self.flowers {
            flower.alive = false;
        }
        for i in 0..FLOWER_N {
            self.spawn_near_origin(i, rng, now);
        }
    }

    pub fn alive_count(&self) -> usize {
        self.flowers.iter().filter(|f| f.alive).count()
    }

    fn spawn_at(&mut self, i: usize, wx: i32, wy: i32, rng: &mut Xorshift32, now: Millis) {
        let flower = &mut self.flowers[i];
        flower.alive = true;
        flower.radius = rng.random_range(FLOWER_RADIUS_MIN..=FLOWER_RADIUS_MAX) as u8;
        flower.wx = wx;
        flower.wy = wy;
        flower.restyle(rng);
        flower.born_ms = now;
    }

    /// Initial placement: keep slot `i` clear of slots `0..i` from the same batch
    pub fn spawn_near_origin(&mut self, i: usize, rng: &mut Xorshift32, now: Millis) {
        let band = (FLOWER_SPAWN_NEAR_DIST_MIN, FLOWER_SPAWN_NEAR_DIST_MAX);
        let spacing2 = (FLOWER_COLLISION_DIST as i64).pow(2);

        for _ in 0..FLOWER_SPAWN_NEAR_TRIES {
            let (wx, wy) = polar_sample(rng, band);
            let crowded = self.flowers[..i]
                .iter()
                .any(|other| dist2_i(wx, wy, other.wx, other.wy) < spacing2);
            if !crowded {
                self.spawn_at(i, wx, wy, rng, now);
                return;
            }
        }

        log::warn!("flower {i}: near-origin sampling exhausted, placing unconditionally");
        let (wx, wy) = polar_sample(rng, NEAR_FALLBACK_BAND);
        self.spawn_at(i, wx, wy, rng, now);
    }

    /// Respawn slot `i` inside the roam boundary, away from the bee and from
    /// other live flowers
    pub fn spawn_elsewhere(&mut self, i: usize, bee: (i32, i32), rng: &mut Xorshift32, now: Millis) {
        let band = (
            FLOWER_SPAWN_ELSEWHERE_DIST_MIN,
            ROAM_RADIUS as i32 - FLOWER_SPAWN_ELSEWHERE_MARGIN,
        );
        let boundary2 = (ROAM_RADIUS * ROAM_RADIUS) as i64;
        let avoid2 = (FLOWER_BEE_AVOIDANCE_DIST as i64).pow(2);
        let spacing2 = (FLOWER_SPACING_ELSEWHERE as i64).pow(2);

        for _ in 0..FLOWER_SPAWN_ELSEWHERE_TRIES {
            let (wx, wy) = polar_sample(rng, band);

            if dist2_i(wx, wy, 0, 0) > boundary2 {
                continue;
            }
            // Keep the new flower out of reach so the radar stays meaningful
            if dist2_i(wx, wy, bee.0, bee.1) < avoid2 {
                continue;
            }
            let crowded = self.flowers.iter().enumerate().any(|(k, other)| {
                k != i && other.alive && dist2_i(wx, wy, other.wx, other.wy) < spacing2
            });
            if crowded {
                continue;
            }

            self.spawn_at(i, wx, wy, rng, now);
            return;
        }

        log::debug!("flower {i}: respawn sampling exhausted, placing unconditionally");
        let (wx, wy) = polar_sample(rng, ELSEWHERE_FALLBACK_BAND);
        self.spawn_at(i, wx, wy, rng, now);
    }

    /// First live flower (in slot order) the bee overlaps, if any
    pub fn first_hit(&self, bee: (i32, i32)) -> Option<usize> {
        self.flowers.iter().position(|f| {
            let reach = (f.radius as i64) + BEE_HIT_RADIUS as i64;
            f.alive && dist2_i(bee.0, bee.1, f.wx, f.wy) <= reach * reach
        })
    }

    /// Take pollen from the first overlapping flower and respawn it elsewhere.
    ///
    /// Returns the slot that was harvested. The caller owns the carry limit
    /// and unload checks.
    pub fn harvest(&mut self, bee: (i32, i32), rng: &mut Xorshift32, now: Millis) -> Option<usize> {
        let i = self.first_hit(bee)?;
        self.flowers[i].alive = false;
        self.spawn_elsewhere(i, bee, rng, now);
        Some(i)
    }

    /// Exhaustive nearest live flower by squared distance
    pub fn nearest(&self, from: (i32, i32)) -> Option<(i32, i32)> {
        self.flowers
            .iter()
            .filter(|f| f.alive)
            .min_by_key(|f| dist2_i(f.wx, f.wy, from.0, from.1))
            .map(|f| (f.wx, f.wy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with(positions: &[(i32, i32, u8)]) -> FlowerField {
        let mut field = FlowerField::default();
        for (slot, &(wx, wy, radius)) in field.flowers.iter_mut().zip(positions) {
            *slot = Flower {
                wx,
                wy,
                radius,
                alive: true,
                ..Default::default()
            };
        }
        field
    }

    #[test]
    fn test_reset_populates_every_slot() {
        let mut rng = Xorshift32::new(1234);
        let mut field = FlowerField::default();
        field.reset(&mut rng, 0);
        assert_eq!(field.alive_count(), FLOWER_N);
        for f in &field.flowers {
            assert!((FLOWER_RADIUS_MIN..=FLOWER_RADIUS_MAX).contains(&(f.radius as i32)));
            let d2 = dist2_i(f.wx, f.wy, 0, 0);
            // Inside the outer sampling band (with float truncation slack)
            assert!(d2 <= (FLOWER_SPAWN_NEAR_DIST_MAX as i64 + 1).pow(2));
        }
    }

    #[test]
    fn test_hit_boundary_is_inclusive() {
        // radius 6 + hit 14 = 20
        let field = field_with(&[(20, 0, 6)]);
        assert_eq!(field.first_hit((0, 0)), Some(0));

        let field = field_with(&[(21, 0, 6)]);
        assert_eq!(field.first_hit((0, 0)), None);

        // 12² + 16² = 20²
        let field = field_with(&[(12, 16, 6)]);
        assert_eq!(field.first_hit((0, 0)), Some(0));
    }

    #[test]
    fn test_first_match_wins_not_nearest() {
        let field = field_with(&[(15, 0, 6), (1, 0, 6)]);
        assert_eq!(field.first_hit((0, 0)), Some(0));
    }

    #[test]
    fn test_harvest_respawns_away_from_bee() {
        let mut rng = Xorshift32::new(77);
        let mut field = field_with(&[(10, 0, 8)]);
        let slot = field.harvest((0, 0), &mut rng, 500);
        assert_eq!(slot, Some(0));
        let f = &field.flowers[0];
        assert!(f.alive);
        assert_eq!(f.born_ms, 500);
        assert!((f.wx, f.wy) != (10, 0));
    }

    #[test]
    fn test_nearest_skips_dead() {
        let mut field = field_with(&[(100, 0, 6), (30, 0, 6), (50, 50, 6)]);
        assert_eq!(field.nearest((0, 0)), Some((30, 0)));
        field.flowers[1].alive = false;
        assert_eq!(field.nearest((0, 0)), Some((50, 50)));
        for f in &mut field.flowers {
            f.alive = false;
        }
        assert_eq!(field.nearest((0, 0)), None);
    }

    #[test]
    fn test_petal_shade_is_darker() {
        let mut rng = Xorshift32::new(5);
        let mut flower = Flower::default();
        flower.restyle(&mut rng);
        assert_ne!(flower.petal, flower.petal_lo);
        assert_eq!(flower.center, rgb565(255, 235, 130));
    }
}
