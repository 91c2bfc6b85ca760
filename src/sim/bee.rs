//! The bee: spring-damper motion, wing animation and boost timers
//!
//! Stick input does not push the bee directly. It picks a *target point*
//! inside the roam radius and the bee is pulled toward it by a
//! spring-damper, so releasing the stick glides it home to the hive.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::time::{Millis, is_before};
use crate::consts::*;

/// Spring-damper coefficients for one movement mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
}

impl SpringParams {
    pub const NORMAL: Self = Self {
        stiffness: SPRING_K_NORMAL,
        damping: DAMPING_NORMAL,
    };
    /// Stiffer and more damped: snappier but still controllable at speed
    pub const BOOST: Self = Self {
        stiffness: SPRING_K_BOOST,
        damping: DAMPING_BOOST,
    };

    pub fn for_mode(boosting: bool) -> Self {
        if boosting { Self::BOOST } else { Self::NORMAL }
    }
}

/// Normalized stick sample after deadzone and circle-to-square remap
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickInput {
    /// Direction in [-1, 1] on each axis
    pub dir: Vec2,
    /// Raw X axis sits inside the deadzone
    pub rest_x: bool,
    /// Raw Y axis sits inside the deadzone
    pub rest_y: bool,
}

impl StickInput {
    /// Centered stick: target snaps to the hive on both axes
    pub const NEUTRAL: Self = Self {
        dir: Vec2::ZERO,
        rest_x: true,
        rest_y: true,
    };

    /// Stick deflection with out-of-range values clamped; an axis counts as
    /// at rest when its value is exactly zero.
    pub fn new(nx: f32, ny: f32) -> Self {
        let dir = Vec2::new(clamp_axis(nx), clamp_axis(ny));
        Self {
            dir,
            rest_x: dir.x == 0.0,
            rest_y: dir.y == 0.0,
        }
    }

    /// World-space point the spring pulls toward
    pub fn target(&self, roam_radius: f32) -> Vec2 {
        let mut target = self.dir * roam_radius;
        if self.rest_x {
            target.x = 0.0;
        }
        if self.rest_y {
            target.y = 0.0;
        }
        target
    }
}

fn clamp_axis(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
}

/// The player's bee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bee {
    /// World position (hive at origin)
    pub pos: Vec2,
    pub vel: Vec2,
    /// Wing flap phase (radians, wrapped)
    pub wing_phase: f32,
    /// Normalized flap speed [0, 1]
    pub wing_speed: f32,
    pub boost_active_until: Millis,
    pub boost_cooldown_until: Millis,
}

impl Default for Bee {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            wing_phase: 0.0,
            wing_speed: 0.0,
            boost_active_until: 0,
            boost_cooldown_until: 0,
        }
    }
}

impl Bee {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Boost still running at `now`.
    ///
    /// After a reset both deadlines equal the reset timestamp of zero, which
    /// reads as expired until the clock has advanced half a wrap. Callers that
    /// start near the rollover should reset with [`Bee::reset_at`].
    pub fn is_boosting(&self, now: Millis) -> bool {
        is_before(now, self.boost_active_until)
    }

    pub fn is_boost_on_cooldown(&self, now: Millis) -> bool {
        is_before(now, self.boost_cooldown_until)
    }

    /// Reset with boost deadlines pinned to `now` so both read as expired
    pub fn reset_at(&mut self, now: Millis) {
        self.reset();
        self.boost_active_until = now;
        self.boost_cooldown_until = now;
    }

    /// Short boost fired by a pollen pickup
    pub fn trigger_auto_boost(&mut self, now: Millis) {
        self.boost_active_until = now.wrapping_add(BOOST_DURATION_AUTO);
        self.boost_cooldown_until = now.wrapping_add(BOOST_COOLDOWN_AUTO);
    }

    /// Deliberate player boost: longer burst, shorter cooldown, and a
    /// velocity kick along the stick direction. Refused while cooling down.
    ///
    /// Not driven by the frame loop; pickups only fire the automatic boost.
    pub fn trigger_manual_boost(&mut self, now: Millis, dir: Vec2) -> bool {
        if self.is_boost_on_cooldown(now) {
            return false;
        }
        self.boost_active_until = now.wrapping_add(BOOST_DURATION_MANUAL);
        self.boost_cooldown_until = now.wrapping_add(BOOST_COOLDOWN_MANUAL);
        self.vel += dir.normalize_or_zero() * BOOST_IMPULSE;
        log::debug!("manual boost at {now}");
        true
    }

    /// Advance one explicit-Euler step of the spring toward the stick target
    pub fn step_physics(&mut self, input: &StickInput, dt: f32, boosting: bool) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let target = input.target(ROAM_RADIUS);
        let spring = SpringParams::for_mode(boosting);

        // F = k * (target - pos) - d * vel
        let force = spring.stiffness * (target - self.pos) - spring.damping * self.vel;
        self.vel += force * dt;
        self.pos += self.vel * dt;
    }

    /// Normalized speed used for wings, trails and ambient buzz
    pub fn speed_norm(&self) -> f32 {
        ((self.vel.x.abs() + self.vel.y.abs()) / WING_SPEED_DIVISOR).clamp(0.0, 1.0)
    }

    pub fn update_wings(&mut self, dt: f32) {
        self.wing_speed = self.speed_norm();
        let hz = WING_HZ_MIN + WING_HZ_RANGE * self.wing_speed;
        self.wing_phase += std::f32::consts::TAU * hz * dt;
        if self.wing_phase > WING_PHASE_WRAP {
            self.wing_phase -= WING_PHASE_WRAP;
        }
    }

    /// Park the bee on the hive with no motion (unloading)
    pub fn hold_at_hive(&mut self) {
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.wing_speed = 0.0;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Integer world position used for hit tests
    pub fn cell_pos(&self) -> (i32, i32) {
        (self.pos.x as i32, self.pos.y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_input_keeps_bee_home() {
        let mut bee = Bee::default();
        bee.step_physics(&StickInput::NEUTRAL, 0.016, false);
        assert_eq!(bee.pos, Vec2::ZERO);
        assert_eq!(bee.vel, Vec2::ZERO);
    }

    #[test]
    fn test_spring_pulls_toward_target() {
        let mut bee = Bee::default();
        let input = StickInput::new(1.0, 0.0);
        assert_eq!(input.target(ROAM_RADIUS), Vec2::new(ROAM_RADIUS, 0.0));

        for _ in 0..200 {
            bee.step_physics(&input, 0.016, false);
        }
        assert!((bee.pos.x - ROAM_RADIUS).abs() < 1.0, "x = {}", bee.pos.x);
        assert!(bee.pos.y.abs() < 0.001);
    }

    #[test]
    fn test_rest_axis_snaps_target() {
        let input = StickInput {
            dir: Vec2::new(0.5, 0.5),
            rest_x: true,
            rest_y: false,
        };
        assert_eq!(input.target(100.0), Vec2::new(0.0, 50.0));
    }

    #[test]
    fn test_input_clamped() {
        let input = StickInput::new(3.0, f32::NAN);
        assert_eq!(input.dir, Vec2::new(1.0, 0.0));
        assert!(input.rest_y);
    }

    #[test]
    fn test_stalled_frame_step_is_clamped() {
        let input = StickInput::new(1.0, 0.0);
        let mut clamped = Bee::default();
        clamped.step_physics(&input, 5.0, false);
        let mut bounded = Bee::default();
        bounded.step_physics(&input, MAX_FRAME_DT, false);
        assert_eq!(clamped.pos, bounded.pos);
    }

    #[test]
    fn test_auto_boost_timers() {
        let mut bee = Bee::default();
        bee.reset_at(1_000);
        assert!(!bee.is_boosting(1_000));

        bee.trigger_auto_boost(1_000);
        assert!(bee.is_boosting(1_499));
        assert!(!bee.is_boosting(1_500));
        assert!(bee.is_boost_on_cooldown(6_199));
        assert!(!bee.is_boost_on_cooldown(6_200));
    }

    #[test]
    fn test_boost_across_rollover() {
        let mut bee = Bee::default();
        let now = u32::MAX - 100;
        bee.trigger_auto_boost(now);
        assert!(bee.is_boosting(u32::MAX));
        assert!(bee.is_boosting(200));
        assert!(!bee.is_boosting(400));
        assert!(bee.is_boost_on_cooldown(400));
    }

    #[test]
    fn test_manual_boost_respects_cooldown() {
        let mut bee = Bee::default();
        bee.reset_at(0);
        assert!(bee.trigger_manual_boost(10, Vec2::new(0.0, 2.0)));
        assert_eq!(bee.vel, Vec2::new(0.0, BOOST_IMPULSE));
        assert!(bee.is_boosting(700));
        assert!(!bee.trigger_manual_boost(100, Vec2::X));
        assert!(bee.trigger_manual_boost(3_510, Vec2::X));
    }

    #[test]
    fn test_wings_track_speed() {
        let mut bee = Bee::default();
        bee.vel = Vec2::new(260.0, 260.0);
        bee.update_wings(0.01);
        assert!((bee.wing_speed - 1.0).abs() < f32::EPSILON);

        bee.vel = Vec2::new(52.0, 0.0);
        bee.update_wings(0.01);
        assert!((bee.wing_speed - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_wing_phase_wraps() {
        let mut bee = Bee {
            wing_phase: WING_PHASE_WRAP - 0.01,
            ..Default::default()
        };
        bee.update_wings(0.05);
        assert!(bee.wing_phase < WING_PHASE_WRAP);
        assert!(bee.wing_phase >= 0.0);
    }
}
