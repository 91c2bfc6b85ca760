//! Camera: eased zoom, decaying shake, world <-> screen transform
//!
//! The bee is pinned to the (shaken) screen centre and the world scrolls
//! underneath it: `screen = centre + shake + (world - focus) * zoom`.

use glam::{IVec2, Vec2};

use crate::consts::*;
use crate::sim::time::{Millis, is_before, remaining};

/// Screen point the bee is drawn at before shake (centre of the play area
/// below the HUD band)
pub const SCREEN_ANCHOR: IVec2 = IVec2::new(DISPLAY_W / 2, (DISPLAY_H + HUD_H) / 2);

#[derive(Debug, Clone)]
pub struct Camera {
    pub zoom: f32,
    /// Current shake offset in pixels
    pub shake: Vec2,
    pub shake_until: Millis,
    pub shake_duration_ms: u32,
    pub shake_magnitude: f32,
    /// Shake can be disabled from settings (reduced motion)
    pub shake_enabled: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Camera {
    pub fn new(shake_enabled: bool) -> Self {
        Self {
            zoom: CAMERA_ZOOM_NORMAL,
            shake: Vec2::ZERO,
            shake_until: 0,
            shake_duration_ms: 0,
            shake_magnitude: 0.0,
            shake_enabled,
        }
    }

    /// Back to rest; the shake preference survives
    pub fn reset(&mut self, now: Millis) {
        *self = Self::new(self.shake_enabled);
        self.shake_until = now;
    }

    pub fn trigger_shake(&mut self, now: Millis, magnitude: f32, duration_ms: u32) {
        if !self.shake_enabled {
            return;
        }
        self.shake_until = now.wrapping_add(duration_ms);
        self.shake_duration_ms = duration_ms;
        self.shake_magnitude = magnitude;
    }

    fn ease_zoom(&mut self, target: f32, dt: f32) {
        let lerp = (CAMERA_ZOOM_LERP_SPEED * dt).clamp(0.0, 1.0);
        self.zoom += (target - self.zoom) * lerp;
    }

    /// Per-frame update while flying
    pub fn update(&mut self, dt: f32, boosting: bool, now: Millis) {
        let target = if boosting {
            CAMERA_ZOOM_BOOST
        } else {
            CAMERA_ZOOM_NORMAL
        };
        self.ease_zoom(target, dt);

        if is_before(now, self.shake_until) && self.shake_duration_ms > 0 {
            let t = (remaining(now, self.shake_until) as f32 / self.shake_duration_ms as f32)
                .clamp(0.0, 1.0);
            let amp = self.shake_magnitude * t * t;
            // Folded so the phase keeps its precision late in a long session
            let phase = (now % 1_000_000) as f32 * CAMERA_SHAKE_PHASE_MULT;
            self.shake = Vec2::new(
                (phase * CAMERA_SHAKE_FREQ_X).sin() * amp,
                (phase * CAMERA_SHAKE_FREQ_Y).cos() * amp,
            );
        } else {
            self.shake = Vec2::ZERO;
            self.shake_duration_ms = 0;
        }
    }

    /// Per-frame update while unloading: ease back to normal, no shake
    pub fn settle(&mut self, dt: f32) {
        self.ease_zoom(CAMERA_ZOOM_NORMAL, dt);
        self.shake = Vec2::ZERO;
    }

    /// Screen position of the bee (anchor + truncated shake)
    pub fn center(&self) -> IVec2 {
        SCREEN_ANCHOR + IVec2::new(self.shake.x as i32, self.shake.y as i32)
    }

    /// World point to screen pixel, relative to `focus` (bee position, or a
    /// parallax-scaled copy of it for background layers)
    pub fn project(&self, world: Vec2, focus: Vec2) -> IVec2 {
        let d = (world - focus) * self.zoom;
        self.center() + IVec2::new(d.x as i32, d.y as i32)
    }

    /// Screen pixel back to world space for the same `focus`
    pub fn unproject(&self, screen: IVec2, focus: Vec2) -> Vec2 {
        focus + (screen - self.center()).as_vec2() / self.zoom
    }

    /// World rectangle (min, max) covered by a screen rectangle (inclusive corners)
    pub fn world_bounds(&self, min: IVec2, max: IVec2, focus: Vec2) -> (Vec2, Vec2) {
        (self.unproject(min, focus), self.unproject(max, focus))
    }
}
