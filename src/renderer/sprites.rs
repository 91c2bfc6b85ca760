//! World sprites: hive, flowers, trails, the bee and score popups

use glam::IVec2;

use super::FrameView;
use super::background::wave;
use super::canvas::{GLYPH_H, TileCanvas, text_width};
use super::color::{fade565, palette, rgb565};
use crate::consts::*;
use crate::field::hash32;
use crate::sim::bee::Bee;
use crate::sim::flowers::Flower;
use crate::sim::time::{Millis, age, is_before, remaining};
use crate::vfx::{life_t, tail_fade, trail_alpha};

/// Bee bob period (ms) and amplitude (px)
const BOB_PERIOD_MS: u32 = 785;
const BOB_PX: f32 = 2.0;

/// Vertical bob applied to the bee and everything attached to it
pub fn bee_bob(now: Millis) -> i32 {
    (wave(now, BOB_PERIOD_MS) * BOB_PX) as i32
}

pub fn draw_hive(c: &mut TileCanvas, x: i32, y: i32) {
    c.circle(x, y, 12, palette::HIVE);
    c.circle(x, y, 7, palette::HIVE);
    c.circle(x, y, 2, palette::HIVE);
}

/// Expanding double ring after each delivered unit
pub fn draw_hive_pulse(c: &mut TileCanvas, x: i32, y: i32, now: Millis, until: Millis) {
    if !is_before(now, until) {
        return;
    }
    let t = (1.0 - remaining(now, until) as f32 / HIVE_PULSE_MS as f32).clamp(0.0, 1.0);
    let r = 10 + (t * 26.0) as i32;
    c.circle(x, y, r, rgb565(140, 220, 150));
    c.circle(x, y, r + 4, rgb565(220, 255, 230));
    if now & 0x3 == 0 {
        c.circle(x, y, r - 2, palette::WHITE);
    }
}

/// Five-disc flower with a drop shadow and a bloom pop right after spawning
pub fn draw_flower(c: &mut TileCanvas, x: i32, y: i32, f: &Flower, now: Millis, detail: bool) {
    if !f.alive {
        return;
    }
    let r = f.radius as i32;
    let petals = [(-r, 0), (r, 0), (0, -r), (0, r), (0, 0)];

    if detail {
        for (dx, dy) in petals {
            c.fill_circle(x + 1 + dx, y + 1 + dy, r, f.petal_lo);
        }
    }
    for (dx, dy) in petals {
        c.fill_circle(x + dx, y + dy, r, f.petal);
    }

    let cr = r / 2 + 2;
    c.fill_circle(x, y, cr, f.center);
    c.circle(x, y, cr, palette::WHITE);
    c.pixel(x - 1, y - 1, palette::POLLEN_HI);
    c.pixel(x - 2, y - 1, palette::WHITE);

    let since = age(now, f.born_ms);
    if !detail || since >= FLOWER_BLOOM_MS {
        return;
    }
    let t = since as f32 / FLOWER_BLOOM_MS as f32;
    let grow = 1 + (t * (r + 2) as f32) as i32;
    c.fill_circle(x, y, grow, rgb565(255, 245, 200));
    c.circle(x, y, grow + 2, palette::WHITE);

    let ring = r + 8 + ((1.0 - t) * 10.0) as i32;
    let glow = rgb565(255, 250, 230);
    c.circle(x, y, ring, rgb565(255, 235, 200));
    c.circle(x, y, ring + 4, glow);
    if since & 0x3 == 0 {
        c.circle(x, y, ring - 2, palette::WHITE);
        c.circle(x, y, ring + 1, palette::POLLEN_HI);
    }
    if since & 0x7 == 0 {
        let spark = ring + 6;
        c.pixel(x + spark, y, glow);
        c.pixel(x - spark, y, glow);
        c.pixel(x, y + spark, glow);
        c.pixel(x, y - spark, glow);
    }
}

/// Boost trail: glow tiers by remaining opacity, colour shifted by speed
pub fn draw_trails(c: &mut TileCanvas, view: &FrameView) {
    for p in view.state.effects.trail.alive() {
        let alpha = trail_alpha(view.now, p.born_ms);
        if alpha <= 0.0 {
            continue;
        }
        let IVec2 { x, y } = view.camera.project(p.pos, view.bee);
        if !c.overlaps(x - 5, y - 5, x + 5, y + 5) {
            continue;
        }

        let s = p.speed_n;
        let r = ((255.0 - 115.0 * s) * alpha) as u8;
        let g = ((220.0 - 120.0 * s) * alpha) as u8;
        let b = ((60.0 + 195.0 * s) * alpha) as u8;
        let core = rgb565(r, g, b);
        let mid = rgb565(r / 2, g / 2, b / 2);

        if alpha > 0.6 {
            c.fill_circle(x, y, 5, rgb565(r / 3, g / 3, b / 3));
            c.fill_circle(x, y, 3, mid);
            c.fill_circle(x, y, 2, core);
            if p.variant == 0 && alpha > 0.8 {
                let sparkle = rgb565(255, 255, 200);
                c.pixel(x - 3, y, sparkle);
                c.pixel(x + 3, y, sparkle);
                c.pixel(x, y - 3, sparkle);
                c.pixel(x, y + 3, sparkle);
            }
        } else if alpha > 0.3 {
            c.fill_circle(x, y, 3, mid);
            c.fill_circle(x, y, 1, core);
        } else {
            c.pixel(x, y, core);
        }
    }
}

pub fn draw_boost_aura(c: &mut TileCanvas, x: i32, y: i32, now: Millis) {
    let r = 14 + (4.0 * wave(now, 900)) as i32;
    let warm = rgb565(255, 210, 60);
    c.circle(x, y, r, warm);
    c.circle(x, y, r + 2, rgb565(255, 240, 140));
    c.circle(x, y, r - 2, warm);
}

/// Dithered ellipse under the bee that breathes with the wing beat
pub fn draw_shadow(c: &mut TileCanvas, x: i32, y: i32, bee: &Bee) {
    let sy = y + 14;
    let s = 0.5 + 0.5 * bee.wing_phase.sin();
    let rx = 10 + (3.0 * (1.0 - s)) as i32 + (2.0 * bee.wing_speed) as i32;
    let ry = 3 + (2.0 * (1.0 - s)) as i32;
    if !c.overlaps(x - rx, sy - ry, x + rx, sy + ry) {
        return;
    }
    for dy in -ry..=ry {
        let yf = dy as f32 / ry as f32;
        let inside = 1.0 - yf * yf;
        if inside <= 0.0 {
            continue;
        }
        let span = (rx as f32 * inside.sqrt()) as i32;
        let row = sy + dy;
        for dx in -span..=span {
            let col = x + dx;
            if (col + row) & 1 == 0 {
                c.pixel(col, row, palette::SHADOW);
            }
        }
    }
    c.hline(x - rx + 2, sy, rx * 2 - 4, palette::SHADOW_RIM);
}

/// Carried pollen circling the bee; a halo once the load is full
pub fn draw_orbit(c: &mut TileCanvas, x: i32, y: i32, bee: &Bee, pollen: u8) {
    if pollen == 0 {
        return;
    }
    let count = pollen as i32;
    let base = bee.wing_phase * 1.4;
    let ring = 10 + (count / 3) * 2;
    let ring_y = ring - 2;
    for i in 0..count {
        let ang = base + std::f32::consts::TAU * i as f32 / count as f32;
        let px = x + (ang.cos() * ring as f32) as i32;
        let py = y + 5 + (ang.sin() * ring_y as f32) as i32;
        c.fill_circle(px, py, 2, palette::POLLEN);
        c.pixel(px + 1, py - 1, palette::POLLEN_HI);
    }
    if pollen >= MAX_POLLEN_CARRY {
        c.circle(x, y + 2, ring + 4, palette::POLLEN_HI);
    }
}

pub fn draw_bee(c: &mut TileCanvas, x: i32, y: i32, bee: &Bee, pollen: u8) {
    // Body warms toward cream as the load grows
    let load = (pollen as f32 / MAX_POLLEN_CARRY as f32).clamp(0.0, 1.0);
    let body = rgb565(255, 220 + (25.0 * load) as u8, 40 + (120.0 * load) as u8);

    let s = bee.wing_phase.sin();
    let beat = 0.5 + 0.5 * s;
    let flap = (s * (2 + (3.0 * bee.wing_speed) as i32) as f32) as i32;
    let wing_h = 4 + (2.0 * beat) as i32;
    let wing_w = 7 + (2.0 * bee.wing_speed) as i32;
    let wing = rgb565(170 + (55.0 * beat) as u8, 215 + (35.0 * beat) as u8, 255);

    c.fill_ellipse(x - 6, y - 9 + flap, wing_w, wing_h, wing);
    c.fill_ellipse(x + 2, y - 10 - flap / 2, wing_w, wing_h, wing);
    c.ellipse(x - 6, y - 9 + flap, wing_w, wing_h, palette::WHITE);
    c.ellipse(x + 2, y - 10 - flap / 2, wing_w, wing_h, palette::WHITE);
    if s > 0.35 {
        c.pixel(x - 9, y - 12 + flap, palette::POLLEN_HI);
        c.pixel(x + 5, y - 13 - flap / 2, palette::POLLEN_HI);
    }

    c.fill_ellipse(x, y, 12, 8, body);
    c.fill_rect(x - 9, y - 6, 4, 12, palette::BLACK);
    c.fill_rect(x - 1, y - 6, 4, 12, palette::BLACK);
    c.ellipse(x, y, 12, 8, palette::WHITE);

    c.fill_circle(x + 11, y - 1, 5, palette::BLACK);
    c.circle(x + 11, y - 1, 5, palette::WHITE);

    c.fill_triangle(
        IVec2::new(x - 13, y),
        IVec2::new(x - 18, y - 2),
        IVec2::new(x - 18, y + 2),
        palette::BLACK,
    );

    draw_orbit(c, x, y, bee, pollen);
}

/// Hashed twinkles around a loaded bee
pub fn draw_sparkles(c: &mut TileCanvas, x: i32, y: i32, now: Millis, pollen: u8) {
    if pollen == 0 {
        return;
    }
    let n = (4 + pollen as u32).clamp(4, 12);
    for i in 0..n {
        let h = hash32((now >> 4).wrapping_add(i.wrapping_mul(977)));
        let dx = (h & 0x1F) as i32 - 15;
        let dy = ((h >> 5) & 0x1F) as i32 - 15;
        if dx * dx + dy * dy > 160 || (h >> 11) & 1 != 0 {
            continue;
        }
        let color = if i & 1 != 0 {
            palette::POLLEN_HI
        } else {
            palette::WHITE
        };
        c.pixel(x + dx, y + dy, color);
    }
}

/// Bee with its aura, shadow and sparkles at the (shaken) screen centre
pub fn draw_bee_group(c: &mut TileCanvas, view: &FrameView) {
    let center = view.camera.center();
    let (x, y) = (center.x, center.y + bee_bob(view.now));
    if !c.overlaps(x - 40, y - 40, x + 40, y + 40) {
        return;
    }
    let bee = &view.state.bee;
    let pollen = view.state.survival.pollen;
    if bee.is_boosting(view.now) {
        draw_boost_aura(c, x, y, view.now);
    }
    draw_shadow(c, x, y, bee);
    draw_bee(c, x, y, bee, pollen);
    draw_sparkles(c, x, y, view.now, pollen);
}

/// Popup size steps up as it rises
pub fn popup_size(t: f32) -> i32 {
    if t < 0.18 {
        1
    } else if t < 0.72 {
        2
    } else {
        3
    }
}

/// "+N" labels floating up from the hive
pub fn draw_popups(c: &mut TileCanvas, view: &FrameView) {
    for p in view.state.effects.popups.alive() {
        let since = age(view.now, p.born_ms);
        if since > SCORE_POPUP_LIFE_MS {
            continue;
        }
        let t = life_t(view.now, p.born_ms, SCORE_POPUP_LIFE_MS);
        let fade = tail_fade(t, 0.6);
        if fade <= 0.0 {
            continue;
        }
        let rise = 1.0 - (1.0 - t) * (1.0 - t);
        let float_y = (28.0 * rise) as i32;
        let sway = ((since as f32 * 0.018 + p.drift_x as f32).sin() * 2.0) as i32;

        let cx = p.base.x + p.drift_x as i32 + sway;
        let cy = p.base.y - 6 - float_y;
        let size = popup_size(t);

        let label = format!("+{}", p.value);
        let w = text_width(&label, size);
        let h = GLYPH_H * size;
        let (x0, y0) = (cx - w / 2, cy - h / 2);
        if !c.overlaps(x0 - 1, y0 - 1, x0 + w, y0 + h) {
            continue;
        }

        c.text(x0 + 1, y0 + 1, &label, size, palette::SHADOW);
        let main = if t > 0.75 {
            palette::POLLEN_HI
        } else {
            palette::YELLOW
        };
        c.text(x0, y0, &label, size, fade565(main, fade));
        if t > 0.72 {
            let glint = fade565(palette::WHITE, fade);
            c.text(x0 - 1, y0, &label, size, glint);
            c.text(x0 + 1, y0 - 1, &label, size, glint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderOptions;
    use crate::sim::GameState;

    fn canvas() -> TileCanvas {
        let mut c = TileCanvas::new();
        c.begin(IVec2::ZERO, 0);
        c
    }

    fn popup_tile(state: &GameState, now: Millis) -> Vec<u16> {
        let opts = RenderOptions::default();
        let view = FrameView {
            state,
            camera: &state.camera,
            bee: state.bee_pos(),
            now,
            opts: &opts,
        };
        let mut c = TileCanvas::new();
        c.begin(IVec2::new(0, 80), 0);
        draw_popups(&mut c, &view);
        c.pixels().to_vec()
    }

    #[test]
    fn test_popup_gone_at_expiry() {
        let born = 10_000;
        let mut state = GameState::new(1, born, true);
        state.effects.spawn_popup(born, 4, IVec2::new(60, 130), &mut state.rng);

        assert!(popup_tile(&state, born + 100).iter().any(|&px| px != 0));
        assert!(popup_tile(&state, born + SCORE_POPUP_LIFE_MS).iter().all(|&px| px == 0));
    }

    #[test]
    fn test_popup_size_steps() {
        assert_eq!(popup_size(0.0), 1);
        assert_eq!(popup_size(0.5), 2);
        assert_eq!(popup_size(0.9), 3);
    }

    #[test]
    fn test_bob_stays_small() {
        for now in [0, 100, 196, 400, u32::MAX] {
            assert!(bee_bob(now).abs() <= 2);
        }
    }

    #[test]
    fn test_dead_flower_draws_nothing() {
        let mut c = canvas();
        let f = Flower::default();
        draw_flower(&mut c, 50, 40, &f, 0, true);
        assert!(c.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_flower_centre_uses_centre_colour() {
        let mut c = canvas();
        let f = Flower {
            alive: true,
            radius: 8,
            petal: 1,
            petal_lo: 2,
            center: 3,
            ..Default::default()
        };
        draw_flower(&mut c, 50, 40, &f, 10_000, true);
        assert_eq!(c.get(50, 40), Some(3));
        assert_eq!(c.get(50 - 12, 40), Some(1));
    }

    #[test]
    fn test_hive_pulse_only_inside_window() {
        let mut c = canvas();
        draw_hive_pulse(&mut c, 60, 40, 600, 500);
        assert!(c.pixels().iter().all(|&p| p == 0));
        draw_hive_pulse(&mut c, 60, 40, 100, 500);
        assert!(c.pixels().iter().any(|&p| p != 0));
    }

    #[test]
    fn test_empty_orbit_draws_nothing() {
        let mut c = canvas();
        draw_orbit(&mut c, 60, 40, &Bee::default(), 0);
        draw_sparkles(&mut c, 60, 40, 0, 0);
        assert!(c.pixels().iter().all(|&p| p == 0));
    }
}
