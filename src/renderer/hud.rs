//! Screen-fixed overlays: radar, delivery belt, survival bar, top HUD band
//! and the game-over panel

use glam::IVec2;

use super::FrameView;
use super::canvas::{TileCanvas, text_width};
use super::color::{fade565, palette, rgb565};
use crate::consts::*;
use crate::sim::time::{Millis, age};
use crate::vfx::{life_t, tail_fade};

/// Survival bar rectangle (x, y, w, h)
pub const BAR: (i32, i32, i32, i32) = (6, DISPLAY_H - 8, DISPLAY_W - 12, 6);

/// Delivery belt panel corners (x0, y0, x1, y1)
const BELT_PANEL: (i32, i32, i32, i32) = (DISPLAY_W - 122, DISPLAY_H - 56, DISPLAY_W - 6, DISPLAY_H - 20);

const GAME_OVER_MESSAGES: [&str; 6] = [
    "Bee-autiful!",
    "Buzz-tastic!",
    "Sweet Flying!",
    "You're the Bee!",
    "Amazing Work!",
    "Pollen Master!",
];

/// Cheer line for a final score
pub fn game_over_message(score: u32) -> &'static str {
    GAME_OVER_MESSAGES[(score % GAME_OVER_MESSAGES.len() as u32) as usize]
}

/// Square wave: on for the first half of each period
pub fn blink_phase(now: Millis, period_ms: u32) -> bool {
    now % period_ms < period_ms / 2
}

/// Blink honouring reduced motion (steady on)
fn blink(view: &FrameView, period_ms: u32) -> bool {
    !view.opts.blink || blink_phase(view.now, period_ms)
}

/// Fill colour for a survival fraction
pub fn survival_color(pct: f32) -> u16 {
    if pct > 0.80 {
        palette::UI_GO
    } else if pct > 0.40 {
        palette::YELLOW
    } else if pct > 0.20 {
        palette::UI_ORANGE
    } else {
        palette::UI_WARN
    }
}

/// Rings, dotted bearing line and arrow toward the radar target
pub fn draw_radar(c: &mut TileCanvas, view: &FrameView) {
    let radar = &view.state.radar;
    if !radar.showing(view.now) {
        return;
    }
    let IVec2 { x: cx, y: cy } = view.camera.center();
    if !c.overlaps(cx - 60, cy - 60, cx + 80, cy + 60) {
        return;
    }
    let t = radar.progress(view.now);
    let (dir, len) = radar.bearing(view.bee);

    let accent = if radar.to_hive {
        palette::HIVE
    } else {
        palette::YELLOW
    };
    let r0 = 14 + (t * 26.0) as i32;
    c.circle(cx, cy, r0, accent);
    c.circle(cx, cy, r0 + 4, palette::WHITE);
    if t > 0.35 {
        c.circle(cx, cy, 10 + ((t - 0.35) * 30.0) as i32, palette::UI_DIM);
    }

    let at = |d: f32| IVec2::new(cx + (dir.x * d) as i32, cy + (dir.y * d) as i32);
    for i in (6..36).step_by(6) {
        let p = at(i as f32);
        c.pixel(p.x, p.y, palette::WHITE);
    }
    let perp = IVec2::new((-dir.y * 2.0) as i32, (dir.x * 2.0) as i32);
    for i in (12..=36).step_by(8) {
        let p = at(i as f32);
        c.line(p.x - perp.x, p.y - perp.y, p.x + perp.x, p.y + perp.y, palette::UI_DIM);
    }

    let tip = at(36.0);
    let back = IVec2::new((dir.x * 9.0) as i32, (dir.y * 9.0) as i32);
    let side = IVec2::new((-dir.y * 5.0) as i32, (dir.x * 5.0) as i32);
    c.fill_triangle(tip, tip - back + side, tip - back - side, accent);

    c.text(cx + 40, cy - 10, &format!("{}", len as i32), 1, palette::UI_DIM);
}

/// Panel where delivered pollen slides along a track and fades out
pub fn draw_belt(c: &mut TileCanvas, view: &FrameView) {
    let (x0, y0, x1, y1) = BELT_PANEL;
    if !c.overlaps(x0, y0, x1, y1) {
        return;
    }
    c.fill_round_rect(x0, y0, x1 - x0, y1 - y0, 6, rgb565(6, 10, 16));
    c.round_rect(x0, y0, x1 - x0, y1 - y0, 6, rgb565(40, 70, 40));

    let ty = y0 + 20;
    let (ta, tb) = (x0 + 14, x1 - 14);
    c.hline(ta, ty, tb - ta + 1, rgb565(34, 54, 34));
    c.hline(ta, ty + 2, tb - ta + 1, rgb565(22, 34, 22));

    for item in view.state.effects.belt.alive() {
        let since = age(view.now, item.born_ms);
        if since > BELT_LIFE_MS {
            continue;
        }
        let t = life_t(view.now, item.born_ms, BELT_LIFE_MS);
        let fade = tail_fade(t, 0.8);
        if fade <= 0.0 {
            continue;
        }
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        let x = ta + (eased * (tb - ta) as f32) as i32;
        let y = ty + 1;
        let r = if since < 220 {
            4
        } else if t < 0.85 {
            3
        } else {
            2
        };
        c.fill_circle(x, y, r, fade565(palette::POLLEN, fade));
        let rim = if t < 0.75 { palette::WHITE } else { palette::YELLOW };
        c.circle(x, y, r, fade565(rim, fade));
        c.pixel(x + 1, y - 1, fade565(palette::POLLEN_HI, fade));
    }

    c.text(x0 + 10, y0 + 6, "DELIVERIES", 1, palette::UI_DIM);
}

pub fn draw_survival_bar(c: &mut TileCanvas, view: &FrameView) {
    let (x, y, w, h) = BAR;
    if !c.overlaps(x, y, x + w, y + h) {
        return;
    }
    let survival = &view.state.survival;
    let pct = survival.fraction();
    let fill_w = (pct * w as f32) as i32;

    c.fill_rect(x, y, w, h, rgb565(20, 20, 25));
    c.rect(x, y, w, h, rgb565(60, 70, 80));

    let critical = pct <= 0.20;
    let flashing = critical && view.opts.blink && blink_phase(view.now, 400);
    if fill_w > 0 {
        let live = if flashing {
            palette::UI_WARN
        } else {
            survival_color(pct)
        };
        c.fill_rect(x, y, fill_w, h, live);
    }

    // Freshly granted time shows as a bright segment
    if survival.flash_active(view.now) {
        let start = (survival.flash.start_pct * w as f32) as i32;
        let end = (survival.flash.end_pct * w as f32) as i32;
        if end > start {
            c.fill_rect(x + start, y, end - start, h, palette::POLLEN_HI);
        }
    }

    if flashing && fill_w > 0 {
        c.rect(x, y, fill_w, h, palette::WHITE);
        if fill_w > 2 {
            c.rect(x + 1, y + 1, fill_w - 2, h - 2, palette::WHITE);
        }
    }
}

/// Boost status word for the HUD
pub fn boost_label(view: &FrameView) -> (&'static str, u16) {
    let bee = &view.state.bee;
    if bee.is_boosting(view.now) {
        ("ON", palette::YELLOW)
    } else if bee.is_boost_on_cooldown(view.now) {
        ("--", palette::UI_DIM)
    } else {
        ("READY", palette::UI_GO)
    }
}

/// Black band across the top: score, carry count, carry rack, boost
pub fn draw_hud(c: &mut TileCanvas, view: &FrameView) {
    if !c.overlaps(0, 0, DISPLAY_W - 1, HUD_H - 1) {
        return;
    }
    c.fill_rect(0, 0, DISPLAY_W, HUD_H, palette::HUD_BG);

    let survival = &view.state.survival;
    c.text(6, 6, &format!("POLLEN {}", survival.score), 2, palette::WHITE);

    let pollen = survival.pollen;
    let carry = if pollen > 0 {
        format!("CARRY {pollen}/{MAX_POLLEN_CARRY}")
    } else {
        format!("EMPTY 0/{MAX_POLLEN_CARRY}")
    };
    let carry_color = if pollen > 0 {
        palette::YELLOW
    } else {
        palette::UI_DIM
    };
    c.text(6, 20, &carry, 1, carry_color);

    for idx in 0..MAX_POLLEN_CARRY {
        let cx = 84 + (idx % 4) as i32 * 6;
        let cy = 20 + (idx / 4) as i32 * 6;
        let full = idx < pollen;
        c.fill_circle(cx, cy, 2, if full { palette::POLLEN } else { palette::UI_DIM });
        if full {
            c.pixel(cx + 1, cy - 1, palette::POLLEN_HI);
        }
    }

    let bx = DISPLAY_W - 92;
    let (label, color) = boost_label(view);
    c.text(bx, 6, &format!("BOOST {label}"), 1, color);
    if view.state.bee.is_boost_on_cooldown(view.now) {
        c.text(bx, 16, "COOLDN", 1, palette::UI_WARN);
    }
}

pub fn draw_game_over(c: &mut TileCanvas, view: &FrameView) {
    let (w, h) = (200, 100);
    let px = (DISPLAY_W - w) / 2;
    let py = (DISPLAY_H - h) / 2 - 20;

    if c.overlaps(px, py, px + w, py + h) {
        let border = rgb565(120, 180, 220);
        c.fill_round_rect(px, py, w, h, 8, rgb565(30, 40, 60));
        c.round_rect(px, py, w, h, 8, border);
        c.round_rect(px + 1, py + 1, w - 2, h - 2, 7, border);

        let score = view.state.survival.score;
        let msg = game_over_message(score);
        let title_w = text_width(msg, 2);
        c.text(px + (w - title_w) / 2, py + 12, msg, 2, palette::YELLOW);

        let digits = format!("{score}");
        let digits_w = text_width(&digits, 3);
        c.text(px + (w - digits_w) / 2, py + 38, &digits, 3, palette::WHITE);

        c.text(px + 28, py + 66, "pollen delivered", 1, palette::UI_DIM);
        if blink(view, 800) {
            c.text(px + 30, py + 82, "Press to play again", 1, palette::UI_GO);
        }
    }

    // Empty bar, solid red
    let (x, y, bw, bh) = BAR;
    if c.overlaps(x, y, x + bw, y + bh) {
        c.fill_rect(x, y, bw, bh, palette::UI_WARN);
        if blink(view, 700) {
            c.rect(x, y, bw, bh, palette::WHITE);
        }
    }
}
