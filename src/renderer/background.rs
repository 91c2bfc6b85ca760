//! Scrolling backdrop: tile base, parallax stars, nebula, grid, boundary hint
//! and the screen anchor. Nothing here is stored; every layer is recomputed
//! from the camera and the bee position for each tile.

use glam::{IVec2, Vec2};

use super::FrameView;
use super::canvas::TileCanvas;
use super::color::{palette, rgb565};
use crate::consts::*;
use crate::field::FieldLayer;

/// Far and near star layers with their two colour variants
pub const STAR_LAYERS: [(FieldLayer, u16, u16); 2] = [
    (
        FieldLayer {
            salt: 0xA11CE,
            cell: 48,
            density: 8,
            parallax: 0.25,
        },
        palette::STAR2,
        palette::STAR3,
    ),
    (
        FieldLayer {
            salt: 0xBEEF,
            cell: 36,
            density: 8,
            parallax: 0.55,
        },
        palette::STAR,
        palette::STAR2,
    ),
];

pub const NEBULA: FieldLayer = FieldLayer {
    salt: 0xD1B00B,
    cell: 64,
    density: 16,
    parallax: 0.35,
};

const GRID_MINOR: i32 = 80;
const GRID_MAJOR: i32 = 160;

/// Ring shows once the bee has used this much of its roam radius
const BOUNDARY_SHOW_FRACTION: f32 = 0.6;

/// `sin` of a timestamp with the given period, safe for wrapping clocks
pub fn wave(now: u32, period_ms: u32) -> f32 {
    let t = (now % period_ms) as f32 / period_ms as f32;
    (t * std::f32::consts::TAU).sin()
}

/// `cos` counterpart of [`wave`]
pub fn wave_cos(now: u32, period_ms: u32) -> f32 {
    let t = (now % period_ms) as f32 / period_ms as f32;
    (t * std::f32::consts::TAU).cos()
}

/// Flat base colour, checkerboarded per 128-px block of tile origins
pub fn tile_base(origin: IVec2) -> u16 {
    if (origin.x ^ origin.y) & 0x80 != 0 {
        palette::BG1
    } else {
        palette::BG0
    }
}

/// World rectangle under this tile for a layer following `focus`
fn tile_world(c: &TileCanvas, view: &FrameView, focus: Vec2) -> (Vec2, Vec2) {
    let (lo, hi) = c.bounds();
    view.camera.world_bounds(lo, hi, focus)
}

pub fn draw_star_layer(c: &mut TileCanvas, view: &FrameView, layer: &FieldLayer, ca: u16, cb: u16) {
    let focus = view.bee * layer.parallax;
    let (min, max) = tile_world(c, view, focus);
    for p in layer.points_in(min, max) {
        let s = view.camera.project(p.world.as_vec2(), focus);
        let color = if (p.seed >> 16) & 1 != 0 { ca } else { cb };
        c.pixel(s.x, s.y, color);
        // 1 in 16 stars is a short bar
        if (p.seed >> 20) & 0xF == 0 {
            c.pixel(s.x - 1, s.y, color);
            c.pixel(s.x + 1, s.y, color);
        }
    }
}

/// Nebula drift offset; keeps the layer alive while the bee idles
pub fn nebula_drift(now: u32) -> Vec2 {
    Vec2::new(wave(now, 52_360) * 22.0, wave_cos(now, 62_832) * 18.0)
}

pub fn draw_nebula(c: &mut TileCanvas, view: &FrameView) {
    let focus = view.bee * NEBULA.parallax + nebula_drift(view.now);
    let (min, max) = tile_world(c, view, focus);
    for p in NEBULA.points_in(min, max) {
        let s = view.camera.project(p.world.as_vec2(), focus);
        let h = p.seed;
        let color = rgb565(
            40 + ((h >> 12) & 0x1F) as u8,
            40 + ((h >> 17) & 0x1F) as u8,
            70 + ((h >> 22) & 0x3F) as u8,
        );
        c.pixel(s.x, s.y, color);
        if h & 0x100 != 0 {
            c.pixel(s.x + 1, s.y, color);
            c.pixel(s.x, s.y + 1, color);
        }
    }
}

pub fn draw_grid(c: &mut TileCanvas, view: &FrameView) {
    let (lo, hi) = c.bounds();
    let (min, max) = tile_world(c, view, view.bee);

    let first_x = (min.x / GRID_MINOR as f32).floor() as i32 * GRID_MINOR;
    for gx in (first_x..=max.x as i32).step_by(GRID_MINOR as usize) {
        let sx = view.camera.project(Vec2::new(gx as f32, view.bee.y), view.bee).x;
        if sx < lo.x || sx > hi.x {
            continue;
        }
        let color = if gx.rem_euclid(GRID_MAJOR) == 0 {
            palette::GRID
        } else {
            palette::GRID2
        };
        c.vline(sx, lo.y, TILE_H, color);
    }

    let first_y = (min.y / GRID_MINOR as f32).floor() as i32 * GRID_MINOR;
    for gy in (first_y..=max.y as i32).step_by(GRID_MINOR as usize) {
        let sy = view.camera.project(Vec2::new(view.bee.x, gy as f32), view.bee).y;
        if sy < lo.y || sy > hi.y {
            continue;
        }
        let color = if gy.rem_euclid(GRID_MAJOR) == 0 {
            palette::GRID
        } else {
            palette::GRID2
        };
        c.hline(lo.x, sy, TILE_W, color);
    }
}

/// Faint ring at the roam radius around the hive, once the bee strays far
pub fn draw_boundary(c: &mut TileCanvas, view: &FrameView) {
    if view.bee.length() <= ROAM_RADIUS * BOUNDARY_SHOW_FRACTION {
        return;
    }
    let hive = view.camera.project(Vec2::ZERO, view.bee);
    let r = (ROAM_RADIUS * view.camera.zoom) as i32;
    c.circle(hive.x, hive.y, r, palette::BOUNDARY);
}

/// Crosshair ticks and a slowly breathing ring around the bee's screen spot
pub fn draw_anchor(c: &mut TileCanvas, view: &FrameView) {
    let IVec2 { x, y } = view.camera.center();
    c.hline(x - 26, y, 12, palette::ANCHOR);
    c.hline(x + 15, y, 12, palette::ANCHOR);
    c.vline(x, y - 26, 12, palette::ANCHOR);
    c.vline(x, y + 15, 12, palette::ANCHOR);

    let r = 22 + (6.0 * wave(view.now, 1_200)) as i32;
    c.circle(x, y, r, palette::ANCHOR_RING);
}
