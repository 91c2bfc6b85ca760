//! Tile-sized offscreen canvas
//!
//! All drawing calls take *screen* coordinates; the canvas knows which tile
//! of the display it currently holds and clips everything to it. A shape
//! that straddles tiles is simply drawn again (clipped) for each tile.

use glam::IVec2;

use crate::consts::{TILE_H, TILE_W};

/// Pixels per tile buffer
pub const TILE_PIXELS: usize = (TILE_W * TILE_H) as usize;

/// Glyph cell width/height at text size 1 (5x7 glyph + spacing)
pub const GLYPH_W: i32 = 6;
pub const GLYPH_H: i32 = 8;

pub struct TileCanvas {
    origin: IVec2,
    pixels: Vec<u16>,
}

impl Default for TileCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl TileCanvas {
    pub fn new() -> Self {
        Self {
            origin: IVec2::ZERO,
            pixels: vec![0; TILE_PIXELS],
        }
    }

    /// Retarget the canvas at the tile whose top-left is `origin` and flood it
    pub fn begin(&mut self, origin: IVec2, color: u16) {
        self.origin = origin;
        self.pixels.fill(color);
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    /// Inclusive screen-space bounds of this tile
    pub fn bounds(&self) -> (IVec2, IVec2) {
        (
            self.origin,
            self.origin + IVec2::new(TILE_W - 1, TILE_H - 1),
        )
    }

    /// Does the inclusive screen rectangle touch this tile?
    pub fn overlaps(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
        let (lo, hi) = self.bounds();
        !(x1 < lo.x || x0 > hi.x || y1 < lo.y || y0 > hi.y)
    }

    /// Row-major RGB565 pixels
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    /// Pixel bytes in native endianness for the display transport
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Read back a screen pixel if it lies in this tile
    pub fn get(&self, x: i32, y: i32) -> Option<u16> {
        let lx = x - self.origin.x;
        let ly = y - self.origin.y;
        if (0..TILE_W).contains(&lx) && (0..TILE_H).contains(&ly) {
            Some(self.pixels[(ly * TILE_W + lx) as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn pixel(&mut self, x: i32, y: i32, color: u16) {
        let lx = x - self.origin.x;
        let ly = y - self.origin.y;
        if (0..TILE_W).contains(&lx) && (0..TILE_H).contains(&ly) {
            self.pixels[(ly * TILE_W + lx) as usize] = color;
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) {
        if w <= 0 || h <= 0 {
            return;
        }
        let x0 = (x - self.origin.x).max(0);
        let y0 = (y - self.origin.y).max(0);
        let x1 = (x + w - self.origin.x).min(TILE_W);
        let y1 = (y + h - self.origin.y).min(TILE_H);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for ly in y0..y1 {
            let row = (ly * TILE_W) as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    pub fn hline(&mut self, x: i32, y: i32, w: i32, color: u16) {
        self.fill_rect(x, y, w, 1, color);
    }

    pub fn vline(&mut self, x: i32, y: i32, h: i32, color: u16) {
        self.fill_rect(x, y, 1, h, color);
    }

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u16) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.hline(x, y, w, color);
        self.hline(x, y + h - 1, w, color);
        self.vline(x, y, h, color);
        self.vline(x + w - 1, y, h, color);
    }

    /// Bresenham line, endpoints inclusive
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u16) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Midpoint circle outline, restricted to the quadrants in `corners`
    /// (1 = top-left, 2 = top-right, 4 = bottom-right, 8 = bottom-left)
    fn circle_arcs(&mut self, cx: i32, cy: i32, r: i32, corners: u8, color: u16) {
        let mut f = 1 - r;
        let mut ddf_x = 1;
        let mut ddf_y = -2 * r;
        let mut x = 0;
        let mut y = r;
        while x < y {
            if f >= 0 {
                y -= 1;
                ddf_y += 2;
                f += ddf_y;
            }
            x += 1;
            ddf_x += 2;
            f += ddf_x;
            if corners & 0x4 != 0 {
                self.pixel(cx + x, cy + y, color);
                self.pixel(cx + y, cy + x, color);
            }
            if corners & 0x2 != 0 {
                self.pixel(cx + x, cy - y, color);
                self.pixel(cx + y, cy - x, color);
            }
            if corners & 0x8 != 0 {
                self.pixel(cx - y, cy + x, color);
                self.pixel(cx - x, cy + y, color);
            }
            if corners & 0x1 != 0 {
                self.pixel(cx - y, cy - x, color);
                self.pixel(cx - x, cy - y, color);
            }
        }
    }

    pub fn circle(&mut self, cx: i32, cy: i32, r: i32, color: u16) {
        if r < 0 {
            return;
        }
        self.pixel(cx, cy + r, color);
        self.pixel(cx, cy - r, color);
        self.pixel(cx + r, cy, color);
        self.pixel(cx - r, cy, color);
        self.circle_arcs(cx, cy, r, 0xF, color);
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u16) {
        if r < 0 {
            return;
        }
        // Skip whole-circle work when it cannot touch this tile
        if !self.overlaps(cx - r, cy - r, cx + r, cy + r) {
            return;
        }
        let r2 = r * r;
        for dy in -r..=r {
            let span = ((r2 - dy * dy) as f32).sqrt() as i32;
            self.hline(cx - span, cy + dy, 2 * span + 1, color);
        }
    }

    fn ellipse_span(rx: i32, ry: i32, dy: i32) -> i32 {
        let yf = dy as f32 / ry as f32;
        (rx as f32 * (1.0 - yf * yf).max(0.0).sqrt()) as i32
    }

    pub fn fill_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, color: u16) {
        if rx <= 0 || ry <= 0 || !self.overlaps(cx - rx, cy - ry, cx + rx, cy + ry) {
            return;
        }
        for dy in -ry..=ry {
            let span = Self::ellipse_span(rx, ry, dy);
            self.hline(cx - span, cy + dy, 2 * span + 1, color);
        }
    }

    pub fn ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, color: u16) {
        if rx <= 0 || ry <= 0 || !self.overlaps(cx - rx, cy - ry, cx + rx, cy + ry) {
            return;
        }
        // Row extents catch the flat sides, column extents the steep ones
        for dy in -ry..=ry {
            let span = Self::ellipse_span(rx, ry, dy);
            self.pixel(cx - span, cy + dy, color);
            self.pixel(cx + span, cy + dy, color);
        }
        for dx in -rx..=rx {
            let span = Self::ellipse_span(ry, rx, dx);
            self.pixel(cx + dx, cy - span, color);
            self.pixel(cx + dx, cy + span, color);
        }
    }

    /// Filled triangle via edge functions over the bounding box
    pub fn fill_triangle(&mut self, a: IVec2, b: IVec2, c: IVec2, color: u16) {
        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        if !self.overlaps(min.x, min.y, max.x, max.y) {
            return;
        }
        let edge = |p: IVec2, q: IVec2, r: IVec2| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
        let area = edge(a, b, c);
        if area == 0 {
            self.line(a.x, a.y, b.x, b.y, color);
            self.line(b.x, b.y, c.x, c.y, color);
            return;
        }
        let (lo, hi) = self.bounds();
        for y in min.y.max(lo.y)..=max.y.min(hi.y) {
            for x in min.x.max(lo.x)..=max.x.min(hi.x) {
                let p = IVec2::new(x, y);
                let w0 = edge(b, c, p);
                let w1 = edge(c, a, p);
                let w2 = edge(a, b, p);
                let inside = if area > 0 {
                    w0 >= 0 && w1 >= 0 && w2 >= 0
                } else {
                    w0 <= 0 && w1 <= 0 && w2 <= 0
                };
                if inside {
                    self.pixel(x, y, color);
                }
            }
        }
    }

    pub fn round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) {
        let r = r.min(w / 2).min(h / 2).max(0);
        self.hline(x + r, y, w - 2 * r, color);
        self.hline(x + r, y + h - 1, w - 2 * r, color);
        self.vline(x, y + r, h - 2 * r, color);
        self.vline(x + w - 1, y + r, h - 2 * r, color);
        self.circle_arcs(x + r, y + r, r, 0x1, color);
        self.circle_arcs(x + w - r - 1, y + r, r, 0x2, color);
        self.circle_arcs(x + w - r - 1, y + h - r - 1, r, 0x4, color);
        self.circle_arcs(x + r, y + h - r - 1, r, 0x8, color);
    }

    pub fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, r: i32, color: u16) {
        let r = r.min(w / 2).min(h / 2).max(0);
        self.fill_rect(x + r, y, w - 2 * r, h, color);
        self.fill_rect(x, y + r, w, h - 2 * r, color);
        self.fill_circle(x + r, y + r, r, color);
        self.fill_circle(x + w - r - 1, y + r, r, color);
        self.fill_circle(x + r, y + h - r - 1, r, color);
        self.fill_circle(x + w - r - 1, y + h - r - 1, r, color);
    }

    /// Draw `text` with its top-left at (x, y), scaled by `size`.
    /// Returns the advance width in pixels.
    pub fn text(&mut self, x: i32, y: i32, text: &str, size: i32, color: u16) -> i32 {
        let size = size.max(1);
        let width = text_width(text, size);
        if !self.overlaps(x, y, x + width, y + GLYPH_H * size) {
            return width;
        }
        let mut pen = x;
        for ch in text.chars() {
            if let Some(columns) = super::font::glyph(ch) {
                for (col, bits) in columns.iter().enumerate() {
                    for row in 0..7 {
                        if (bits >> row) & 1 != 0 {
                            self.fill_rect(pen + col as i32 * size, y + row * size, size, size, color);
                        }
                    }
                }
            }
            pen += GLYPH_W * size;
        }
        width
    }
}

/// Advance width of `text` at `size`
pub fn text_width(text: &str, size: i32) -> i32 {
    text.chars().count() as i32 * GLYPH_W * size.max(1)
}
