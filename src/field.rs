//! Procedural background field
//!
//! Stars and nebula specks are never stored. The world is cut into square
//! cells; each cell's content is derived from a 32-bit hash of its
//! coordinates and a layer salt, so the same (cell, salt, size) always looks
//! the same no matter when or in what order it is drawn.

use glam::{IVec2, Vec2};

/// 32-bit integer mixing hash
#[inline]
pub fn hash32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Deterministic seed for one grid cell of one layer
#[inline]
pub fn world_cell_seed(cell_x: i32, cell_y: i32, salt: u32) -> u32 {
    hash32((cell_x as u32).wrapping_mul(73_856_093) ^ (cell_y as u32).wrapping_mul(19_349_663) ^ salt)
}

/// One layer of hashed background content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayer {
    pub salt: u32,
    /// Cell edge length in world units (at most 256)
    pub cell: i32,
    /// A cell is populated with probability 1/`density`; must be a power of two
    pub density: u32,
    /// Fraction of the bee's motion this layer follows (depth cue)
    pub parallax: f32,
}

/// A populated cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPoint {
    pub cell: IVec2,
    /// World position of the point inside the cell
    pub world: IVec2,
    /// The cell's full seed; upper bits pick colour and size variants
    pub seed: u32,
}

impl FieldLayer {
    /// Whether a seed passes this layer's 1/N occupancy test (low bits)
    #[inline]
    pub fn accepts(&self, seed: u32) -> bool {
        seed & (self.density - 1) == 0
    }

    /// Sample a single cell; `None` when the cell is empty
    pub fn sample(&self, cell_x: i32, cell_y: i32) -> Option<CellPoint> {
        let seed = world_cell_seed(cell_x, cell_y, self.salt);
        if !self.accepts(seed) {
            return None;
        }
        let px = (seed & 0xFF) as i32 % self.cell;
        let py = ((seed >> 8) & 0xFF) as i32 % self.cell;
        Some(CellPoint {
            cell: IVec2::new(cell_x, cell_y),
            world: IVec2::new(cell_x * self.cell + px, cell_y * self.cell + py),
            seed,
        })
    }

    /// Cell index range covering the world rectangle `[min, max]`
    pub fn cell_range(&self, min: Vec2, max: Vec2) -> (IVec2, IVec2) {
        let cell = self.cell as f32;
        let lo = IVec2::new(
            (min.x.min(max.x) / cell).floor() as i32,
            (min.y.min(max.y) / cell).floor() as i32,
        );
        let hi = IVec2::new(
            (min.x.max(max.x) / cell).floor() as i32,
            (min.y.max(max.y) / cell).floor() as i32,
        );
        (lo, hi)
    }

    /// Every populated cell intersecting the world rectangle, row by row
    pub fn points_in(&self, min: Vec2, max: Vec2) -> impl Iterator<Item = CellPoint> + '_ {
        let (lo, hi) = self.cell_range(min, max);
        (lo.y..=hi.y).flat_map(move |cy| (lo.x..=hi.x).filter_map(move |cx| self.sample(cx, cy)))
    }
}
