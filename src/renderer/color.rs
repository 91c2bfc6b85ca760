//! RGB565 colours for the panel

/// Pack 8-bit RGB into RGB565
#[inline]
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    (((r as u16) & 0xF8) << 8) | (((g as u16) & 0xFC) << 3) | ((b as u16) >> 3)
}

/// Pack RGB after scaling every channel by `alpha` (fade toward black)
#[inline]
pub fn rgb565_scaled(r: u8, g: u8, b: u8, alpha: f32) -> u16 {
    let a = alpha.clamp(0.0, 1.0);
    rgb565(
        (r as f32 * a) as u8,
        (g as f32 * a) as u8,
        (b as f32 * a) as u8,
    )
}

/// Fade a packed colour toward black
#[inline]
pub fn fade565(c: u16, alpha: f32) -> u16 {
    let (r, g, b) = unpack565(c);
    rgb565_scaled(r, g, b, alpha)
}

/// Unpack RGB565 back to 8-bit channels (low bits replicated)
#[inline]
pub fn unpack565(c: u16) -> (u8, u8, u8) {
    let r = ((c >> 11) & 0x1F) as u8;
    let g = ((c >> 5) & 0x3F) as u8;
    let b = (c & 0x1F) as u8;
    ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

/// Game palette
pub mod palette {
    use super::rgb565;

    pub const BG0: u16 = rgb565(4, 8, 18);
    pub const BG1: u16 = rgb565(8, 12, 26);
    pub const GRID: u16 = rgb565(18, 28, 52);
    pub const GRID2: u16 = rgb565(12, 18, 34);
    pub const STAR: u16 = rgb565(240, 240, 240);
    pub const STAR2: u16 = rgb565(180, 210, 255);
    pub const STAR3: u16 = rgb565(255, 230, 180);
    pub const WHITE: u16 = rgb565(245, 245, 245);
    pub const YELLOW: u16 = rgb565(255, 220, 40);
    pub const BLACK: u16 = rgb565(20, 20, 20);
    pub const HIVE: u16 = rgb565(90, 140, 90);
    pub const HUD_BG: u16 = rgb565(0, 0, 0);
    pub const POLLEN: u16 = rgb565(255, 235, 110);
    pub const POLLEN_HI: u16 = rgb565(255, 255, 210);
    pub const SHADOW: u16 = rgb565(0, 0, 0);
    pub const SHADOW_RIM: u16 = rgb565(20, 20, 20);
    pub const UI_DIM: u16 = rgb565(120, 140, 170);
    pub const UI_GO: u16 = rgb565(80, 210, 140);
    pub const UI_WARN: u16 = rgb565(255, 120, 120);
    pub const UI_ORANGE: u16 = rgb565(255, 140, 0);
    pub const BOUNDARY: u16 = rgb565(50, 70, 90);
    pub const ANCHOR: u16 = rgb565(40, 70, 90);
    pub const ANCHOR_RING: u16 = rgb565(35, 55, 70);
}
