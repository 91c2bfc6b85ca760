//! Buzz Box - a pollen-gathering arcade game for tiny framebuffers
//!
//! Core modules:
//! - `sim`: World simulation (bee physics, flowers, hive unloading, survival clock, radar)
//! - `vfx`: Fixed-capacity effect pools (trails, score popups, belt tokens)
//! - `camera`: Zoom, shake and the world-to-screen transform
//! - `field`: Stateless hash-seeded procedural background
//! - `renderer`: Tile renderer with adaptive frame cadence
//! - `audio`: Sound cue interface consumed by the synth collaborator
//! - `settings`: Presentation preferences

pub mod audio;
pub mod camera;
pub mod field;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod vfx;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    // === Display ===
    /// Physical panel size (landscape)
    pub const DISPLAY_W: i32 = 320;
    pub const DISPLAY_H: i32 = 240;
    /// Height of the HUD band at the top of the display
    pub const HUD_H: i32 = 28;
    /// Offscreen tile buffer size
    pub const TILE_W: i32 = 120;
    pub const TILE_H: i32 = 80;

    // === Entity counts ===
    pub const MAX_POLLEN_CARRY: u8 = 8;
    pub const FLOWER_N: usize = 7;
    pub const BELT_ITEM_N: usize = 10;
    pub const TRAIL_MAX: usize = 24;
    pub const SCORE_POPUP_N: usize = 6;

    // === Timing (ms) ===
    pub const UNLOAD_TICK_MS: u32 = 100;
    pub const UNLOAD_CHIRP_BASE: u16 = 760;
    pub const UNLOAD_CHIRP_STEP: u16 = 90;
    pub const UNLOAD_CHIRP_MS: u16 = 55;
    pub const EVENT_TAIL_MS: u32 = 140;
    pub const BELT_LIFE_MS: u32 = 14_000;
    pub const HIVE_PULSE_MS: u32 = 520;
    pub const SCORE_POPUP_LIFE_MS: u32 = 1_100;
    pub const SURVIVAL_FLASH_MS: u32 = 140;
    pub const TRAIL_LIFE_MS: u32 = 250;
    pub const RADAR_DURATION_MS: u32 = 320;
    pub const FLOWER_BLOOM_MS: u32 = 420;

    // === Frame cadence ===
    pub const RENDER_INTERVAL_ACTIVE_MS: u32 = 40; // ~25 FPS
    pub const RENDER_INTERVAL_IDLE_MS: u32 = 80; // ~12.5 FPS
    pub const TRAIL_SPAWN_INTERVAL_MS: u32 = 20;
    pub const MAX_DELTA_MS: u32 = 60;
    pub const LOOP_DELAY_MS: u32 = 2;
    /// Upper bound for a single physics step (seconds)
    pub const MAX_FRAME_DT: f32 = MAX_DELTA_MS as f32 / 1000.0;

    // === Survival ===
    pub const SURVIVAL_TIME_MAX: f32 = 15.0;
    pub const SURVIVAL_POLLEN_BASE: f32 = 0.65;
    pub const SURVIVAL_POLLEN_MULT_STEP: f32 = 0.55;

    // === World ===
    /// Maximum exploration radius around the hive
    pub const ROAM_RADIUS: f32 = 180.0;
    pub const HIVE_COLLECTION_RADIUS: i32 = 22;
    pub const BEE_HIT_RADIUS: i32 = 14;

    // === Movement physics ===
    pub const SPRING_K_NORMAL: f32 = 32.0;
    pub const SPRING_K_BOOST: f32 = 48.0;
    pub const DAMPING_NORMAL: f32 = 12.0;
    pub const DAMPING_BOOST: f32 = 16.0;
    pub const BOOST_IMPULSE: f32 = 150.0;
    pub const BOOST_DURATION_AUTO: u32 = 500;
    pub const BOOST_DURATION_MANUAL: u32 = 700;
    pub const BOOST_COOLDOWN_AUTO: u32 = 5_200;
    pub const BOOST_COOLDOWN_MANUAL: u32 = 3_500;

    // === Wing animation ===
    pub const WING_SPEED_DIVISOR: f32 = 520.0;
    pub const WING_HZ_MIN: f32 = 3.0;
    pub const WING_HZ_RANGE: f32 = 14.0; // Hz = MIN + RANGE * speed
    pub const WING_PHASE_WRAP: f32 = 1000.0;
    /// Wing speed below which the bee counts as idle for render cadence
    pub const WING_IDLE_THRESHOLD: f32 = 0.05;
    /// Wing speed needed before boost trails are emitted
    pub const TRAIL_MIN_WING_SPEED: f32 = 0.2;

    // === Camera ===
    pub const CAMERA_ZOOM_BOOST: f32 = 1.22;
    pub const CAMERA_ZOOM_NORMAL: f32 = 1.0;
    pub const CAMERA_ZOOM_LERP_SPEED: f32 = 7.0;
    pub const CAMERA_SHAKE_MAGNITUDE: f32 = 6.5;
    pub const CAMERA_SHAKE_DURATION_MS: u32 = 180;
    pub const CAMERA_SHAKE_PHASE_MULT: f32 = 0.045;
    pub const CAMERA_SHAKE_FREQ_X: f32 = 6.2;
    pub const CAMERA_SHAKE_FREQ_Y: f32 = 7.4;

    // === Flower spawning ===
    pub const FLOWER_RADIUS_MIN: i32 = 6;
    pub const FLOWER_RADIUS_MAX: i32 = 11;
    pub const FLOWER_SPAWN_NEAR_DIST_MIN: i32 = 90;
    pub const FLOWER_SPAWN_NEAR_DIST_MAX: i32 = 220;
    pub const FLOWER_SPAWN_NEAR_TRIES: u32 = 60;
    pub const FLOWER_COLLISION_DIST: i32 = 80;
    pub const FLOWER_SPAWN_ELSEWHERE_DIST_MIN: i32 = 60;
    pub const FLOWER_SPAWN_ELSEWHERE_MARGIN: i32 = 20;
    pub const FLOWER_SPAWN_ELSEWHERE_TRIES: u32 = 80;
    pub const FLOWER_BEE_AVOIDANCE_DIST: i32 = 150;
    pub const FLOWER_SPACING_ELSEWHERE: i32 = 120;

    // === Score popup ===
    pub const SCORE_POPUP_DRIFT_MIN: i8 = -10;
    pub const SCORE_POPUP_DRIFT_MAX: i8 = 10;
}

/// Squared distance between two integer world points, widened so far-flung
/// coordinates cannot overflow.
#[inline]
pub fn dist2_i(ax: i32, ay: i32, bx: i32, by: i32) -> i64 {
    let dx = ax as i64 - bx as i64;
    let dy = ay as i64 - by as i64;
    dx * dx + dy * dy
}
