//! Tile renderer
//!
//! The display is covered by a grid of [`TILE_W`]x[`TILE_H`] tiles. Every
//! tile is rebuilt from scratch on each rendered frame, back to front, and
//! handed to the [`Display`] at its offset. How often a frame is rendered is
//! decided by [`RenderCadence`].

pub mod background;
pub mod canvas;
pub mod color;
pub mod font;
pub mod hud;
pub mod sprites;

use glam::{IVec2, Vec2};

use crate::Settings;
use crate::camera::Camera;
use crate::consts::*;
use crate::sim::GameState;
use crate::sim::time::{Millis, age};
use canvas::TileCanvas;

/// Offscreen slack before a flower is culled
const FLOWER_CULL_MARGIN: i32 = 30;
/// Offscreen slack before the hive is culled
const HIVE_CULL_MARGIN: i32 = 40;

/// Receives finished tiles. Tiles on the right and bottom edges may extend
/// past the display; the receiver clips them.
pub trait Display {
    fn push_tile(&mut self, origin: IVec2, tile: &TileCanvas);
}

/// Per-frame render switches derived from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Parallax star layers to draw (0..=2)
    pub star_layers: usize,
    pub nebula: bool,
    /// Flower shadow and spawn bloom
    pub flower_detail: bool,
    pub trails: bool,
    /// Blinking warnings; off under reduced motion
    pub blink: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl RenderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            star_layers: settings.quality.star_layers(),
            nebula: settings.quality.nebula_enabled(),
            flower_detail: settings.quality.flower_detail(),
            trails: settings.trails,
            blink: settings.effective_blink(),
        }
    }
}

/// Everything the draw passes read for one frame
pub struct FrameView<'a> {
    pub state: &'a GameState,
    pub camera: &'a Camera,
    /// Bee world position, the focus of every projection
    pub bee: Vec2,
    pub now: Millis,
    pub opts: &'a RenderOptions,
}

/// Adaptive frame pacing: fast while something moves, slow while idle
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderCadence {
    last_render_ms: Option<Millis>,
}

impl RenderCadence {
    pub fn interval(animating: bool) -> u32 {
        if animating {
            RENDER_INTERVAL_ACTIVE_MS
        } else {
            RENDER_INTERVAL_IDLE_MS
        }
    }

    /// True (and the render time recorded) once the interval has elapsed.
    /// The very first call always renders.
    pub fn should_render(&mut self, now: Millis, animating: bool) -> bool {
        let due = match self.last_render_ms {
            None => true,
            Some(last) => age(now, last) >= Self::interval(animating),
        };
        if due {
            self.last_render_ms = Some(now);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_render_ms = None;
    }
}

/// Tile origins covering the display, row-major
pub fn tile_origins() -> impl Iterator<Item = IVec2> {
    (0..DISPLAY_H)
        .step_by(TILE_H as usize)
        .flat_map(|y| (0..DISPLAY_W).step_by(TILE_W as usize).map(move |x| IVec2::new(x, y)))
}

/// Screen point lies within the display below `top`, grown by `margin`
fn on_screen(p: IVec2, top: i32, margin: i32) -> bool {
    p.x >= -margin && p.x < DISPLAY_W + margin && p.y >= top - margin && p.y < DISPLAY_H + margin
}

pub struct TileRenderer {
    canvas: TileCanvas,
    pub opts: RenderOptions,
    /// Frames rendered so far
    pub frames: u64,
}

impl TileRenderer {
    pub fn new(opts: RenderOptions) -> Self {
        Self {
            canvas: TileCanvas::new(),
            opts,
            frames: 0,
        }
    }

    /// Rebuild and push every tile. Returns the number of tiles pushed.
    pub fn render_frame(&mut self, state: &GameState, now: Millis, display: &mut impl Display) -> usize {
        let view = FrameView {
            state,
            camera: &state.camera,
            bee: state.bee_pos(),
            now,
            opts: &self.opts,
        };

        // Culling against the whole display, once per frame
        let hive = view.camera.project(Vec2::ZERO, view.bee);
        let hive_visible = on_screen(hive, HUD_H, HIVE_CULL_MARGIN);
        let flowers: Vec<_> = state
            .flowers
            .flowers
            .iter()
            .filter(|f| f.alive)
            .map(|f| (view.camera.project(f.pos(), view.bee), f))
            .filter(|(p, _)| on_screen(*p, 0, FLOWER_CULL_MARGIN))
            .collect();

        let mut pushed = 0;
        for origin in tile_origins() {
            let c = &mut self.canvas;
            c.begin(origin, background::tile_base(origin));

            for (layer, ca, cb) in background::STAR_LAYERS.iter().take(view.opts.star_layers) {
                background::draw_star_layer(c, &view, layer, *ca, *cb);
            }
            if view.opts.nebula {
                background::draw_nebula(c, &view);
            }
            background::draw_grid(c, &view);
            background::draw_boundary(c, &view);
            background::draw_anchor(c, &view);

            if hive_visible {
                sprites::draw_hive(c, hive.x, hive.y);
                sprites::draw_hive_pulse(c, hive.x, hive.y, now, state.effects.hive_pulse_until);
            }
            for (p, f) in &flowers {
                sprites::draw_flower(c, p.x, p.y, f, now, view.opts.flower_detail);
            }
            if view.opts.trails {
                sprites::draw_trails(c, &view);
            }
            sprites::draw_bee_group(c, &view);
            sprites::draw_popups(c, &view);

            hud::draw_radar(c, &view);
            hud::draw_belt(c, &view);
            hud::draw_survival_bar(c, &view);
            hud::draw_hud(c, &view);
            if state.is_game_over() {
                hud::draw_game_over(c, &view);
            }

            display.push_tile(origin, c);
            pushed += 1;
        }

        self.frames += 1;
        log::trace!("frame {} rendered ({pushed} tiles)", self.frames);
        pushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QualityPreset;
    use color::palette;

    #[derive(Default)]
    struct Recorder {
        origins: Vec<IVec2>,
        hud_pixel: Option<u16>,
    }

    impl Display for Recorder {
        fn push_tile(&mut self, origin: IVec2, tile: &TileCanvas) {
            if origin == IVec2::ZERO {
                self.hud_pixel = tile.get(1, 1);
            }
            self.origins.push(origin);
        }
    }

    #[test]
    fn test_tile_grid_covers_display() {
        let origins: Vec<_> = tile_origins().collect();
        assert_eq!(origins.len(), 9);
        assert_eq!(origins[0], IVec2::ZERO);
        assert_eq!(origins[2], IVec2::new(240, 0));
        assert_eq!(origins[8], IVec2::new(240, 160));
    }

    #[test]
    fn test_cadence_switches_interval() {
        let mut cadence = RenderCadence::default();
        assert!(cadence.should_render(1_000, false));
        assert!(!cadence.should_render(1_040, false));
        assert!(cadence.should_render(1_040, true));
        assert!(!cadence.should_render(1_100, false));
        assert!(cadence.should_render(1_120, false));
    }

    #[test]
    fn test_cadence_across_wrap() {
        let mut cadence = RenderCadence::default();
        assert!(cadence.should_render(u32::MAX - 10, true));
        assert!(!cadence.should_render(20, true));
        assert!(cadence.should_render(30, true));
    }

    #[test]
    fn test_options_follow_settings() {
        let low = RenderOptions::from_settings(&Settings::from_preset(QualityPreset::Low));
        assert_eq!(low.star_layers, 1);
        assert!(!low.nebula && !low.flower_detail && !low.trails);

        let calm = RenderOptions::from_settings(&Settings {
            reduced_motion: true,
            ..Default::default()
        });
        assert!(!calm.blink);
        assert_eq!(calm.star_layers, 2);
    }

    #[test]
    fn test_render_pushes_every_tile() {
        let state = GameState::new(7, 5_000, true);
        let mut renderer = TileRenderer::new(RenderOptions::default());
        let mut display = Recorder::default();

        assert_eq!(renderer.render_frame(&state, 5_000, &mut display), 9);
        assert_eq!(display.origins.len(), 9);
        assert_eq!(display.hud_pixel, Some(palette::HUD_BG));
        assert_eq!(renderer.frames, 1);
    }

    #[test]
    fn test_render_game_over_frame() {
        let mut state = GameState::new(3, 0, false);
        state.survival.time_left = 0.0;
        state.survival.game_over = true;
        let mut renderer = TileRenderer::new(RenderOptions::default());
        let mut display = Recorder::default();
        assert_eq!(renderer.render_frame(&state, 100, &mut display), 9);
    }

    #[test]
    fn test_on_screen_margins() {
        assert!(on_screen(IVec2::new(-30, 0), 0, 30));
        assert!(!on_screen(IVec2::new(-31, 0), 0, 30));
        assert!(on_screen(IVec2::new(DISPLAY_W + 29, DISPLAY_H), 0, 30));
        assert!(!on_screen(IVec2::new(0, -31), 0, 30));
    }

    #[test]
    fn test_hive_culled_under_hud_band() {
        let top = HUD_H - HIVE_CULL_MARGIN;
        assert!(on_screen(IVec2::new(100, top), HUD_H, HIVE_CULL_MARGIN));
        assert!(!on_screen(IVec2::new(100, top - 1), HUD_H, HIVE_CULL_MARGIN));
    }
}
