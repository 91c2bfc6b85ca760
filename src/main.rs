//! Buzz Box headless driver
//!
//! Runs the game on a simulated millisecond clock with an autopilot on the
//! stick, feeds sound events to the buzzer model, collects rendered tiles
//! into a framebuffer and prints a JSON summary of the run.
//!
//! Usage: buzz-box [--seed N] [--seconds N] [--settings PATH] [--frame-out PATH]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use buzz_box::Settings;
use buzz_box::audio::{self, AudioSink, AudioStats, ToneSynth};
use buzz_box::consts::*;
use buzz_box::renderer::canvas::TileCanvas;
use buzz_box::renderer::color::unpack565;
use buzz_box::renderer::{Display, RenderCadence, RenderOptions, TileRenderer};
use buzz_box::sim::time::{Millis, has_reached, is_before};
use buzz_box::sim::{FrameInput, GameEvent, GameState, StickInput, frame_dt, tick};

/// Clock start, close enough to the wrap that every run crosses it
const CLOCK_START: Millis = u32::MAX - 5_000;
/// Nominal loop period plus the end-of-loop yield
const LOOP_MS: u32 = 14 + LOOP_DELAY_MS;

#[derive(Debug)]
struct Args {
    seed: Option<u32>,
    seconds: u32,
    settings: Option<PathBuf>,
    frame_out: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: None,
            seconds: 60,
            settings: None,
            frame_out: None,
        }
    }
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--seed" => args.seed = Some(value()?.parse().map_err(|e| format!("--seed: {e}"))?),
            "--seconds" => args.seconds = value()?.parse().map_err(|e| format!("--seconds: {e}"))?,
            "--settings" => args.settings = Some(PathBuf::from(value()?)),
            "--frame-out" => args.frame_out = Some(PathBuf::from(value()?)),
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

/// Full-display RGB565 framebuffer assembled from pushed tiles
struct FrameCollector {
    pixels: Vec<u16>,
    tiles: u64,
}

impl FrameCollector {
    fn new() -> Self {
        Self {
            pixels: vec![0; (DISPLAY_W * DISPLAY_H) as usize],
            tiles: 0,
        }
    }

    /// Binary PPM of the current framebuffer
    fn write_ppm(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write!(out, "P6\n{DISPLAY_W} {DISPLAY_H}\n255\n")?;
        for &px in &self.pixels {
            let (r, g, b) = unpack565(px);
            out.write_all(&[r, g, b])?;
        }
        out.flush()
    }
}

impl Display for FrameCollector {
    fn push_tile(&mut self, origin: IVec2, tile: &TileCanvas) {
        let w = TILE_W.min(DISPLAY_W - origin.x).max(0) as usize;
        let h = TILE_H.min(DISPLAY_H - origin.y).max(0) as usize;
        for row in 0..h {
            let src = &tile.pixels()[row * TILE_W as usize..][..w];
            let dst = (origin.y as usize + row) * DISPLAY_W as usize + origin.x as usize;
            self.pixels[dst..dst + w].copy_from_slice(src);
        }
        self.tiles += 1;
    }
}

/// Flies to the nearest flower until full, then home; taps the radar now
/// and then and restarts after a game over
struct Autopilot {
    rng: Pcg32,
    next_tap: Millis,
}

impl Autopilot {
    fn new(seed: u64, now: Millis) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_tap: now,
        }
    }

    fn sample(&mut self, state: &GameState, now: Millis) -> FrameInput {
        if state.is_game_over() {
            return FrameInput {
                stick: StickInput::NEUTRAL,
                pressed: self.rng.random_ratio(1, 30),
            };
        }

        let bee = state.bee.cell_pos();
        // Head home early rather than run out of time with pollen aboard
        let cutting_close = state.survival.pollen > 0 && state.survival.time_left < 5.0;
        let goal = if state.survival.can_carry_more() && !cutting_close {
            state.flowers.nearest(bee)
        } else {
            None
        };
        let stick = match goal {
            Some((wx, wy)) => {
                let jitter = Vec2::new(self.rng.random_range(-0.05..0.05), self.rng.random_range(-0.05..0.05));
                let dir = Vec2::new(wx as f32, wy as f32) / ROAM_RADIUS + jitter;
                StickInput::new(dir.x, dir.y)
            }
            None => StickInput::NEUTRAL,
        };

        let pressed = has_reached(now, self.next_tap);
        if pressed {
            self.next_tap = now.wrapping_add(self.rng.random_range(1_500..4_000));
        }
        FrameInput { stick, pressed }
    }
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u32,
    frames: u64,
    rendered: u64,
    tiles: u64,
    collected: u32,
    delivered: u32,
    best_score: u32,
    games_over: u32,
    restarts: u32,
    final_score: u32,
    audio: AudioStats,
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("buzz-box: {e}");
            std::process::exit(2);
        }
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("Buzz Box (headless) seed {seed:#010x}, {}s, quality {}", args.seconds, settings.quality.as_str());

    let mut now = CLOCK_START;
    let mut state = GameState::new(seed, now, settings.effective_screen_shake());
    let mut renderer = TileRenderer::new(RenderOptions::from_settings(&settings));
    let mut cadence = RenderCadence::default();
    let mut display = FrameCollector::new();
    let mut synth = ToneSynth::new(settings.effective_volume());
    let mut pilot = Autopilot::new(u64::from(seed), now);
    let mut summary = RunSummary {
        seed,
        ..Default::default()
    };

    let end = now.wrapping_add(args.seconds.saturating_mul(1_000));
    let mut last = now;
    while is_before(now, end) {
        let dt = frame_dt(now, last);
        last = now;

        let input = pilot.sample(&state, now);
        let report = tick(&mut state, &input, now, dt);
        summary.frames += 1;
        summary.collected += u32::from(report.collected);
        summary.delivered += u32::from(report.delivered);

        let events = state.drain_events();
        for event in &events {
            match event {
                GameEvent::GameOver { score } => {
                    summary.games_over += 1;
                    summary.best_score = summary.best_score.max(*score);
                }
                GameEvent::Restarted => summary.restarts += 1,
                _ => {}
            }
        }
        audio::dispatch(&events, &mut synth, now);
        synth.update(now, dt, report.ambient.as_ref());

        if cadence.should_render(now, state.is_animating(now)) {
            renderer.render_frame(&state, now, &mut display);
        }

        // Frames occasionally run long
        now = now.wrapping_add(LOOP_MS + pilot.rng.random_range(0..6));
    }

    summary.rendered = renderer.frames;
    summary.tiles = display.tiles;
    summary.final_score = state.survival.score;
    summary.best_score = summary.best_score.max(state.survival.score);
    summary.audio = synth.stats();

    if let Some(path) = &args.frame_out {
        match display.write_ppm(path) {
            Ok(()) => log::info!("Last frame written to {}", path.display()),
            Err(e) => log::warn!("Could not write frame {}: {e}", path.display()),
        }
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize summary: {e}"),
    }
}
