//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Seeded RNG only
//! - Wrapping millisecond timestamps, compared by signed difference
//! - Fixed-size storage, stable slot order
//! - No platform dependencies; only the camera and RGB565 packing are shared
//!   with the renderer

pub mod bee;
pub mod flowers;
pub mod hive;
pub mod radar;
pub mod rng;
pub mod state;
pub mod survival;
pub mod tick;
pub mod time;

pub use bee::{Bee, SpringParams, StickInput};
pub use flowers::{Flower, FlowerField};
pub use hive::{Hive, HivePhase, UnloadStep};
pub use radar::Radar;
pub use rng::Xorshift32;
pub use state::{GameEvent, GameState};
pub use survival::{Survival, SurvivalFlash};
pub use tick::{AmbientFeed, FrameInput, FrameReport, frame_dt, tick};
pub use time::Millis;
