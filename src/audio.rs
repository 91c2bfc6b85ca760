//! Sound cues for a single-voice buzzer
//!
//! The simulation never touches audio. The driver drains [`GameEvent`]s
//! after each frame and feeds them to an [`AudioSink`]. [`ToneSynth`] models
//! a piezo buzzer: one short step sequence at a time, and a wing buzz that
//! follows the bee's speed whenever no sequence is playing.

use crate::field::hash32;
use crate::sim::state::GameEvent;
use crate::sim::tick::AmbientFeed;
use crate::sim::time::{Millis, age, has_reached, is_before};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Button press in normal play
    Click,
    /// Radar sweep started
    RadarPing,
    /// Flower harvested
    PollenChirp,
    /// One unit unloaded; pitch rises with each unit
    Unload { hz: u16, ms: u16 },
    /// Hold the last pitch and glide back into the wing buzz
    Tail { hz: u16, ms: u32 },
}

/// A single square-wave tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub hz: u16,
    /// Duration; 0 means sustained until replaced
    pub ms: u16,
}

const fn tone(hz: u16, ms: u16) -> Tone {
    Tone { hz, ms }
}

/// One sequence step: the tone and the gap before the next step
type Step = (Tone, u32);

const CLICK_STEPS: &[Step] = &[(tone(1800, 18), 22)];
const RADAR_STEPS: &[Step] = &[(tone(1500, 14), 18), (tone(980, 50), 60), (tone(1220, 55), 70)];
const CHIRP_STEPS: &[Step] = &[(tone(940, 55), 65), (tone(1160, 55), 65), (tone(860, 80), 95)];

/// Click followed by the radar sweep
const CLICK_RADAR_STEPS: &[Step] = &[
    (tone(1800, 18), 22),
    (tone(1500, 14), 18),
    (tone(980, 50), 60),
    (tone(1220, 55), 70),
];

const CLICK_TAIL_MS: u32 = 110;
const RADAR_TAIL_MS: u32 = 140;
const CHIRP_TAIL_MS: u32 = 130;

/// Wing buzz pitch range
const AMBIENT_BASE_HZ: f32 = 220.0;
const AMBIENT_SPEED_HZ: f32 = 520.0;
const AMBIENT_MIN_HZ: f32 = 180.0;
const AMBIENT_MAX_HZ: f32 = 980.0;
/// Envelope level below which the buzz is silent
const AMBIENT_GATE: f32 = 0.05;

/// Something that can make the game's sounds
pub trait AudioSink {
    /// Start a cue
    fn play(&mut self, cue: SoundCue, now: Millis);

    /// Per-frame update. `ambient` is present only in normal play.
    fn update(&mut self, now: Millis, dt: f32, ambient: Option<&AmbientFeed>);

    /// Silence everything immediately
    fn stop_all(&mut self);

    /// Forget smoothing state (new run)
    fn reset(&mut self) {
        self.stop_all();
    }
}

/// Route a frame's events to the sink
pub fn dispatch(events: &[GameEvent], sink: &mut impl AudioSink, now: Millis) {
    for event in events {
        match *event {
            GameEvent::Click => sink.play(SoundCue::Click, now),
            GameEvent::PollenChirp => sink.play(SoundCue::PollenChirp, now),
            GameEvent::UnloadTone { hz, ms } => sink.play(SoundCue::Unload { hz, ms }, now),
            GameEvent::UnloadTail { hz, ms } => sink.play(SoundCue::Tail { hz, ms }, now),
            GameEvent::StopAll => sink.stop_all(),
            GameEvent::Restarted => sink.reset(),
            GameEvent::RadarPing { .. } => sink.play(SoundCue::RadarPing, now),
            GameEvent::GameOver { .. } => {}
        }
    }
}

/// Silent sink; cues only show up in the trace log
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, cue: SoundCue, now: Millis) {
        log::trace!("[{now}] cue {cue:?}");
    }
    fn update(&mut self, _now: Millis, _dt: f32, _ambient: Option<&AmbientFeed>) {}
    fn stop_all(&mut self) {
        log::trace!("stop all");
    }
}

#[derive(Debug, Clone, Copy)]
struct Sequence {
    cue: SoundCue,
    steps: &'static [Step],
    step: usize,
    next_ms: Millis,
    tail_ms: u32,
}

#[derive(Debug, Clone, Copy)]
struct Tail {
    hz: f32,
    start_ms: Millis,
    until_ms: Millis,
}

/// Counters for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct AudioStats {
    pub cues: u32,
    pub dropped: u32,
    pub tones: u32,
    pub stops: u32,
}

/// Buzzer model
#[derive(Debug, Clone)]
pub struct ToneSynth {
    volume: f32,
    sequence: Option<Sequence>,
    tail: Option<Tail>,
    last_event_hz: f32,
    ambient_env: f32,
    ambient_hz: f32,
    /// What the buzzer is emitting right now
    output: Option<Tone>,
    stats: AudioStats,
}

impl ToneSynth {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            sequence: None,
            tail: None,
            last_event_hz: 0.0,
            ambient_env: 0.0,
            ambient_hz: 0.0,
            output: None,
            stats: AudioStats::default(),
        }
    }

    /// A step sequence is playing
    pub fn busy(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn output(&self) -> Option<Tone> {
        self.output
    }

    pub fn stats(&self) -> AudioStats {
        self.stats
    }

    fn emit(&mut self, t: Tone) {
        self.output = Some(t);
        self.stats.tones += 1;
        log::trace!("tone {} Hz for {} ms", t.hz, t.ms);
    }

    fn start_sequence(&mut self, cue: SoundCue, steps: &'static [Step], tail_ms: u32, now: Millis) {
        if self.busy() {
            self.stats.dropped += 1;
            return;
        }
        self.sequence = Some(Sequence {
            cue,
            steps,
            step: 0,
            next_ms: now,
            tail_ms,
        });
        self.tail = None;
    }

    fn set_tail(&mut self, hz: f32, now: Millis, ms: u32) {
        self.tail = Some(Tail {
            hz,
            start_ms: now,
            until_ms: now.wrapping_add(ms),
        });
    }

    fn advance_sequence(&mut self, now: Millis) {
        let Some(mut seq) = self.sequence else {
            return;
        };
        if is_before(now, seq.next_ms) {
            return;
        }
        match seq.steps.get(seq.step) {
            Some(&(t, gap)) => {
                self.emit(t);
                self.last_event_hz = t.hz as f32;
                seq.step += 1;
                seq.next_ms = now.wrapping_add(gap);
                self.sequence = Some(seq);
            }
            None => {
                self.output = None;
                self.sequence = None;
                self.set_tail(self.last_event_hz, now, seq.tail_ms);
            }
        }
    }

    fn update_ambient(&mut self, now: Millis, dt: f32, feed: &AmbientFeed) {
        let tail_active = self.tail.is_some_and(|t| is_before(now, t.until_ms));
        let env_target = if feed.wing_speed > 0.05 || tail_active { 1.0 } else { 0.0 };
        let env_rate = if env_target > self.ambient_env { 8.0 } else { 4.0 };
        self.ambient_env += (env_target - self.ambient_env) * (env_rate * dt).clamp(0.0, 1.0);

        // Small per-4ms jitter keeps the buzz from sounding like a pure tone
        let jitter = ((hash32((now >> 2).wrapping_add(0x5f37_59df)) & 0x7) as f32 - 3.0) * 2.2;
        let mut target = AMBIENT_BASE_HZ + feed.wing_speed * AMBIENT_SPEED_HZ + jitter;

        if let Some(t) = self.tail.filter(|_| tail_active) {
            let span = age(t.until_ms, t.start_ms).max(1) as f32;
            let k = (age(now, t.start_ms) as f32 / span).clamp(0.0, 1.0);
            let blend = k * k;
            target = t.hz * (1.0 - blend) + target * blend;
        }

        self.ambient_hz += (target - self.ambient_hz) * (10.0 * dt).clamp(0.0, 1.0);

        if self.ambient_env > AMBIENT_GATE {
            let hz = self.ambient_hz.clamp(AMBIENT_MIN_HZ, AMBIENT_MAX_HZ) as u16;
            self.output = Some(tone(hz, 0));
        } else {
            self.output = None;
        }
    }
}

impl AudioSink for ToneSynth {
    fn play(&mut self, cue: SoundCue, now: Millis) {
        if self.volume <= 0.0 {
            return;
        }
        self.stats.cues += 1;
        log::debug!("cue {cue:?}");
        match cue {
            SoundCue::Click => self.start_sequence(cue, CLICK_STEPS, CLICK_TAIL_MS, now),
            SoundCue::RadarPing => match self.sequence.as_mut() {
                // The press click and its ping share one sequence
                Some(seq) if seq.cue == SoundCue::Click => {
                    seq.cue = cue;
                    seq.steps = CLICK_RADAR_STEPS;
                    seq.tail_ms = RADAR_TAIL_MS;
                }
                _ => self.start_sequence(cue, RADAR_STEPS, RADAR_TAIL_MS, now),
            },
            SoundCue::PollenChirp => self.start_sequence(cue, CHIRP_STEPS, CHIRP_TAIL_MS, now),
            SoundCue::Unload { hz, ms } => {
                self.last_event_hz = hz as f32;
                self.emit(tone(hz, ms));
            }
            SoundCue::Tail { hz, ms } => self.set_tail(hz as f32, now, ms),
        }
    }

    fn update(&mut self, now: Millis, dt: f32, ambient: Option<&AmbientFeed>) {
        if self.volume <= 0.0 {
            return;
        }
        self.advance_sequence(now);
        if self.tail.is_some_and(|t| has_reached(now, t.until_ms)) {
            self.tail = None;
        }
        if self.busy() {
            return;
        }
        if let Some(feed) = ambient {
            self.update_ambient(now, dt, feed);
        }
    }

    fn stop_all(&mut self) {
        self.output = None;
        self.sequence = None;
        self.tail = None;
        self.ambient_env = 0.0;
        self.ambient_hz = 0.0;
        self.last_event_hz = 0.0;
        self.stats.stops += 1;
    }
}
