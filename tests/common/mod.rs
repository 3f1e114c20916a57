// Shared native test doubles: a surface that records draw calls and an audio
// sink that records cues, plus an engine builder wired to both.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use festive_runner::sprites::SpriteRegion;
use festive_runner::{
    AudioError, AudioPlayer, AudioSink, Cue, Engine, GameConfig, Rect, Rng, SpriteSheet, Surface, TextStyle,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear,
    Fill(Rect, String),
    Blit(SpriteRegion, Rect),
    Text(String),
}

pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new(config: &GameConfig) -> Self {
        Self { width: config.width, height: config.height, ops: Vec::new() }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn blits(&self) -> Vec<SpriteRegion> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Blit(src, _) => Some(*src),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(Op::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(Op::Fill(rect, color.to_string()));
    }

    fn blit(&mut self, src: &SpriteRegion, dst: Rect) {
        self.ops.push(Op::Blit(*src, dst));
    }

    fn fill_text(&mut self, text: &str, _x: f64, _y: f64, _style: TextStyle) {
        self.ops.push(Op::Text(text.to_string()));
    }
}

pub type CueLog = Rc<RefCell<Vec<Cue>>>;

pub struct RecordingSink(pub CueLog);

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: Cue, _volume: f64) -> Result<(), AudioError> {
        self.0.borrow_mut().push(cue);
        Ok(())
    }
}

pub fn engine_with(config: GameConfig, seed: u64) -> (Engine, CueLog) {
    let cues: CueLog = Rc::new(RefCell::new(Vec::new()));
    let audio = AudioPlayer::new(Box::new(RecordingSink(cues.clone())), config.audio_volume);
    (Engine::new(config, SpriteSheet::standard(), audio, Rng::new(seed)), cues)
}

pub fn engine() -> (Engine, CueLog) {
    engine_with(GameConfig::default(), 42)
}

/// Config with spawning pushed out of reach so a run never crashes.
pub fn empty_world() -> GameConfig {
    GameConfig { obstacle_interval_ms: 1.0e12, min_obstacle_interval_ms: 1.0e12, ..GameConfig::default() }
}

pub const FRAME_MS: f64 = 1000.0 / 60.0;
