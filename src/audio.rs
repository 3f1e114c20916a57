//! Short sound cues. The engine fires them and never looks at the outcome:
//! browsers routinely block playback until the first user gesture, so a
//! failed play is logged and dropped.

use std::collections::HashMap;

use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    ButtonPress,
    Count,
    Crash,
    Hit,
    Score,
}

impl Cue {
    pub const ALL: [Cue; 5] = [Cue::ButtonPress, Cue::Count, Cue::Crash, Cue::Hit, Cue::Score];

    pub fn as_str(self) -> &'static str {
        match self {
            Cue::ButtonPress => "button-press",
            Cue::Count => "count",
            Cue::Crash => "crash",
            Cue::Hit => "hit",
            Cue::Score => "score",
        }
    }

    pub fn parse(name: &str) -> Option<Cue> {
        Cue::ALL.into_iter().find(|cue| cue.as_str() == name)
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("cue '{0}' was never loaded")]
    NotLoaded(&'static str),
    #[error("playback of '{cue}' rejected: {reason}")]
    Rejected { cue: &'static str, reason: String },
}

/// Output side of the player: something that can start a cue at a volume.
pub trait AudioSink {
    fn play(&mut self, cue: Cue, volume: f64) -> Result<(), AudioError>;
}

pub struct AudioPlayer {
    sink: Box<dyn AudioSink>,
    volume: f64,
    default_volume: f64,
    enabled: bool,
}

impl AudioPlayer {
    pub fn new(sink: Box<dyn AudioSink>, volume: f64) -> Self {
        let volume = volume.clamp(0.0, 1.0);
        Self { sink, volume, default_volume: volume, enabled: true }
    }

    pub fn play(&mut self, cue: Cue) {
        if !self.enabled {
            return;
        }
        if let Err(err) = self.sink.play(cue, self.volume) {
            log::warn!("audio: {err}");
        }
    }

    pub fn play_button_press(&mut self) {
        self.play(Cue::ButtonPress);
    }

    pub fn play_count(&mut self) {
        self.play(Cue::Count);
    }

    pub fn play_crash(&mut self) {
        self.play(Cue::Crash);
    }

    pub fn play_hit(&mut self) {
        self.play(Cue::Hit);
    }

    pub fn play_score(&mut self) {
        self.play(Cue::Score);
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Clamped to `[0, 1]`; NaN is treated as silence.
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
    }

    pub fn mute(&mut self) {
        self.set_volume(0.0);
    }

    pub fn unmute(&mut self) {
        self.set_volume(self.default_volume);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Browser sink backed by one preloaded `<audio>` element per cue.
pub struct HtmlAudioSink {
    elements: HashMap<Cue, HtmlAudioElement>,
    // Shared rejection handler for play() promises; kept alive with the sink.
    on_rejected: Closure<dyn FnMut(JsValue)>,
}

impl HtmlAudioSink {
    /// Creates one element per `(cue, src)` pair; cues left out stay
    /// unloaded and report `NotLoaded` when played.
    pub fn preload<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (Cue, String)>,
    {
        let mut elements = HashMap::new();
        for (cue, src) in sources {
            match HtmlAudioElement::new_with_src(&src) {
                Ok(el) => {
                    el.set_preload("auto");
                    elements.insert(cue, el);
                }
                Err(e) => log::warn!("audio: cannot create element for {src}: {e:?}"),
            }
        }
        let on_rejected = Closure::wrap(Box::new(|reason: JsValue| {
            log::warn!("audio: playback blocked: {reason:?}");
        }) as Box<dyn FnMut(JsValue)>);
        Self { elements, on_rejected }
    }
}

impl AudioSink for HtmlAudioSink {
    fn play(&mut self, cue: Cue, volume: f64) -> Result<(), AudioError> {
        let el = self.elements.get(&cue).ok_or(AudioError::NotLoaded(cue.as_str()))?;
        el.set_current_time(0.0);
        el.set_volume(volume);
        let promise = el.play().map_err(|e| AudioError::Rejected {
            cue: cue.as_str(),
            reason: format!("{e:?}"),
        })?;
        let _ = promise.catch(&self.on_rejected);
        Ok(())
    }
}
