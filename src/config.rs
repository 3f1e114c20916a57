//! Tuning constants for the runner. A `GameConfig` is built once (defaults or
//! the site's static JSON file), validated, and then handed by value or
//! reference to every component at construction. Nothing mutates it later.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::audio::Cue;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "serde_json")]
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("max_speed {max} is below starting speed {start}")]
    MaxSpeedBelowStart { start: f64, max: f64 },
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange { field: &'static str, min: f64, max: f64 },
    #[error("audio_volume {0} is outside [0, 1]")]
    VolumeOutOfRange(f64),
    #[error("cloud band {min}..{max} is outside the canvas (0..{height})")]
    CloudBandOutsideCanvas { min: f64, max: f64, height: f64 },
    #[error("unknown audio cue '{0}'")]
    UnknownCue(String),
}

/// Speeds are pixels per frame at `fps`; gravity and acceleration are per
/// frame; intervals and timers are milliseconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub width: f64,
    pub height: f64,
    pub fps: f64,

    pub speed: f64,
    pub max_speed: f64,
    pub acceleration: f64,

    pub gravity: f64,
    pub initial_jump_velocity: f64,
    pub bottom_pad: f64,
    pub player_x: f64,

    /// Parallax coefficient applied to cloud scroll.
    pub bg_cloud_speed: f64,

    pub obstacle_interval_ms: f64,
    pub min_obstacle_interval_ms: f64,
    /// Milliseconds shaved off the obstacle interval per unit of speed.
    pub obstacle_interval_speed_factor: f64,
    /// Spawned entities start this far past the right edge.
    pub spawn_offset: f64,

    pub cloud_interval_ms: f64,
    pub min_cloud_interval_ms: f64,
    pub max_cloud_interval_ms: f64,
    pub cloud_min_y: f64,
    pub cloud_max_y: f64,
    pub max_clouds: usize,

    pub audio_volume: f64,
    /// Directory holding `<cue>.wav`, relative to the page.
    pub audio_dir: String,
    /// Per-cue source overrides keyed by cue name (`"crash"`), typically
    /// data URLs so the page needs no audio files at all.
    pub cue_sources: BTreeMap<String, String>,
    pub min_swipe_distance: f64,
    /// Score points between two Score cues; 0 disables the cue.
    pub score_cue_interval: u64,
    /// Upper bound on one frame's delta (backgrounded tabs).
    pub max_frame_delta_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 150.0,
            fps: 60.0,
            speed: 6.0,
            max_speed: 12.0,
            acceleration: 0.001,
            gravity: 0.6,
            initial_jump_velocity: 10.0,
            bottom_pad: 10.0,
            player_x: 50.0,
            bg_cloud_speed: 0.2,
            obstacle_interval_ms: 1500.0,
            min_obstacle_interval_ms: 500.0,
            obstacle_interval_speed_factor: 50.0,
            spawn_offset: 50.0,
            cloud_interval_ms: 3000.0,
            min_cloud_interval_ms: 2000.0,
            max_cloud_interval_ms: 5000.0,
            cloud_min_y: 20.0,
            cloud_max_y: 80.0,
            max_clouds: 6,
            audio_volume: 0.1,
            audio_dir: "assets/audio".to_string(),
            cue_sources: BTreeMap::new(),
            min_swipe_distance: 30.0,
            score_cue_interval: 100,
            max_frame_delta_ms: 100.0,
        }
    }
}

impl GameConfig {
    /// Parse the site's config file. Missing keys keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("fps", self.fps),
            ("speed", self.speed),
            ("gravity", self.gravity),
            ("initial_jump_velocity", self.initial_jump_velocity),
            ("obstacle_interval_ms", self.obstacle_interval_ms),
            ("min_obstacle_interval_ms", self.min_obstacle_interval_ms),
            ("cloud_interval_ms", self.cloud_interval_ms),
            ("min_cloud_interval_ms", self.min_cloud_interval_ms),
            ("max_frame_delta_ms", self.max_frame_delta_ms),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.max_speed < self.speed {
            return Err(ConfigError::MaxSpeedBelowStart { start: self.speed, max: self.max_speed });
        }
        if self.min_cloud_interval_ms > self.max_cloud_interval_ms {
            return Err(ConfigError::InvertedRange {
                field: "cloud_interval",
                min: self.min_cloud_interval_ms,
                max: self.max_cloud_interval_ms,
            });
        }
        if self.cloud_min_y > self.cloud_max_y {
            return Err(ConfigError::InvertedRange {
                field: "cloud_y",
                min: self.cloud_min_y,
                max: self.cloud_max_y,
            });
        }
        let band_on_canvas = |y: f64| y.is_finite() && (0.0..=self.height).contains(&y);
        if !band_on_canvas(self.cloud_min_y) || !band_on_canvas(self.cloud_max_y) {
            return Err(ConfigError::CloudBandOutsideCanvas {
                min: self.cloud_min_y,
                max: self.cloud_max_y,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.audio_volume) {
            return Err(ConfigError::VolumeOutOfRange(self.audio_volume));
        }
        if let Some(name) = self.cue_sources.keys().find(|name| Cue::parse(name).is_none()) {
            return Err(ConfigError::UnknownCue(name.clone()));
        }
        Ok(())
    }

    /// Source for every cue: the override if one is set, otherwise the
    /// `.wav` file under `audio_dir`.
    pub fn audio_sources(&self) -> Vec<(Cue, String)> {
        Cue::ALL
            .into_iter()
            .map(|cue| {
                let src = match self.cue_sources.get(cue.as_str()) {
                    Some(src) => src.clone(),
                    None => format!("{}/{}.wav", self.audio_dir.trim_end_matches('/'), cue.as_str()),
                };
                (cue, src)
            })
            .collect()
    }

    /// Nominal duration of one frame in milliseconds.
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    /// Converts an elapsed time into frame units for motion integration.
    pub fn frames(&self, delta_ms: f64) -> f64 {
        delta_ms / self.frame_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn frames_scale_with_fps() {
        let cfg = GameConfig::default();
        assert!((cfg.frames(1000.0) - 60.0).abs() < 1e-9);
        assert!((cfg.frames(cfg.frame_ms()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_inverted_speed_bounds() {
        let cfg = GameConfig { max_speed: 3.0, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::MaxSpeedBelowStart { .. })));
    }

    #[test]
    fn rejects_zero_fps_and_bad_volume() {
        let cfg = GameConfig { fps: 0.0, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::NotPositive { field: "fps", .. })));
        let cfg = GameConfig { audio_volume: 1.5, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::VolumeOutOfRange(_))));
    }

    #[test]
    fn rejects_cloud_band_off_canvas() {
        let cfg = GameConfig { cloud_min_y: -1e19, cloud_max_y: 1e19, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::CloudBandOutsideCanvas { .. })));
        let cfg = GameConfig { cloud_max_y: f64::INFINITY, ..GameConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = GameConfig { cloud_min_y: 0.0, cloud_max_y: 150.0, ..GameConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn audio_sources_prefer_overrides() {
        let mut cfg = GameConfig { audio_dir: "sfx/".to_string(), ..GameConfig::default() };
        cfg.cue_sources.insert("crash".to_string(), "data:audio/wav;base64,UklGRg==".to_string());
        let sources = cfg.audio_sources();
        assert_eq!(sources.len(), Cue::ALL.len());
        assert!(sources.contains(&(Cue::Crash, "data:audio/wav;base64,UklGRg==".to_string())));
        assert!(sources.contains(&(Cue::ButtonPress, "sfx/button-press.wav".to_string())));
    }

    #[test]
    fn rejects_unknown_cue_override() {
        let mut cfg = GameConfig::default();
        cfg.cue_sources.insert("boing".to_string(), "boing.wav".to_string());
        assert!(matches!(cfg.validate(), Err(ConfigError::UnknownCue(name)) if name == "boing"));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn cue_sources_parse_from_json() {
        let cfg = GameConfig::from_json(r#"{ "cue_sources": { "score": "data:audio/wav;base64,AA==" } }"#).unwrap();
        assert_eq!(cfg.cue_sources.get("score").map(String::as_str), Some("data:audio/wav;base64,AA=="));
        assert_eq!(cfg.audio_dir, "assets/audio");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "max_speed": 20.0, "max_clouds": 2 }"#).unwrap();
        assert_eq!(cfg.max_speed, 20.0);
        assert_eq!(cfg.max_clouds, 2);
        assert_eq!(cfg.speed, GameConfig::default().speed);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_errors_surface() {
        assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            GameConfig::from_json(r#"{ "gravity": -1 }"#),
            Err(ConfigError::NotPositive { field: "gravity", .. })
        ));
    }
}
