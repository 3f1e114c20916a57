//! Runner engine: owns the state machine, every live entity, the spawn
//! schedulers and score/speed progression. One `update` per animation frame
//! while running; `render` every frame regardless of state.
//!
//! The engine knows nothing about the DOM. Drawing goes through `Surface`,
//! sound through `AudioPlayer`, and platform teardown (frame loop, input
//! listeners) is registered with `on_destroy` by whoever embeds it.

mod hud;
mod spawn;
mod state;

pub use spawn::SpawnTimer;
pub use state::GameState;

use crate::audio::AudioPlayer;
use crate::config::GameConfig;
use crate::entities::{Cloud, Entity, Horizon, Obstacle, ObstacleSize, Player};
use crate::input::Command;
use crate::sprites::{SpriteName, SpriteSheet};
use crate::surface::Surface;
use crate::util::{Rect, Rng, check_collision};

const BACKGROUND: &str = "#f7f7f7";

pub struct Engine {
    config: GameConfig,
    sprites: SpriteSheet,
    audio: AudioPlayer,
    rng: Rng,

    state: GameState,
    score: u64,
    high_score: u64,
    distance: f64,
    elapsed_ms: f64,
    speed: f64,
    // Last score milestone that already played the Score cue.
    score_milestone: u64,

    player: Player,
    horizon: Horizon,
    obstacles: Vec<Obstacle>,
    clouds: Vec<Cloud>,
    obstacle_timer: SpawnTimer,
    cloud_timer: SpawnTimer,

    destroyed: bool,
    teardown: Vec<Box<dyn FnOnce()>>,
}

impl Engine {
    pub fn new(config: GameConfig, sprites: SpriteSheet, audio: AudioPlayer, rng: Rng) -> Self {
        let player = new_player(&config, &sprites);
        let horizon = Horizon::new(&config, sprites.region(SpriteName::Horizon));
        Self {
            speed: config.speed,
            obstacle_timer: SpawnTimer::new(config.obstacle_interval_ms),
            cloud_timer: SpawnTimer::new(config.cloud_interval_ms),
            config,
            sprites,
            audio,
            rng,
            state: GameState::Waiting,
            score: 0,
            high_score: 0,
            distance: 0.0,
            elapsed_ms: 0.0,
            score_milestone: 0,
            player,
            horizon,
            obstacles: Vec::new(),
            clouds: Vec::new(),
            destroyed: false,
            teardown: Vec::new(),
        }
    }

    // --- Commands -------------------------------------------------------------

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Jump => self.jump(),
            Command::Duck => self.duck(),
            Command::Stand => self.stand(),
            Command::Pause => self.pause(),
            Command::Restart => self.restart(),
        }
    }

    pub fn start(&mut self) {
        if self.destroyed || self.state != GameState::Waiting {
            return;
        }
        self.state = GameState::Running;
        self.audio.play_button_press();
        log::info!("run started");
    }

    /// While waiting, the first jump also starts the run.
    pub fn jump(&mut self) {
        if self.destroyed {
            return;
        }
        match self.state {
            GameState::Running => {
                self.player.jump();
                self.audio.play_button_press();
            }
            GameState::Waiting => {
                self.start();
                self.player.jump();
            }
            GameState::Crashed | GameState::Paused => {}
        }
    }

    pub fn duck(&mut self) {
        if !self.destroyed && self.state == GameState::Running {
            self.player.duck();
        }
    }

    pub fn stand(&mut self) {
        if !self.destroyed && self.state == GameState::Running {
            self.player.stand();
        }
    }

    pub fn pause(&mut self) {
        if self.destroyed {
            return;
        }
        self.state = match self.state {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
            other => other,
        };
    }

    /// Only a crashed run can be restarted. The high score survives.
    pub fn restart(&mut self) {
        if self.destroyed || self.state != GameState::Crashed {
            return;
        }
        self.state = GameState::Waiting;
        self.score = 0;
        self.distance = 0.0;
        self.elapsed_ms = 0.0;
        self.speed = self.config.speed;
        self.score_milestone = 0;
        self.player = new_player(&self.config, &self.sprites);
        self.horizon = Horizon::new(&self.config, self.sprites.region(SpriteName::Horizon));
        self.obstacles.clear();
        self.clouds.clear();
        self.obstacle_timer = SpawnTimer::new(self.config.obstacle_interval_ms);
        self.cloud_timer = SpawnTimer::new(self.config.cloud_interval_ms);
        self.audio.play_button_press();
        log::info!("restarted (high score {})", self.high_score);
    }

    /// Registers platform teardown (cancel frame loop, detach listeners).
    pub fn on_destroy<F: FnOnce() + 'static>(&mut self, hook: F) {
        if self.destroyed {
            hook();
        } else {
            self.teardown.push(Box::new(hook));
        }
    }

    /// Runs teardown hooks once. Afterwards every command, update and render
    /// is a no-op. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for hook in self.teardown.drain(..) {
            hook();
        }
        log::info!("engine destroyed");
    }

    // --- Frame ---------------------------------------------------------------

    pub fn tick(&mut self, delta_ms: f64, surface: &mut dyn Surface) {
        self.update(delta_ms);
        self.render(surface);
    }

    pub fn update(&mut self, delta_ms: f64) {
        if self.destroyed || self.state != GameState::Running {
            return;
        }
        let frames = self.config.frames(delta_ms);
        let speed = self.speed;

        self.player.update(frames, speed);
        self.horizon.update(frames, speed);
        for obstacle in &mut self.obstacles {
            obstacle.update(frames, speed);
        }
        self.obstacles.retain(|o| !o.is_removed());
        for cloud in &mut self.clouds {
            cloud.update(frames, speed);
        }
        self.clouds.retain(|c| !c.is_removed());

        self.advance_progress(delta_ms, frames);

        if self.check_collisions() {
            self.crash();
            return;
        }

        if self.obstacle_timer.advance(delta_ms) {
            self.spawn_obstacle();
        }
        if self.cloud_timer.advance(delta_ms) {
            self.spawn_cloud();
        }
    }

    fn advance_progress(&mut self, delta_ms: f64, frames: f64) {
        self.elapsed_ms += delta_ms;
        self.distance += self.speed * frames;
        self.speed = (self.speed + self.config.acceleration * frames).min(self.config.max_speed);
        self.score = (self.distance / 10.0).floor() as u64;

        let interval = self.config.score_cue_interval;
        if interval > 0 && self.score / interval > self.score_milestone {
            self.score_milestone = self.score / interval;
            self.audio.play_score();
        }
    }

    fn check_collisions(&self) -> bool {
        let player = self.player.bounds();
        self.obstacles.iter().any(|o| check_collision(&player, &o.bounds()))
    }

    fn crash(&mut self) {
        self.state = GameState::Crashed;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.audio.play_crash();
        log::info!("crashed at score {} (high {})", self.score, self.high_score);
    }

    fn spawn_obstacle(&mut self) {
        let size = if self.rng.coin_flip() { ObstacleSize::Small } else { ObstacleSize::Large };
        let x = self.config.width + self.config.spawn_offset;
        let ground_line = self.config.height - self.config.bottom_pad;
        self.obstacles.push(Obstacle::new(self.sprites.region(size.sprite()), x, ground_line));

        let next = (self.config.obstacle_interval_ms - self.speed * self.config.obstacle_interval_speed_factor)
            .max(self.config.min_obstacle_interval_ms);
        self.obstacle_timer.set_interval(next);
        log::debug!("spawned {size:?} obstacle, next in {next:.0}ms");
    }

    fn spawn_cloud(&mut self) {
        if self.clouds.len() < self.config.max_clouds {
            let y = self.rng.range(self.config.cloud_min_y as i64, self.config.cloud_max_y as i64) as f64;
            let x = self.config.width + self.config.spawn_offset;
            self.clouds.push(Cloud::new(self.sprites.region(SpriteName::Cloud), x, y, self.config.bg_cloud_speed));
        }
        let next = self
            .rng
            .range(self.config.min_cloud_interval_ms as i64, self.config.max_cloud_interval_ms as i64);
        self.cloud_timer.set_interval(next as f64);
    }

    /// Back to front: background, ground, clouds, obstacles, player, HUD.
    pub fn render(&self, surface: &mut dyn Surface) {
        if self.destroyed {
            return;
        }
        surface.clear();
        surface.fill_rect(Rect::new(0.0, 0.0, surface.width(), surface.height()), BACKGROUND);
        self.horizon.draw(surface);
        for cloud in &self.clouds {
            cloud.draw(surface);
        }
        for obstacle in &self.obstacles {
            obstacle.draw(surface);
        }
        self.player.draw(surface);
        hud::draw(self, surface);
    }

    // --- Accessors -----------------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn obstacle_interval_ms(&self) -> f64 {
        self.obstacle_timer.interval_ms()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn audio_mut(&mut self) -> &mut AudioPlayer {
        &mut self.audio
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

fn new_player(config: &GameConfig, sprites: &SpriteSheet) -> Player {
    Player::new(config, sprites.region(SpriteName::Player), sprites.region(SpriteName::PlayerDuck))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioError, AudioSink, Cue};
    use crate::sprites::SpriteRegion;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct Cues(Rc<RefCell<Vec<Cue>>>);

    impl AudioSink for Cues {
        fn play(&mut self, cue: Cue, _volume: f64) -> Result<(), AudioError> {
            self.0.borrow_mut().push(cue);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Texts(Vec<String>);

    impl Surface for Texts {
        fn width(&self) -> f64 {
            600.0
        }
        fn height(&self) -> f64 {
            150.0
        }
        fn clear(&mut self) {
            self.0.clear();
        }
        fn fill_rect(&mut self, _rect: Rect, _color: &str) {}
        fn blit(&mut self, _src: &SpriteRegion, _dst: Rect) {}
        fn fill_text(&mut self, text: &str, _x: f64, _y: f64, _style: crate::surface::TextStyle) {
            self.0.push(text.to_string());
        }
    }

    fn engine() -> (Engine, Rc<RefCell<Vec<Cue>>>) {
        let cues = Rc::new(RefCell::new(Vec::new()));
        let audio = AudioPlayer::new(Box::new(Cues(cues.clone())), 0.1);
        (Engine::new(GameConfig::default(), SpriteSheet::standard(), audio, Rng::new(7)), cues)
    }

    fn obstacle_on_player(engine: &Engine) -> Obstacle {
        let p = engine.player.bounds();
        let sprite = engine.sprites.region(SpriteName::ObstacleSmall);
        Obstacle::new(sprite, p.x + 10.0, p.bottom())
    }

    #[test]
    fn crash_then_restart_preserves_high_score() {
        let (mut e, cues) = engine();
        e.start();
        e.high_score = 30;
        e.distance = 500.0;
        e.speed = 9.0;
        e.elapsed_ms = 12_000.0;
        e.obstacles.push(obstacle_on_player(&e));
        e.update(0.0);
        assert_eq!(e.state(), GameState::Crashed);
        assert_eq!(e.score(), 50);
        assert_eq!(e.high_score(), 50);
        assert_eq!(cues.borrow().last(), Some(&Cue::Crash));

        e.restart();
        assert_eq!(e.state(), GameState::Waiting);
        assert_eq!(e.score(), 0);
        assert_eq!(e.distance(), 0.0);
        assert_eq!(e.elapsed_ms(), 0.0);
        assert_eq!(e.speed(), e.config().speed);
        assert_eq!(e.high_score(), 50);
        assert!(e.obstacles().is_empty());
        assert!(e.clouds().is_empty());
        assert_eq!(cues.borrow().last(), Some(&Cue::ButtonPress));
    }

    #[test]
    fn lower_score_keeps_previous_high_score() {
        let (mut e, _) = engine();
        e.start();
        e.high_score = 80;
        e.distance = 200.0;
        e.obstacles.push(obstacle_on_player(&e));
        e.update(0.0);
        assert_eq!(e.state(), GameState::Crashed);
        assert_eq!(e.high_score(), 80);
    }

    #[test]
    fn crash_stops_spawning_for_that_frame() {
        let (mut e, _) = engine();
        e.start();
        e.obstacles.push(obstacle_on_player(&e));
        // Would fire on this very frame if the update continued past the crash.
        e.obstacle_timer = SpawnTimer::new(0.0);
        e.update(0.0);
        e.update(100.0);
        assert_eq!(e.state(), GameState::Crashed);
        assert_eq!(e.obstacles().len(), 1);
    }

    #[test]
    fn jumping_player_clears_obstacle() {
        let (mut e, _) = engine();
        e.start();
        e.player.jump();
        for _ in 0..8 {
            e.update(e.config.frame_ms());
        }
        // Airborne by now: an obstacle under the player no longer overlaps.
        let sprite = e.sprites.region(SpriteName::ObstacleSmall);
        let ground_line = e.config.height - e.config.bottom_pad;
        e.obstacles.push(Obstacle::new(sprite, e.config.player_x, ground_line));
        e.update(0.0);
        assert_eq!(e.state(), GameState::Running);
    }

    #[test]
    fn spawn_interval_shrinks_with_speed() {
        let (mut e, _) = engine();
        e.start();
        e.speed = 10.0;
        e.spawn_obstacle();
        assert_eq!(e.obstacle_interval_ms(), 1000.0);
        e.speed = 40.0;
        e.spawn_obstacle();
        assert_eq!(e.obstacle_interval_ms(), e.config.min_obstacle_interval_ms);
        let o = &e.obstacles()[0];
        assert_eq!(o.bounds().x, e.config.width + e.config.spawn_offset);
        assert_eq!(o.bounds().bottom(), e.config.height - e.config.bottom_pad);
    }

    #[test]
    fn cloud_spawns_respect_band_and_cap() {
        let (mut e, _) = engine();
        for _ in 0..20 {
            e.spawn_cloud();
            let next = e.cloud_timer.interval_ms();
            assert!((2000.0..=5000.0).contains(&next));
        }
        assert_eq!(e.clouds().len(), e.config.max_clouds);
        for c in e.clouds() {
            assert!((20.0..=80.0).contains(&c.bounds().y));
        }
    }

    #[test]
    fn score_cue_plays_on_milestones() {
        let (mut e, cues) = engine();
        e.start();
        e.distance = 995.0;
        e.update(e.config.frame_ms());
        assert_eq!(e.score(), 100);
        assert_eq!(cues.borrow().iter().filter(|c| **c == Cue::Score).count(), 1);
        e.update(e.config.frame_ms());
        assert_eq!(cues.borrow().iter().filter(|c| **c == Cue::Score).count(), 1);
    }

    #[test]
    fn destroy_runs_hooks_once_and_freezes_engine() {
        let (mut e, _) = engine();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        e.on_destroy(move || c.set(c.get() + 1));
        e.destroy();
        e.destroy();
        assert_eq!(calls.get(), 1);
        e.jump();
        assert_eq!(e.state(), GameState::Waiting);

        let late = Rc::new(Cell::new(false));
        let l = late.clone();
        e.on_destroy(move || l.set(true));
        assert!(late.get());
    }

    #[test]
    fn overlays_follow_state() {
        let (mut e, _) = engine();
        let mut s = Texts::default();
        e.render(&mut s);
        assert!(s.0.iter().any(|t| t == "Press SPACE to start"));
        assert!(s.0.iter().any(|t| t == "Time: 00:00"));

        e.start();
        e.pause();
        e.render(&mut s);
        assert!(s.0.iter().any(|t| t == "PAUSED"));

        e.pause();
        e.distance = 1234.0;
        e.obstacles.push(obstacle_on_player(&e));
        e.update(0.0);
        e.render(&mut s);
        assert!(s.0.iter().any(|t| t == "GAME OVER"));
        assert!(s.0.iter().any(|t| t == "Score: 123 (123m)"));
        assert!(s.0.iter().any(|t| t == "High Score: 123"));
    }
}
