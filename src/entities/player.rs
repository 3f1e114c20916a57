use super::Entity;
use crate::config::GameConfig;
use crate::sprites::SpriteRegion;
use crate::surface::Surface;
use crate::util::Rect;

/// The runner. x is fixed; only y moves, driven by jump physics.
#[derive(Clone, Debug)]
pub struct Player {
    x: f64,
    y: f64,
    ground_y: f64,
    velocity: f64,
    jumping: bool,
    ducking: bool,
    width: f64,
    height: f64,
    gravity: f64,
    jump_velocity: f64,
    stand_sprite: SpriteRegion,
    duck_sprite: SpriteRegion,
}

impl Player {
    pub fn new(config: &GameConfig, stand_sprite: SpriteRegion, duck_sprite: SpriteRegion) -> Self {
        let width = stand_sprite.width;
        let height = stand_sprite.height;
        let ground_y = config.height - height - config.bottom_pad;
        Self {
            x: config.player_x,
            y: ground_y,
            ground_y,
            velocity: 0.0,
            jumping: false,
            ducking: false,
            width,
            height,
            gravity: config.gravity,
            jump_velocity: config.initial_jump_velocity,
            stand_sprite,
            duck_sprite,
        }
    }

    /// Applies the upward impulse unless already airborne.
    pub fn jump(&mut self) {
        if !self.jumping {
            self.jumping = true;
            self.velocity = -self.jump_velocity;
        }
    }

    // Recorded even mid-air; only the grounded sprite changes.
    pub fn duck(&mut self) {
        self.ducking = true;
    }

    pub fn stand(&mut self) {
        self.ducking = false;
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_ducking(&self) -> bool {
        self.ducking
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn ground_y(&self) -> f64 {
        self.ground_y
    }
}

impl Entity for Player {
    fn update(&mut self, frames: f64, _speed: f64) {
        if !self.jumping {
            return;
        }
        self.y += self.velocity * frames;
        self.velocity += self.gravity * frames;
        if self.y >= self.ground_y {
            self.y = self.ground_y;
            self.jumping = false;
            self.velocity = 0.0;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let sprite = if self.ducking && !self.jumping { &self.duck_sprite } else { &self.stand_sprite };
        surface.blit(sprite, self.bounds());
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
