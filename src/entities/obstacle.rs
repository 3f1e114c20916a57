use super::{Entity, scroll_left};
use crate::sprites::{SpriteName, SpriteRegion};
use crate::surface::Surface;
use crate::util::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleSize {
    Small,
    Large,
}

impl ObstacleSize {
    pub fn sprite(self) -> SpriteName {
        match self {
            ObstacleSize::Small => SpriteName::ObstacleSmall,
            ObstacleSize::Large => SpriteName::ObstacleLarge,
        }
    }
}

/// A ground obstacle. Its size comes straight from its atlas region and it
/// rests on the ground line it was spawned with.
#[derive(Clone, Debug)]
pub struct Obstacle {
    sprite: SpriteRegion,
    rect: Rect,
    removed: bool,
}

impl Obstacle {
    pub fn new(sprite: SpriteRegion, x: f64, ground_line: f64) -> Self {
        let rect = Rect::new(x, ground_line - sprite.height, sprite.width, sprite.height);
        Self { sprite, rect, removed: false }
    }
}

impl Entity for Obstacle {
    fn update(&mut self, frames: f64, speed: f64) {
        if scroll_left(&mut self.rect, speed * frames) {
            self.removed = true;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.blit(&self.sprite, self.rect);
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_removed(&self) -> bool {
        self.removed
    }
}
