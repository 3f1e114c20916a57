use super::{Entity, scroll_left};
use crate::sprites::SpriteRegion;
use crate::surface::Surface;
use crate::util::Rect;

/// Background decoration. Scrolls slower than the ground and never collides.
#[derive(Clone, Debug)]
pub struct Cloud {
    sprite: SpriteRegion,
    rect: Rect,
    parallax: f64,
    removed: bool,
}

impl Cloud {
    pub fn new(sprite: SpriteRegion, x: f64, y: f64, parallax: f64) -> Self {
        Self { sprite, rect: Rect::new(x, y, sprite.width, sprite.height), parallax, removed: false }
    }
}

impl Entity for Cloud {
    fn update(&mut self, frames: f64, speed: f64) {
        if scroll_left(&mut self.rect, speed * frames * self.parallax) {
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
