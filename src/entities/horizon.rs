use super::Entity;
use crate::config::GameConfig;
use crate::sprites::SpriteRegion;
use crate::surface::Surface;
use crate::util::Rect;

/// Scrolling ground strip. The atlas region holds two tiles side by side;
/// they are drawn alternately from `x` until the canvas is covered.
#[derive(Clone, Debug)]
pub struct Horizon {
    sprite: SpriteRegion,
    tile_width: f64,
    x: f64,
    y: f64,
    view_width: f64,
    // Which of the two tiles is drawn first; flips on every wrap.
    lead: usize,
}

impl Horizon {
    pub fn new(config: &GameConfig, sprite: SpriteRegion) -> Self {
        Self {
            sprite,
            tile_width: sprite.width / 2.0,
            x: 0.0,
            y: config.height - sprite.height,
            view_width: config.width,
            lead: 0,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    fn tile_source(&self, index: usize) -> SpriteRegion {
        SpriteRegion::new(
            self.sprite.x + (index % 2) as f64 * self.tile_width,
            self.sprite.y,
            self.tile_width,
            self.sprite.height,
        )
    }
}

impl Entity for Horizon {
    fn update(&mut self, frames: f64, speed: f64) {
        self.x -= speed * frames;
        while self.x <= -self.tile_width {
            self.x += self.tile_width;
            self.lead ^= 1;
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        // Always at least two tiles so the wrap point never shows a seam.
        let tiles = ((self.view_width / self.tile_width).ceil() as usize + 1).max(2);
        for i in 0..tiles {
            let dst = Rect::new(self.x + i as f64 * self.tile_width, self.y, self.tile_width, self.sprite.height);
            surface.blit(&self.tile_source(i + self.lead), dst);
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.view_width - self.x, self.sprite.height)
    }
}
