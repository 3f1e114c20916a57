//! World entities. Each one owns its own position state, advances itself
//! from elapsed frames and the world scroll speed, and draws itself onto a
//! `Surface`. Entities never see each other; the engine does all
//! cross-entity work (collision, removal).

mod cloud;
mod horizon;
mod obstacle;
mod player;

pub use cloud::Cloud;
pub use horizon::Horizon;
pub use obstacle::{Obstacle, ObstacleSize};
pub use player::Player;

use crate::surface::Surface;
use crate::util::Rect;

/// Capability shared by everything the engine updates and draws.
pub trait Entity {
    /// Advance by `frames` frame units while the world scrolls at `speed`
    /// pixels per frame.
    fn update(&mut self, frames: f64, speed: f64);
    fn draw(&self, surface: &mut dyn Surface);
    fn bounds(&self) -> Rect;
    /// Set once the entity has scrolled fully past the left edge.
    fn is_removed(&self) -> bool {
        false
    }
}

/// Shared left-scroll step for obstacles and clouds.
fn scroll_left(bounds: &mut Rect, distance: f64) -> bool {
    bounds.x -= distance;
    bounds.right() < 0.0
}
