//! HUD and state overlays drawn on top of the world.

use super::{Engine, GameState};
use crate::surface::{Surface, TextAlign, TextStyle};
use crate::util::{Rect, format_distance, format_time};

const HUD: TextStyle = TextStyle { font: "16px Arial", color: "#535353", align: TextAlign::Left };
const TITLE: TextStyle = TextStyle { font: "24px Arial", color: "#ffffff", align: TextAlign::Center };
const BODY: TextStyle = TextStyle { font: "16px Arial", color: "#ffffff", align: TextAlign::Center };
const HINT: TextStyle = TextStyle { font: "16px Arial", color: "#535353", align: TextAlign::Center };

pub(super) fn draw(engine: &Engine, surface: &mut dyn Surface) {
    let lines = [
        format!("Score: {}", engine.score()),
        format!("High Score: {}", engine.high_score()),
        format!("Time: {}", format_time((engine.elapsed_ms() / 1000.0) as u64)),
        format!("Speed: {}", engine.speed().floor() as u64),
    ];
    for (i, line) in lines.iter().enumerate() {
        surface.fill_text(line, 20.0, 30.0 + 20.0 * i as f64, HUD);
    }

    let (cx, cy) = (surface.width() / 2.0, surface.height() / 2.0);
    match engine.state() {
        GameState::Crashed => {
            surface.fill_rect(Rect::new(0.0, 0.0, surface.width(), surface.height()), "rgba(0, 0, 0, 0.7)");
            surface.fill_text("GAME OVER", cx, cy - 20.0, TITLE);
            let summary = format!("Score: {} ({})", engine.score(), format_distance(engine.distance()));
            surface.fill_text(&summary, cx, cy + 10.0, BODY);
            surface.fill_text("Press R to restart", cx, cy + 40.0, BODY);
        }
        GameState::Paused => surface.fill_text("PAUSED", cx, cy, HINT),
        GameState::Waiting => surface.fill_text("Press SPACE to start", cx, cy, HINT),
        GameState::Running => {}
    }
}
