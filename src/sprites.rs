//! Sprite atlas table. Every sprite lives in one shared bitmap; this module
//! maps logical names to their sub-rectangles and loads the bitmap.

use std::collections::HashMap;
use std::fmt;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteName {
    Player,
    PlayerDuck,
    Cloud,
    Horizon,
    ObstacleSmall,
    ObstacleLarge,
}

impl SpriteName {
    pub const ALL: [SpriteName; 6] = [
        SpriteName::Player,
        SpriteName::PlayerDuck,
        SpriteName::Cloud,
        SpriteName::Horizon,
        SpriteName::ObstacleSmall,
        SpriteName::ObstacleLarge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpriteName::Player => "Player",
            SpriteName::PlayerDuck => "PlayerDuck",
            SpriteName::Cloud => "Cloud",
            SpriteName::Horizon => "Horizon",
            SpriteName::ObstacleSmall => "ObstacleSmall",
            SpriteName::ObstacleLarge => "ObstacleLarge",
        }
    }

    pub fn parse(name: &str) -> Option<SpriteName> {
        Self::ALL.into_iter().find(|n| n.as_str() == name)
    }
}

impl fmt::Display for SpriteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source rectangle inside the atlas, in atlas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SpriteRegion {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

const SPRITE_TABLE: [(SpriteName, SpriteRegion); 6] = [
    (SpriteName::Player, SpriteRegion::new(1338.0, 2.0, 44.0, 47.0)),
    (SpriteName::PlayerDuck, SpriteRegion::new(1338.0, 49.0, 44.0, 47.0)),
    (SpriteName::Cloud, SpriteRegion::new(86.0, 2.0, 46.0, 14.0)),
    (SpriteName::Horizon, SpriteRegion::new(2.0, 54.0, 1200.0, 12.0)),
    (SpriteName::ObstacleSmall, SpriteRegion::new(228.0, 2.0, 17.0, 35.0)),
    (SpriteName::ObstacleLarge, SpriteRegion::new(332.0, 2.0, 25.0, 50.0)),
];

/// Immutable name → region map for one atlas.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    regions: HashMap<SpriteName, SpriteRegion>,
}

impl SpriteSheet {
    pub fn standard() -> Self {
        Self { regions: SPRITE_TABLE.into_iter().collect() }
    }

    pub fn region(&self, name: SpriteName) -> SpriteRegion {
        // The table is total over SpriteName.
        self.regions[&name]
    }

    pub fn lookup(&self, name: &str) -> Option<SpriteRegion> {
        SpriteName::parse(name).and_then(|n| self.regions.get(&n).copied())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Decoded atlas bitmap plus its region table.
pub struct LoadedAtlas {
    pub image: HtmlImageElement,
    pub sheet: SpriteSheet,
}

/// Starts decoding the atlas at `src`; `on_done` runs once with either the
/// populated sheet or the load error. Only one of the two image callbacks
/// can fire, so `on_done` is shared between them and taken on first use.
pub fn load_atlas<F>(src: &str, on_done: F) -> Result<(), GameError>
where
    F: FnOnce(Result<LoadedAtlas, GameError>) + 'static,
{
    let image = HtmlImageElement::new()?;
    let done = std::rc::Rc::new(std::cell::RefCell::new(Some(on_done)));

    let on_load = {
        let done = done.clone();
        let image = image.clone();
        Closure::once_into_js(move || {
            image.set_onload(None);
            image.set_onerror(None);
            if let Some(cb) = done.borrow_mut().take() {
                log::info!("sprite atlas decoded ({}x{})", image.natural_width(), image.natural_height());
                cb(Ok(LoadedAtlas { image, sheet: SpriteSheet::standard() }));
            }
        })
    };
    let on_error = {
        let src = src.to_string();
        let image = image.clone();
        Closure::once_into_js(move |_evt: JsValue| {
            image.set_onload(None);
            image.set_onerror(None);
            if let Some(cb) = done.borrow_mut().take() {
                log::error!("sprite atlas failed to load: {src}");
                cb(Err(GameError::AtlasLoad { src }));
            }
        })
    };

    image.set_onload(Some(on_load.unchecked_ref()));
    image.set_onerror(Some(on_error.unchecked_ref()));
    image.set_src(src);
    Ok(())
}
