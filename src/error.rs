use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::config::ConfigError;

/// Failures that keep the game from starting. None of these are retried:
/// the canvas and assets are local to the page.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("canvas '{0}' not found")]
    CanvasNotFound(String),
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("failed to load sprite atlas from '{src}'")]
    AtlasLoad { src: String },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("dom call failed: {0}")]
    Dom(String),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
