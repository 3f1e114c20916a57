use std::fmt;

/// Top-level game state. Legal transitions:
/// Waiting → Running, Running ⇄ Paused, Running → Crashed, Crashed → Waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Waiting,
    Running,
    Crashed,
    Paused,
}

impl GameState {
    pub fn as_str(self) -> &'static str {
        match self {
            GameState::Waiting => "WAITING",
            GameState::Running => "RUNNING",
            GameState::Crashed => "CRASHED",
            GameState::Paused => "PAUSED",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
