//! Device input → game commands. The adapter only remembers where the
//! current touch started; everything else is a direct mapping.

/// Abstract commands understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Jump,
    Duck,
    Stand,
    Pause,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowUp,
    ArrowDown,
    KeyP,
    KeyR,
}

impl Key {
    /// Maps a `KeyboardEvent.code` value; unrelated keys yield `None`.
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "Space" => Some(Key::Space),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "KeyP" => Some(Key::KeyP),
            "KeyR" => Some(Key::KeyR),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    TouchStart { x: f64, y: f64 },
    TouchMove,
    TouchEnd { x: f64, y: f64 },
    PointerDown,
    PointerUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
}

impl Gesture {
    pub fn command(self) -> Command {
        match self {
            Gesture::Tap | Gesture::SwipeUp | Gesture::SwipeRight => Command::Jump,
            Gesture::SwipeDown | Gesture::SwipeLeft => Command::Duck,
        }
    }
}

/// Classify a touch displacement (screen coordinates, y grows downward).
/// Ties between the axes count as horizontal.
pub fn classify_swipe(dx: f64, dy: f64, min_distance: f64) -> Gesture {
    if (dx * dx + dy * dy).sqrt() <= min_distance {
        return Gesture::Tap;
    }
    if dy.abs() > dx.abs() {
        if dy < 0.0 { Gesture::SwipeUp } else { Gesture::SwipeDown }
    } else if dx > 0.0 {
        Gesture::SwipeRight
    } else {
        Gesture::SwipeLeft
    }
}

#[derive(Clone, Debug)]
pub struct InputAdapter {
    min_swipe_distance: f64,
    pointer_enabled: bool,
    touch_start: Option<(f64, f64)>,
}

impl InputAdapter {
    /// `pointer_enabled` is false on mobile, where taps already arrive as
    /// touch events and a second mouse-compat event would double-jump.
    pub fn new(min_swipe_distance: f64, pointer_enabled: bool) -> Self {
        Self { min_swipe_distance, pointer_enabled, touch_start: None }
    }

    /// Returns the command to forward, if any. A `Some` means the event was
    /// consumed and its default browser action should be suppressed.
    pub fn handle(&mut self, event: InputEvent) -> Option<Command> {
        match event {
            InputEvent::KeyDown(Key::Space | Key::ArrowUp) => Some(Command::Jump),
            InputEvent::KeyDown(Key::ArrowDown) => Some(Command::Duck),
            InputEvent::KeyDown(Key::KeyP) => Some(Command::Pause),
            InputEvent::KeyDown(Key::KeyR) => Some(Command::Restart),
            InputEvent::KeyUp(Key::ArrowDown) => Some(Command::Stand),
            InputEvent::KeyUp(_) => None,
            InputEvent::TouchStart { x, y } => {
                self.touch_start = Some((x, y));
                None
            }
            InputEvent::TouchMove => None,
            InputEvent::TouchEnd { x, y } => {
                let gesture = match self.touch_start.take() {
                    Some((sx, sy)) => classify_swipe(x - sx, y - sy, self.min_swipe_distance),
                    None => Gesture::Tap,
                };
                log::trace!("touch gesture {gesture:?}");
                Some(gesture.command())
            }
            InputEvent::PointerDown if self.pointer_enabled => Some(Command::Jump),
            InputEvent::PointerDown | InputEvent::PointerUp => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_mapping() {
        let mut input = InputAdapter::new(30.0, true);
        assert_eq!(input.handle(InputEvent::KeyDown(Key::Space)), Some(Command::Jump));
        assert_eq!(input.handle(InputEvent::KeyDown(Key::ArrowUp)), Some(Command::Jump));
        assert_eq!(input.handle(InputEvent::KeyDown(Key::ArrowDown)), Some(Command::Duck));
        assert_eq!(input.handle(InputEvent::KeyUp(Key::ArrowDown)), Some(Command::Stand));
        assert_eq!(input.handle(InputEvent::KeyDown(Key::KeyP)), Some(Command::Pause));
        assert_eq!(input.handle(InputEvent::KeyDown(Key::KeyR)), Some(Command::Restart));
        assert_eq!(input.handle(InputEvent::KeyUp(Key::Space)), None);
    }

    #[test]
    fn unknown_codes_are_ignored() {
        assert_eq!(Key::from_code("KeyA"), None);
        assert_eq!(Key::from_code("ArrowDown"), Some(Key::ArrowDown));
    }

    #[test]
    fn swipe_classification() {
        assert_eq!(classify_swipe(0.0, -80.0, 30.0), Gesture::SwipeUp);
        assert_eq!(classify_swipe(5.0, 80.0, 30.0), Gesture::SwipeDown);
        assert_eq!(classify_swipe(-80.0, 10.0, 30.0), Gesture::SwipeLeft);
        assert_eq!(classify_swipe(80.0, -10.0, 30.0), Gesture::SwipeRight);
        assert_eq!(classify_swipe(40.0, 40.0, 30.0), Gesture::SwipeRight);
        assert_eq!(classify_swipe(10.0, -10.0, 30.0), Gesture::Tap);
    }

    #[test]
    fn touch_sequence_produces_commands() {
        let mut input = InputAdapter::new(30.0, false);
        assert_eq!(input.handle(InputEvent::TouchStart { x: 100.0, y: 100.0 }), None);
        assert_eq!(input.handle(InputEvent::TouchMove), None);
        assert_eq!(input.handle(InputEvent::TouchEnd { x: 100.0, y: 160.0 }), Some(Command::Duck));
        input.handle(InputEvent::TouchStart { x: 100.0, y: 100.0 });
        assert_eq!(input.handle(InputEvent::TouchEnd { x: 102.0, y: 101.0 }), Some(Command::Jump));
    }

    #[test]
    fn touch_end_without_start_is_a_tap() {
        let mut input = InputAdapter::new(30.0, false);
        assert_eq!(input.handle(InputEvent::TouchEnd { x: 500.0, y: 0.0 }), Some(Command::Jump));
    }

    #[test]
    fn pointer_only_when_enabled() {
        let mut desktop = InputAdapter::new(30.0, true);
        let mut mobile = InputAdapter::new(30.0, false);
        assert_eq!(desktop.handle(InputEvent::PointerDown), Some(Command::Jump));
        assert_eq!(desktop.handle(InputEvent::PointerUp), None);
        assert_eq!(mobile.handle(InputEvent::PointerDown), None);
    }
}
