//! Small helpers shared by the engine and entities: rectangles, overlap test,
//! HUD formatting and the spawn RNG.

/// Axis-aligned rectangle in canvas pixels (top-left origin).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Strict overlap on both axes; touching edges do not count.
pub fn check_collision(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Whole seconds as `mm:ss`. Minutes keep growing past 99.
pub fn format_time(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Distance in world units shown as meters (10 units per meter).
pub fn format_distance(distance: f64) -> String {
    format!("{}m", (distance / 10.0).floor().max(0.0) as u64)
}

/// xorshift64 generator. Deterministic for a given seed so the spawn
/// schedule can be replayed in tests.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed } }
    }

    /// Seed from the platform entropy source, falling back to the page clock.
    pub fn from_entropy() -> Self {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return Self::new(u64::from_le_bytes(buf));
            }
            log::warn!("entropy source unavailable, seeding from clock");
        }
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        // LCG mix so nearby clock readings diverge.
        Self::new((now as u64).wrapping_mul(1664525).wrapping_add(1013904223))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[min, max]` (inclusive on both ends).
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        // A full-width range overflows span + 1; every u64 offset is then valid.
        let span = max.wrapping_sub(min) as u64;
        let offset = match span.checked_add(1) {
            Some(n) => self.next_u64() % n,
            None => self.next_u64(),
        };
        min.wrapping_add(offset as i64)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.range(0, 1) == 0
    }
}
