/// Timer-accumulator behind obstacle and cloud spawning: collects elapsed
/// milliseconds and fires once the current interval is reached.
#[derive(Clone, Debug)]
pub struct SpawnTimer {
    elapsed_ms: f64,
    interval_ms: f64,
}

impl SpawnTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self { elapsed_ms: 0.0, interval_ms }
    }

    /// Returns true when the interval elapsed; the accumulator restarts at 0.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }
}
