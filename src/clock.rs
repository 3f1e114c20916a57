//! Frame timing. `FrameClock` turns animation-frame timestamps into deltas;
//! `FrameLoop` tracks the one pending frame request so teardown can cancel it.

/// Handle returned by the platform for a pending frame request.
pub type FrameId = i32;

/// Platform hook for display-synchronized callbacks (`requestAnimationFrame`).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Option<FrameId>;
    fn cancel_frame(&mut self, id: FrameId);
}

/// Per-frame delta in milliseconds. The first frame reports zero; large gaps are clamped.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_delta_ms: f64,
}

impl FrameClock {
    pub fn new(max_delta_ms: f64) -> Self {
        Self { last_ms: None, max_delta_ms }
    }

    pub fn delta(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_ms {
            Some(last) => (now_ms - last).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        delta
    }

}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameId>,
    stopped: bool,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler, pending: None, stopped: false }
    }

    /// Requests the first frame. No-op once stopped or while one is pending.
    pub fn start(&mut self) {
        if self.stopped || self.pending.is_some() {
            return;
        }
        self.pending = self.scheduler.request_frame();
    }

    /// Called from inside the frame callback. Returns false once stopped, in
    /// which case the callback must not touch game state.
    pub fn frame_fired(&mut self) -> bool {
        self.pending = None;
        if self.stopped {
            return false;
        }
        self.pending = self.scheduler.request_frame();
        true
    }

    /// Cancels the pending frame. Returns true only on the first call.
    pub fn stop(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.stopped = true;
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Fake {
        next: FrameId,
        requested: Vec<FrameId>,
        cancelled: Vec<FrameId>,
    }

    impl FrameScheduler for Fake {
        fn request_frame(&mut self) -> Option<FrameId> {
            self.next += 1;
            self.requested.push(self.next);
            Some(self.next)
        }

        fn cancel_frame(&mut self, id: FrameId) {
            self.cancelled.push(id);
        }
    }

    #[test]
    fn clock_starts_at_zero_and_clamps() {
        let mut clock = FrameClock::new(100.0);
        assert_eq!(clock.delta(5000.0), 0.0);
        assert_eq!(clock.delta(5016.0), 16.0);
        assert_eq!(clock.delta(9000.0), 100.0);
        assert_eq!(clock.delta(8990.0), 0.0);
    }

    #[test]
    fn loop_keeps_one_pending_frame() {
        let mut lp = FrameLoop::new(Fake::default());
        lp.start();
        lp.start();
        assert_eq!(lp.scheduler_mut().requested, vec![1]);
        assert!(lp.frame_fired());
        assert!(lp.is_active());
        assert_eq!(lp.scheduler_mut().requested, vec![1, 2]);
    }

    #[test]
    fn stop_is_idempotent_and_cancels() {
        let mut lp = FrameLoop::new(Fake::default());
        lp.start();
        assert!(lp.stop());
        assert!(!lp.stop());
        assert!(!lp.is_active());
        assert_eq!(lp.scheduler_mut().cancelled, vec![1]);
        assert!(!lp.frame_fired());
        lp.start();
        assert!(!lp.is_active());
    }
}
