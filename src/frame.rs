//! Frame timing and scheduling
//!
//! The host hands us animation-frame timestamps in milliseconds. [`FrameClock`]
//! turns consecutive timestamps into tick units (1.0 = one 60 Hz frame), and
//! [`FrameLoop`] owns a console's registration with whatever scheduler drives
//! it, cancelling the pending frame when dropped.

use crate::consts::NOMINAL_TICK_MS;

/// Converts host timestamps into normalized tick units
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    /// Largest step handed to the simulation
    max_ticks: f32,
}

impl FrameClock {
    pub fn new(max_ticks: f32) -> Self {
        Self {
            last_ms: None,
            max_ticks,
        }
    }

    /// Elapsed tick units since the previous call. The first call returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0.0;
        };
        let ticks = ((now_ms - last) / NOMINAL_TICK_MS).max(0.0) as f32;
        if ticks > self.max_ticks {
            log::warn!(
                "frame stalled for {:.0} ms, clamping to {} ticks",
                now_ms - last,
                self.max_ticks
            );
            self.max_ticks
        } else {
            ticks
        }
    }

    /// Forget the last timestamp so the next frame starts from zero
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Host frame scheduler (requestAnimationFrame in the browser, a manual queue in tests)
pub trait FrameScheduler {
    type Handle: Copy;

    /// Run `callback` with the frame timestamp on the next frame
    fn request_frame(&mut self, callback: Box<dyn FnOnce(f64)>) -> Self::Handle;

    /// Drop a pending request
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// A console's registration with its scheduler
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    /// Register for the next frame, replacing any pending request
    pub fn schedule(&mut self, callback: Box<dyn FnOnce(f64)>) {
        self.stop();
        self.pending = Some(self.scheduler.request_frame(callback));
    }

    /// Call from inside the callback: the request has been consumed
    pub fn fired(&mut self) {
        self.pending = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending registration, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
