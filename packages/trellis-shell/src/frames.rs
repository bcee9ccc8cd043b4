use std::cell::RefCell;
use std::rc::Rc;

use web_time::Instant;

use crate::{ShellError, Windows};

/// A callback run once on the next animation frame, with the frame timestamp
/// in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(&mut Windows, f64) -> Result<(), ShellError>>;

/// Pending animation-frame callbacks, in registration order.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    pending: Rc<RefCell<Vec<FrameCallback>>>,
}

impl FrameScheduler {
    pub fn request_animation_frame(
        &self,
        callback: impl FnOnce(&mut Windows, f64) -> Result<(), ShellError> + 'static,
    ) {
        self.pending.borrow_mut().push(Box::new(callback));
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Swap out everything registered so far. Callbacks registered while the
    /// snapshot runs land in the fresh queue.
    pub(crate) fn take(&self) -> Vec<FrameCallback> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

/// Source of animation-frame timestamps.
pub trait FrameClock {
    /// Milliseconds since some fixed origin.
    fn now(&self) -> f64;
}

/// Milliseconds since the clock was created.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_swaps_the_queue() {
        let frames = FrameScheduler::default();
        let runner = frames.clone();
        frames.request_animation_frame(|_, _| Ok(()));
        frames.request_animation_frame(|_, _| Ok(()));
        assert_eq!(runner.len(), 2);

        let snapshot = runner.take();
        assert_eq!(snapshot.len(), 2);
        assert!(frames.is_empty());
    }

    #[test]
    fn monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
