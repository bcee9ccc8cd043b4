use trellis_traits::{Event, NativeBackend};

use crate::{
    AppConfig, FrameClock, FrameScheduler, MonotonicClock, ShellError, Window, WindowConfig,
    Windows,
};

/// What one [`App::tick`] did.
#[derive(Debug, Default)]
pub struct TickStats {
    /// Events handed to a window.
    pub events: usize,
    /// Animation-frame callbacks run.
    pub frames: usize,
    /// Windows whose batch was sent.
    pub flushed: usize,
    /// Errors that did not stop the tick.
    pub errors: Vec<ShellError>,
}

/// The run loop: owns the backend, every window, and the animation-frame
/// queue.
pub struct App {
    backend: Box<dyn NativeBackend>,
    windows: Windows,
    frames: FrameScheduler,
    /// Whether the last snapshot ran any callbacks. Sent to the backend as
    /// the poll hint.
    animating: bool,
    clock: Box<dyn FrameClock>,
}

impl App {
    pub fn new(backend: impl NativeBackend + 'static, config: AppConfig) -> Self {
        Self {
            backend: Box::new(backend),
            windows: Windows::default(),
            frames: FrameScheduler::default(),
            animating: false,
            clock: config
                .clock
                .unwrap_or_else(|| Box::new(MonotonicClock::new())),
        }
    }

    pub fn create_window(&mut self) -> Result<&mut Window, ShellError> {
        self.create_window_with(WindowConfig::default())
    }

    /// Ask the backend for a new window and register it under the returned id.
    pub fn create_window_with(&mut self, config: WindowConfig) -> Result<&mut Window, ShellError> {
        let id = self.backend.create_window()?;
        if self.windows.contains(id) {
            #[cfg(feature = "tracing")]
            tracing::error!(window = id.0, "backend reused a live window id");
            return Err(ShellError::DuplicateWindow(id));
        }

        #[cfg(feature = "tracing")]
        tracing::info!(window = id.0, "window created");

        self.windows.insert(Window::new(id, config))
    }

    pub fn windows(&self) -> &Windows {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut Windows {
        &mut self.windows
    }

    /// A handle to this app's animation-frame queue.
    pub fn frames(&self) -> FrameScheduler {
        self.frames.clone()
    }

    pub fn request_animation_frame(
        &self,
        callback: impl FnOnce(&mut Windows, f64) -> Result<(), ShellError> + 'static,
    ) {
        self.frames.request_animation_frame(callback);
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Run one iteration of the loop.
    ///
    /// A failing event poll aborts the tick and is returned. Every other
    /// failure is logged, collected in [`TickStats::errors`], and the tick
    /// carries on: a dispatch error skips the rest of this poll's events, a
    /// failing frame callback does not stop the others, and a failing flush
    /// keeps that window's batch for the next tick.
    pub fn tick(&mut self) -> Result<TickStats, ShellError> {
        let mut stats = TickStats::default();

        let events = self.backend.get_events(self.animating)?;
        self.dispatch(events, &mut stats);
        self.run_frames(&mut stats);
        self.flush_all(&mut stats);

        Ok(stats)
    }

    fn dispatch(&mut self, events: Vec<Event>, stats: &mut TickStats) {
        for event in events {
            let Event::WindowEvent { window, event } = event;
            let result = match self.windows.get_mut(window) {
                Some(target) => target.handle_event(&event),
                None => Err(ShellError::UnknownWindow(window)),
            };

            if let Err(err) = result {
                #[cfg(feature = "tracing")]
                tracing::error!(window = window.0, "event dispatch failed: {err}");
                stats.errors.push(err);
                break;
            }
            stats.events += 1;
        }
    }

    fn run_frames(&mut self, stats: &mut TickStats) {
        let snapshot = self.frames.take();
        self.animating = !snapshot.is_empty();
        if snapshot.is_empty() {
            return;
        }

        let timestamp = self.clock.now();
        for callback in snapshot {
            stats.frames += 1;
            if let Err(err) = callback(&mut self.windows, timestamp) {
                #[cfg(feature = "tracing")]
                tracing::error!("animation frame callback failed: {err}");
                stats.errors.push(err);
            }
        }
    }

    fn flush_all(&mut self, stats: &mut TickStats) {
        for window in self.windows.iter_mut() {
            match window.flush(self.backend.as_mut()) {
                Ok(true) => stats.flushed += 1,
                Ok(false) => {}
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        window = window.id().0,
                        "scene flush failed, keeping batch: {err}"
                    );
                    stats.errors.push(err.into());
                }
            }
        }
    }
}
