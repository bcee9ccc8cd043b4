//! The Trellis run loop.
//!
//! An [`App`] owns the native backend, one [`Window`] per native window (each
//! with its own [`Document`](trellis_dom::Document)), and the animation-frame
//! queue. Each [`App::tick`] polls the backend for events, dispatches them,
//! runs the animation frames registered so far, then flushes every window's
//! scene. [`run`] ticks forever, yielding to the tokio scheduler in between.
//!
//! ## Feature flags
//!  - `default`: Enables the features listed below.
//!  - `tracing`: Enables tracing support.

mod application;
mod config;
mod error;
mod frames;
mod window;

pub use crate::application::{App, TickStats};
pub use crate::config::AppConfig;
pub use crate::error::ShellError;
pub use crate::frames::{FrameCallback, FrameClock, FrameScheduler, MonotonicClock};
pub use crate::window::{EventHandler, NoopEventHandler, Window, WindowConfig, Windows};

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

thread_local! {
    static APP: OnceCell<Rc<RefCell<App>>> = const { OnceCell::new() };
    static FRAMES: OnceCell<FrameScheduler> = const { OnceCell::new() };
}

/// The app running on this thread, created with `init` on first access.
///
/// Later calls ignore `init` and return the same app. Creating the app binds
/// the free [`request_animation_frame`] to its queue.
pub fn get_app(init: impl FnOnce() -> App) -> Rc<RefCell<App>> {
    APP.with(|cell| {
        cell.get_or_init(|| {
            let app = init();
            FRAMES.with(|frames| {
                frames.get_or_init(|| app.frames());
            });
            Rc::new(RefCell::new(app))
        })
        .clone()
    })
}

/// Register `callback` with this thread's app. Fails with
/// [`ShellError::NoApp`] before [`get_app`] has been called.
///
/// Usable while the app is borrowed, including from inside frame callbacks
/// and event handlers.
pub fn request_animation_frame(
    callback: impl FnOnce(&mut Windows, f64) -> Result<(), ShellError> + 'static,
) -> Result<(), ShellError> {
    let frames = FRAMES
        .with(|frames| frames.get().cloned())
        .ok_or(ShellError::NoApp)?;
    frames.request_animation_frame(callback);
    Ok(())
}

/// Tick `app` until `stop` returns true, yielding after every tick.
///
/// Tick errors are logged and the loop keeps going.
pub async fn run_until(app: &Rc<RefCell<App>>, mut stop: impl FnMut(&App) -> bool) {
    loop {
        {
            let mut app = app.borrow_mut();
            if stop(&app) {
                return;
            }
            match app.tick() {
                #[cfg(feature = "tracing")]
                Ok(stats) => tracing::trace!(
                    events = stats.events,
                    frames = stats.frames,
                    flushed = stats.flushed,
                    errors = stats.errors.len(),
                    "tick"
                ),
                #[cfg(not(feature = "tracing"))]
                Ok(_) => {}
                #[cfg(feature = "tracing")]
                Err(err) => tracing::error!("tick aborted: {err}"),
                #[cfg(not(feature = "tracing"))]
                Err(_) => {}
            }
        }
        tokio::task::yield_now().await;
    }
}

/// Tick `app` forever.
pub async fn run(app: Rc<RefCell<App>>) {
    run_until(&app, |_| false).await
}
