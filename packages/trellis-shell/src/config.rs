use crate::FrameClock;

/// Options used when constructing an [`App`](crate::App)
#[derive(Default)]
pub struct AppConfig {
    /// Timestamp source for animation frames. Defaults to a
    /// [`MonotonicClock`](crate::MonotonicClock) started with the app.
    pub clock: Option<Box<dyn FrameClock>>,
}
