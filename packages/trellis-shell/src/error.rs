use thiserror::Error;
use trellis_dom::DomError;
use trellis_traits::{BackendError, WindowId};

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ShellError {
    /// The backend reported an event for a window this app never created.
    #[error("event for unknown {0}")]
    UnknownWindow(WindowId),
    /// The backend handed out an id that already belongs to a live window.
    #[error("backend reused the id of live {0}")]
    DuplicateWindow(WindowId),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("no app is running on this thread")]
    NoApp,
}
