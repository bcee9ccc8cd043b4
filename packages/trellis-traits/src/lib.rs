//! Shared types for Trellis
//!
//! Everything that crosses the process boundary between the document side and
//! the native renderer lives here: surface and window ids, the change batch a
//! window flushes each tick, native events, and the [`NativeBackend`] channel
//! itself.

pub mod backend;
pub mod events;
pub mod ffi;
pub mod scene;

pub use backend::{BackendError, HeadlessBackend, NativeBackend};
pub use events::{Event, NativeEvent, WindowId};
pub use ffi::{FfiMsg, FfiResult};
pub use scene::{
    Align, AlignProp, ChangeBatch, DimProp, Dimension, LayoutChange, SurfaceId, TextChange,
    TreeChange,
};
