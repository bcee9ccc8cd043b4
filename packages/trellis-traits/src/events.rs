use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SurfaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window {}", self.0)
    }
}

/// An event returned by `GetEvents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value")]
pub enum Event {
    /// An event scoped to one window, routed to that window's document.
    WindowEvent { window: WindowId, event: NativeEvent },
}

/// Native event payload. Targets are native surface ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NativeEvent {
    MouseMove { target: SurfaceId },
    MouseDown { target: SurfaceId },
    MouseUp { target: SurfaceId },
    Scroll { target: SurfaceId },
    KeyDown { target: SurfaceId, key: u16 },
    KeyPress { target: SurfaceId, key: u16 },
    KeyUp { target: SurfaceId, key: u16 },
    Resize { width: f32, height: f32 },
    Close,
}

impl NativeEvent {
    /// The surface the event is aimed at, if it has one.
    pub fn target(&self) -> Option<SurfaceId> {
        match self {
            NativeEvent::MouseMove { target }
            | NativeEvent::MouseDown { target }
            | NativeEvent::MouseUp { target }
            | NativeEvent::Scroll { target }
            | NativeEvent::KeyDown { target, .. }
            | NativeEvent::KeyPress { target, .. }
            | NativeEvent::KeyUp { target, .. } => Some(*target),
            NativeEvent::Resize { .. } | NativeEvent::Close => None,
        }
    }

    /// Returns the DOM-style name of the event ("mousedown", "keyup", etc)
    pub fn name(&self) -> &'static str {
        match self {
            NativeEvent::MouseMove { .. } => "mousemove",
            NativeEvent::MouseDown { .. } => "mousedown",
            NativeEvent::MouseUp { .. } => "mouseup",
            NativeEvent::Scroll { .. } => "scroll",
            NativeEvent::KeyDown { .. } => "keydown",
            NativeEvent::KeyPress { .. } => "keypress",
            NativeEvent::KeyUp { .. } => "keyup",
            NativeEvent::Resize { .. } => "resize",
            NativeEvent::Close => "close",
        }
    }
}
