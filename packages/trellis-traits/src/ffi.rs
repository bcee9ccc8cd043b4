//! Request/response messages exchanged with the native backend.

use serde::{Deserialize, Serialize};

use crate::{ChangeBatch, Event, WindowId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value")]
pub enum FfiMsg {
    CreateWindow,
    /// `true` lets the backend return an empty list right away, `false` lets
    /// it block until at least one event exists.
    GetEvents(bool),
    UpdateScene {
        window: WindowId,
        update: ChangeBatch,
    },
}

impl FfiMsg {
    pub fn name(&self) -> &'static str {
        match self {
            FfiMsg::CreateWindow => "CreateWindow",
            FfiMsg::GetEvents(_) => "GetEvents",
            FfiMsg::UpdateScene { .. } => "UpdateScene",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value")]
pub enum FfiResult {
    Nothing,
    WindowId(WindowId),
    Events(Vec<Event>),
}
