use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use thiserror::Error;

use crate::{ChangeBatch, Event, FfiMsg, FfiResult, NativeEvent, WindowId};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("native backend failed to handle {msg}: {reason}")]
    Transport { msg: &'static str, reason: String },
    #[error("native backend answered {msg} with {got:?}")]
    UnexpectedResponse { msg: &'static str, got: FfiResult },
}

/// Synchronous request/response channel to the native renderer.
///
/// Called only from the loop thread.
pub trait NativeBackend {
    fn send(&mut self, msg: &FfiMsg) -> Result<FfiResult, BackendError>;

    fn create_window(&mut self) -> Result<WindowId, BackendError> {
        match self.send(&FfiMsg::CreateWindow)? {
            FfiResult::WindowId(id) => Ok(id),
            got => Err(BackendError::UnexpectedResponse {
                msg: "CreateWindow",
                got,
            }),
        }
    }

    fn get_events(&mut self, animating: bool) -> Result<Vec<Event>, BackendError> {
        match self.send(&FfiMsg::GetEvents(animating))? {
            FfiResult::Events(events) => Ok(events),
            // Nothing pending
            FfiResult::Nothing => Ok(Vec::new()),
            got => Err(BackendError::UnexpectedResponse {
                msg: "GetEvents",
                got,
            }),
        }
    }
}

#[derive(Default)]
struct HeadlessState {
    next_window_id: u32,
    events: VecDeque<Event>,
    updates: Vec<(WindowId, ChangeBatch)>,
    polls: Vec<bool>,
    failing_sends: usize,
    failing_polls: usize,
    responses: VecDeque<FfiResult>,
}

/// In-memory backend with no renderer behind it.
///
/// Clones share state, so a caller can keep one handle to queue events and
/// inspect sent updates while the run loop owns the other.
#[derive(Clone, Default)]
pub struct HeadlessBackend {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id handed out by the next `CreateWindow`. Ids start at 1 otherwise.
    pub fn set_next_window_id(&self, id: u32) {
        self.state.borrow_mut().next_window_id = id;
    }

    pub fn push_event(&self, window: WindowId, event: NativeEvent) {
        self.state
            .borrow_mut()
            .events
            .push_back(Event::WindowEvent { window, event });
    }

    /// Make the next `count` scene updates fail.
    pub fn fail_next_updates(&self, count: usize) {
        self.state.borrow_mut().failing_sends = count;
    }

    /// Make the next `count` event polls fail. Failed polls are still
    /// recorded in [`polls`](Self::polls) and leave queued events in place.
    pub fn fail_next_polls(&self, count: usize) {
        self.state.borrow_mut().failing_polls = count;
    }

    /// Answer the next message with `result` instead of the usual reply.
    /// Queued answers are used in order.
    pub fn respond_next_with(&self, result: FfiResult) {
        self.state.borrow_mut().responses.push_back(result);
    }

    pub fn updates(&self) -> Vec<(WindowId, ChangeBatch)> {
        self.state.borrow().updates.clone()
    }

    pub fn take_updates(&self) -> Vec<(WindowId, ChangeBatch)> {
        std::mem::take(&mut self.state.borrow_mut().updates)
    }

    /// The `animating` hint passed to each `GetEvents` so far.
    pub fn polls(&self) -> Vec<bool> {
        self.state.borrow().polls.clone()
    }
}

impl NativeBackend for HeadlessBackend {
    fn send(&mut self, msg: &FfiMsg) -> Result<FfiResult, BackendError> {
        let mut state = self.state.borrow_mut();
        if let FfiMsg::GetEvents(animating) = msg {
            state.polls.push(*animating);
        }
        if let Some(result) = state.responses.pop_front() {
            return Ok(result);
        }
        match msg {
            FfiMsg::CreateWindow => {
                let id = state.next_window_id.max(1);
                state.next_window_id = id + 1;
                Ok(FfiResult::WindowId(WindowId(id)))
            }
            FfiMsg::GetEvents(_) => {
                if state.failing_polls > 0 {
                    state.failing_polls -= 1;
                    return Err(BackendError::Transport {
                        msg: msg.name(),
                        reason: "headless poll failure".to_string(),
                    });
                }
                // Never blocks: there is nothing to wait on
                Ok(FfiResult::Events(state.events.drain(..).collect()))
            }
            FfiMsg::UpdateScene { window, update } => {
                if state.failing_sends > 0 {
                    state.failing_sends -= 1;
                    return Err(BackendError::Transport {
                        msg: msg.name(),
                        reason: "headless send failure".to_string(),
                    });
                }
                state.updates.push((*window, update.clone()));
                Ok(FfiResult::Nothing)
            }
        }
    }
}
