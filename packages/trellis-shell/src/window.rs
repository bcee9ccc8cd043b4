use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use trellis_dom::{Document, DocumentConfig, NodeId};
use trellis_traits::{BackendError, NativeBackend, NativeEvent, WindowId};

use crate::ShellError;

/// Reacts to native events routed into a window's document.
pub trait EventHandler {
    /// `target` is the node behind the event's target surface, when the event
    /// has one and it is still known to the document.
    fn handle_event(
        &mut self,
        document: &mut Document,
        target: Option<NodeId>,
        event: &NativeEvent,
    ) -> Result<(), ShellError>;
}

/// Ignores every event.
pub struct NoopEventHandler;
impl EventHandler for NoopEventHandler {
    fn handle_event(
        &mut self,
        _document: &mut Document,
        _target: Option<NodeId>,
        _event: &NativeEvent,
    ) -> Result<(), ShellError> {
        Ok(())
    }
}

impl<F> EventHandler for F
where
    F: FnMut(&mut Document, Option<NodeId>, &NativeEvent) -> Result<(), ShellError>,
{
    fn handle_event(
        &mut self,
        document: &mut Document,
        target: Option<NodeId>,
        event: &NativeEvent,
    ) -> Result<(), ShellError> {
        self(document, target, event)
    }
}

pub struct WindowConfig {
    pub handler: Box<dyn EventHandler>,
    pub document: DocumentConfig,
}

impl WindowConfig {
    pub fn with_handler(handler: impl EventHandler + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            document: DocumentConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::with_handler(NoopEventHandler)
    }
}

/// One native window and the document mirrored into it.
pub struct Window {
    id: WindowId,
    document: Document,
    handler: Box<dyn EventHandler>,
    size: Option<(f32, f32)>,
}

impl Window {
    pub(crate) fn new(id: WindowId, config: WindowConfig) -> Self {
        Self {
            id,
            document: Document::new(id, config.document),
            handler: config.handler,
            size: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Last size reported by a resize event.
    pub fn size(&self) -> Option<(f32, f32)> {
        self.size
    }

    pub fn handle_event(&mut self, event: &NativeEvent) -> Result<(), ShellError> {
        if let NativeEvent::Resize { width, height } = event {
            self.size = Some((*width, *height));
        }

        let target = event
            .target()
            .and_then(|surface| self.document.node_for_surface(surface));

        #[cfg(feature = "tracing")]
        tracing::trace!(window = self.id.0, event = event.name(), ?target, "dispatch");

        self.handler.handle_event(&mut self.document, target, event)
    }

    pub fn flush(&mut self, backend: &mut dyn NativeBackend) -> Result<bool, BackendError> {
        self.document.scene_mut().flush(backend)
    }
}

/// All windows owned by the app, keyed by backend id.
#[derive(Default)]
pub struct Windows(BTreeMap<WindowId, Window>);

impl Windows {
    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.0.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.0.get_mut(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.0.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.0.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.0.values_mut()
    }

    /// Register `window`, refusing to replace a live window with the same id.
    pub(crate) fn insert(&mut self, window: Window) -> Result<&mut Window, ShellError> {
        match self.0.entry(window.id) {
            Entry::Occupied(entry) => Err(ShellError::DuplicateWindow(*entry.key())),
            Entry::Vacant(entry) => Ok(entry.insert(window)),
        }
    }

    pub fn remove(&mut self, id: WindowId) -> Option<Window> {
        self.0.remove(&id)
    }
}
