//! Batching of mirrored changes for one window's native scene.
//!
//! The document calls in here as it mutates; nothing reaches the backend until
//! [`SceneContext::flush`].

use rustc_hash::FxHashMap;
use trellis_traits::{
    Align, AlignProp, BackendError, ChangeBatch, DimProp, Dimension, FfiMsg, LayoutChange,
    NativeBackend, SurfaceId, TextChange, TreeChange, WindowId,
};

pub struct SceneContext {
    window: WindowId,
    /// Next surface id to hand out. 0 is the root.
    next_id: u32,
    changes: ChangeBatch,
    /// Recorded native parent of every allocated surface, ROOT when detached.
    parents: FxHashMap<SurfaceId, SurfaceId>,
}

impl SceneContext {
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            next_id: 1,
            changes: ChangeBatch::default(),
            parents: FxHashMap::default(),
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn create_surface(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.changes.tree_changes.push(TreeChange::Create {});
        self.parents.insert(id, SurfaceId::ROOT);
        id
    }

    pub fn insert_at(&mut self, parent: SurfaceId, child: SurfaceId, index: u32) {
        self.changes.tree_changes.push(TreeChange::Insert {
            parent,
            child,
            index,
        });
        self.parents.insert(child, parent);
    }

    pub fn remove_child(&mut self, parent: SurfaceId, child: SurfaceId) {
        self.changes
            .tree_changes
            .push(TreeChange::Remove { parent, child });
        self.parents.insert(child, SurfaceId::ROOT);
    }

    pub fn set_text(&mut self, surface: SurfaceId, text: impl Into<String>) {
        self.changes.text_changes.push(TextChange {
            surface,
            text: text.into(),
        });
    }

    pub fn set_dimension(&mut self, surface: SurfaceId, dim_prop: DimProp, dim: Dimension) {
        self.changes.layout_changes.push(LayoutChange::Dimension {
            surface,
            dim_prop,
            dim,
        });
    }

    pub fn set_align(&mut self, surface: SurfaceId, align_prop: AlignProp, align: Align) {
        self.changes.layout_changes.push(LayoutChange::Align {
            surface,
            align_prop,
            align,
        });
    }

    /// Recorded native parent of `surface`. `None` for ids never allocated here.
    pub fn parent_of(&self, surface: SurfaceId) -> Option<SurfaceId> {
        self.parents.get(&surface).copied()
    }

    /// Changes accumulated since the last flush.
    pub fn pending(&self) -> &ChangeBatch {
        &self.changes
    }

    /// Send the accumulated batch as a single `UpdateScene` message.
    ///
    /// Returns `Ok(false)` without sending when there are no structural or text
    /// entries; any pending layout entries are dropped in that case. If the
    /// backend fails, the batch is kept whole and goes out with the next flush.
    pub fn flush(&mut self, backend: &mut dyn NativeBackend) -> Result<bool, BackendError> {
        if !self.changes.needs_flush() {
            if !self.changes.layout_changes.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    window = self.window.0,
                    dropped = self.changes.layout_changes.len(),
                    "layout-only batch, not sending"
                );
                self.changes.layout_changes.clear();
            }
            return Ok(false);
        }

        let msg = FfiMsg::UpdateScene {
            window: self.window,
            update: std::mem::take(&mut self.changes),
        };

        match backend.send(&msg) {
            Ok(_) => {
                #[cfg(feature = "tracing")]
                if let FfiMsg::UpdateScene { update, .. } = &msg {
                    tracing::trace!(
                        window = self.window.0,
                        tree = update.tree_changes.len(),
                        text = update.text_changes.len(),
                        layout = update.layout_changes.len(),
                        "scene flushed"
                    );
                }
                Ok(true)
            }
            Err(err) => {
                if let FfiMsg::UpdateScene { update, .. } = msg {
                    self.changes = update;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_traits::HeadlessBackend;

    #[test]
    fn surface_ids_start_at_one_and_increase() {
        let mut scene = SceneContext::new(WindowId(1));
        let ids: Vec<_> = (0..5).map(|_| scene.create_surface()).collect();
        assert_eq!(
            ids,
            vec![SurfaceId(1), SurfaceId(2), SurfaceId(3), SurfaceId(4), SurfaceId(5)]
        );
        assert!(ids.iter().all(|id| !id.is_root()));
        assert_eq!(scene.pending().tree_changes.len(), 5);
        assert_eq!(scene.parent_of(SurfaceId(3)), Some(SurfaceId::ROOT));
    }

    #[test]
    fn back_references_follow_insert_and_remove() {
        let mut scene = SceneContext::new(WindowId(1));
        let parent = scene.create_surface();
        let child = scene.create_surface();

        scene.insert_at(parent, child, 0);
        assert_eq!(scene.parent_of(child), Some(parent));

        scene.remove_child(parent, child);
        assert_eq!(scene.parent_of(child), Some(SurfaceId::ROOT));
        assert_eq!(scene.parent_of(SurfaceId(99)), None);
    }

    #[test]
    fn flush_sends_everything_once_and_resets() {
        let backend = HeadlessBackend::new();
        let mut sink = backend.clone();
        let mut scene = SceneContext::new(WindowId(3));

        let a = scene.create_surface();
        scene.set_text(a, "hi");
        scene.set_dimension(a, DimProp::Height, Dimension::Auto);

        assert!(scene.flush(&mut sink).unwrap());
        assert!(scene.pending().is_empty());
        assert!(!scene.flush(&mut sink).unwrap());

        let updates = backend.updates();
        assert_eq!(updates.len(), 1);
        let (window, batch) = &updates[0];
        assert_eq!(*window, WindowId(3));
        assert_eq!(batch.tree_changes, vec![TreeChange::Create {}]);
        assert_eq!(batch.text_changes.len(), 1);
        assert_eq!(batch.layout_changes.len(), 1);
    }

    #[test]
    fn layout_only_batches_are_dropped_without_sending() {
        let backend = HeadlessBackend::new();
        let mut sink = backend.clone();
        let mut scene = SceneContext::new(WindowId(1));

        scene.set_align(SurfaceId(1), AlignProp::AlignSelf, Align::Center);
        assert!(!scene.flush(&mut sink).unwrap());
        assert!(scene.pending().is_empty());

        // A later real flush must not carry the stale layout entry
        scene.set_text(SurfaceId(1), "x");
        assert!(scene.flush(&mut sink).unwrap());
        assert!(!scene.flush(&mut sink).unwrap());

        let updates = backend.updates();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].1.layout_changes.is_empty());
    }

    #[test]
    fn failed_flush_keeps_the_whole_batch() {
        let backend = HeadlessBackend::new();
        let mut sink = backend.clone();
        let mut scene = SceneContext::new(WindowId(1));

        let a = scene.create_surface();
        let b = scene.create_surface();
        scene.insert_at(a, b, 0);

        backend.fail_next_updates(1);
        assert!(scene.flush(&mut sink).is_err());
        assert_eq!(scene.pending().tree_changes.len(), 3);
        assert!(backend.updates().is_empty());

        assert!(scene.flush(&mut sink).unwrap());
        assert_eq!(backend.updates()[0].1.tree_changes.len(), 3);
    }
}
