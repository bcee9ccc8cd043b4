//! End-to-end checks of document mutations reaching a backend as batches.

use trellis_dom::{
    ChildNode, Document, DocumentConfig, ElementRef, NodeHandle, NodeId, NodeOrString, ParentNode,
    QueryEngine, TreeNode,
};
use trellis_traits::{HeadlessBackend, SurfaceId, TextChange, TreeChange, WindowId};

fn document() -> Document {
    Document::new(WindowId(4), DocumentConfig::default())
}

#[test]
fn building_a_small_tree_flushes_one_ordered_batch() {
    let backend = HeadlessBackend::new();
    let mut sink = backend.clone();
    let mut doc = document();

    let column = doc.create_element("column");
    let title = doc.create_element("label");
    doc.root().append_child(&mut doc, column).unwrap();
    column.append_child(&mut doc, title).unwrap();
    title.set_text_content(&mut doc, "Hello").unwrap();

    assert!(doc.scene_mut().flush(&mut sink).unwrap());

    let updates = backend.take_updates();
    assert_eq!(updates.len(), 1);
    let (window, batch) = &updates[0];
    assert_eq!(*window, WindowId(4));
    assert_eq!(
        batch.tree_changes,
        vec![
            TreeChange::Create {},
            TreeChange::Create {},
            TreeChange::Insert {
                parent: SurfaceId::ROOT,
                child: SurfaceId(1),
                index: 0
            },
            TreeChange::Insert {
                parent: SurfaceId(1),
                child: SurfaceId(2),
                index: 0
            },
        ]
    );
    assert_eq!(
        batch.text_changes,
        vec![TextChange {
            surface: SurfaceId(2),
            text: "Hello".to_string()
        }]
    );
    assert!(batch.layout_changes.is_empty());

    // Nothing left over for the next tick
    assert!(!doc.scene_mut().flush(&mut sink).unwrap());
    assert!(backend.updates().is_empty());
}

#[test]
fn replacing_text_content_resends_the_element_text() {
    let mut doc = document();
    let label = doc.create_element("label");
    label.set_text_content(&mut doc, "one").unwrap();
    label.set_text_content(&mut doc, "").unwrap();

    let texts: Vec<_> = doc
        .scene()
        .pending()
        .text_changes
        .iter()
        .map(|change| change.text.as_str())
        .collect();
    // Added, removed, then the empty replacement added
    assert_eq!(texts, vec!["one", "", ""]);
    assert_eq!(label.child_nodes(&doc).len(), 1);
}

#[test]
fn fragments_and_comments_never_reach_the_scene() {
    let mut doc = document();
    let fragment = doc.create_document_fragment();
    let note = doc.create_comment("hidden");
    let item = doc.create_element("item");
    fragment
        .append(&mut doc, [NodeOrString::from(note), item.into()])
        .unwrap();

    let before = doc.scene().pending().tree_changes.len();
    doc.root().append_child(&mut doc, fragment).unwrap();

    let added = &doc.scene().pending().tree_changes[before..];
    assert_eq!(
        added,
        &[TreeChange::Insert {
            parent: SurfaceId::ROOT,
            child: item.surface(&doc),
            index: 0
        }]
    );
    assert_eq!(doc.child_nodes(NodeId::DOCUMENT), &[note.id(), item.id()]);
}

#[test]
fn native_indices_skip_unmirrored_siblings() {
    let mut doc = document();
    let row = doc.create_element("row");
    let first = doc.create_element("a");
    let last = doc.create_element("c");
    row.append(&mut doc, [NodeOrString::from(first), "gap".into(), last.into()])
        .unwrap();

    let middle = doc.create_element("b");
    last.before(&mut doc, [middle]).unwrap();

    assert_eq!(
        doc.scene().pending().tree_changes.last(),
        Some(&TreeChange::Insert {
            parent: row.surface(&doc),
            child: middle.surface(&doc),
            index: 1
        })
    );
    assert_eq!(doc.scene().parent_of(middle.surface(&doc)), Some(row.surface(&doc)));
}

struct ByLocalName;

impl QueryEngine for ByLocalName {
    fn query_selector_all(&self, doc: &Document, scope: NodeId, selectors: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = doc.child_nodes(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if doc
                .element(id)
                .is_some_and(|el: ElementRef| el.local_name(doc) == selectors)
            {
                found.push(id);
            }
            stack.extend(doc.child_nodes(id).iter().rev().copied());
        }
        found
    }
}

#[test]
fn selectors_are_delegated_to_the_configured_engine() {
    let config = DocumentConfig {
        query_engine: Some(std::sync::Arc::new(ByLocalName)),
    };
    let mut doc = Document::new(WindowId(1), config);
    let outer = doc.create_element("box");
    let inner = doc.create_element("box");
    let other = doc.create_element("span");
    doc.root().append(&mut doc, [outer]).unwrap();
    outer.append(&mut doc, [inner, other]).unwrap();

    assert_eq!(
        doc.root().query_selector_all(&doc, "box"),
        vec![outer.id(), inner.id()]
    );
    assert_eq!(outer.query_selector(&doc, "box"), Some(inner.id()));
    assert_eq!(other.parent_element(&doc), Some(outer));

    // Without an engine nothing matches
    let plain = document();
    assert_eq!(plain.root().query_selector(&plain, "box"), None);
}
