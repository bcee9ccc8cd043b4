//! The change batch sent to the native scene once per tick.
//!
//! Three independent sequences are kept so the backend can apply structure,
//! text and layout in separate passes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Native-side counterpart of a structural node.
///
/// Ids are allocated per window, start at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    /// The window's root surface. Also recorded as the parent of detached surfaces.
    pub const ROOT: SurfaceId = SurfaceId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A structural change.
///
/// Untagged on the wire: a creation is the bare `{}` marker, an insertion is
/// `{parent, child, index}` and a removal is `{parent, child}`. Variant order
/// matters for deserialization, most specific first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeChange {
    Insert {
        parent: SurfaceId,
        child: SurfaceId,
        index: u32,
    },
    Remove {
        parent: SurfaceId,
        child: SurfaceId,
    },
    /// Creates the next surface. The id is implied by the allocation order.
    Create {},
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChange {
    pub surface: SurfaceId,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimProp {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    FlexBasis,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    Undefined,
    Auto,
    Points(f32),
    Percent(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignProp {
    AlignContent,
    AlignItems,
    AlignSelf,
    JustifyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Align {
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
    Baseline,
    SpaceBetween,
    SpaceAround,
}

/// A layout property change, keyed by surface and property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutChange {
    Dimension {
        surface: SurfaceId,
        dim_prop: DimProp,
        dim: Dimension,
    },
    Align {
        surface: SurfaceId,
        align_prop: AlignProp,
        align: Align,
    },
}

impl LayoutChange {
    pub fn surface(&self) -> SurfaceId {
        match self {
            LayoutChange::Dimension { surface, .. } | LayoutChange::Align { surface, .. } => {
                *surface
            }
        }
    }
}

/// Everything a window accumulated since its last flush.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    pub tree_changes: Vec<TreeChange>,
    pub text_changes: Vec<TextChange>,
    pub layout_changes: Vec<LayoutChange>,
}

impl ChangeBatch {
    /// Whether the batch has structural or text entries.
    ///
    /// Layout entries are not considered: a batch holding only
    /// layout changes is never sent.
    pub fn needs_flush(&self) -> bool {
        !self.tree_changes.is_empty() || !self.text_changes.is_empty()
    }

    pub fn is_layout_only(&self) -> bool {
        !self.needs_flush() && !self.layout_changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tree_changes.len() + self.text_changes.len() + self.layout_changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape_matches_native_expectations() {
        let batch = ChangeBatch {
            tree_changes: vec![
                TreeChange::Create {},
                TreeChange::Insert {
                    parent: SurfaceId(1),
                    child: SurfaceId(2),
                    index: 0,
                },
                TreeChange::Remove {
                    parent: SurfaceId(1),
                    child: SurfaceId(2),
                },
            ],
            text_changes: vec![TextChange {
                surface: SurfaceId(2),
                text: "hello".into(),
            }],
            layout_changes: vec![
                LayoutChange::Dimension {
                    surface: SurfaceId(1),
                    dim_prop: DimProp::Width,
                    dim: Dimension::Points(100.0),
                },
                LayoutChange::Align {
                    surface: SurfaceId(1),
                    align_prop: AlignProp::AlignItems,
                    align: Align::Center,
                },
            ],
        };

        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            value,
            json!({
                "tree_changes": [
                    {},
                    { "parent": 1, "child": 2, "index": 0 },
                    { "parent": 1, "child": 2 },
                ],
                "text_changes": [{ "surface": 2, "text": "hello" }],
                "layout_changes": [
                    { "surface": 1, "dim_prop": "Width", "dim": { "Points": 100.0 } },
                    { "surface": 1, "align_prop": "AlignItems", "align": "Center" },
                ],
            })
        );
    }

    #[test]
    fn untagged_tree_changes_decode_to_the_right_variant() {
        let changes: Vec<TreeChange> =
            serde_json::from_str(r#"[{"parent":3,"child":4},{},{"parent":0,"child":4,"index":2}]"#)
                .unwrap();
        assert_eq!(
            changes,
            vec![
                TreeChange::Remove {
                    parent: SurfaceId(3),
                    child: SurfaceId(4)
                },
                TreeChange::Create {},
                TreeChange::Insert {
                    parent: SurfaceId::ROOT,
                    child: SurfaceId(4),
                    index: 2
                },
            ]
        );
    }

    #[test]
    fn layout_entries_alone_do_not_need_a_flush() {
        let mut batch = ChangeBatch::default();
        assert!(!batch.needs_flush());
        assert!(!batch.is_layout_only());

        batch.layout_changes.push(LayoutChange::Align {
            surface: SurfaceId(1),
            align_prop: AlignProp::JustifyContent,
            align: Align::SpaceBetween,
        });
        assert!(!batch.needs_flush());
        assert!(batch.is_layout_only());
        assert_eq!(batch.len(), 1);

        batch.text_changes.push(TextChange {
            surface: SurfaceId(1),
            text: String::new(),
        });
        assert!(batch.needs_flush());
        assert!(!batch.is_layout_only());
    }
}
