//! Editing of text and comment payloads.
//!
//! Offsets and counts are in Unicode scalar values and are clamped to the
//! payload length, so out-of-range arguments never fail.

use std::ops::Range;

use crate::{Document, DomError, NodeId};

impl Document {
    pub fn data(&self, id: NodeId) -> Result<&str, DomError> {
        self.node(id)
            .character_data()
            .map(|data| data.content.as_str())
            .ok_or(DomError::NotCharacterData(id))
    }

    pub fn set_data(&mut self, id: NodeId, data: &str) -> Result<(), DomError> {
        self.edit_data(id, |content| {
            content.clear();
            content.push_str(data);
        })
    }

    pub fn length(&self, id: NodeId) -> Result<usize, DomError> {
        Ok(self.data(id)?.chars().count())
    }

    pub fn substring_data(&self, id: NodeId, offset: usize, count: usize) -> Result<String, DomError> {
        let data = self.data(id)?;
        Ok(data[char_range(data, offset, count)].to_string())
    }

    pub fn append_data(&mut self, id: NodeId, data: &str) -> Result<(), DomError> {
        self.edit_data(id, |content| content.push_str(data))
    }

    pub fn insert_data(&mut self, id: NodeId, offset: usize, data: &str) -> Result<(), DomError> {
        self.replace_data(id, offset, 0, data)
    }

    pub fn delete_data(&mut self, id: NodeId, offset: usize, count: usize) -> Result<(), DomError> {
        self.replace_data(id, offset, count, "")
    }

    /// Replace `count` characters starting at `offset` with `data`.
    pub fn replace_data(
        &mut self,
        id: NodeId,
        offset: usize,
        count: usize,
        data: &str,
    ) -> Result<(), DomError> {
        self.edit_data(id, |content| {
            let range = char_range(content, offset, count);
            content.replace_range(range, data);
        })
    }

    fn edit_data(&mut self, id: NodeId, edit: impl FnOnce(&mut String)) -> Result<(), DomError> {
        let node = self.node_mut(id);
        let data = node
            .character_data_mut()
            .ok_or(DomError::NotCharacterData(id))?;
        edit(&mut data.content);

        // Text shows up natively as its parent element's text
        let parent = node.parent.filter(|_| node.is_text_node());
        if let Some(parent) = parent {
            self.sync_text(parent);
        }
        Ok(())
    }
}

/// Byte range of `count` chars starting at char `offset`, clamped to `s`.
fn char_range(s: &str, offset: usize, count: usize) -> Range<usize> {
    let byte_at = |chars: usize| s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i);
    byte_at(offset)..byte_at(offset.saturating_add(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentConfig;
    use trellis_traits::WindowId;

    fn text_doc(content: &str) -> (Document, NodeId) {
        let mut doc = Document::new(WindowId(1), DocumentConfig::default());
        let text = doc.create_text_node(content).0;
        (doc, text)
    }

    #[test]
    fn ranges_clamp_to_the_payload() {
        assert_eq!(char_range("hello", 1, 3), 1..4);
        assert_eq!(char_range("hello", 3, 100), 3..5);
        assert_eq!(char_range("hello", 10, 2), 5..5);
        assert_eq!(char_range("hello", 2, usize::MAX), 2..5);
        assert_eq!(char_range("", 0, 1), 0..0);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let (mut doc, text) = text_doc("héllo wörld");
        assert_eq!(doc.length(text).unwrap(), 11);
        assert_eq!(doc.substring_data(text, 1, 4).unwrap(), "éllo");

        doc.delete_data(text, 6, 5).unwrap();
        assert_eq!(doc.data(text).unwrap(), "héllo ");
    }

    #[test]
    fn edits_splice_at_the_offset() {
        let (mut doc, text) = text_doc("hello");

        doc.insert_data(text, 2, "XY").unwrap();
        assert_eq!(doc.data(text).unwrap(), "heXYllo");

        doc.replace_data(text, 0, 2, "J").unwrap();
        assert_eq!(doc.data(text).unwrap(), "JXYllo");

        doc.append_data(text, "!").unwrap();
        doc.insert_data(text, 100, "?").unwrap();
        assert_eq!(doc.data(text).unwrap(), "JXYllo!?");

        doc.delete_data(text, 1, 0).unwrap();
        doc.delete_data(text, 50, 50).unwrap();
        assert_eq!(doc.data(text).unwrap(), "JXYllo!?");

        doc.set_data(text, "").unwrap();
        assert_eq!(doc.length(text).unwrap(), 0);
    }

    #[test]
    fn elements_are_not_character_data() {
        let mut doc = Document::new(WindowId(1), DocumentConfig::default());
        let div = doc.create_element("div").0;
        assert_eq!(doc.data(div), Err(DomError::NotCharacterData(div)));
        assert_eq!(
            doc.append_data(div, "x"),
            Err(DomError::NotCharacterData(div))
        );
    }

    #[test]
    fn text_edits_resend_parent_text() {
        let mut doc = Document::new(WindowId(1), DocumentConfig::default());
        let label = doc.create_element("label").0;
        let text = doc.create_text_node("count: 1").0;
        let note = doc.create_comment("note").0;
        doc.append_child(label, text).unwrap();
        doc.append_child(label, note).unwrap();

        doc.replace_data(text, 7, 1, "2").unwrap();
        doc.append_data(note, " ignored").unwrap();

        let texts: Vec<_> = doc
            .scene()
            .pending()
            .text_changes
            .iter()
            .map(|change| change.text.clone())
            .collect();
        assert_eq!(texts, vec!["count: 1", "count: 2"]);
        assert_eq!(doc.data(note).unwrap(), "note ignored");
    }
}
