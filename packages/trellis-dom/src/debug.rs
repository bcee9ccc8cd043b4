use crate::node::NodeData;
use crate::{Document, NodeId};

impl Document {
    /// Indented rendering of the subtree under `id`, one node per line.
    pub fn debug_tree(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_debug_tree(id, 0, &mut out);
        out
    }

    fn write_debug_tree(&self, id: NodeId, level: usize, out: &mut String) {
        let node = self.node(id);
        let indent = " ".repeat(level * 2);
        let line = match &node.data {
            NodeData::Element(el) => format!("{indent}<{}> {}", el.local_name, el.surface),
            NodeData::Text(text) => format!("{indent}{:?}", text.content),
            NodeData::Comment(text) => format!("{indent}<!--{}-->", text.content),
            _ => format!("{indent}{}", node.node_name()),
        };
        out.push_str(&line);
        out.push('\n');
        for child in node.children.iter() {
            self.write_debug_tree(*child, level + 1, out);
        }
    }

    #[cfg(feature = "tracing")]
    pub fn print_tree(&self) {
        tracing::debug!("\n{}", self.debug_tree(NodeId::DOCUMENT));
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Document, DocumentConfig, NodeHandle, NodeId, NodeOrString, ParentNode, TreeNode, WindowId,
    };

    #[test]
    fn renders_nested_nodes() {
        let mut doc = Document::new(WindowId(1), DocumentConfig::default());
        let div = doc.create_element("div");
        let note = doc.create_comment(" hi ");
        doc.root().append_child(&mut doc, div).unwrap();
        div.append(&mut doc, [NodeOrString::from("text"), note.into()]).unwrap();

        assert_eq!(
            doc.debug_tree(NodeId::DOCUMENT),
            "#document\n  <div> #1\n    \"text\"\n    <!-- hi -->\n"
        );
    }

    #[test]
    fn renders_detached_fragments() {
        let mut doc = Document::new(WindowId(1), DocumentConfig::default());
        let fragment = doc.create_document_fragment();
        let item = doc.create_element("LI");
        fragment.append(&mut doc, [item]).unwrap();
        item.append(&mut doc, ["one"]).unwrap();

        assert_eq!(
            doc.debug_tree(fragment.id()),
            "#document-fragment\n  <li> #1\n    \"one\"\n"
        );
    }
}
