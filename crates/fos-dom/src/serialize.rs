//! HTML serialization (`outerHTML` / `innerHTML` getters)

use crate::{DomTree, Namespace, NodeData, NodeId};

/// HTML elements without an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serialize a node and its subtree
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

/// Serialize the children of a node
pub fn inner_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    for (child, _) in tree.children(id) {
        write_node(tree, child, &mut out);
    }
    out
}

fn write_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Document => {
            for (child, _) in tree.children(id) {
                write_node(tree, child, out);
            }
        }
        NodeData::Text(text) => escape(text, false, out),
        NodeData::Markup(source) => out.push_str(source),
        NodeData::Element(element) => {
            let name = element.qualified_name();
            out.push('<');
            out.push_str(&name);
            for attr in element.attrs.iter() {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');

            let void = element.namespace == Namespace::Html
                && VOID_ELEMENTS.contains(&element.local_name.as_str());
            if void {
                return;
            }
            for (child, _) in tree.children(id) {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&name);
            out.push('>');
        }
    }
}

fn escape(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementData, Node};

    #[test]
    fn test_serialize_element() {
        let mut tree = DomTree::new();
        let mut data = ElementData::new(Namespace::Html, None, "p".into());
        data.set_attr("title", "a \"b\" & c");
        let p = tree.push(Node::element(data));
        let text = tree.push(Node::text("1 < 2".into()));
        tree.append_child(p, text).unwrap();

        assert_eq!(outer_html(&tree, p), "<p title=\"a &quot;b&quot; &amp; c\">1 &lt; 2</p>");
        assert_eq!(inner_html(&tree, p), "1 &lt; 2");
    }

    #[test]
    fn test_void_and_markup() {
        let mut tree = DomTree::new();
        let div = tree.push(Node::element(ElementData::new(Namespace::Html, None, "div".into())));
        let br = tree.push(Node::element(ElementData::new(Namespace::Html, None, "br".into())));
        let raw = tree.push(Node::markup("<b>bold</b>".into()));
        tree.append_child(div, br).unwrap();
        tree.append_child(div, raw).unwrap();

        assert_eq!(outer_html(&tree, div), "<div><br><b>bold</b></div>");
    }
}
