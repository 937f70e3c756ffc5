//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: a detached node stays in the arena so that
//! outstanding handles keep pointing at it.

use crate::{DomError, Node, NodeData, NodeId};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a detached node to the arena
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`, moving it if it
    /// already has a parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if child == NodeId::ROOT || self.get(child).is_none() {
            return Err(DomError::HierarchyRequest);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        match self.get(parent).map(|n| &n.data) {
            Some(NodeData::Element(_)) | Some(NodeData::Document) => {}
            _ => return Err(DomError::HierarchyRequest),
        }

        self.detach(child);

        let last = self.nodes[parent.0 as usize].last_child;
        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        self.nodes[parent.0 as usize].last_child = child;
        Ok(())
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(node) => (node.parent, node.prev_sibling, node.next_sibling),
            None => return,
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }

        let node = &mut self.nodes[id.0 as usize];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Detach every child of `parent`
    pub fn remove_children(&mut self, parent: NodeId) {
        let ids: Vec<NodeId> = self.children(parent).map(|(id, _)| id).collect();
        for id in ids {
            self.detach(id);
        }
    }

    /// Iterate over the direct children of a node
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self.get(parent).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next: first }
    }

    /// Descendants of `root` in document order, excluding `root`
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).map(|(id, _)| id).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut kids: Vec<NodeId> = self.children(id).map(|(id, _)| id).collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Check whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.get(current).map_or(NodeId::NONE, |n| n.parent);
        }
        false
    }

    /// Concatenated text of all text descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for desc in self.descendants(id) {
            match self.get(desc).map(|n| &n.data) {
                Some(NodeData::Text(text)) => out.push_str(text),
                Some(NodeData::Markup(source)) => push_markup_text(&mut out, source),
                _ => {}
            }
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Child iterator
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Text of an unparsed markup fragment: everything outside `<...>`
fn push_markup_text(out: &mut String, source: &str) {
    let mut in_tag = false;
    for c in source.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementData, Namespace};

    fn element(tree: &mut DomTree, name: &str) -> NodeId {
        tree.push(Node::element(ElementData::new(Namespace::Html, None, name.into())))
    }

    #[test]
    fn test_append_links_siblings() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, "div");
        let a = element(&mut tree, "a");
        let b = element(&mut tree, "b");

        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        let ids: Vec<NodeId> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(tree.get(a).unwrap().next_sibling, b);
        assert_eq!(tree.get(b).unwrap().prev_sibling, a);
    }

    #[test]
    fn test_append_moves_node() {
        let mut tree = DomTree::new();
        let first = element(&mut tree, "div");
        let second = element(&mut tree, "div");
        let child = element(&mut tree, "span");

        tree.append_child(first, child).unwrap();
        tree.append_child(second, child).unwrap();

        assert_eq!(tree.children(first).count(), 0);
        assert_eq!(tree.children(second).count(), 1);
        assert_eq!(tree.get(child).unwrap().parent, second);
    }

    #[test]
    fn test_append_rejects_cycle() {
        let mut tree = DomTree::new();
        let outer = element(&mut tree, "div");
        let inner = element(&mut tree, "div");
        tree.append_child(outer, inner).unwrap();

        assert_eq!(tree.append_child(inner, outer), Err(DomError::HierarchyRequest));
        assert_eq!(tree.append_child(outer, outer), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn test_text_content() {
        let mut tree = DomTree::new();
        let div = element(&mut tree, "div");
        let span = element(&mut tree, "span");
        let hello = tree.push(Node::text("Hello, ".into()));
        let markup = tree.push(Node::markup("<b>World</b>".into()));

        tree.append_child(div, hello).unwrap();
        tree.append_child(div, span).unwrap();
        tree.append_child(span, markup).unwrap();

        assert_eq!(tree.text_content(div), "Hello, World");
    }
}
