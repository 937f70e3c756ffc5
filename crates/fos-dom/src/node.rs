//! DOM Node
//!
//! Nodes live in the `DomTree` arena and link to each other by `NodeId`
//! instead of pointers.

use std::collections::HashMap;

use crate::{NodeId, Namespace, NamedNodeMap, PropertyValue};
use crate::events::{Listener, RegisteredListener};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(data: ElementData) -> Self {
        Self::with_data(NodeData::Element(data))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(content))
    }

    /// Create a raw markup fragment node
    pub fn markup(source: String) -> Self {
        Self::with_data(NodeData::Markup(source))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Markup assigned through `innerHTML`, kept unparsed
    Markup(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Namespace the element was created in
    pub namespace: Namespace,
    /// Namespace prefix (`svg` in `svg:circle`)
    pub prefix: Option<String>,
    /// Local name
    pub local_name: String,
    /// Customized built-in element name
    pub is: Option<String>,
    /// Attributes
    pub attrs: NamedNodeMap,
    /// Listeners registered through `addEventListener`
    pub listeners: Vec<RegisteredListener>,
    /// `on*` event handler properties, keyed by event type
    pub handlers: HashMap<String, Listener>,
    /// IDL state that does not reflect an attribute (`value`, `checked`)
    pub stored: HashMap<String, PropertyValue>,
}

impl ElementData {
    pub fn new(namespace: Namespace, prefix: Option<String>, local_name: String) -> Self {
        Self {
            namespace,
            prefix,
            local_name,
            is: None,
            attrs: NamedNodeMap::new(),
            listeners: Vec::new(),
            handlers: HashMap::new(),
            stored: HashMap::new(),
        }
    }

    /// Qualified name (`prefix:local` or `local`)
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// `tagName`: upper-cased for HTML elements
    pub fn tag_name(&self) -> String {
        let qualified = self.qualified_name();
        if self.namespace == Namespace::Html {
            qualified.to_ascii_uppercase()
        } else {
            qualified
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attribute(name)
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.set_attribute(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_case() {
        let html = ElementData::new(Namespace::Html, None, "div".into());
        assert_eq!(html.tag_name(), "DIV");

        let svg = ElementData::new(Namespace::Svg, Some("svg".into()), "circle".into());
        assert_eq!(svg.qualified_name(), "svg:circle");
        assert_eq!(svg.tag_name(), "svg:circle");
    }

    #[test]
    fn test_node_kinds() {
        let node = Node::text("hi".into());
        assert!(node.is_text());
        assert_eq!(node.as_text(), Some("hi"));
        assert!(node.as_element().is_none());

        let node = Node::element(ElementData::new(Namespace::Html, None, "p".into()));
        assert!(node.is_element());
        assert!(!node.parent.is_valid());
    }
}
