//! fOS DOM - Document Object Model
//!
//! Memory-efficient DOM tree implementation with the mutation surface
//! scripts see: attributes, class list, dataset, inline style, IDL
//! properties and event listeners.

mod node;
mod tree;
mod document;
mod element;
mod attributes;
mod classlist;
mod dataset;
mod style;
mod properties;
mod events;
mod selector;
mod serialize;

pub use node::{Node, NodeData, ElementData};
pub use tree::DomTree;
pub use document::Document;
pub use element::Element;
pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use dataset::DOMStringMap;
pub use style::CssDeclarations;
pub use properties::{PropertyKind, PropertyValue, number_to_dom_string};
pub use events::{Event, EventCallback, EventHandler, EventPhase, Listener, ListenerOptions};
pub use selector::SelectorList;

/// HTML namespace URI
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
/// SVG namespace URI
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
/// MathML namespace URI
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}

/// Element namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
    /// Any other namespace, by URI
    Other(String),
}

impl Namespace {
    /// Resolve a namespace URI
    pub fn from_uri(uri: &str) -> Self {
        match uri {
            HTML_NAMESPACE => Self::Html,
            SVG_NAMESPACE => Self::Svg,
            MATHML_NAMESPACE => Self::MathMl,
            other => Self::Other(other.to_string()),
        }
    }

    /// Namespace URI
    pub fn uri(&self) -> &str {
        match self {
            Self::Html => HTML_NAMESPACE,
            Self::Svg => SVG_NAMESPACE,
            Self::MathMl => MATHML_NAMESPACE,
            Self::Other(uri) => uri,
        }
    }
}

/// DOM exceptions raised by mutation and lookup operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("InvalidCharacterError: '{name}' is not a valid name")]
    InvalidCharacter { name: String },

    #[error("SyntaxError: '{token}' is not a valid token")]
    InvalidToken { token: String },

    #[error("SyntaxError: '{key}' is not a valid dataset key")]
    InvalidDatasetKey { key: String },

    #[error("SyntaxError: '{selector}' is not a valid selector: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("TypeError: property '{property}' is read-only")]
    ReadOnly { property: String },

    #[error("TypeError: '{property}' is not a property of <{element}>")]
    UnknownProperty { property: String, element: String },

    #[error("HierarchyRequestError: the new child would create a cycle")]
    HierarchyRequest,

    #[error("WrongDocumentError: node belongs to a different document")]
    WrongDocument,
}
