//! Platform binding
//!
//! The capabilities the engine needs from a document object model. The
//! resolver only ever talks to a node through [`ElementBinding`]; the
//! provider only talks to a document through [`DocumentScope`].

use fos_dom::{DomError, Listener, ListenerOptions};

use crate::value::Value;

/// Mutation surface of a node
pub trait ElementBinding {
    /// Whether `name` is a property of the node
    fn has_property(&self, name: &str) -> bool;

    /// Direct property write. `Err` means the platform refused it.
    fn set_property(&self, name: &str, value: &Value) -> Result<(), DomError>;

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError>;

    /// Boolean attribute: present iff `present`
    fn toggle_attribute(&self, name: &str, present: bool) -> Result<(), DomError>;

    /// `classList.add(token)`
    fn add_class(&self, token: &str) -> Result<(), DomError>;

    /// `dataset[key] = value`
    fn set_dataset(&self, key: &str, value: &str) -> Result<(), DomError>;

    /// `style.cssText = css`
    fn set_style_text(&self, css: &str) -> Result<(), DomError>;

    fn add_listener(&self, event_type: &str, listener: Listener, options: ListenerOptions) -> Result<(), DomError>;

    /// Created under a non-default namespace
    fn is_namespaced(&self) -> bool;
}

/// Creation and lookup within one document
pub trait DocumentScope {
    type Node: ElementBinding;

    /// Plain node, optionally extending a customized built-in
    fn create_element(&self, local_name: &str, is: Option<&str>) -> Result<Self::Node, DomError>;

    fn create_element_ns(&self, namespace: &str, local_name: &str) -> Result<Self::Node, DomError>;

    /// First node matching `selectors`
    fn query_selector(&self, selectors: &str) -> Result<Option<Self::Node>, DomError>;
}
