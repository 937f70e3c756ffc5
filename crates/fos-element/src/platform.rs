//! Platform binding for `fos-dom`
//!
//! Connects the engine to the in-memory DOM and holds the ambient default
//! document used when an option bag names no document.

use std::cell::RefCell;

use fos_dom::{Document, DomError, Element, Listener, ListenerOptions, Namespace, PropertyValue};

use crate::binding::{DocumentScope, ElementBinding};
use crate::coerce::to_js_string;
use crate::value::Value;

thread_local! {
    static DEFAULT_DOCUMENT: RefCell<Option<Document>> = const { RefCell::new(None) };
}

/// Ambient default document, created on first use
pub fn default_document() -> Document {
    DEFAULT_DOCUMENT.with(|slot| slot.borrow_mut().get_or_insert_with(Document::default).clone())
}

/// Replace the ambient default document, returning the previous one
pub fn set_default_document(document: Document) -> Option<Document> {
    DEFAULT_DOCUMENT.with(|slot| slot.borrow_mut().replace(document))
}

fn to_property_value(value: &Value) -> PropertyValue {
    match value {
        Value::Undefined | Value::Null => PropertyValue::Null,
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => PropertyValue::Number(*n),
        Value::String(s) => PropertyValue::String(s.clone()),
        Value::Function(_) | Value::Handler(_) => match value.as_listener() {
            Some(listener) => PropertyValue::Listener(listener),
            None => PropertyValue::Null,
        },
        other => PropertyValue::String(to_js_string(other)),
    }
}

impl ElementBinding for Element {
    fn has_property(&self, name: &str) -> bool {
        Element::has_property(self, name)
    }

    fn set_property(&self, name: &str, value: &Value) -> Result<(), DomError> {
        Element::set_property(self, name, to_property_value(value))
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        Element::set_attribute(self, name, value)
    }

    fn toggle_attribute(&self, name: &str, present: bool) -> Result<(), DomError> {
        Element::toggle_attribute(self, name, Some(present)).map(|_| ())
    }

    fn add_class(&self, token: &str) -> Result<(), DomError> {
        Element::add_class(self, token)
    }

    fn set_dataset(&self, key: &str, value: &str) -> Result<(), DomError> {
        self.dataset_set(key, value)
    }

    fn set_style_text(&self, css: &str) -> Result<(), DomError> {
        Element::set_style_text(self, css);
        Ok(())
    }

    fn add_listener(&self, event_type: &str, listener: Listener, options: ListenerOptions) -> Result<(), DomError> {
        self.add_event_listener(event_type, listener, options);
        Ok(())
    }

    fn is_namespaced(&self) -> bool {
        self.namespace() != Namespace::Html
    }
}

impl DocumentScope for Document {
    type Node = Element;

    fn create_element(&self, local_name: &str, is: Option<&str>) -> Result<Element, DomError> {
        Document::create_element(self, local_name, is)
    }

    fn create_element_ns(&self, namespace: &str, local_name: &str) -> Result<Element, DomError> {
        Document::create_element_ns(self, namespace, local_name)
    }

    fn query_selector(&self, selectors: &str) -> Result<Option<Element>, DomError> {
        Document::query_selector(self, selectors)
    }
}
