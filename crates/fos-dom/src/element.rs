//! Element handle
//!
//! Script-facing element API: attributes, classList, dataset, style,
//! IDL properties, listeners and child insertion. Every method borrows the
//! owning document for the duration of the call only, so listeners are
//! free to mutate the tree while an event is dispatched.

use std::fmt;

use crate::attributes::validate_attribute_name;
use crate::events::RegisteredListener;
use crate::properties::{self, PropertyKind, PropertyValue};
use crate::serialize;
use crate::{
    CssDeclarations, DOMStringMap, DOMTokenList, Document, DomError, ElementData, Event,
    EventPhase, Listener, ListenerOptions, Namespace, Node, NodeId,
};

/// Handle to an element node
#[derive(Clone)]
pub struct Element {
    document: Document,
    id: NodeId,
}

impl Element {
    pub(crate) fn new(document: Document, id: NodeId) -> Self {
        Self { document, id }
    }

    /// Arena index of this element
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Document the element belongs to
    pub fn owner_document(&self) -> Document {
        self.document.clone()
    }

    fn with_element<R>(&self, f: impl FnOnce(&ElementData) -> R) -> R {
        let data = self.document.data();
        match data.tree.get(self.id).and_then(Node::as_element) {
            Some(element) => f(element),
            None => unreachable!("element handle {:?} points at a non-element node", self.id),
        }
    }

    fn with_element_mut<R>(&self, f: impl FnOnce(&mut ElementData) -> R) -> R {
        let mut data = self.document.data_mut();
        match data.tree.get_mut(self.id).and_then(Node::as_element_mut) {
            Some(element) => f(element),
            None => unreachable!("element handle {:?} points at a non-element node", self.id),
        }
    }

    /// Element namespace
    pub fn namespace(&self) -> Namespace {
        self.with_element(|e| e.namespace.clone())
    }

    /// Check if the element is in the HTML namespace
    pub fn is_html(&self) -> bool {
        self.with_element(|e| e.namespace == Namespace::Html)
    }

    /// Local name
    pub fn local_name(&self) -> String {
        self.with_element(|e| e.local_name.clone())
    }

    /// `tagName`
    pub fn tag_name(&self) -> String {
        self.with_element(ElementData::tag_name)
    }

    /// Customized built-in name given at creation
    pub fn is_value(&self) -> Option<String> {
        self.with_element(|e| e.is.clone())
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// HTML elements match attribute names case-insensitively
    fn attribute_name(&self, name: &str) -> String {
        if self.is_html() {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let name = self.attribute_name(name);
        self.with_element(|e| e.get_attr(&name).map(str::to_string))
    }

    /// Check if an attribute is present
    pub fn has_attribute(&self, name: &str) -> bool {
        let name = self.attribute_name(name);
        self.with_element(|e| e.attrs.has_attribute(&name))
    }

    /// Set an attribute
    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        validate_attribute_name(name)?;
        let name = self.attribute_name(name);
        self.with_element_mut(|e| e.set_attr(&name, value));
        Ok(())
    }

    /// Remove an attribute
    pub fn remove_attribute(&self, name: &str) {
        let name = self.attribute_name(name);
        self.with_element_mut(|e| {
            e.attrs.remove_named_item(&name);
        });
    }

    /// Toggle an attribute, returns whether it is present afterwards
    pub fn toggle_attribute(&self, name: &str, force: Option<bool>) -> Result<bool, DomError> {
        validate_attribute_name(name)?;
        let name = self.attribute_name(name);
        Ok(self.with_element_mut(|e| e.attrs.toggle_attribute(&name, force)))
    }

    /// Attribute names in insertion order
    pub fn attribute_names(&self) -> Vec<String> {
        self.with_element(|e| {
            e.attrs
                .get_attribute_names()
                .into_iter()
                .map(str::to_string)
                .collect()
        })
    }

    // ------------------------------------------------------------------
    // classList / dataset / style
    // ------------------------------------------------------------------

    /// Snapshot of the class list
    pub fn class_list(&self) -> DOMTokenList {
        self.with_element(|e| DOMTokenList::from_string(e.get_attr("class").unwrap_or("")))
    }

    /// `classList.add(token)`
    pub fn add_class(&self, token: &str) -> Result<(), DomError> {
        let mut list = self.class_list();
        list.add(token)?;
        let value = list.value();
        self.with_element_mut(|e| e.set_attr("class", &value));
        Ok(())
    }

    /// Snapshot of the dataset
    pub fn dataset(&self) -> DOMStringMap {
        self.with_element(|e| {
            DOMStringMap::from_attributes(e.attrs.iter().map(|a| (a.name.as_str(), a.value.as_str())))
        })
    }

    /// `dataset[key]`
    pub fn dataset_get(&self, key: &str) -> Option<String> {
        let name = DOMStringMap::to_attribute_name(key).ok()?;
        self.with_element(|e| e.get_attr(&name).map(str::to_string))
    }

    /// `dataset[key] = value`
    pub fn dataset_set(&self, key: &str, value: &str) -> Result<(), DomError> {
        let name = DOMStringMap::to_attribute_name(key)?;
        validate_attribute_name(&name)?;
        self.with_element_mut(|e| e.set_attr(&name, value));
        Ok(())
    }

    /// `style.cssText`
    pub fn style_text(&self) -> String {
        self.with_element(|e| CssDeclarations::parse(e.get_attr("style").unwrap_or("")).css_text())
    }

    /// `style.cssText = css`
    pub fn set_style_text(&self, css: &str) {
        let text = CssDeclarations::parse(css).css_text();
        self.with_element_mut(|e| e.set_attr("style", &text));
    }

    // ------------------------------------------------------------------
    // IDL properties
    // ------------------------------------------------------------------

    /// How a property is backed, if the element has it
    pub fn property_kind(&self, name: &str) -> Option<PropertyKind> {
        self.with_element(|e| properties::lookup(&e.namespace, &e.local_name, name))
    }

    /// `name in element`
    pub fn has_property(&self, name: &str) -> bool {
        self.property_kind(name).is_some()
    }

    /// Read a property
    pub fn get_property(&self, name: &str) -> Option<PropertyValue> {
        let kind = self.property_kind(name)?;
        let value = match kind {
            PropertyKind::Reflect(attr) => {
                PropertyValue::String(self.get_attribute(attr).unwrap_or_default())
            }
            PropertyKind::ReflectBool(attr) => PropertyValue::Bool(self.has_attribute(attr)),
            PropertyKind::ClassName | PropertyKind::ClassList => {
                PropertyValue::String(self.get_attribute("class").unwrap_or_default())
            }
            PropertyKind::Style => PropertyValue::String(self.style_text()),
            PropertyKind::TextContent => PropertyValue::String(self.text_content()),
            PropertyKind::InnerHtml => PropertyValue::String(self.inner_html()),
            PropertyKind::Handler(event) => self.with_element(|e| {
                e.handlers
                    .get(event)
                    .cloned()
                    .map_or(PropertyValue::Null, PropertyValue::Listener)
            }),
            PropertyKind::Stored => self.with_element(|e| {
                e.stored.get(name).cloned().unwrap_or(PropertyValue::Null)
            }),
            PropertyKind::Dataset => PropertyValue::Null,
            PropertyKind::ReadOnly => match name {
                "tagName" | "nodeName" => PropertyValue::String(self.tag_name()),
                "localName" => PropertyValue::String(self.local_name()),
                "namespaceURI" => PropertyValue::String(self.namespace().uri().to_string()),
                "className" => PropertyValue::String(self.get_attribute("class").unwrap_or_default()),
                other => self
                    .get_attribute(other)
                    .map_or(PropertyValue::Null, PropertyValue::String),
            },
        };
        Some(value)
    }

    /// Write a property. Fails for unknown and read-only properties.
    pub fn set_property(&self, name: &str, value: PropertyValue) -> Result<(), DomError> {
        let kind = self.property_kind(name).ok_or_else(|| DomError::UnknownProperty {
            property: name.to_string(),
            element: self.local_name(),
        })?;

        match kind {
            PropertyKind::Reflect(attr) => self.set_attribute(attr, &value.to_dom_string()),
            PropertyKind::ReflectBool(attr) => {
                self.toggle_attribute(attr, Some(value.truthy())).map(|_| ())
            }
            PropertyKind::ClassName | PropertyKind::ClassList => {
                self.set_attribute("class", &value.to_dom_string())
            }
            PropertyKind::Style => {
                self.set_style_text(&value.to_string_or_empty());
                Ok(())
            }
            PropertyKind::TextContent => {
                self.set_text_content(&value.to_string_or_empty());
                Ok(())
            }
            PropertyKind::InnerHtml => {
                self.set_inner_html(&value.to_string_or_empty());
                Ok(())
            }
            PropertyKind::Handler(event) => {
                self.with_element_mut(|e| match value {
                    PropertyValue::Listener(listener) => {
                        e.handlers.insert(event.to_string(), listener);
                    }
                    _ => {
                        e.handlers.remove(event);
                    }
                });
                Ok(())
            }
            PropertyKind::Stored => {
                self.with_element_mut(|e| {
                    e.stored.insert(name.to_string(), value);
                });
                Ok(())
            }
            PropertyKind::Dataset | PropertyKind::ReadOnly => Err(DomError::ReadOnly {
                property: name.to_string(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    /// Append an element as the last child
    pub fn append_child(&self, child: &Element) -> Result<(), DomError> {
        if !self.document.ptr_eq(&child.document) {
            return Err(DomError::WrongDocument);
        }
        self.document.data_mut().tree.append_child(self.id, child.id)
    }

    /// Append a text node as the last child
    pub fn append_text(&self, text: &str) -> Result<(), DomError> {
        let mut data = self.document.data_mut();
        let node = data.tree.push(Node::text(text.to_string()));
        data.tree.append_child(self.id, node)
    }

    /// Parent element, if attached under one
    pub fn parent_element(&self) -> Option<Element> {
        let parent = {
            let data = self.document.data();
            let parent = data.tree.get(self.id).map_or(NodeId::NONE, |n| n.parent);
            data.tree.get(parent).filter(|n| n.is_element()).map(|_| parent)
        };
        parent.map(|id| Element::new(self.document.clone(), id))
    }

    /// Child elements
    pub fn children(&self) -> Vec<Element> {
        let ids: Vec<NodeId> = {
            let data = self.document.data();
            data.tree
                .children(self.id)
                .filter(|(_, n)| n.is_element())
                .map(|(id, _)| id)
                .collect()
        };
        ids.into_iter()
            .map(|id| Element::new(self.document.clone(), id))
            .collect()
    }

    /// Number of child nodes of any kind
    pub fn child_node_count(&self) -> usize {
        self.document.data().tree.children(self.id).count()
    }

    /// `textContent`
    pub fn text_content(&self) -> String {
        self.document.data().tree.text_content(self.id)
    }

    /// `textContent = text`: replaces all children
    pub fn set_text_content(&self, text: &str) {
        let mut data = self.document.data_mut();
        data.tree.remove_children(self.id);
        if !text.is_empty() {
            let node = data.tree.push(Node::text(text.to_string()));
            // A fresh text node under an element cannot fail
            let _ = data.tree.append_child(self.id, node);
        }
    }

    /// `innerHTML`
    pub fn inner_html(&self) -> String {
        serialize::inner_html(&self.document.data().tree, self.id)
    }

    /// `innerHTML = markup`: replaces all children with the markup, unparsed
    pub fn set_inner_html(&self, markup: &str) {
        let mut data = self.document.data_mut();
        data.tree.remove_children(self.id);
        if !markup.is_empty() {
            let node = data.tree.push(Node::markup(markup.to_string()));
            let _ = data.tree.append_child(self.id, node);
        }
    }

    /// `outerHTML`
    pub fn outer_html(&self) -> String {
        serialize::outer_html(&self.document.data().tree, self.id)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// `addEventListener`. A listener already registered for the same
    /// type and capture flag is not added twice.
    pub fn add_event_listener(&self, event_type: &str, listener: Listener, options: ListenerOptions) {
        self.with_element_mut(|e| {
            let duplicate = e.listeners.iter().any(|l| {
                l.event_type == event_type
                    && l.options.capture == options.capture
                    && l.listener.same(&listener)
            });
            if !duplicate {
                e.listeners.push(RegisteredListener {
                    event_type: event_type.to_string(),
                    listener,
                    options,
                });
            }
        });
    }

    /// `removeEventListener`
    pub fn remove_event_listener(&self, event_type: &str, listener: &Listener, capture: bool) {
        self.with_element_mut(|e| {
            e.listeners.retain(|l| {
                !(l.event_type == event_type && l.options.capture == capture && l.listener.same(listener))
            });
        });
    }

    /// Listeners registered for an event type
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.with_element(|e| e.listeners.iter().filter(|l| l.event_type == event_type).count())
    }

    /// Options of the listeners registered for an event type
    pub fn listener_options(&self, event_type: &str) -> Vec<ListenerOptions> {
        self.with_element(|e| {
            e.listeners
                .iter()
                .filter(|l| l.event_type == event_type)
                .map(|l| l.options)
                .collect()
        })
    }

    /// Dispatch an event through capture, target and bubble phases.
    /// Returns `false` if a listener prevented the default action.
    pub fn dispatch_event(&self, event: &mut Event) -> bool {
        event.target = Some(self.id);

        let mut path: Vec<NodeId> = Vec::new();
        {
            let data = self.document.data();
            let mut current = data.tree.get(self.id).map_or(NodeId::NONE, |n| n.parent);
            while let Some(node) = data.tree.get(current) {
                if node.is_element() {
                    path.push(current);
                }
                current = node.parent;
            }
        }
        path.reverse();

        for &node in &path {
            if event.propagation_stopped {
                break;
            }
            self.invoke_listeners(node, event, EventPhase::Capturing);
        }
        if !event.propagation_stopped {
            self.invoke_listeners(self.id, event, EventPhase::AtTarget);
        }
        if event.bubbles {
            for &node in path.iter().rev() {
                if event.propagation_stopped {
                    break;
                }
                self.invoke_listeners(node, event, EventPhase::Bubbling);
            }
        }

        event.phase = EventPhase::None;
        event.current_target = None;
        !event.is_default_prevented()
    }

    fn invoke_listeners(&self, node: NodeId, event: &mut Event, phase: EventPhase) {
        let (listeners, handler) = {
            let mut data = self.document.data_mut();
            let Some(element) = data.tree.get_mut(node).and_then(Node::as_element_mut) else {
                return;
            };
            let matching: Vec<RegisteredListener> = element
                .listeners
                .iter()
                .filter(|l| {
                    l.event_type == event.event_type
                        && match phase {
                            EventPhase::Capturing => l.options.capture,
                            EventPhase::Bubbling => !l.options.capture,
                            _ => true,
                        }
                })
                .cloned()
                .collect();
            // `once` listeners go away before they run
            element.listeners.retain(|l| {
                !(l.options.once
                    && matching.iter().any(|m| {
                        m.event_type == l.event_type
                            && m.options.capture == l.options.capture
                            && m.listener.same(&l.listener)
                    }))
            });
            let handler = match phase {
                EventPhase::Capturing => None,
                _ => element.handlers.get(&event.event_type).cloned(),
            };
            (matching, handler)
        };

        event.phase = phase;
        event.current_target = Some(node);
        for registered in &listeners {
            if event.immediate_stopped {
                return;
            }
            event.in_passive_listener = registered.options.passive;
            registered.listener.invoke(event);
            event.in_passive_listener = false;
        }
        if let Some(handler) = handler {
            if !event.immediate_stopped {
                handler.invoke(event);
            }
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.document.ptr_eq(&other.document)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SVG_NAMESPACE;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn div() -> Element {
        Document::default().create_element("div", None).unwrap()
    }

    #[test]
    fn test_attribute_names_lowercased_for_html() {
        let el = div();
        el.set_attribute("aria-Label", "x").unwrap();
        assert_eq!(el.get_attribute("aria-label").as_deref(), Some("x"));

        let svg = Document::default().create_element_ns(SVG_NAMESPACE, "svg").unwrap();
        svg.set_attribute("viewBox", "0 0 10 10").unwrap();
        assert!(svg.has_attribute("viewBox"));
        assert!(!svg.has_attribute("viewbox"));
    }

    #[test]
    fn test_invalid_attribute_name() {
        let el = div();
        assert!(el.set_attribute("", "x").is_err());
        assert!(el.toggle_attribute("a b", Some(true)).is_err());
        assert!(el.attribute_names().is_empty());
    }

    #[test]
    fn test_class_list_reflects_attribute() {
        let el = div();
        el.set_attribute("class", "a").unwrap();
        el.add_class("b").unwrap();
        el.add_class("a").unwrap();
        assert_eq!(el.get_attribute("class").as_deref(), Some("a b"));
        assert!(el.add_class("").is_err());
    }

    #[test]
    fn test_dataset() {
        let el = div();
        el.dataset_set("userId", "7").unwrap();
        assert_eq!(el.get_attribute("data-user-id").as_deref(), Some("7"));
        assert_eq!(el.dataset_get("userId").as_deref(), Some("7"));
        assert_eq!(el.dataset().get("userId"), Some("7"));
        assert!(el.dataset_set("user-id", "7").is_err());
    }

    #[test]
    fn test_reflected_properties() {
        let el = div();
        el.set_property("id", "main".into()).unwrap();
        el.set_property("hidden", true.into()).unwrap();
        el.set_property("className", "a b".into()).unwrap();
        el.set_property("tabIndex", PropertyValue::Number(2.0)).unwrap();

        assert_eq!(el.get_attribute("id").as_deref(), Some("main"));
        assert!(el.has_attribute("hidden"));
        assert_eq!(el.get_attribute("class").as_deref(), Some("a b"));
        assert_eq!(el.get_attribute("tabindex").as_deref(), Some("2"));
        assert_eq!(el.get_property("hidden"), Some(PropertyValue::Bool(true)));

        el.set_property("hidden", false.into()).unwrap();
        assert!(!el.has_attribute("hidden"));
    }

    #[test]
    fn test_text_and_html_properties() {
        let el = div();
        el.set_property("textContent", "a < b".into()).unwrap();
        assert_eq!(el.text_content(), "a < b");
        assert_eq!(el.inner_html(), "a &lt; b");

        el.set_property("innerHTML", "<i>x</i>".into()).unwrap();
        assert_eq!(el.inner_html(), "<i>x</i>");
        assert_eq!(el.child_node_count(), 1);

        el.set_property("textContent", PropertyValue::Null).unwrap();
        assert_eq!(el.child_node_count(), 0);
    }

    #[test]
    fn test_read_only_properties() {
        let el = div();
        assert!(matches!(el.set_property("tagName", "p".into()), Err(DomError::ReadOnly { .. })));
        assert!(matches!(el.set_property("dataset", "x".into()), Err(DomError::ReadOnly { .. })));
        assert!(matches!(el.set_property("nope", "x".into()), Err(DomError::UnknownProperty { .. })));

        let svg = Document::default().create_element_ns(SVG_NAMESPACE, "svg").unwrap();
        assert!(svg.has_property("className"));
        assert!(svg.set_property("className", "icon".into()).is_err());
        assert!(svg.set_property("id", "logo".into()).is_ok());
    }

    #[test]
    fn test_style_property() {
        let el = div();
        el.set_property("style", "color: red; bogus".into()).unwrap();
        assert_eq!(el.style_text(), "color: red;");
        assert_eq!(el.get_attribute("style").as_deref(), Some("color: red;"));
    }

    #[test]
    fn test_append_child_rules() {
        let doc = Document::default();
        let parent = doc.create_element("ul", None).unwrap();
        let item = doc.create_element("li", None).unwrap();
        parent.append_child(&item).unwrap();
        parent.append_text("tail").unwrap();

        assert_eq!(parent.children(), vec![item.clone()]);
        assert_eq!(item.parent_element(), Some(parent.clone()));
        assert_eq!(parent.outer_html(), "<ul><li></li>tail</ul>");
        assert_eq!(item.append_child(&parent), Err(DomError::HierarchyRequest));

        let foreign = Document::default().create_element("li", None).unwrap();
        assert_eq!(parent.append_child(&foreign), Err(DomError::WrongDocument));
    }

    #[test]
    fn test_dispatch_and_once() {
        let el = div();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let c = calls.clone();
        el.add_event_listener("click", Listener::callback(move |_| c.borrow_mut().push("always")), ListenerOptions::default());
        let c = calls.clone();
        el.add_event_listener(
            "click",
            Listener::callback(move |_| c.borrow_mut().push("once")),
            ListenerOptions { once: true, ..Default::default() },
        );

        el.dispatch_event(&mut Event::new("click", true, true));
        el.dispatch_event(&mut Event::new("click", true, true));

        assert_eq!(*calls.borrow(), vec!["always", "once", "always"]);
        assert_eq!(el.listener_count("click"), 1);
    }

    #[test]
    fn test_duplicate_listener_ignored() {
        let el = div();
        let listener = Listener::callback(|_| {});
        el.add_event_listener("input", listener.clone(), ListenerOptions::default());
        el.add_event_listener("input", listener.clone(), ListenerOptions::default());
        assert_eq!(el.listener_count("input"), 1);

        el.add_event_listener("input", listener.clone(), ListenerOptions { capture: true, ..Default::default() });
        assert_eq!(el.listener_count("input"), 2);

        el.remove_event_listener("input", &listener, false);
        assert_eq!(el.listener_options("input"), vec![ListenerOptions { capture: true, ..Default::default() }]);
    }

    #[test]
    fn test_bubbling_and_handler_property() {
        let doc = Document::default();
        let outer = doc.create_element("div", None).unwrap();
        let inner = doc.create_element("button", None).unwrap();
        outer.append_child(&inner).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        outer.add_event_listener(
            "click",
            Listener::callback(move |e| l.borrow_mut().push(format!("capture {:?}", e.phase))),
            ListenerOptions { capture: true, ..Default::default() },
        );
        let l = log.clone();
        outer
            .set_property("onclick", PropertyValue::Listener(Listener::callback(move |e| {
                l.borrow_mut().push(format!("handler {:?}", e.phase))
            })))
            .unwrap();
        let l = log.clone();
        inner.add_event_listener(
            "click",
            Listener::callback(move |e| {
                l.borrow_mut().push(format!("target {:?}", e.phase));
                e.prevent_default();
            }),
            ListenerOptions::default(),
        );

        let allowed = inner.dispatch_event(&mut Event::new("click", true, true));
        assert!(!allowed);
        assert_eq!(
            *log.borrow(),
            vec!["capture Capturing", "target AtTarget", "handler Bubbling"]
        );
    }

    #[test]
    fn test_listener_may_mutate_tree() {
        let el = div();
        let target = el.clone();
        el.add_event_listener(
            "click",
            Listener::callback(move |_| target.set_attribute("clicked", "").unwrap()),
            ListenerOptions::default(),
        );
        el.dispatch_event(&mut Event::new("click", false, false));
        assert!(el.has_attribute("clicked"));
    }
}
