//! Document - High-level document API
//!
//! `Document` is a cheap, clonable handle. Elements created from it share
//! its arena, so a handle stays valid for as long as any clone is alive.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::attributes::validate_element_name;
use crate::{DomError, DomTree, Element, ElementData, Namespace, Node, NodeId, SelectorList};

pub(crate) struct DocumentData {
    pub(crate) tree: DomTree,
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

/// HTML Document
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentData>>,
}

impl Document {
    /// Create a new document with `<html>`, `<head>` and `<body>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.push(Node::element(html_element("html")));
        let head = tree.push(Node::element(html_element("head")));
        let body = tree.push(Node::element(html_element("body")));

        // Fresh nodes under a fresh root cannot violate the hierarchy
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self::from_data(DocumentData {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        })
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self::from_data(DocumentData {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        })
    }

    fn from_data(data: DocumentData) -> Self {
        Self { inner: Rc::new(RefCell::new(data)) }
    }

    pub(crate) fn data(&self) -> Ref<'_, DocumentData> {
        self.inner.borrow()
    }

    pub(crate) fn data_mut(&self) -> RefMut<'_, DocumentData> {
        self.inner.borrow_mut()
    }

    /// Get document URL
    pub fn url(&self) -> String {
        self.data().url.clone()
    }

    /// Check if two handles refer to the same document
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of nodes ever allocated in this document
    pub fn node_count(&self) -> usize {
        self.data().tree.len()
    }

    /// `<html>` element
    pub fn document_element(&self) -> Option<Element> {
        self.element_at(self.data().html_element)
    }

    /// `<head>` element
    pub fn head(&self) -> Option<Element> {
        self.element_at(self.data().head_element)
    }

    /// `<body>` element
    pub fn body(&self) -> Option<Element> {
        self.element_at(self.data().body_element)
    }

    fn element_at(&self, id: NodeId) -> Option<Element> {
        id.is_valid().then(|| Element::new(self.clone(), id))
    }

    /// `createElement(localName, { is })`. HTML names are lower-cased.
    pub fn create_element(&self, local_name: &str, is: Option<&str>) -> Result<Element, DomError> {
        validate_element_name(local_name)?;
        let mut data = ElementData::new(Namespace::Html, None, local_name.to_ascii_lowercase());
        data.is = is.map(str::to_string);

        let id = self.data_mut().tree.push(Node::element(data));
        tracing::trace!("Created <{}>{}", local_name, is.map(|i| format!(" is={}", i)).unwrap_or_default());
        Ok(Element::new(self.clone(), id))
    }

    /// `createElementNS(namespace, qualifiedName)`
    pub fn create_element_ns(&self, namespace: &str, qualified_name: &str) -> Result<Element, DomError> {
        let (prefix, local_name) = match qualified_name.split_once(':') {
            Some((prefix, local)) => {
                validate_element_name(prefix)?;
                (Some(prefix.to_string()), local)
            }
            None => (None, qualified_name),
        };
        validate_element_name(local_name)?;

        let data = ElementData::new(Namespace::from_uri(namespace), prefix, local_name.to_string());
        let id = self.data_mut().tree.push(Node::element(data));
        tracing::trace!("Created <{}> in {}", qualified_name, namespace);
        Ok(Element::new(self.clone(), id))
    }

    /// First element in document order matching `selectors`
    pub fn query_selector(&self, selectors: &str) -> Result<Option<Element>, DomError> {
        let list = SelectorList::parse(selectors)?;
        let found = {
            let data = self.data();
            list.query_first(&data.tree, data.tree.root())
        };
        Ok(found.map(|id| Element::new(self.clone(), id)))
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        let found = {
            let data = self.data();
            data.tree.descendants(data.tree.root()).into_iter().find(|&node| {
                data.tree
                    .get(node)
                    .and_then(Node::as_element)
                    .is_some_and(|e| e.get_attr("id") == Some(id))
            })
        };
        found.map(|node| Element::new(self.clone(), node))
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        let data = self.data();
        crate::serialize::outer_html(&data.tree, data.tree.root())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data();
        f.debug_struct("Document")
            .field("url", &data.url)
            .field("nodes", &data.tree.len())
            .finish()
    }
}

fn html_element(name: &str) -> ElementData {
    ElementData::new(Namespace::Html, None, name.to_string())
}
