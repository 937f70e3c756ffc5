//! Node Provider
//!
//! Turns a tag identifier into the node to configure: a selector lookup,
//! a namespaced node, a plain node, or a node the caller already holds.

use fos_dom::{DomError, Element};
use tracing::debug;

use crate::binding::DocumentScope;
use crate::config::Config;
use crate::options::Options;

/// What `configure` operates on
#[derive(Debug, Clone)]
pub enum Target<N = Element> {
    /// Tag name, namespaced tag, or marker-prefixed selector
    Tag(String),
    /// Existing node, used as-is
    Node(N),
}

impl<N> From<&str> for Target<N> {
    fn from(tag: &str) -> Self {
        Target::Tag(tag.to_string())
    }
}

impl<N> From<String> for Target<N> {
    fn from(tag: String) -> Self {
        Target::Tag(tag)
    }
}

impl From<Element> for Target {
    fn from(node: Element) -> Self {
        Target::Node(node)
    }
}

impl From<&Element> for Target {
    fn from(node: &Element) -> Self {
        Target::Node(node.clone())
    }
}

/// Node handed to the resolver
#[derive(Debug)]
pub struct Provided<N> {
    pub node: N,
    /// Option key consumed at creation time
    pub consumed_hint: Option<String>,
}

impl<N> Provided<N> {
    fn new(node: N) -> Self {
        Self { node, consumed_hint: None }
    }
}

/// Produce the node for `target`. `Ok(None)` only for a selector that
/// matched nothing.
pub fn provide<D: DocumentScope>(
    target: Target<D::Node>,
    options: &Options,
    scope: &D,
    config: &Config,
) -> Result<Option<Provided<D::Node>>, DomError> {
    let tag = match target {
        Target::Node(node) => return Ok(Some(Provided::new(node))),
        Target::Tag(tag) => tag,
    };

    if let Some(selectors) = tag.strip_prefix(config.selector_marker) {
        let found = scope.query_selector(selectors)?;
        debug!("Lookup '{}': {}", selectors, if found.is_some() { "found" } else { "no match" });
        return Ok(found.map(Provided::new));
    }

    if let Some((namespace, local_name)) = config.namespace_for(&tag) {
        debug!("Creating <{}> in {}", local_name, namespace);
        let node = scope.create_element_ns(namespace, local_name)?;
        return Ok(Some(Provided::new(node)));
    }

    let hint = options.get(&config.hint_key).and_then(|v| v.as_str());
    debug!("Creating <{}>{}", tag, hint.map(|is| format!(" is={}", is)).unwrap_or_default());
    let node = scope.create_element(&tag, hint)?;
    Ok(Some(Provided {
        node,
        consumed_hint: hint.map(|_| config.hint_key.clone()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use fos_dom::{Document, Namespace};

    fn provide_in(doc: &Document, target: Target, options: &Options) -> Option<Provided<Element>> {
        provide(target, options, doc, &Config::default()).unwrap()
    }

    #[test]
    fn test_existing_node_passthrough() {
        let doc = Document::default();
        let el = doc.create_element("p", None).unwrap();
        let options = Options::new().with("is", "x-p");

        let provided = provide_in(&doc, Target::from(&el), &options).unwrap();
        assert_eq!(provided.node, el);
        assert!(provided.consumed_hint.is_none());
        assert!(el.is_value().is_none());
    }

    #[test]
    fn test_selector_lookup() {
        let doc = Document::default();
        let el = doc.create_element("p", None).unwrap();
        el.set_attribute("id", "intro").unwrap();
        doc.body().unwrap().append_child(&el).unwrap();

        let found = provide_in(&doc, "<#intro".into(), &Options::new()).unwrap();
        assert_eq!(found.node, el);
        assert!(provide_in(&doc, "<#missing".into(), &Options::new()).is_none());

        let bad = provide("<p[".into(), &Options::new(), &doc, &Config::default());
        assert!(matches!(bad, Err(DomError::InvalidSelector { .. })));
    }

    #[test]
    fn test_namespaced_creation() {
        let doc = Document::default();
        let svg = provide_in(&doc, "svg".into(), &Options::new()).unwrap().node;
        assert_eq!(svg.namespace(), Namespace::Svg);
        assert_eq!(svg.local_name(), "svg");

        let circle = provide_in(&doc, "svg:circle".into(), &Options::new()).unwrap().node;
        assert_eq!(circle.namespace(), Namespace::Svg);
        assert_eq!(circle.local_name(), "circle");
    }

    #[test]
    fn test_customized_builtin_hint() {
        let doc = Document::default();
        let options = Options::new().with("is", "fancy-button");
        let provided = provide_in(&doc, "button".into(), &options).unwrap();
        assert_eq!(provided.node.is_value().as_deref(), Some("fancy-button"));
        assert_eq!(provided.consumed_hint.as_deref(), Some("is"));

        let options = Options::new().with("is", Value::Number(1.0));
        let provided = provide_in(&doc, "button".into(), &options).unwrap();
        assert!(provided.node.is_value().is_none());
        assert!(provided.consumed_hint.is_none());
    }

    #[test]
    fn test_custom_marker() {
        let doc = Document::default();
        let config = Config { selector_marker: '$', ..Config::default() };
        let found = provide(Target::<Element>::from("$body"), &Options::new(), &doc, &config).unwrap();
        assert_eq!(found.unwrap().node, doc.body().unwrap());
    }

    #[test]
    fn test_invalid_tag_name() {
        let doc = Document::default();
        let result = provide(Target::<Element>::from("no tag"), &Options::new(), &doc, &Config::default());
        assert!(matches!(result, Err(DomError::InvalidCharacter { .. })));
    }
}
