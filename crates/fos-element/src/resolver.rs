//! Option Resolver
//!
//! Applies an option bag to a node. Every key runs through a fixed sequence
//! of rules; the first rule that handles the pair ends its resolution, so
//! each pair causes at most one mutation. A rule may also rewrite the key or
//! value before passing the pair on (`class` becomes `className`, `?`
//! coerces to a boolean, `@` strips its marker).
//!
//! Resolution never fails. A property write the platform refuses degrades to
//! an attribute write; other refusals are logged and the key is skipped.

use std::borrow::Cow;

use fos_dom::{DomError, ListenerOptions};
use tracing::{trace, warn};

use crate::binding::ElementBinding;
use crate::coerce::{to_js_string, to_json_text};
use crate::options::{Key, Options};
use crate::value::{Symbol, Value};

/// Effect of resolving one pair
#[derive(Debug)]
enum Outcome {
    /// Hint consumed at creation
    Skipped,
    /// Nullish value or unusable shape
    Ignored,
    Property(String),
    /// Property write refused, written as an attribute instead
    PropertyFallback(String),
    Attribute(String),
    BooleanAttribute(String, bool),
    JsonAttribute(String),
    Aria(usize),
    Dataset(usize),
    Style,
    ClassTokens(usize),
    Listener(String),
    /// Platform refused every path for this key
    Refused(String, DomError),
}

/// Key/value pair as it moves through the rules
struct Pair<'a> {
    key: Cow<'a, str>,
    value: Cow<'a, Value>,
}

enum Step<'a> {
    Done(Outcome),
    Next(Pair<'a>),
}

/// A rule sees the node, the consumed hint key and the pair
type Rule<N> = for<'a> fn(&N, Option<&str>, Pair<'a>) -> Step<'a>;

/// Rules in evaluation order
fn rules<N: ElementBinding>() -> [Rule<N>; 5] {
    [skip_consumed_hint, named_intent, settable_property, listener_markers, type_fallback]
}

/// Apply every option to `node`, in bag order
pub fn resolve<N: ElementBinding>(node: &N, options: &Options, consumed_hint: Option<&str>) {
    for (key, value) in options.iter() {
        let outcome = match key {
            Key::Str(name) => run_rules(node, consumed_hint, name, value),
            Key::Symbol(symbol) => resolve_symbol(node, symbol, value),
        };
        match &outcome {
            Outcome::Refused(name, err) => warn!("Option '{}' not applied: {}", name, err),
            outcome => trace!("Option '{}': {:?}", key, outcome),
        }
    }
}

fn run_rules<N: ElementBinding>(node: &N, consumed_hint: Option<&str>, key: &str, value: &Value) -> Outcome {
    let mut pair = Pair {
        key: Cow::Borrowed(key),
        value: Cow::Borrowed(value),
    };
    for rule in rules::<N>() {
        match rule(node, consumed_hint, pair) {
            Step::Done(outcome) => return outcome,
            Step::Next(next) => pair = next,
        }
    }
    // The fallback rule handles every pair
    Outcome::Ignored
}

/// Symbols never name a property or carry markers; they resolve under
/// their description through the type-directed fallback.
fn resolve_symbol<N: ElementBinding>(node: &N, symbol: &Symbol, value: &Value) -> Outcome {
    let Some(name) = symbol.description() else {
        return Outcome::Ignored;
    };
    let pair = Pair {
        key: Cow::Borrowed(name),
        value: Cow::Borrowed(value),
    };
    match type_fallback(node, None, pair) {
        Step::Done(outcome) => outcome,
        Step::Next(_) => Outcome::Ignored,
    }
}

// ----------------------------------------------------------------------
// Rule 1: hint consumed by the provider
// ----------------------------------------------------------------------

fn skip_consumed_hint<'a, N: ElementBinding>(_node: &N, hint: Option<&str>, pair: Pair<'a>) -> Step<'a> {
    if hint == Some(&*pair.key) {
        return Step::Done(Outcome::Skipped);
    }
    Step::Next(pair)
}

// ----------------------------------------------------------------------
// Rule 2: named intents, unless the node has a property of that name
// ----------------------------------------------------------------------

fn named_intent<'a, N: ElementBinding>(node: &N, _hint: Option<&str>, pair: Pair<'a>) -> Step<'a> {
    if node.has_property(&pair.key) {
        return Step::Next(pair);
    }
    let retarget = |property: &'static str, pair: Pair<'a>| {
        Step::Next(Pair {
            key: Cow::Borrowed(property),
            value: pair.value,
        })
    };
    match &*pair.key {
        "aria" => Step::Done(apply_aria(node, &pair.value)),
        "data" => Step::Done(apply_dataset(node, &pair.value)),
        "style" => Step::Done(apply_style(node, &pair.value)),
        "class" => retarget("className", pair),
        "html" => retarget("innerHTML", pair),
        "text" => retarget("textContent", pair),
        _ => Step::Next(pair),
    }
}

fn apply_aria<N: ElementBinding>(node: &N, value: &Value) -> Outcome {
    let Some(entries) = value.as_object() else {
        return Outcome::Ignored;
    };
    let mut written = 0;
    for (sub_key, sub_value) in entries.iter() {
        let name = if sub_key == "role" {
            "role".to_string()
        } else {
            format!("aria-{}", sub_key.to_lowercase())
        };
        match node.set_attribute(&name, &to_js_string(sub_value)) {
            Ok(()) => written += 1,
            Err(err) => warn!("ARIA attribute '{}' not applied: {}", name, err),
        }
    }
    Outcome::Aria(written)
}

fn apply_dataset<N: ElementBinding>(node: &N, value: &Value) -> Outcome {
    let Some(entries) = value.as_object() else {
        return Outcome::Ignored;
    };
    let mut written = 0;
    for (key, entry) in entries.iter() {
        match node.set_dataset(key, &to_js_string(entry)) {
            Ok(()) => written += 1,
            Err(err) => warn!("Dataset entry '{}' not applied: {}", key, err),
        }
    }
    Outcome::Dataset(written)
}

fn apply_style<N: ElementBinding>(node: &N, value: &Value) -> Outcome {
    let result = if node.is_namespaced() {
        node.set_attribute("style", &to_js_string(value))
    } else {
        let css = if value.is_nullish() { String::new() } else { to_js_string(value) };
        node.set_style_text(&css)
    };
    match result {
        Ok(()) => Outcome::Style,
        Err(err) => Outcome::Refused("style".to_string(), err),
    }
}

// ----------------------------------------------------------------------
// Rule 3: settable properties
// ----------------------------------------------------------------------

fn settable_property<'a, N: ElementBinding>(node: &N, _hint: Option<&str>, pair: Pair<'a>) -> Step<'a> {
    if !node.has_property(&pair.key) {
        return Step::Next(pair);
    }
    if pair.key == "classList" {
        return Step::Done(add_class_tokens(node, &pair.value));
    }

    let key = pair.key.into_owned();
    let outcome = match node.set_property(&key, &pair.value) {
        Ok(()) => Outcome::Property(key),
        Err(refused) => {
            trace!("Property '{}' refused ({}), writing attribute", key, refused);
            match node.set_attribute(&key, &to_js_string(&pair.value)) {
                Ok(()) => Outcome::PropertyFallback(key),
                Err(err) => Outcome::Refused(key, err),
            }
        }
    };
    Step::Done(outcome)
}

fn add_class_tokens<N: ElementBinding>(node: &N, value: &Value) -> Outcome {
    let tokens: Vec<String> = match value {
        Value::Undefined | Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(to_js_string).collect(),
        Value::String(s) => s.split_ascii_whitespace().map(str::to_string).collect(),
        other => vec![to_js_string(other)],
    };
    let mut added = 0;
    for token in &tokens {
        match node.add_class(token) {
            Ok(()) => added += 1,
            Err(err) => warn!("Class token '{}' not applied: {}", token, err),
        }
    }
    Outcome::ClassTokens(added)
}

// ----------------------------------------------------------------------
// Rule 4: `?` and `@` markers
// ----------------------------------------------------------------------

fn listener_markers<'a, N: ElementBinding>(node: &N, _hint: Option<&str>, pair: Pair<'a>) -> Step<'a> {
    // `?` coerces, then shares the single marker strip with `@`
    let value = match pair.key.chars().next() {
        Some('?') => Cow::Owned(Value::Bool(pair.value.truthy())),
        Some('@') => pair.value,
        _ => return Step::Next(pair),
    };
    let key = match pair.key {
        Cow::Borrowed(k) => Cow::Borrowed(&k[1..]),
        Cow::Owned(k) => Cow::Owned(k[1..].to_string()),
    };

    let Some(items) = value.as_sequence() else {
        return Step::Next(Pair { key, value });
    };
    let Some(listener) = items.first().and_then(Value::as_listener) else {
        return Step::Done(Outcome::Ignored);
    };
    let options = listener_options(items.get(1));
    let outcome = match node.add_listener(&key, listener, options) {
        Ok(()) => Outcome::Listener(key.into_owned()),
        Err(err) => Outcome::Refused(key.into_owned(), err),
    };
    Step::Done(outcome)
}

/// Third `addEventListener` argument: an options object or a capture flag
fn listener_options(value: Option<&Value>) -> ListenerOptions {
    match value {
        Some(Value::Object(object)) => {
            let flag = |name: &str| object.get(name).is_some_and(Value::truthy);
            ListenerOptions {
                capture: flag("capture"),
                once: flag("once"),
                passive: flag("passive"),
            }
        }
        Some(other) => ListenerOptions {
            capture: other.truthy(),
            ..Default::default()
        },
        None => ListenerOptions::default(),
    }
}

// ----------------------------------------------------------------------
// Rule 5: type-directed fallback
// ----------------------------------------------------------------------

fn type_fallback<'a, N: ElementBinding>(node: &N, _hint: Option<&str>, pair: Pair<'a>) -> Step<'a> {
    let key = pair.key.into_owned();
    let value = &*pair.value;

    let result = match value {
        Value::Bool(present) => node
            .toggle_attribute(&key, *present)
            .map(|()| Outcome::BooleanAttribute(key.clone(), *present)),
        Value::Undefined | Value::Null => Ok(Outcome::Ignored),
        Value::Function(_) | Value::Handler(_) => match value.as_listener() {
            Some(listener) => node
                .add_listener(&key, listener, ListenerOptions::default())
                .map(|()| Outcome::Listener(key.clone())),
            None => Ok(Outcome::Ignored),
        },
        Value::Array(_) | Value::Object(_) => node
            .set_attribute(&key, &to_json_text(value))
            .map(|()| Outcome::JsonAttribute(key.clone())),
        Value::Number(_) | Value::BigInt(_) | Value::String(_) | Value::Symbol(_) => node
            .set_attribute(&key, &to_js_string(value))
            .map(|()| Outcome::Attribute(key.clone())),
    };

    Step::Done(result.unwrap_or_else(|err| Outcome::Refused(key, err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Object;
    use fos_dom::Listener;
    use std::cell::RefCell;

    /// Records every call; the property surface is configurable
    #[derive(Default)]
    struct MockNode {
        properties: Vec<&'static str>,
        read_only: Vec<&'static str>,
        namespaced: bool,
        calls: RefCell<Vec<String>>,
    }

    impl MockNode {
        fn with_properties(properties: &[&'static str]) -> Self {
            Self { properties: properties.to_vec(), ..Default::default() }
        }

        fn log(&self, call: String) -> Result<(), DomError> {
            self.calls.borrow_mut().push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl ElementBinding for MockNode {
        fn has_property(&self, name: &str) -> bool {
            self.properties.iter().chain(&self.read_only).any(|p| *p == name)
        }

        fn set_property(&self, name: &str, value: &Value) -> Result<(), DomError> {
            if self.read_only.iter().any(|p| *p == name) {
                return Err(DomError::ReadOnly { property: name.to_string() });
            }
            self.log(format!("prop {}={}", name, to_js_string(value)))
        }

        fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
            if name.contains(' ') {
                return Err(DomError::InvalidCharacter { name: name.to_string() });
            }
            self.log(format!("attr {}={}", name, value))
        }

        fn toggle_attribute(&self, name: &str, present: bool) -> Result<(), DomError> {
            self.log(format!("toggle {}={}", name, present))
        }

        fn add_class(&self, token: &str) -> Result<(), DomError> {
            self.log(format!("class {}", token))
        }

        fn set_dataset(&self, key: &str, value: &str) -> Result<(), DomError> {
            self.log(format!("data {}={}", key, value))
        }

        fn set_style_text(&self, css: &str) -> Result<(), DomError> {
            self.log(format!("style {}", css))
        }

        fn add_listener(&self, event_type: &str, _listener: Listener, options: ListenerOptions) -> Result<(), DomError> {
            self.log(format!(
                "listen {} capture={} once={} passive={}",
                event_type, options.capture, options.once, options.passive
            ))
        }

        fn is_namespaced(&self) -> bool {
            self.namespaced
        }
    }

    fn run(node: &MockNode, options: Options) -> Vec<String> {
        resolve(node, &options, None);
        node.calls()
    }

    #[test]
    fn test_style_intent() {
        let plain = MockNode::default();
        assert_eq!(run(&plain, Options::new().with("style", "color: red")), vec!["style color: red"]);

        let namespaced = MockNode { namespaced: true, ..Default::default() };
        assert_eq!(run(&namespaced, Options::new().with("style", "fill: blue")), vec!["attr style=fill: blue"]);
    }

    #[test]
    fn test_property_shadows_named_intent() {
        let node = MockNode::with_properties(&["style", "data"]);
        let calls = run(
            &node,
            Options::new()
                .with("style", "x")
                .with("data", Object::new().with("a", "1")),
        );
        assert_eq!(calls, vec!["prop style=x", "prop data=[object Object]"]);
    }

    #[test]
    fn test_retargeted_keys() {
        let node = MockNode::with_properties(&["className", "innerHTML", "textContent"]);
        let calls = run(
            &node,
            Options::new().with("class", "a").with("html", "<b>").with("text", "t"),
        );
        assert_eq!(calls, vec!["prop className=a", "prop innerHTML=<b>", "prop textContent=t"]);
    }

    #[test]
    fn test_retarget_without_property_falls_back() {
        let node = MockNode::default();
        assert_eq!(run(&node, Options::new().with("class", "a")), vec!["attr className=a"]);
    }

    #[test]
    fn test_read_only_property_falls_back_to_attribute() {
        let node = MockNode { read_only: vec!["width"], ..Default::default() };
        assert_eq!(run(&node, Options::new().with("width", 10)), vec!["attr width=10"]);
    }

    #[test]
    fn test_aria_and_data() {
        let node = MockNode::default();
        let calls = run(
            &node,
            Options::new()
                .with("aria", Object::new().with("labelledBy", "x").with("role", "tab"))
                .with("data", Object::new().with("count", 3).with("flag", true).with("gone", Value::Undefined))
                .with("aria", Object::new().with("labelledBy", "y").with("hidden", Value::Null)),
        );
        assert_eq!(
            calls,
            vec![
                "attr aria-labelledby=y",
                "attr aria-hidden=null",
                "data count=3",
                "data flag=true",
                "data gone=undefined",
            ]
        );
    }

    #[test]
    fn test_non_object_aria_ignored() {
        let node = MockNode::default();
        assert!(run(&node, Options::new().with("aria", "label").with("data", 1)).is_empty());
    }

    #[test]
    fn test_class_list_shapes() {
        let node = MockNode::with_properties(&["classList"]);
        let calls = run(
            &node,
            Options::new().with("classList", Value::Array(vec!["a".into(), "b".into()])),
        );
        assert_eq!(calls, vec!["class a", "class b"]);

        let node = MockNode::with_properties(&["classList"]);
        assert_eq!(run(&node, Options::new().with("classList", " c  d ")), vec!["class c", "class d"]);

        let node = MockNode::with_properties(&["classList"]);
        assert!(run(&node, Options::new().with("classList", Value::Null)).is_empty());
    }

    #[test]
    fn test_listener_markers() {
        let node = MockNode::default();
        let f = Value::function(|_| {});
        let calls = run(
            &node,
            Options::new()
                .with("@click", Value::Array(vec![f.clone(), Object::new().with("once", true).into()]))
                .with("@focus", Value::Array(vec![f.clone(), true.into()]))
                .with("@input", f.clone())
                .with("@bad", Value::Array(vec!["nope".into()])),
        );
        assert_eq!(
            calls,
            vec![
                "listen click capture=false once=true passive=false",
                "listen focus capture=true once=false passive=false",
                "listen input capture=false once=false passive=false",
            ]
        );
    }

    #[test]
    fn test_question_marker_coerces_to_boolean() {
        let node = MockNode::default();
        let calls = run(
            &node,
            Options::new()
                .with("?hidden", 0)
                .with("?open", "yes")
                .with("?@x", Value::Array(vec![Value::function(|_| {})])),
        );
        assert_eq!(calls, vec!["toggle hidden=false", "toggle open=true", "toggle @x=true"]);
    }

    #[test]
    fn test_type_fallback() {
        let node = MockNode::default();
        let calls = run(
            &node,
            Options::new()
                .with("flag", true)
                .with("gone", Value::Undefined)
                .with("count", 2.5)
                .with("big", Value::BigInt(9))
                .with("config", Object::new().with("a", Value::Array(vec![1.into()])))
                .with("onthing", Value::function(|_| {})),
        );
        assert_eq!(
            calls,
            vec![
                "toggle flag=true",
                "attr count=2.5",
                "attr big=9",
                r#"attr config={"a":[1]}"#,
                "listen onthing capture=false once=false passive=false",
            ]
        );
    }

    #[test]
    fn test_consumed_hint_skipped() {
        let node = MockNode::default();
        resolve(&node, &Options::new().with("is", "x-y").with("title", "t"), Some("is"));
        assert_eq!(node.calls(), vec!["attr title=t"]);
    }

    #[test]
    fn test_symbol_keys() {
        let node = MockNode::default();
        let calls = run(
            &node,
            Options::new()
                .with(Symbol::new(Some("marker")), "on")
                .with(Symbol::new(None), "lost")
                .with(Symbol::new(Some("@click")), true),
        );
        assert_eq!(calls, vec!["attr marker=on", "toggle @click=true"]);
    }

    #[test]
    fn test_refusal_does_not_stop_resolution() {
        let node = MockNode::default();
        let calls = run(&node, Options::new().with("bad name", "x").with("ok", "y"));
        assert_eq!(calls, vec!["attr ok=y"]);
    }
}
