//! Option bag
//!
//! Keys enumerate the way own properties of a script object do: array
//! indices ascending, then string keys in insertion order, then symbols in
//! insertion order.

use std::fmt;

use fos_dom::{Document, Element};

use crate::value::{Symbol, Value};

/// Option key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Str(String),
    Symbol(Symbol),
}

impl Key {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            Key::Symbol(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => f.write_str(s),
            Key::Symbol(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<Symbol> for Key {
    fn from(s: Symbol) -> Self {
        Key::Symbol(s)
    }
}

/// Enumeration class of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum KeyRank {
    Index(u32),
    Str,
    Symbol,
}

impl KeyRank {
    pub(crate) fn of_str(key: &str) -> Self {
        array_index(key).map_or(KeyRank::Str, KeyRank::Index)
    }

    fn of_key(key: &Key) -> Self {
        match key {
            Key::Str(s) => Self::of_str(s),
            Key::Symbol(_) => KeyRank::Symbol,
        }
    }
}

/// Canonical array index: no sign, no leading zeros, below 2^32 - 1
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&n| n != u32::MAX)
}

/// Insert keeping enumeration order. An existing key keeps its slot.
pub(crate) fn insert_ordered<K: PartialEq, V>(
    entries: &mut Vec<(K, V)>,
    key: K,
    value: V,
    rank: impl Fn(&K) -> KeyRank,
) -> Option<V> {
    if let Some((_, slot)) = entries.iter_mut().find(|(k, _)| *k == key) {
        return Some(std::mem::replace(slot, value));
    }
    let new_rank = rank(&key);
    let at = entries
        .iter()
        .position(|(k, _)| rank(k) > new_rank)
        .unwrap_or(entries.len());
    entries.insert(at, (key, value));
    None
}

/// Flat option bag for one `configure` call
#[derive(Clone, Default)]
pub struct Options {
    entries: Vec<(Key, Value)>,
    document: Option<Document>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an option, returning the previous value
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        insert_ordered(&mut self.entries, key.into(), value.into(), KeyRank::of_key)
    }

    /// Value of a string key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Options in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Document scope for creation and lookup
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn set_document(&mut self, document: Document) {
        self.document = Some(document);
    }

    /// Builder-style `set_document`
    pub fn with_document(mut self, document: Document) -> Self {
        self.set_document(document);
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k.to_string(), v)))
            .finish()
    }
}

/// Child appended after options are resolved
#[derive(Debug, Clone)]
pub enum Child {
    Element(Element),
    Text(String),
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Element(element)
    }
}

impl From<&Element> for Child {
    fn from(element: &Element) -> Self {
        Child::Element(element.clone())
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(options: &Options) -> Vec<String> {
        options.iter().map(|(k, _)| k.to_string()).collect()
    }

    #[test]
    fn test_array_index() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("42"), Some(42));
        assert_eq!(array_index("042"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("1.5"), None);
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index(""), None);
    }

    #[test]
    fn test_enumeration_order() {
        let sym = Symbol::new(Some("s"));
        let options = Options::new()
            .with(sym, 1)
            .with("title", "t")
            .with("10", 1)
            .with("@click", Value::Null)
            .with("2", 2);
        assert_eq!(keys(&options), vec!["2", "10", "title", "@click", "Symbol(s)"]);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut options = Options::new().with("a", 1).with("b", 2);
        let previous = options.insert("a", 3);
        assert_eq!(previous, Some(Value::Number(1.0)));
        assert_eq!(keys(&options), vec!["a", "b"]);
        assert_eq!(options.get("a"), Some(&Value::Number(3.0)));
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn test_document_is_not_an_option() {
        let options = Options::new().with_document(Document::default());
        assert!(options.is_empty());
        assert!(options.document().is_some());
        assert!(options.get("document").is_none());
    }
}
