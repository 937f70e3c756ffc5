//! Option values
//!
//! The dynamic values a caller can put in an option bag, with the
//! capability queries the resolver dispatches on.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use fos_dom::{Event, EventCallback, EventHandler, Listener};

use crate::options::{KeyRank, insert_ordered};

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// Unique symbol with an optional description
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Option<String>,
}

impl Symbol {
    /// Create a fresh symbol, distinct from every other
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: description.map(str::to_string),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// Ordered string-keyed map (plain object)
#[derive(Clone, Default, PartialEq)]
pub struct Object {
    entries: Vec<(String, Value)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry, returning the previous value
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        insert_ordered(&mut self.entries, key.to_string(), value.into(), |k| KeyRank::of_str(k))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Entries in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|(k, v)| (k, v))).finish()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.insert(key.as_ref(), value);
        }
        object
    }
}

/// Dynamic option value
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Symbol(Symbol),
    Array(Vec<Value>),
    Object(Object),
    /// Callable
    Function(EventCallback),
    /// Object exposing `handleEvent`
    Handler(Rc<dyn EventHandler>),
}

impl Value {
    /// Wrap a closure as a callable value
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&mut Event) + 'static,
    {
        Value::Function(Rc::new(f))
    }

    /// `undefined` or `null`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Truthiness (`!!value`)
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_)
            | Value::Array(_)
            | Value::Object(_)
            | Value::Function(_)
            | Value::Handler(_) => true,
        }
    }

    /// Listener capability: a callable or a `handleEvent` object
    pub fn as_listener(&self) -> Option<Listener> {
        match self {
            Value::Function(f) => Some(Listener::Callback(f.clone())),
            Value::Handler(h) => Some(Listener::Handler(h.clone())),
            _ => None,
        }
    }

    /// Ordered sequence view
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Value::Handler(a), Value::Handler(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::BigInt(n) => write!(f, "{}n", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Symbol(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Object(object) => write!(f, "{:?}", object),
            Value::Function(_) => f.write_str("[Function]"),
            Value::Handler(_) => f.write_str("[Handler]"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.truthy());
        assert!(!Value::Number(f64::NAN).truthy());
        assert!(!Value::from("").truthy());
        assert!(!Value::BigInt(0).truthy());
        assert!(Value::from("0").truthy());
        assert!(Value::Array(vec![]).truthy());
        assert!(Value::Object(Object::new()).truthy());
    }

    #[test]
    fn test_listener_capability() {
        struct Noop;
        impl EventHandler for Noop {
            fn handle_event(&self, _event: &mut Event) {}
        }

        assert!(Value::function(|_| {}).as_listener().is_some());
        assert!(Value::Handler(Rc::new(Noop)).as_listener().is_some());
        assert!(Value::Object(Object::new()).as_listener().is_none());
        assert!(Value::from("click").as_listener().is_none());
    }

    #[test]
    fn test_object_enumeration_order() {
        let object = Object::new()
            .with("b", 1)
            .with("2", 2)
            .with("a", 3)
            .with("1", 4)
            .with("b", 5);
        let keys: Vec<&str> = object.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["1", "2", "b", "a"]);
        assert_eq!(object.get("b"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_symbols_are_unique() {
        let a = Symbol::new(Some("id"));
        let b = Symbol::new(Some("id"));
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
        assert_eq!(format!("{:?}", a), "Symbol(id)");
    }

    #[test]
    fn test_function_identity() {
        let f = Value::function(|_| {});
        assert_eq!(f.clone(), f);
        assert_ne!(f, Value::function(|_| {}));
    }
}
