//! DOMStringMap (dataset)
//!
//! camelCase view over an element's `data-*` attributes.

use std::collections::BTreeMap;

use crate::DomError;

/// Snapshot of an element's dataset, keyed by camelCase name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMStringMap {
    data: BTreeMap<String, String>,
}

impl DOMStringMap {
    /// Create empty string map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from data-* attributes
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut data = BTreeMap::new();
        for (name, value) in attrs {
            if let Some(key) = name.strip_prefix("data-") {
                data.insert(to_camel_case(key), value.to_string());
            }
        }
        Self { data }
    }

    /// Get value by camelCase key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }

    /// Check if key exists
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get all keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(|s| s.as_str())
    }

    /// Convert key to attribute name. A `-` followed by a lowercase ASCII
    /// letter has no camelCase spelling and is rejected.
    pub fn to_attribute_name(key: &str) -> Result<String, DomError> {
        let mut chars = key.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '-' && chars.peek().is_some_and(|n| n.is_ascii_lowercase()) {
                return Err(DomError::InvalidDatasetKey { key: key.to_string() });
            }
        }
        Ok(format!("data-{}", to_kebab_case(key)))
    }
}

/// Convert kebab-case to camelCase
fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '-' && next.is_ascii_lowercase() => {
                result.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => result.push(c),
        }
    }

    result
}

/// Convert camelCase to kebab-case
fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}
