//! Element Attributes
//!
//! Attribute manipulation: get, set, remove, has, toggle.

use std::collections::HashMap;

use crate::DomError;

/// Named node map (attribute collection)
#[derive(Debug, Clone, Default)]
pub struct NamedNodeMap {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl NamedNodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of attributes
    pub fn length(&self) -> usize {
        self.attributes.len()
    }

    /// Get attribute by index
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.attributes.get(index)
    }

    /// Get attribute by name
    pub fn get_named_item(&self, name: &str) -> Option<&Attr> {
        self.by_name.get(name).and_then(|&i| self.attributes.get(i))
    }

    /// Get attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.get_named_item(name).map(|a| a.value.as_str())
    }

    /// Set attribute, replacing the value in place if it exists
    pub fn set_named_item(&mut self, attr: Attr) -> Option<Attr> {
        if let Some(&index) = self.by_name.get(&attr.name) {
            Some(std::mem::replace(&mut self.attributes[index], attr))
        } else {
            self.by_name.insert(attr.name.clone(), self.attributes.len());
            self.attributes.push(attr);
            None
        }
    }

    /// Set attribute by name/value
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.set_named_item(Attr::new(name, value));
    }

    /// Remove attribute by name
    pub fn remove_named_item(&mut self, name: &str) -> Option<Attr> {
        let index = self.by_name.remove(name)?;
        // Update indices for items after removed
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some(self.attributes.remove(index))
    }

    /// Check if attribute exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Toggle attribute, returns whether it is present afterwards
    pub fn toggle_attribute(&mut self, name: &str, force: Option<bool>) -> bool {
        match force {
            Some(true) => {
                if !self.has_attribute(name) {
                    self.set_attribute(name, "");
                }
                true
            }
            Some(false) => {
                self.remove_named_item(name);
                false
            }
            None => {
                if self.has_attribute(name) {
                    self.remove_named_item(name);
                    false
                } else {
                    self.set_attribute(name, "");
                    true
                }
            }
        }
    }

    /// Get attribute names
    pub fn get_attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Iterate over attributes
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

/// Validate an attribute name: non-empty, without ASCII whitespace,
/// NUL, `/`, `=` or `>`
pub fn validate_attribute_name(name: &str) -> Result<(), DomError> {
    let invalid = name.is_empty()
        || name.chars().any(|c| {
            c.is_ascii_whitespace() || matches!(c, '\0' | '/' | '=' | '>')
        });
    if invalid {
        Err(DomError::InvalidCharacter { name: name.to_string() })
    } else {
        Ok(())
    }
}

/// Validate an element local name: starts with an ASCII letter and
/// contains no ASCII whitespace, NUL, `/` or `>`
pub fn validate_element_name(name: &str) -> Result<(), DomError> {
    let starts_alpha = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    let invalid = !starts_alpha
        || name.chars().any(|c| c.is_ascii_whitespace() || matches!(c, '\0' | '/' | '>'));
    if invalid {
        Err(DomError::InvalidCharacter { name: name.to_string() })
    } else {
        Ok(())
    }
}
