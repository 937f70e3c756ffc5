//! Engine Configuration

use serde::{Deserialize, Serialize};

use fos_dom::{MATHML_NAMESPACE, SVG_NAMESPACE};

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid selector marker: {0:?}")]
    InvalidMarker(char),

    #[error("Invalid namespace prefix: '{0}'")]
    InvalidPrefix(String),
}

/// Tag prefix that creates namespaced nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRule {
    /// Root tag name, also the `prefix:` form
    pub prefix: String,

    /// Namespace URI
    pub uri: String,
}

impl NamespaceRule {
    pub fn new(prefix: &str, uri: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
        }
    }

    /// Local name if `tag` belongs to this namespace
    pub fn local_name<'a>(&self, tag: &'a str) -> Option<&'a str> {
        if tag == self.prefix {
            return Some(tag);
        }
        tag.strip_prefix(self.prefix.as_str())?.strip_prefix(':')
    }
}

/// Engine configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Marks a tag identifier as a selector lookup
    pub selector_marker: char,

    /// Option key carrying the customized built-in name
    pub hint_key: String,

    /// Namespaced tag prefixes, checked in order
    pub namespaces: Vec<NamespaceRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selector_marker: '<',
            hint_key: "is".to_string(),
            namespaces: vec![
                NamespaceRule::new("svg", SVG_NAMESPACE),
                NamespaceRule::new("math", MATHML_NAMESPACE),
            ],
        }
    }
}

impl Config {
    /// Load from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields a tag identifier is matched against
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selector_marker.is_whitespace() || self.selector_marker.is_ascii_alphanumeric() {
            return Err(ConfigError::InvalidMarker(self.selector_marker));
        }
        for rule in &self.namespaces {
            if rule.prefix.is_empty() || rule.prefix.contains(':') || rule.prefix.starts_with(self.selector_marker) {
                return Err(ConfigError::InvalidPrefix(rule.prefix.clone()));
            }
        }
        Ok(())
    }

    /// Namespace URI and local name for a namespaced tag
    pub fn namespace_for<'a>(&self, tag: &'a str) -> Option<(&str, &'a str)> {
        self.namespaces
            .iter()
            .find_map(|rule| rule.local_name(tag).map(|local| (rule.uri.as_str(), local)))
    }
}
