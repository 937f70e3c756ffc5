//! fOS Element - Declarative element configuration
//!
//! Creates or looks up an element and configures it from a flat option
//! bag in one call. Each option key resolves to exactly one effect:
//! property write, attribute write, dataset merge, ARIA expansion, class or
//! style shortcut, or event listener registration.
//!
//! # Example
//! ```rust,ignore
//! use fos_element::{configure, Object, Options, Value};
//!
//! let button = configure(
//!     "button",
//!     &Options::new()
//!         .with("class", "primary")
//!         .with("aria", Object::new().with("label", "Save"))
//!         .with("@click", Value::function(|_| println!("saved"))),
//!     &["Save".into()],
//! )?;
//! ```

mod binding;
mod coerce;
mod config;
mod platform;
mod options;
mod provider;
mod resolver;
mod value;

pub use binding::{DocumentScope, ElementBinding};
pub use coerce::{to_js_string, to_json_text};
pub use config::{Config, ConfigError, NamespaceRule};
pub use platform::{default_document, set_default_document};
pub use options::{Child, Key, Options};
pub use provider::{Provided, Target, provide};
pub use resolver::resolve;
pub use value::{Object, Symbol, Value};

// Re-export the DOM crate
pub use fos_dom as dom;

use fos_dom::{DomError, Element};
use tracing::{debug, warn};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Node creation or lookup refused by the DOM
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

/// Configures elements with a fixed [`Config`]
#[derive(Debug, Clone, Default)]
pub struct Configurator {
    config: Config,
}

impl Configurator {
    /// Validates `config` before accepting it
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Provide a node, resolve `options` on it, then append `children`.
    ///
    /// Returns `Ok(None)` only when `target` is a selector that matched
    /// nothing.
    pub fn configure(
        &self,
        target: impl Into<Target>,
        options: &Options,
        children: &[Child],
    ) -> Result<Option<Element>, Error> {
        let scope = options.document().cloned().unwrap_or_else(default_document);

        let Some(provided) = provide(target.into(), options, &scope, &self.config)? else {
            return Ok(None);
        };
        let node = provided.node;

        resolve(&node, options, provided.consumed_hint.as_deref());

        if !children.is_empty() {
            append_children(&node, children);
        }
        debug!("Configured <{}> ({} options, {} children)", node.local_name(), options.len(), children.len());
        Ok(Some(node))
    }
}

fn append_children(node: &Element, children: &[Child]) {
    for child in children {
        let result = match child {
            Child::Element(element) => node.append_child(element),
            Child::Text(text) => node.append_text(text),
        };
        if let Err(err) = result {
            warn!("Child not appended to <{}>: {}", node.local_name(), err);
        }
    }
}

/// Configure with the default [`Config`]
pub fn configure(
    target: impl Into<Target>,
    options: &Options,
    children: &[Child],
) -> Result<Option<Element>, Error> {
    Configurator::default().configure(target, options, children)
}
