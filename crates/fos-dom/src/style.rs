//! Inline style (`style.cssText`)
//!
//! Declarations are kept as written; malformed ones are dropped the way a
//! CSS parser drops them.

/// Parsed inline declaration block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssDeclarations {
    declarations: Vec<(String, String)>,
}

impl CssDeclarations {
    /// Parse a declaration block such as `color: red; margin: 0`
    pub fn parse(text: &str) -> Self {
        let mut declarations: Vec<(String, String)> = Vec::new();
        for chunk in split_declarations(text) {
            let Some((name, value)) = chunk.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if value.is_empty() || !is_property_name(name) {
                continue;
            }
            let name = if name.starts_with("--") {
                name.to_string()
            } else {
                name.to_ascii_lowercase()
            };
            // Later declarations win
            declarations.retain(|(n, _)| *n != name);
            declarations.push((name, value.to_string()));
        }
        Self { declarations }
    }

    /// Value of a property
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check if there are no declarations
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize as `name: value;` pairs
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(n, v)| format!("{}: {};", n, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split on `;` outside quotes and parentheses
fn split_declarations(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&text[start..]);
    out
}

fn is_property_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
