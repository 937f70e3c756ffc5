//! Selectors
//!
//! The subset `querySelector` supports: selector lists of compound
//! selectors (type, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`)
//! joined by descendant or child combinators.

use crate::{DomError, DomTree, ElementData, Namespace, NodeId, DOMTokenList};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone)]
struct Compound {
    /// Relation to the compound on the left
    combinator: Combinator,
    parts: Vec<SimpleSelector>,
}

#[derive(Debug, Clone)]
struct ComplexSelector {
    compounds: Vec<Compound>,
}

/// Parsed comma-separated selector list
#[derive(Debug, Clone)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let mut selectors = Vec::new();
        for part in split_top_level(input, ',') {
            selectors.push(Parser::new(input, part).complex()?);
        }
        Ok(Self { selectors })
    }

    /// Check if the element at `id` matches any selector in the list
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.selectors
            .iter()
            .any(|sel| match_complex(sel, sel.compounds.len() - 1, tree, id))
    }

    /// First matching element below `root` in document order
    pub fn query_first(&self, tree: &DomTree, root: NodeId) -> Option<NodeId> {
        tree.descendants(root)
            .into_iter()
            .find(|&id| self.matches(tree, id))
    }
}

fn match_complex(sel: &ComplexSelector, index: usize, tree: &DomTree, id: NodeId) -> bool {
    let Some(element) = tree.get(id).and_then(|n| n.as_element()) else {
        return false;
    };
    let compound = &sel.compounds[index];
    if !compound.parts.iter().all(|p| matches_simple(p, element)) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let mut ancestor = tree.get(id).map_or(NodeId::NONE, |n| n.parent);
    match compound.combinator {
        Combinator::Child => match_complex(sel, index - 1, tree, ancestor),
        Combinator::Descendant => {
            while ancestor.is_valid() {
                if match_complex(sel, index - 1, tree, ancestor) {
                    return true;
                }
                ancestor = tree.get(ancestor).map_or(NodeId::NONE, |n| n.parent);
            }
            false
        }
    }
}

fn matches_simple(selector: &SimpleSelector, element: &ElementData) -> bool {
    let html = element.namespace == Namespace::Html;
    match selector {
        SimpleSelector::Universal => true,
        SimpleSelector::Tag(tag) if html => element.local_name.eq_ignore_ascii_case(tag),
        SimpleSelector::Tag(tag) => element.local_name == *tag,
        SimpleSelector::Id(id) => element.get_attr("id") == Some(id.as_str()),
        SimpleSelector::Class(class) => element
            .get_attr("class")
            .is_some_and(|c| DOMTokenList::from_string(c).contains(class)),
        SimpleSelector::Attr { name, value } => {
            let name = if html { name.to_ascii_lowercase() } else { name.clone() };
            match (element.get_attr(&name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        }
    }
}

/// Split on `sep` outside brackets and quotes
fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if c == sep && depth == 0 => {
                out.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&input[start..]);
    out
}

struct Parser<'a> {
    full: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(full: &'a str, part: &str) -> Self {
        Self { full, chars: part.chars().collect(), pos: 0 }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::InvalidSelector {
            selector: self.full.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn complex(&mut self) -> Result<ComplexSelector, DomError> {
        let mut compounds: Vec<Compound> = Vec::new();
        let mut pending: Option<Combinator> = None;

        self.skip_whitespace();
        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    if compounds.is_empty() || pending == Some(Combinator::Child) {
                        return Err(self.error("dangling combinator"));
                    }
                    self.pos += 1;
                    pending = Some(Combinator::Child);
                }
                Some(_) => {
                    if !compounds.is_empty() && pending.is_none() && !had_space {
                        return Err(self.error("unexpected character"));
                    }
                    let parts = self.compound()?;
                    compounds.push(Compound {
                        combinator: pending.take().unwrap_or(Combinator::Descendant),
                        parts,
                    });
                }
            }
        }

        if compounds.is_empty() {
            return Err(self.error("empty selector"));
        }
        if pending.is_some() {
            return Err(self.error("dangling combinator"));
        }
        Ok(ComplexSelector { compounds })
    }

    fn compound(&mut self) -> Result<Vec<SimpleSelector>, DomError> {
        let mut parts = Vec::new();

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                parts.push(SimpleSelector::Universal);
            }
            Some(c) if is_ident_char(c) => parts.push(SimpleSelector::Tag(self.ident()?)),
            _ => {}
        }

        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.pos += 1;
                    parts.push(SimpleSelector::Id(self.ident()?));
                }
                '.' => {
                    self.pos += 1;
                    parts.push(SimpleSelector::Class(self.ident()?));
                }
                '[' => {
                    self.pos += 1;
                    parts.push(self.attribute()?);
                }
                c if c.is_ascii_whitespace() || c == '>' => break,
                c => return Err(self.error(format!("unsupported character '{}'", c))),
            }
        }

        if parts.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(parts)
    }

    fn attribute(&mut self) -> Result<SimpleSelector, DomError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.pos += 1;
                self.skip_whitespace();
                let value = match self.peek() {
                    Some(q @ ('"' | '\'')) => self.quoted(q)?,
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                Some(value)
            }
            _ => return Err(self.error("malformed attribute selector")),
        };
        if self.peek() != Some(']') {
            return Err(self.error("unterminated attribute selector"));
        }
        self.pos += 1;
        Ok(SimpleSelector::Attr { name, value })
    }

    fn quoted(&mut self, quote: char) -> Result<String, DomError> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == quote {
                return Ok(out);
            }
            out.push(c);
        }
        Err(self.error("unterminated string"))
    }

    fn ident(&mut self) -> Result<String, DomError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
