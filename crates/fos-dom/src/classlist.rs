//! DOMTokenList (classList)
//!
//! Space-separated token set backing `classList`. The owning element keeps
//! the `class` attribute as the source of truth and round-trips through
//! this type on every mutation.

use crate::DomError;

/// DOMTokenList for managing space-separated tokens (e.g., classList)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from space-separated string, dropping duplicates
    pub fn from_string(s: &str) -> Self {
        let mut list = Self::new();
        for token in s.split_ascii_whitespace() {
            if !list.contains(token) {
                list.tokens.push(token.to_string());
            }
        }
        list
    }

    /// Get number of tokens
    pub fn length(&self) -> usize {
        self.tokens.len()
    }

    /// Get token at index
    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|s| s.as_str())
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token. Returns whether the list changed.
    pub fn add(&mut self, token: &str) -> Result<bool, DomError> {
        validate_token(token)?;
        if self.contains(token) {
            return Ok(false);
        }
        self.tokens.push(token.to_string());
        Ok(true)
    }

    /// Remove a token
    pub fn remove(&mut self, token: &str) -> Result<(), DomError> {
        validate_token(token)?;
        self.tokens.retain(|t| t != token);
        Ok(())
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> Result<bool, DomError> {
        validate_token(token)?;
        let present = self.contains(token);
        let wanted = force.unwrap_or(!present);
        if wanted && !present {
            self.tokens.push(token.to_string());
        } else if !wanted && present {
            self.tokens.retain(|t| t != token);
        }
        Ok(wanted)
    }

    /// Get value as string
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    /// Iterate over tokens
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

fn validate_token(token: &str) -> Result<(), DomError> {
    if token.is_empty() {
        return Err(DomError::InvalidToken { token: token.to_string() });
    }
    if token.chars().any(|c| c.is_ascii_whitespace()) {
        return Err(DomError::InvalidCharacter { name: token.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        let list = DOMTokenList::from_string("btn btn-primary  active btn");
        assert_eq!(list.length(), 3);
        assert!(list.contains("btn"));
        assert!(list.contains("btn-primary"));
        assert_eq!(list.value(), "btn btn-primary active");
    }

    #[test]
    fn test_add_remove() {
        let mut list = DOMTokenList::new();
        assert_eq!(list.add("foo"), Ok(true));
        assert_eq!(list.add("bar"), Ok(true));
        assert_eq!(list.add("foo"), Ok(false));
        assert_eq!(list.length(), 2);

        list.remove("foo").unwrap();
        assert_eq!(list.length(), 1);
        assert!(!list.contains("foo"));
    }

    #[test]
    fn test_invalid_tokens() {
        let mut list = DOMTokenList::new();
        assert!(matches!(list.add(""), Err(DomError::InvalidToken { .. })));
        assert!(matches!(list.add("a b"), Err(DomError::InvalidCharacter { .. })));
        assert_eq!(list.length(), 0);
    }

    #[test]
    fn test_toggle() {
        let mut list = DOMTokenList::new();

        assert_eq!(list.toggle("active", None), Ok(true));
        assert!(list.contains("active"));

        assert_eq!(list.toggle("active", None), Ok(false));
        assert!(!list.contains("active"));

        assert_eq!(list.toggle("active", Some(false)), Ok(false));
        assert!(!list.contains("active"));
    }
}
